// Presentation helpers: display rows, trend glyphs, CSV/JSON export and
// console table previews.
use crate::series::Series;
use crate::types::{DeltaEntry, DeltaRow, RankingEntry, RankingRow, ResultRow, Trend};
use crate::util::{format_delta, format_percent};
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};
use tracing::debug;

/// Arrow shown next to a delta; flat deltas get none.
pub fn trend_glyph(trend: Trend) -> &'static str {
    match trend {
        Trend::Increase => "▲",
        Trend::Decrease => "▼",
        Trend::Flat => "",
    }
}

/// Colour name for a delta, as used by the dashboard.
pub fn trend_color(trend: Trend) -> &'static str {
    match trend {
        Trend::Increase => "green",
        Trend::Decrease => "red",
        Trend::Flat => "blue",
    }
}

/// `▲ +5.50%`, `▼ -1.25%`, `0.00%`.
pub fn format_trend(delta: f64) -> String {
    let glyph = trend_glyph(Trend::of(delta));
    let value = format!("{}%", format_delta(delta));
    if glyph.is_empty() {
        value
    } else {
        format!("{} {}", glyph, value)
    }
}

pub fn result_rows(series: &Series) -> Vec<ResultRow> {
    series
        .records
        .iter()
        .map(|r| ResultRow {
            school_id: r.school_id.clone(),
            school_name: r.school_name.clone(),
            edition: r.edition,
            percentage: format_percent(r.percentage),
        })
        .collect()
}

pub fn delta_rows(deltas: &[DeltaEntry]) -> Vec<DeltaRow> {
    deltas
        .iter()
        .map(|d| DeltaRow {
            school_name: d.school_name.clone(),
            comparison: d.comparison_label(),
            edition_current: d.edition_current,
            edition_previous: d.edition_previous,
            delta: format_trend(d.delta),
        })
        .collect()
}

pub fn ranking_rows(ranking: &[RankingEntry]) -> Vec<RankingRow> {
    ranking
        .iter()
        .map(|e| RankingRow {
            rank: e.rank,
            school_id: e.school_id.clone(),
            school_name: e.school_name.clone(),
            percentage: format_percent(e.percentage),
        })
        .collect()
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    debug!(path = %path.display(), rows = rows.len(), "CSV written");
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    debug!(path = %path.display(), "JSON written");
    Ok(())
}

/// Markdown table of the first `max_rows` rows, or `(sem dados)`.
pub fn table_string<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(sem dados)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", table_string(rows, max_rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Record;

    fn delta(cur: f64, prev: f64) -> DeltaEntry {
        DeltaEntry {
            school_name: "Escola X".into(),
            edition_current: 2023,
            edition_previous: 2022,
            percentage_current: cur,
            percentage_previous: prev,
            delta: cur - prev,
        }
    }

    #[test]
    fn trend_presentation() {
        assert_eq!(format_trend(5.5), "▲ +5.50%");
        assert_eq!(format_trend(-1.25), "▼ -1.25%");
        assert_eq!(format_trend(0.0), "0.00%");
        assert_eq!(trend_color(Trend::Flat), "blue");
    }

    #[test]
    fn delta_rows_carry_comparison_label() {
        let rows = delta_rows(&[delta(75.5, 70.0)]);
        assert_eq!(rows[0].comparison, "2023 - 2022");
        assert_eq!(rows[0].delta, "▲ +5.50%");
    }

    #[test]
    fn markdown_preview_has_headers() {
        let series = Series {
            school_id: "1".into(),
            records: vec![Record {
                school_id: "1".into(),
                school_name: "Escola X".into(),
                edition: 2023,
                percentage: 75.5,
            }],
        };
        let table = table_string(&result_rows(&series), 5);
        assert!(table.contains("PERCENTUAL ALFABETIZAÇÃO"));
        assert!(table.contains("75.5%"));
        assert_eq!(table_string::<ResultRow>(&[], 5), "(sem dados)");
    }

    #[test]
    fn csv_export_uses_display_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranking_2023.csv");
        let ranking = vec![RankingEntry {
            rank: 1,
            school_id: "23001".into(),
            school_name: "Escola A".into(),
            edition: 2023,
            percentage: 95.5,
        }];
        write_csv(&path, &ranking_rows(&ranking)).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["ORD,INEP,ESCOLA,PERCENTUAL", "1,23001,Escola A,95.5%"]);
    }

    #[test]
    fn json_export_of_chart_series() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        let series = Series {
            school_id: "1".into(),
            records: vec![Record {
                school_id: "1".into(),
                school_name: "Escola X".into(),
                edition: 2023,
                percentage: 75.5,
            }],
        };
        write_json(&path, &series.chart()).unwrap();
        let v: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(v["labels"][0], "2023");
        assert_eq!(v["annotations"][0], "75.5%");
    }
}
