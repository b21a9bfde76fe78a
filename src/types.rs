use serde::Serialize;
use tabled::Tabled;

/// One data row as it arrives from the tabular source, before validation.
///
/// Every field is optional text; `line` is the 1-based data row number
/// (header excluded) used in error messages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    pub line: usize,
    pub school_id: Option<String>,
    pub school_name: Option<String>,
    pub edition: Option<String>,
    pub percentage: Option<String>,
}

impl From<&Record> for RawRow {
    fn from(r: &Record) -> Self {
        RawRow {
            line: 0,
            school_id: Some(r.school_id.clone()),
            school_name: Some(r.school_name.clone()),
            edition: Some(r.edition.to_string()),
            // `Display` for f64 round-trips exactly through `parse`.
            percentage: Some(r.percentage.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub school_id: String,
    pub school_name: String,
    pub edition: i32,
    pub percentage: f64,
}

/// Totals from a normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    pub total_rows: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub duplicates_replaced: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaEntry {
    pub school_name: String,
    pub edition_current: i32,
    pub edition_previous: i32,
    pub percentage_current: f64,
    pub percentage_previous: f64,
    pub delta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increase,
    Decrease,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub rank: usize,
    pub school_id: String,
    pub school_name: String,
    pub edition: i32,
    pub percentage: f64,
}

/// Data handed to an external bar/line chart renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub annotations: Vec<String>,
}

// Display rows. Numbers are pre-formatted strings, same as the CSV exports.

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ResultRow {
    #[serde(rename = "INEP")]
    #[tabled(rename = "INEP")]
    pub school_id: String,
    #[serde(rename = "ESCOLA")]
    #[tabled(rename = "ESCOLA")]
    pub school_name: String,
    #[serde(rename = "EDIÇÃO")]
    #[tabled(rename = "EDIÇÃO")]
    pub edition: i32,
    #[serde(rename = "PERCENTUAL ALFABETIZAÇÃO")]
    #[tabled(rename = "PERCENTUAL ALFABETIZAÇÃO")]
    pub percentage: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct DeltaRow {
    #[serde(rename = "Escola")]
    #[tabled(rename = "Escola")]
    pub school_name: String,
    #[serde(rename = "Comparação")]
    #[tabled(rename = "Comparação")]
    pub comparison: String,
    #[serde(rename = "Edição Atual")]
    #[tabled(rename = "Edição Atual")]
    pub edition_current: i32,
    #[serde(rename = "Edição Anterior")]
    #[tabled(rename = "Edição Anterior")]
    pub edition_previous: i32,
    #[serde(rename = "Diferença Percentual")]
    #[tabled(rename = "Diferença Percentual")]
    pub delta: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RankingRow {
    #[serde(rename = "ORD")]
    #[tabled(rename = "ORD")]
    pub rank: usize,
    #[serde(rename = "INEP")]
    #[tabled(rename = "INEP")]
    pub school_id: String,
    #[serde(rename = "ESCOLA")]
    #[tabled(rename = "ESCOLA")]
    pub school_name: String,
    #[serde(rename = "PERCENTUAL")]
    #[tabled(rename = "PERCENTUAL")]
    pub percentage: String,
}
