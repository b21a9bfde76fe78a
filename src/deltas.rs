use crate::series::Series;
use crate::types::{DeltaEntry, Trend};

impl Trend {
    pub fn of(delta: f64) -> Trend {
        if delta > 0.0 {
            Trend::Increase
        } else if delta < 0.0 {
            Trend::Decrease
        } else {
            Trend::Flat
        }
    }
}

impl DeltaEntry {
    pub fn trend(&self) -> Trend {
        Trend::of(self.delta)
    }

    /// `"2023 - 2022"`, current edition first.
    pub fn comparison_label(&self) -> String {
        format!("{} - {}", self.edition_current, self.edition_previous)
    }
}

/// One entry per consecutive pair of editions; empty for fewer than two.
///
/// Deltas are exact differences. Rounding is left to the display layer.
pub fn compute_deltas(series: &Series) -> Vec<DeltaEntry> {
    series
        .records
        .windows(2)
        .map(|pair| {
            let (prev, cur) = (&pair[0], &pair[1]);
            DeltaEntry {
                school_name: cur.school_name.clone(),
                edition_current: cur.edition,
                edition_previous: prev.edition,
                percentage_current: cur.percentage,
                percentage_previous: prev.percentage,
                delta: cur.percentage - prev.percentage,
            }
        })
        .collect()
}
