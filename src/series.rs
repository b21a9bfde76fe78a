use crate::types::{ChartSeries, Record};
use crate::util::format_percent;
use std::collections::{BTreeMap, BTreeSet};

/// One school's records ordered by edition. Gaps between editions are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub school_id: String,
    pub records: Vec<Record>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Name from the most recent edition; schools get renamed over time.
    pub fn school_name(&self) -> Option<&str> {
        self.records.last().map(|r| r.school_name.as_str())
    }

    /// Bar/line chart data: edition labels with `95.5%` annotations.
    pub fn chart(&self) -> ChartSeries {
        ChartSeries {
            title: self.school_name().unwrap_or(&self.school_id).to_string(),
            labels: self.records.iter().map(|r| r.edition.to_string()).collect(),
            values: self.records.iter().map(|r| r.percentage).collect(),
            annotations: self.records.iter().map(|r| format_percent(r.percentage)).collect(),
        }
    }
}

/// All records of `school_id`, ascending by edition.
///
/// If the input holds two records for the same edition only the last is
/// kept, so the result is strictly increasing even for unnormalized input.
pub fn build_series(records: &[Record], school_id: &str) -> Series {
    let mut by_edition: BTreeMap<i32, &Record> = BTreeMap::new();
    for r in records.iter().filter(|r| r.school_id == school_id) {
        by_edition.insert(r.edition, r);
    }
    Series {
        school_id: school_id.to_string(),
        records: by_edition.into_values().cloned().collect(),
    }
}

/// One series per school, ordered by school name then id.
pub fn build_all_series(records: &[Record]) -> Vec<Series> {
    let ids: BTreeSet<&str> = records.iter().map(|r| r.school_id.as_str()).collect();
    let mut all: Vec<Series> = ids.into_iter().map(|id| build_series(records, id)).collect();
    all.sort_by(|a, b| {
        a.school_name()
            .cmp(&b.school_name())
            .then_with(|| a.school_id.cmp(&b.school_id))
    });
    all
}

/// Look up a school id by its (trimmed) display name.
///
/// A name shared by several ids resolves to the smallest id.
pub fn find_school_id<'a>(records: &'a [Record], name: &str) -> Option<&'a str> {
    let name = name.trim();
    records
        .iter()
        .filter(|r| r.school_name == name)
        .map(|r| r.school_id.as_str())
        .min()
}

/// Distinct school names, sorted.
pub fn school_names(records: &[Record]) -> Vec<String> {
    let names: BTreeSet<&str> = records.iter().map(|r| r.school_name.as_str()).collect();
    names.into_iter().map(str::to_string).collect()
}

/// Distinct editions, ascending.
pub fn editions(records: &[Record]) -> Vec<i32> {
    let set: BTreeSet<i32> = records.iter().map(|r| r.edition).collect();
    set.into_iter().collect()
}
