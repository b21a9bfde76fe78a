use crate::types::{RankingEntry, Record};

/// Rank every school of one edition, best percentage first.
///
/// Equal percentages are ordered by school name, then school id, so the
/// result never depends on input order. Ranks are ordinal: 1..N, no ties.
/// A NaN percentage (never produced by `normalize`) ranks last.
pub fn rank_edition(records: &[Record], edition: i32) -> Vec<RankingEntry> {
    let mut rows: Vec<&Record> = records.iter().filter(|r| r.edition == edition).collect();
    rows.sort_by(|a, b| {
        a.percentage
            .is_nan()
            .cmp(&b.percentage.is_nan())
            .then_with(|| b.percentage.total_cmp(&a.percentage))
            .then_with(|| a.school_name.cmp(&b.school_name))
            .then_with(|| a.school_id.cmp(&b.school_id))
    });
    rows.into_iter()
        .enumerate()
        .map(|(idx, r)| RankingEntry {
            rank: idx + 1,
            school_id: r.school_id.clone(),
            school_name: r.school_name.clone(),
            edition: r.edition,
            percentage: r.percentage,
        })
        .collect()
}
