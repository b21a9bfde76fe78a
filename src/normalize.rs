// Record normalization: raw text rows in, typed and deduplicated records out.
//
// Rows that fail validation are excluded and returned as `ValidationError`s
// alongside the accepted records; nothing is dropped without a trace.
use crate::error::ValidationError;
use crate::types::{NormalizeReport, RawRow, Record};
use crate::util::{clean_text, parse_f64_safe, parse_whole_number};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const MIN_EDITION: i64 = 1900;
pub const MAX_EDITION: i64 = 9999;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    /// Sorted by `(school_id, edition)`, one record per pair.
    pub records: Vec<Record>,
    pub rejected: Vec<ValidationError>,
    pub report: NormalizeReport,
}

/// Validate and convert a single row.
pub fn normalize_row(row: &RawRow) -> Result<Record, ValidationError> {
    let line = row.line;

    let school_id = clean_text(row.school_id.as_deref()).ok_or(ValidationError::MissingField {
        line,
        field: "school_id",
    })?;

    let edition = match parse_whole_number(row.edition.as_deref()) {
        Ok(Some(e)) => e,
        Ok(None) => return Err(ValidationError::MissingField { line, field: "edition" }),
        Err(()) => {
            let value = row.edition.as_deref().unwrap_or_default().trim().to_string();
            return Err(if parse_f64_safe(Some(&value)).is_some() {
                ValidationError::FractionalEdition { line, value }
            } else {
                ValidationError::InvalidNumber { line, field: "edition", value }
            });
        }
    };
    if !(MIN_EDITION..=MAX_EDITION).contains(&edition) {
        return Err(ValidationError::EditionOutOfRange { line, edition });
    }

    let raw_pct = clean_text(row.percentage.as_deref()).ok_or(ValidationError::MissingField {
        line,
        field: "percentage",
    })?;
    let percentage = parse_f64_safe(Some(&raw_pct)).ok_or_else(|| ValidationError::InvalidNumber {
        line,
        field: "percentage",
        value: raw_pct.clone(),
    })?;
    // Out-of-range values are rejected, never clamped.
    if !(0.0..=100.0).contains(&percentage) {
        return Err(ValidationError::PercentageOutOfRange { line, value: percentage });
    }

    let school_name = clean_text(row.school_name.as_deref()).unwrap_or_else(|| school_id.clone());

    Ok(Record {
        school_id,
        school_name,
        edition: edition as i32,
        percentage,
    })
}

/// Normalize a batch of rows.
///
/// When two rows share `(school_id, edition)` the later one in input order
/// wins and the replacement is counted in `report.duplicates_replaced`.
pub fn normalize(rows: &[RawRow]) -> Normalized {
    let mut by_key: BTreeMap<(String, i32), Record> = BTreeMap::new();
    let mut rejected = Vec::new();
    let mut duplicates_replaced = 0usize;

    for row in rows {
        match normalize_row(row) {
            Ok(record) => {
                let key = (record.school_id.clone(), record.edition);
                if by_key.insert(key, record).is_some() {
                    duplicates_replaced += 1;
                    debug!(line = row.line, "duplicate (school, edition) replaced by later row");
                }
            }
            Err(e) => {
                warn!(line = e.line(), error = %e, "row rejected");
                rejected.push(e);
            }
        }
    }

    let records: Vec<Record> = by_key.into_values().collect();
    let report = NormalizeReport {
        total_rows: rows.len(),
        accepted: records.len(),
        rejected: rejected.len(),
        duplicates_replaced,
    };
    debug!(?report, "normalization finished");
    Normalized { records, rejected, report }
}
