// Read-only view over one load of normalized records.
//
// A `Dataset` is never mutated after construction. Refreshing the data means
// building a new one and dropping the old.
use crate::deltas::compute_deltas;
use crate::error::{EmptyResult, ValidationError};
use crate::normalize::{normalize, Normalized};
use crate::ranking::rank_edition;
use crate::series::{build_all_series, build_series, editions, find_school_id, school_names, Series};
use crate::types::{DeltaEntry, NormalizeReport, RankingEntry, RawRow, Record};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    report: NormalizeReport,
}

impl Dataset {
    /// Normalize `rows`; rejected rows are handed back to the caller.
    pub fn from_rows(rows: &[RawRow]) -> (Self, Vec<ValidationError>) {
        let Normalized { records, rejected, report } = normalize(rows);
        debug!(records = records.len(), rejected = rejected.len(), "dataset built");
        (Dataset { records, report }, rejected)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn report(&self) -> &NormalizeReport {
        &self.report
    }

    pub fn editions(&self) -> Vec<i32> {
        editions(&self.records)
    }

    pub fn school_names(&self) -> Vec<String> {
        school_names(&self.records)
    }

    pub fn school_id_for_name(&self, name: &str) -> Option<&str> {
        find_school_id(&self.records, name)
    }

    pub fn school_name(&self, school_id: &str) -> Option<&str> {
        latest_name(&self.records, school_id)
    }

    pub fn series(&self, school_id: &str) -> Result<Series, EmptyResult> {
        let s = build_series(&self.records, school_id);
        if s.is_empty() {
            return Err(EmptyResult::School(school_id.to_string()));
        }
        Ok(s)
    }

    pub fn all_series(&self) -> Vec<Series> {
        build_all_series(&self.records)
    }

    pub fn deltas(&self, school_id: &str) -> Result<Vec<DeltaEntry>, EmptyResult> {
        self.series(school_id).map(|s| compute_deltas(&s))
    }

    pub fn ranking(&self, edition: i32) -> Result<Vec<RankingEntry>, EmptyResult> {
        let ranking = rank_edition(&self.records, edition);
        if ranking.is_empty() {
            return Err(EmptyResult::Edition(edition));
        }
        Ok(ranking)
    }
}

// Latest edition's name for the school.
fn latest_name<'a>(records: &'a [Record], school_id: &str) -> Option<&'a str> {
    records
        .iter()
        .filter(|r| r.school_id == school_id)
        .max_by_key(|r| r.edition)
        .map(|r| r.school_name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, name: &str, edition: &str, pct: &str) -> RawRow {
        RawRow {
            line: 0,
            school_id: Some(id.into()),
            school_name: Some(name.into()),
            edition: Some(edition.into()),
            percentage: Some(pct.into()),
        }
    }

    fn sample() -> Dataset {
        let rows = vec![
            raw("S1", "Escola X", "2022", "70.0"),
            raw("S1", "Escola X", "2023", "75.5"),
            raw("S2", "Escola Y", "2023", "80"),
            raw("S3", "Escola Z", "2023", "abc"),
        ];
        let (ds, rejected) = Dataset::from_rows(&rows);
        assert_eq!(rejected.len(), 1);
        ds
    }

    #[test]
    fn queries_signal_empty_results() {
        let ds = sample();
        assert_eq!(ds.series("S9").unwrap_err(), EmptyResult::School("S9".into()));
        assert_eq!(ds.ranking(2008).unwrap_err(), EmptyResult::Edition(2008));
        assert_eq!(ds.ranking(2023).unwrap().len(), 2);
    }

    #[test]
    fn deltas_for_one_school() {
        let ds = sample();
        let d = ds.deltas("S1").unwrap();
        assert_eq!(d.len(), 1);
        assert!((d[0].delta - 5.5).abs() < 1e-9);
        assert!(ds.deltas("S2").unwrap().is_empty());
    }

    #[test]
    fn listings_and_lookups() {
        let ds = sample();
        assert_eq!(ds.editions(), vec![2022, 2023]);
        assert_eq!(ds.school_names(), vec!["Escola X", "Escola Y"]);
        assert_eq!(ds.school_id_for_name("Escola Y"), Some("S2"));
        assert_eq!(ds.school_name("S1"), Some("Escola X"));
        assert_eq!(ds.all_series().len(), 2);
        assert_eq!(ds.report().rejected, 1);
    }

    #[test]
    fn dataset_is_shareable_across_threads() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<Dataset>();
    }
}
