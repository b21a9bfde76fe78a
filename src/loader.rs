// Tabular ingestion: CSV exports of the results and access-code sheets.
//
// Only the configured columns are read; cell values are passed through as
// text and validated later by `normalize`.
use crate::config::ColumnMap;
use crate::error::LoadError;
use crate::types::RawRow;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

/// Spreadsheet exports in pt-BR locales use `;` as field separator.
fn sniff_delimiter(header_line: &str) -> u8 {
    if header_line.matches(';').count() > header_line.matches(',').count() {
        b';'
    } else {
        b','
    }
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == name.trim())
        .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
}

fn open_sniffed(path: &Path) -> Result<(File, u8), LoadError> {
    let mut file = File::open(path)?;
    let mut first = String::new();
    BufReader::new(&mut file).read_line(&mut first)?;
    file.seek(SeekFrom::Start(0))?;
    Ok((file, sniff_delimiter(&first)))
}

pub fn load_results(path: &Path, columns: &ColumnMap) -> Result<Vec<RawRow>, LoadError> {
    let (file, delimiter) = open_sniffed(path)?;
    let rows = read_results(file, delimiter, columns)?;
    debug!(path = %path.display(), rows = rows.len(), "results sheet loaded");
    Ok(rows)
}

pub fn read_results<R: Read>(
    reader: R,
    delimiter: u8,
    columns: &ColumnMap,
) -> Result<Vec<RawRow>, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .delimiter(delimiter)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let id_col = column_index(&headers, &columns.school_id)?;
    let name_col = column_index(&headers, &columns.school_name)?;
    let edition_col = column_index(&headers, &columns.edition)?;
    let pct_col = column_index(&headers, &columns.percentage)?;

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result?;
        let cell = |col: usize| record.get(col).map(str::to_string);
        rows.push(RawRow {
            line: idx + 1,
            school_id: cell(id_col),
            school_name: cell(name_col),
            edition: cell(edition_col),
            percentage: cell(pct_col),
        });
    }
    Ok(rows)
}

/// Access codes, one per row of `column`. Blank cells are skipped.
pub fn load_access_codes(path: &Path, column: &str) -> Result<Vec<String>, LoadError> {
    let (file, delimiter) = open_sniffed(path)?;
    let codes = read_access_codes(file, delimiter, column)?;
    debug!(path = %path.display(), codes = codes.len(), "access sheet loaded");
    Ok(codes)
}

pub fn read_access_codes<R: Read>(
    reader: R,
    delimiter: u8,
    column: &str,
) -> Result<Vec<String>, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .delimiter(delimiter)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let col = column_index(&headers, column)?;
    let mut codes = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if let Some(code) = record.get(col).filter(|c| !c.is_empty()) {
            codes.push(code.to_string());
        }
    }
    Ok(codes)
}
