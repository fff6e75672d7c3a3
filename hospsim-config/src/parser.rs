use std::io::{Cursor, Read};
use std::path::Path;

use calamine::{open_workbook_from_rs, Reader, Xlsx};
use csv::ReaderBuilder;

use crate::error::{ConfigError, Result};
use crate::flow::FlowRow;
use crate::form::SpreadsheetFormat;

/// Parses a count, returning 0 if empty or invalid.
/// Decimal cells (e.g. "12.0" written by a spreadsheet) are rounded.
pub fn parse_number(value: &str) -> u32 {
    let trimmed = value.trim();
    if let Ok(n) = trimmed.parse() {
        return n;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v.round().min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

/// Parses a decimal, returning 0 if empty, invalid or not finite
pub fn parse_decimal(value: &str) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Strips the UTF-8 byte order mark spreadsheet programs prepend
fn strip_bom(header: &str) -> &str {
    header.trim_start_matches('\u{feff}').trim()
}

/// Position of each of `R::HEADERS` among the sheet's header cells
fn column_positions<R: FlowRow, S: AsRef<str>>(headers: &[S]) -> Vec<Option<usize>> {
    let columns: Vec<Option<usize>> = R::HEADERS
        .iter()
        .map(|wanted| headers.iter().position(|h| strip_bom(h.as_ref()) == *wanted))
        .collect();

    if columns.iter().all(Option::is_none) {
        tracing::warn!(sheet = R::SHEET_NAME, "no known column headers in spreadsheet");
    }
    columns
}

/// Builds a row from one record, or `None` for a blank line.
/// Text cells are kept exactly as written.
fn row_from_record<R: FlowRow, S: AsRef<str>>(columns: &[Option<usize>], record: &[S]) -> Option<R> {
    if record.iter().all(|cell| cell.as_ref().trim().is_empty()) {
        return None;
    }

    let cells: Vec<&str> = columns
        .iter()
        .map(|col| col.and_then(|i| record.get(i)).map_or("", |cell| cell.as_ref()))
        .collect();
    Some(R::from_cells(&cells))
}

/// Loads a flow table from CSV.
///
/// Columns are matched by their localized header so their order in the
/// sheet does not matter. A column that is missing altogether leaves every
/// row's cell blank, which `FlowRow::from_cells` turns into 0 or "".
pub fn import_rows<R: FlowRow, T: Read>(input: T) -> Result<Vec<R>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(input);

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    let columns = column_positions::<R, _>(&headers);

    let mut rows: Vec<R> = Vec::new();
    for result in reader.records() {
        let record = result?;
        let cells: Vec<&str> = record.iter().collect();
        rows.extend(row_from_record::<R, _>(&columns, &cells));
    }

    tracing::info!(sheet = R::SHEET_NAME, rows = rows.len(), "imported spreadsheet");
    Ok(rows)
}

/// Loads a flow table from the first worksheet of an .xlsx workbook,
/// with the same header matching and blank handling as [`import_rows`].
pub fn import_workbook<R: FlowRow>(bytes: &[u8]) -> Result<Vec<R>> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ConfigError::validation("Excel文件中没有工作表"))??;

    let mut records = range
        .rows()
        .map(|cells| cells.iter().map(ToString::to_string).collect::<Vec<String>>());
    let headers = records.next().unwrap_or_default();
    let columns = column_positions::<R, _>(&headers);

    let rows: Vec<R> = records
        .filter_map(|record| row_from_record::<R, _>(&columns, &record))
        .collect();

    tracing::info!(sheet = R::SHEET_NAME, rows = rows.len(), "imported workbook");
    Ok(rows)
}

/// Imports uploaded bytes as a workbook or as CSV, whichever they are
pub fn import_spreadsheet<R: FlowRow>(bytes: &[u8]) -> Result<Vec<R>> {
    match SpreadsheetFormat::sniff(bytes) {
        SpreadsheetFormat::Xlsx => import_workbook(bytes),
        SpreadsheetFormat::Csv => import_rows(bytes),
    }
}

pub fn import_rows_from_path<R: FlowRow, P: AsRef<Path>>(path: P) -> Result<Vec<R>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| ConfigError::Storage {
        key: path.display().to_string(),
        source,
    })?;
    import_spreadsheet(&bytes)
}
