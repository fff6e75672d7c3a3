use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use rust_xlsxwriter::Workbook;
use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::flow::{Cell, FlowRow};

/// UTF-8 byte order mark so spreadsheet programs pick the right encoding for the Chinese headers
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Every .xlsx file is a zip archive
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpreadsheetFormat {
    #[default]
    Xlsx,
    Csv,
}

impl SpreadsheetFormat {
    /// Guesses the format of uploaded bytes
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(ZIP_MAGIC) {
            Self::Xlsx
        } else {
            Self::Csv
        }
    }

    /// `.csv` files are CSV, anything else is written as a workbook
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Xlsx,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Csv => "text/csv; charset=utf-8",
        }
    }
}

/// Writes a flow table as CSV with the localized header row
pub fn write_rows<R: FlowRow, W: Write>(rows: &[R], writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);

    wtr.write_record(R::HEADERS)?;
    for row in rows {
        wtr.write_record(row.to_cells().iter().map(ToString::to_string))?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Renders a flow table as CSV bytes
pub fn export_rows<R: FlowRow>(rows: &[R]) -> Result<Vec<u8>> {
    let mut buf = UTF8_BOM.to_vec();
    write_rows(rows, &mut buf)?;
    Ok(buf)
}

/// Renders a flow table as a workbook with a single sheet named after the table
pub fn export_workbook<R: FlowRow>(rows: &[R]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(R::SHEET_NAME)?;

    for (col, header) in (0u16..).zip(R::HEADERS) {
        sheet.write_string(0, col, *header)?;
    }
    for (line, row) in (1u32..).zip(rows) {
        for (col, cell) in (0u16..).zip(row.to_cells()) {
            match cell {
                Cell::Text(text) => sheet.write_string(line, col, text)?,
                Cell::Number(n) => sheet.write_number(line, col, n)?,
            };
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Renders a flow table to spreadsheet bytes, ready to download
pub fn export_spreadsheet<R: FlowRow>(rows: &[R], format: SpreadsheetFormat) -> Result<Vec<u8>> {
    match format {
        SpreadsheetFormat::Xlsx => export_workbook(rows),
        SpreadsheetFormat::Csv => export_rows(rows),
    }
}

/// Exports a flow table to a file, as CSV or workbook depending on its extension
pub fn export_rows_to_file<R: FlowRow>(rows: &[R], path: &Path) -> Result<()> {
    let format = SpreadsheetFormat::from_path(path);
    let bytes = export_spreadsheet(rows, format)?;
    let mut file = File::create(path).map_err(|source| ConfigError::Storage {
        key: path.display().to_string(),
        source,
    })?;
    file.write_all(&bytes).map_err(|source| ConfigError::Storage {
        key: path.display().to_string(),
        source,
    })?;

    tracing::info!(
        sheet = R::SHEET_NAME,
        format = format.extension(),
        rows = rows.len(),
        path = %path.display(),
        "exported spreadsheet"
    );
    Ok(())
}
