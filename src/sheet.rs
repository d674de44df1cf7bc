//! Reading of spreadsheet exports (`.xls`, `.xlsx`, `.xlsm`, `.ods`).
//!
//! ProQuest delivers its exports as workbooks. Only the first worksheet is
//! read; its first row holds the column names and every later row is one
//! reference. Cells are looked up by exact (trimmed) header name, like the
//! delimited exports.

use calamine::{Data, Range, Reader, open_workbook_auto};
use std::path::Path;

use crate::schema::FieldRole;
use crate::{ConvertError, Record, Result};

/// File extensions read as workbooks rather than as text.
pub(crate) const SPREADSHEET_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsm", "ods"];

/// Whether `path` carries one of the [`SPREADSHEET_EXTENSIONS`], ignoring case.
pub(crate) fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SPREADSHEET_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}

/// Reads the requested `columns` from the first worksheet of the workbook at `path`.
///
/// # Errors
///
/// Returns [`ConvertError::Spreadsheet`] if the workbook cannot be opened or
/// has no worksheet, and [`ConvertError::ColumnNotFound`] if a requested
/// column is missing from the header row.
pub(crate) fn read_first_sheet(
    path: &Path,
    columns: &[(FieldRole, &'static str)],
) -> Result<Vec<Record>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| spreadsheet_error(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| spreadsheet_error(path, calamine::Error::Msg("workbook has no worksheets")))?
        .map_err(|e| spreadsheet_error(path, e))?;

    records_from_range(&range, columns, path)
}

fn records_from_range(
    range: &Range<Data>,
    columns: &[(FieldRole, &'static str)],
    path: &Path,
) -> Result<Vec<Record>> {
    let mut rows = range.rows();
    let header = rows.next().unwrap_or(&[]);

    let positions = columns
        .iter()
        .map(|(role, column)| {
            header
                .iter()
                .position(|cell| cell_text(cell).is_some_and(|name| name.trim() == *column))
                .map(|index| (*role, index))
                .ok_or_else(|| ConvertError::ColumnNotFound {
                    path: path.to_path_buf(),
                    column: column.to_string(),
                })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(rows
        .map(|row| {
            let mut record = Record::default();
            for (role, index) in &positions {
                record.set(*role, row.get(*index).and_then(cell_text));
            }
            record
        })
        .collect())
}

/// Text of a cell; empty cells are absent. Numbers print without a trailing `.0`.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn spreadsheet_error(path: &Path, source: calamine::Error) -> ConvertError {
    ConvertError::Spreadsheet {
        path: path.to_path_buf(),
        source,
    }
}
