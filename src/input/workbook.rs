//! Spreadsheet workbooks read through calamine.
//!
//! Only the first sheet is read. Its first non-empty row is the header, and
//! every later row in the used range becomes one record, blank rows included.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use super::InputError;

const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Returns true when `path` has a spreadsheet extension (case-insensitive).
pub(super) fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Reads the first sheet of the workbook at `path` as rows of cell text.
pub(super) fn read_first_sheet(path: &Path) -> Result<Vec<Vec<String>>, InputError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|source| InputError::workbook(path, source))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(InputError::Empty)?
        .map_err(|source| InputError::workbook(path, source))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

/// Empty and error cells read as `""`; whole numbers drop the `.0`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(text) => text.clone(),
        #[allow(clippy::float_cmp)]
        Data::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{value:.0}")
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    #[test]
    fn test_workbook_extension_detection() {
        assert!(is_workbook(Path::new("in/all.xlsx")));
        assert!(is_workbook(Path::new("in/ALL.XLS")));
        assert!(is_workbook(Path::new("in/all.ods")));
        assert!(!is_workbook(Path::new("in/all.csv")));
        assert!(!is_workbook(Path::new("in/all")));
    }

    #[test]
    fn test_cell_text_conversions() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::Error(CellErrorType::NA)), "");
        assert_eq!(cell_text(&Data::String("Atta".to_string())), "Atta");
        assert_eq!(cell_text(&Data::Float(7.0)), "7");
        assert_eq!(cell_text(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_text(&Data::Int(12)), "12");
    }
}
