//! Tabular specimen input.
//!
//! Reads the specimen spreadsheet either directly (`.xlsx`, `.xls`, `.ods`
//! and friends, first sheet) or as a comma- or tab-separated UTF-8 export. The
//! header must name the `Genus`, `Species` and `Sub_Species` columns; other
//! columns are ignored. Row indices count data rows from zero (the header is
//! not counted) and stay stable across blank or incomplete rows, since they
//! name the output files.

use std::fmt;
use std::mem::take;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

mod workbook;

const GENUS_COLUMN: &str = "Genus";
const SPECIES_COLUMN: &str = "Species";
const SUBSPECIES_COLUMN: &str = "Sub_Species";

/// Cell values treated as a missing subspecies.
const NULL_MARKERS: &[&str] = &["nan", "null", "none", "n/a"];

/// Errors produced while reading specimen input.
#[derive(Debug, Error)]
pub enum InputError {
    /// The input file could not be read.
    #[error("failed to read input file {path}: {source}")]
    Io {
        /// Input path.
        path: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A text input is not valid UTF-8.
    #[error("input file {path} is not valid UTF-8; re-export it as UTF-8 text or pass the workbook itself")]
    Encoding {
        /// Input path.
        path: String,
    },

    /// A spreadsheet workbook could not be opened or its first sheet read.
    #[error("failed to read workbook {path}: {source}")]
    Workbook {
        /// Workbook path.
        path: String,
        /// The underlying workbook error.
        #[source]
        source: calamine::Error,
    },

    /// A required column is absent from the header row.
    #[error("input header is missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: &'static str,
    },

    /// The input has no header row.
    #[error("input file is empty")]
    Empty,
}

impl InputError {
    fn workbook(path: &Path, source: calamine::Error) -> Self {
        Self::Workbook {
            path: path.display().to_string(),
            source,
        }
    }
}

/// One specimen row ready for resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecimenRow {
    /// Zero-based data row index; names the output file.
    pub index: usize,
    /// Genus with non-alphanumeric characters removed.
    pub genus: String,
    /// Species epithet, trimmed.
    pub species: String,
    /// Subspecies epithet, `""` when blank or null.
    pub subspecies: String,
}

impl fmt::Display for SpecimenRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} {}",
            self.index, self.genus, self.species, self.subspecies
        )
    }
}

/// Rows read from an input file.
#[derive(Debug, Default)]
pub struct SpecimenInput {
    /// Rows with both genus and species present.
    pub rows: Vec<SpecimenRow>,
    /// Indices of data rows that were blank or lacked genus/species.
    pub skipped: Vec<usize>,
}

impl SpecimenInput {
    /// Returns true if no usable rows were read.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns count of usable rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Reads specimen rows from a workbook or a delimited text file.
///
/// The format follows the extension: spreadsheet extensions are read as
/// workbooks, anything else as delimited UTF-8 text.
///
/// # Errors
///
/// Returns [`InputError`] if the file cannot be read or decoded, is empty, or
/// lacks a required column.
pub fn read_specimen_rows(path: &Path) -> Result<SpecimenInput, InputError> {
    if workbook::is_workbook(path) {
        return rows_from_records(workbook::read_first_sheet(path)?);
    }

    let bytes = std::fs::read(path).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|_| InputError::Encoding {
        path: path.display().to_string(),
    })?;
    parse_specimen_rows(&text)
}

/// Parses specimen rows from delimited text. The separator is detected from
/// the header line: tab if it contains one, comma otherwise.
///
/// # Errors
///
/// Returns [`InputError`] if the text is empty or lacks a required column.
pub fn parse_specimen_rows(text: &str) -> Result<SpecimenInput, InputError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let header_line = text.lines().next().ok_or(InputError::Empty)?;
    if header_line.trim().is_empty() {
        return Err(InputError::Empty);
    }
    let sep = if header_line.contains('\t') { '\t' } else { ',' };

    rows_from_records(parse_records(text, sep))
}

/// Applies the header and column rules to records whose first entry is the
/// header row.
fn rows_from_records(records: Vec<Vec<String>>) -> Result<SpecimenInput, InputError> {
    let mut records = records.into_iter();
    let header = records.next().ok_or(InputError::Empty)?;
    let genus_col = column_index(&header, GENUS_COLUMN)?;
    let species_col = column_index(&header, SPECIES_COLUMN)?;
    let subspecies_col = column_index(&header, SUBSPECIES_COLUMN)?;

    let mut input = SpecimenInput::default();
    for (index, record) in records.enumerate() {
        let genus = filter_genus(cell(&record, genus_col));
        let species = cell(&record, species_col).trim().to_string();
        if genus.is_empty() || species.is_empty() {
            debug!(index, "skipping row without genus or species");
            input.skipped.push(index);
            continue;
        }
        input.rows.push(SpecimenRow {
            index,
            genus,
            species,
            subspecies: normalize_subspecies(cell(&record, subspecies_col)),
        });
    }

    Ok(input)
}

/// Removes every character that is not alphanumeric.
#[must_use]
pub fn filter_genus(raw: &str) -> String {
    raw.chars().filter(|ch| ch.is_alphanumeric()).collect()
}

fn normalize_subspecies(raw: &str) -> String {
    let trimmed = raw.trim();
    if NULL_MARKERS
        .iter()
        .any(|marker| trimmed.eq_ignore_ascii_case(marker))
    {
        String::new()
    } else {
        trimmed.to_string()
    }
}

fn column_index(header: &[String], column: &'static str) -> Result<usize, InputError> {
    header
        .iter()
        .position(|name| name.trim() == column)
        .ok_or(InputError::MissingColumn { column })
}

fn cell(record: &[String], col: usize) -> &str {
    record.get(col).map_or("", String::as_str)
}

/// Splits delimited text into records. Quoted fields may contain the
/// separator, newlines and `""` escapes. Blank lines yield a record with one
/// empty field so data row indices stay aligned with the file.
fn parse_records(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut field = String::new();
    let mut record = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            c if c == sep && !in_quotes => record.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                record.push(take(&mut field));
                records.push(take(&mut record));
            }
            _ => field.push(ch),
        }
    }

    // Trailing record without a final newline.
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }

    records
}
