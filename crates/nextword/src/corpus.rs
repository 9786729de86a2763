#![forbid(unsafe_code)]

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::error::InitError;

/// Supplies the text records a vocabulary is built from. Called once at
/// startup; any error aborts initialization.
pub trait CorpusSource {
    /// All records, in corpus order.
    fn records(&self) -> Result<Vec<String>, InitError>;
}

impl CorpusSource for Vec<String> {
    fn records(&self) -> Result<Vec<String>, InitError> {
        Ok(self.clone())
    }
}

/// One column of a CSV file with a header row.
#[derive(Debug, Clone)]
pub struct CsvCorpus {
    path: PathBuf,
    field: String,
}

impl CsvCorpus {
    /// Read column `field` of the CSV at `path`.
    pub fn new(path: impl Into<PathBuf>, field: impl Into<String>) -> Self {
        Self { path: path.into(), field: field.into() }
    }
}

impl CorpusSource for CsvCorpus {
    fn records(&self) -> Result<Vec<String>, InitError> {
        let file = File::open(&self.path).map_err(|source| InitError::Corpus {
            path: self.path.display().to_string(),
            source,
        })?;
        let records = column(file, &self.field)?;
        log::info!("loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }
}

fn malformed(err: &csv::Error) -> InitError {
    let line = err
        .position()
        .and_then(|p| usize::try_from(p.line()).ok())
        .unwrap_or_default();
    InitError::MalformedCsv { line, reason: err.to_string() }
}

/// Extract column `field` from CSV data whose first row is the header.
///
/// Rows shorter than the header contribute an empty record so record
/// positions stay aligned with the file. Blank lines are skipped.
pub fn column<R: Read>(reader: R, field: &str) -> Result<Vec<String>, InitError> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let col = rdr
        .headers()
        .map_err(|e| malformed(&e))?
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == field)
        .ok_or_else(|| InitError::MissingField(field.to_string()))?;

    let mut out = Vec::new();
    for row in rdr.records() {
        let row = row.map_err(|e| malformed(&e))?;
        match row.get(col) {
            Some(text) => out.push(text.to_string()),
            None => {
                log::warn!("corpus row with {} fields has no {field:?} column", row.len());
                out.push(String::new());
            }
        }
    }
    Ok(out)
}
