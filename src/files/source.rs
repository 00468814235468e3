use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use tracing::warn;

use crate::models::{Column, PipelineError, RawRecord};

/// Reads a delimited sales ledger, mapping its headers onto the canonical columns.
#[derive(Debug, Clone, Copy)]
pub struct LedgerReader {
    delimiter: u8
}

impl LedgerReader {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn open(&self, path: &Path) -> Result<LedgerRows<BufReader<File>>, PipelineError> {
        let file = File::open(path)?;
        self.from_reader(BufReader::new(file))
    }

    /// Collects every well-formed ledger line, skipping malformed ones.
    ///
    /// # Errors
    /// Returns `PipelineError` on a missing required column or an I/O failure.
    pub fn read_all<R: Read>(&self, source: R) -> Result<Vec<RawRecord>, PipelineError> {
        let mut records = Vec::new();

        for result in self.from_reader(source)? {
            match result {
                Ok(record) => records.push(record),
                Err(error) if error.is_io_error() => return Err(error.into()),
                Err(error) => warn!("Skipping malformed ledger line: {error}")
            }
        }

        Ok(records)
    }

    /// Validates the header row and returns an iterator over the ledger lines.
    ///
    /// # Errors
    /// Returns `PipelineError::MissingColumns` naming every required column that no header maps to.
    pub fn from_reader<R: Read>(&self, source: R) -> Result<LedgerRows<R>, PipelineError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        let headers = canonical_headers(reader.headers()?)?;

        Ok(LedgerRows {
            reader,
            headers,
            done: false
        })
    }
}

fn canonical_headers(headers: &StringRecord) -> Result<StringRecord, PipelineError> {
    let mut seen = Vec::<Column>::new();

    let canonical: StringRecord = headers.iter()
        .map(|header| match Column::from_header(header) {
            Some(column) if !seen.contains(&column) => {
                seen.push(column);
                column.canonical().to_string()
            }
            //NOTE: First matching header wins, later ones are renamed so they cannot collide
            Some(_) => format!("{header} (duplicate)"),
            None => header.to_string()
        })
        .collect();

    let missing: Vec<&'static str> = Column::ALL.into_iter()
        .filter(|column| column.is_required() && !seen.contains(column))
        .map(Column::canonical)
        .collect();

    if !missing.is_empty() {
        return Err(PipelineError::MissingColumns(missing));
    }

    Ok(canonical)
}

/// Ledger lines as `RawRecord`s. Malformed lines surface as errors without ending the iteration,
/// I/O failures end it.
pub struct LedgerRows<R> {
    reader: Reader<R>,
    headers: StringRecord,
    done: bool
}

impl<R: Read> Iterator for LedgerRows<R> {
    type Item = Result<RawRecord, csv::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut record = StringRecord::new();

        match self.reader.read_record(&mut record) {
            Ok(true) => {
                let result = record.deserialize::<RawRecord>(Some(&self.headers))
                    .map(|mut raw| {
                        raw.line = record.position().map(|position| position.line());
                        raw
                    });

                Some(result)
            }
            Ok(false) => {
                self.done = true;
                None
            }
            Err(error) => {
                self.done = error.is_io_error();
                Some(Err(error))
            }
        }
    }
}
