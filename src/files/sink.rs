use std::io::Write;

use csv::{QuoteStyle, WriterBuilder};

use crate::models::{ForecastRow, PipelineError};

/// Writes the forecast table: a header row, then one row per item.
///
/// Text columns are quoted and numbers are left bare.
#[derive(Debug, Clone, Copy)]
pub struct ForecastWriter {
    delimiter: u8
}

impl ForecastWriter {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn write<W: Write>(&self, destination: W, rows: &[ForecastRow]) -> Result<(), PipelineError> {
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(QuoteStyle::NonNumeric)
            .from_writer(destination);

        for row in rows {
            writer.serialize(row)?;
        }

        writer.flush()?;

        Ok(())
    }
}
