use crate::types::{CardText, Result};
use crate::workbook::Workbook;
use log::{debug, info};
use std::io::{Read, Write};
use std::path::Path;

impl Workbook {
    /// Load every row of a CSV file; there is no header row
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let workbook = Self::from_reader(file)?;
        info!(
            "Loaded {} rows from {}",
            workbook.max_row(),
            path.display()
        );
        Ok(workbook)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Workbook::from_rows(rows))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        self.to_writer(file)?;
        debug!("Saved workbook to {}", path.as_ref().display());
        Ok(())
    }

    /// Write as CSV, padding short rows so every record has the same width
    pub fn to_writer(&self, writer: impl Write) -> Result<()> {
        let width = self.max_column();
        let mut writer = csv::WriterBuilder::new().from_writer(writer);
        for row in self.rows() {
            let padded = row
                .iter()
                .map(String::as_str)
                .chain(std::iter::repeat_n("", width - row.len()));
            writer.write_record(padded)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Read card text from a CSV file with a header row: the first column is the
/// title and the second the body. Shorter rows are skipped.
pub fn load_card_text(path: impl AsRef<Path>) -> Result<Vec<CardText>> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(contents.as_bytes());
    let mut cards = Vec::new();

    for result in reader.records() {
        let record = result?;
        if record.len() >= 2 {
            cards.push(CardText {
                title: record[0].to_string(),
                body: record[1].to_string(),
            });
        }
    }

    debug!("Read {} card(s) from {}", cards.len(), path.as_ref().display());
    Ok(cards)
}
