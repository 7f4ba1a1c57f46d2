use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProcessingError, Result};

const RAW_TEXT_COLUMN: &str = "raw_text";

/// Layout of a report input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// One report per line; indented lines continue the previous report.
    #[default]
    Text,
    /// CSV with a `raw_text` column.
    Csv,
}

/// One undecoded report and the line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReport {
    pub line_number: usize,
    pub text: String,
}

impl RawReport {
    pub fn new(line_number: usize, text: impl Into<String>) -> Self {
        Self {
            line_number,
            text: text.into(),
        }
    }
}

/// Reads raw METAR/TAF text from files.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportReader {
    format: InputFormat,
}

impl ReportReader {
    pub fn new(format: InputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> InputFormat {
        self.format
    }

    pub fn read(&self, path: &Path) -> Result<Vec<RawReport>> {
        let file = File::open(path)?;
        let reports = match self.format {
            InputFormat::Text => read_text(BufReader::new(file))?,
            InputFormat::Csv => read_csv(file)?,
        };
        debug!("Read {} reports from {}", reports.len(), path.display());
        Ok(reports)
    }

    pub async fn read_async(&self, path: &Path) -> Result<Vec<RawReport>> {
        let content = tokio::fs::read_to_string(path).await?;
        let reports = self.read_str(&content)?;
        debug!("Read {} reports from {}", reports.len(), path.display());
        Ok(reports)
    }

    pub fn read_str(&self, content: &str) -> Result<Vec<RawReport>> {
        match self.format {
            InputFormat::Text => read_text(content.as_bytes()),
            InputFormat::Csv => read_csv(content.as_bytes()),
        }
    }
}

fn read_text<R: BufRead>(reader: R) -> Result<Vec<RawReport>> {
    let mut reports: Vec<RawReport> = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let continues = line.starts_with(char::is_whitespace);
        match reports.last_mut() {
            Some(previous) if continues => {
                previous.text.push(' ');
                previous.text.push_str(trimmed);
            }
            _ => reports.push(RawReport::new(index + 1, trimmed)),
        }
    }
    Ok(reports)
}

fn read_csv<R: Read>(reader: R) -> Result<Vec<RawReport>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let column = reader
        .headers()?
        .iter()
        .position(|h| h.eq_ignore_ascii_case(RAW_TEXT_COLUMN))
        .ok_or_else(|| {
            ProcessingError::MissingData(format!("CSV input has no '{}' column", RAW_TEXT_COLUMN))
        })?;

    let mut reports = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line_number = record.position().map_or(0, |p| p.line() as usize);
        match record.get(column).filter(|text| !text.is_empty()) {
            Some(text) => reports.push(RawReport::new(line_number, text)),
            None => debug!("Skipping CSV line {} without report text", line_number),
        }
    }
    Ok(reports)
}
