pub mod groups;
pub mod metar_parser;
pub mod remarks_parser;
pub mod report_reader;
pub mod taf_parser;

pub use groups::is_station_id;
pub use metar_parser::MetarParser;
pub use remarks_parser::RemarksParser;
pub use report_reader::{InputFormat, RawReport, ReportReader};
pub use taf_parser::TafParser;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::WeatherReport;
use groups::is_period_group;

/// Decodes either report kind, telling TAFs from METARs by their header.
#[derive(Debug, Clone)]
pub struct ReportParser {
    metar: MetarParser,
    taf: TafParser,
}

impl Default for ReportParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportParser {
    pub fn new() -> Self {
        Self {
            metar: MetarParser::new(),
            taf: TafParser::new(),
        }
    }

    pub fn with_reference_time(mut self, reference_time: DateTime<Utc>) -> Self {
        self.metar = self.metar.with_reference_time(reference_time);
        self.taf = self.taf.with_reference_time(reference_time);
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.metar = self.metar.with_strict(strict);
        self.taf = self.taf.with_strict(strict);
        self
    }

    pub fn with_decode_remarks(mut self, decode_remarks: bool) -> Self {
        self.metar = self.metar.with_decode_remarks(decode_remarks);
        self
    }

    pub fn parse(&self, raw: &str) -> Result<WeatherReport> {
        if is_taf(raw) {
            self.taf.parse(raw).map(WeatherReport::Taf)
        } else {
            self.metar.parse(raw).map(WeatherReport::Metar)
        }
    }
}

/// A TAF either says so or carries a validity period right after its header.
pub fn is_taf(raw: &str) -> bool {
    let tokens: Vec<&str> = raw.split_whitespace().take(4).collect();
    match tokens.first() {
        Some(&"TAF") => true,
        Some(&"METAR") | Some(&"SPECI") | None => false,
        Some(_) => tokens.iter().skip(1).take(3).any(|t| is_period_group(t)),
    }
}
