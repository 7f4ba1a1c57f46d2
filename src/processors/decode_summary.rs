use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProcessingError;
use crate::models::WeatherReport;

/// A report that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeFailure {
    pub line_number: usize,
    pub raw_text: String,
    pub message: String,
}

/// Outcome counts for a batch of decoded reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodeSummary {
    pub total_reports: usize,
    pub decoded_reports: usize,
    pub failed_reports: usize,
    /// Decoded, but with groups left in `unparsed_groups`.
    pub partially_decoded_reports: usize,
    pub metar_count: usize,
    pub speci_count: usize,
    pub taf_count: usize,
    pub failures: Vec<DecodeFailure>,
    pub station_counts: BTreeMap<String, usize>,
}

impl DecodeSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, report: &WeatherReport) {
        self.total_reports += 1;
        self.decoded_reports += 1;
        if !report.unparsed_groups().is_empty() {
            self.partially_decoded_reports += 1;
        }
        match report.data_type() {
            "TAF" => self.taf_count += 1,
            "SPECI" => self.speci_count += 1,
            _ => self.metar_count += 1,
        }
        *self
            .station_counts
            .entry(report.station_id().to_string())
            .or_insert(0) += 1;
    }

    pub fn record_failure(&mut self, line_number: usize, raw_text: &str, error: &ProcessingError) {
        self.total_reports += 1;
        self.failed_reports += 1;
        self.failures.push(DecodeFailure {
            line_number,
            raw_text: raw_text.to_string(),
            message: error.to_string(),
        });
    }

    /// Fold another chunk's counts into this one. Failures stay ordered by line.
    pub fn merge(&mut self, other: DecodeSummary) {
        self.total_reports += other.total_reports;
        self.decoded_reports += other.decoded_reports;
        self.failed_reports += other.failed_reports;
        self.partially_decoded_reports += other.partially_decoded_reports;
        self.metar_count += other.metar_count;
        self.speci_count += other.speci_count;
        self.taf_count += other.taf_count;
        self.failures.extend(other.failures);
        self.failures.sort_by_key(|f| f.line_number);
        for (station, count) in other.station_counts {
            *self.station_counts.entry(station).or_insert(0) += count;
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_reports == 0 {
            return 0.0;
        }
        100.0 * self.decoded_reports as f64 / self.total_reports as f64
    }

    pub fn is_clean(&self) -> bool {
        self.failed_reports == 0 && self.partially_decoded_reports == 0
    }

    fn percent(&self, count: usize) -> f64 {
        if self.total_reports == 0 {
            0.0
        } else {
            100.0 * count as f64 / self.total_reports as f64
        }
    }

    pub fn generate_report(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Decode Report ===\n");
        summary.push_str(&format!("Total Reports: {}\n", self.total_reports));
        summary.push_str(&format!(
            "Decoded Reports: {} ({:.1}%)\n",
            self.decoded_reports,
            self.percent(self.decoded_reports)
        ));
        summary.push_str(&format!(
            "Partially Decoded: {} ({:.1}%)\n",
            self.partially_decoded_reports,
            self.percent(self.partially_decoded_reports)
        ));
        summary.push_str(&format!(
            "Failed Reports: {} ({:.1}%)\n",
            self.failed_reports,
            self.percent(self.failed_reports)
        ));
        summary.push_str(&format!(
            "\nMETAR: {}  SPECI: {}  TAF: {}\n",
            self.metar_count, self.speci_count, self.taf_count
        ));
        summary.push_str(&format!("Stations: {}\n", self.station_counts.len()));

        if !self.failures.is_empty() {
            summary.push_str("\nTop 10 Failures:\n");
            for (i, failure) in self.failures.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. Line {}: {}\n",
                    i + 1,
                    failure.line_number,
                    failure.message
                ));
            }
        }

        summary
    }
}

impl fmt::Display for DecodeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.generate_report())
    }
}
