use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::info;

use crate::config::AppConfig;
use crate::error::{ProcessingError, Result};
use crate::models::WeatherReport;
use crate::parsers::{InputFormat, RawReport, ReportParser, ReportReader};
use crate::processors::DecodeSummary;
use crate::utils::constants::DEFAULT_CHUNK_SIZE;
use crate::utils::progress::ProgressReporter;

/// Decoded reports in input order, plus the outcome counts.
#[derive(Debug, Clone, Default)]
pub struct BatchOutput {
    pub reports: Vec<WeatherReport>,
    pub summary: DecodeSummary,
}

/// Decodes many raw reports on a rayon pool.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    max_workers: usize,
    chunk_size: usize,
    strict: bool,
    decode_remarks: bool,
    reference_time: Option<DateTime<Utc>>,
}

impl BatchProcessor {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            chunk_size: DEFAULT_CHUNK_SIZE,
            strict: false,
            decode_remarks: true,
            reference_time: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.processing.max_workers)
            .with_chunk_size(config.processing.chunk_size)
            .with_strict(config.parser.strict)
            .with_decode_remarks(config.parser.decode_remarks)
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_decode_remarks(mut self, decode_remarks: bool) -> Self {
        self.decode_remarks = decode_remarks;
        self
    }

    /// Resolve report days against this instant instead of the current time.
    pub fn with_reference_time(mut self, reference_time: DateTime<Utc>) -> Self {
        self.reference_time = Some(reference_time);
        self
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    fn parser(&self) -> ReportParser {
        let parser = ReportParser::new()
            .with_strict(self.strict)
            .with_decode_remarks(self.decode_remarks);
        match self.reference_time {
            Some(reference_time) => parser.with_reference_time(reference_time),
            None => parser,
        }
    }

    /// Decode `raw` in chunks. A report that fails to decode is counted in the
    /// summary; it never aborts the batch.
    pub fn process(
        &self,
        raw: &[RawReport],
        progress: Option<&ProgressReporter>,
    ) -> Result<BatchOutput> {
        info!(
            "Decoding {} reports with {} workers (chunk size {})",
            raw.len(),
            self.max_workers,
            self.chunk_size
        );
        if let Some(p) = progress {
            p.set_message(&format!("Decoding {} reports...", raw.len()));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let parser = self.parser();
        let processed_count = Arc::new(AtomicUsize::new(0));

        let chunks: Vec<BatchOutput> = pool.install(|| {
            raw.par_chunks(self.chunk_size)
                .map(|chunk| {
                    let output = decode_chunk(&parser, chunk);

                    let count = processed_count.fetch_add(chunk.len(), Ordering::Relaxed) + chunk.len();
                    if let Some(p) = progress {
                        p.update(count as u64);
                    }

                    output
                })
                .collect()
        });

        let mut output = BatchOutput {
            reports: Vec::with_capacity(raw.len()),
            summary: DecodeSummary::new(),
        };
        for chunk in chunks {
            output.reports.extend(chunk.reports);
            output.summary.merge(chunk.summary);
        }

        info!(
            "Decoded {}/{} reports ({:.1}%), {} failed",
            output.summary.decoded_reports,
            output.summary.total_reports,
            output.summary.success_rate(),
            output.summary.failed_reports
        );
        Ok(output)
    }

    /// Read `path` asynchronously and decode it on a blocking thread.
    pub async fn process_file(
        &self,
        path: &Path,
        format: InputFormat,
        show_progress: bool,
    ) -> Result<BatchOutput> {
        let raw = ReportReader::new(format).read_async(path).await?;
        info!("Read {} reports from {}", raw.len(), path.display());

        let processor = self.clone();
        tokio::task::spawn_blocking(move || {
            let progress = ProgressReporter::new(raw.len() as u64, "Decoding reports...", !show_progress);
            let output = processor.process(&raw, Some(&progress))?;
            progress.finish_with_message("Decoding complete");
            Ok(output)
        })
        .await?
    }
}

impl Default for BatchProcessor {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

fn decode_chunk(parser: &ReportParser, chunk: &[RawReport]) -> BatchOutput {
    let mut output = BatchOutput {
        reports: Vec::with_capacity(chunk.len()),
        summary: DecodeSummary::new(),
    };
    for item in chunk {
        match parser.parse(&item.text) {
            Ok(report) => {
                output.summary.record_success(&report);
                output.reports.push(report);
            }
            Err(error) => output
                .summary
                .record_failure(item.line_number, &item.text, &error),
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw_reports() -> Vec<RawReport> {
        vec![
            RawReport::new(1, "KJFK 151151Z 28015KT 10SM CLR 20/10 A3000"),
            RawReport::new(2, "NOT A REPORT"),
            RawReport::new(3, "TAF KJFK 151130Z 1512/1618 28012KT P6SM SCT040"),
            RawReport::new(4, "EGLL 151150Z 24010KT 9999 BKN030 12/08 Q1015"),
            RawReport::new(5, "KORD 151151Z 36012KT 10SM FEW040 05/M01 A2990 RMK AO2"),
        ]
    }

    fn processor() -> BatchProcessor {
        BatchProcessor::new(2)
            .with_chunk_size(2)
            .with_reference_time(Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_process_keeps_order_and_counts() {
        let output = processor().process(&raw_reports(), None).unwrap();
        assert_eq!(output.reports.len(), 4);
        let stations: Vec<&str> = output.reports.iter().map(|r| r.station_id()).collect();
        assert_eq!(stations, vec!["KJFK", "KJFK", "EGLL", "KORD"]);

        assert_eq!(output.summary.total_reports, 5);
        assert_eq!(output.summary.failed_reports, 1);
        assert_eq!(output.summary.failures[0].line_number, 2);
        assert_eq!(output.summary.taf_count, 1);
    }

    #[test]
    fn test_chunk_size_does_not_change_result() {
        let small = processor().process(&raw_reports(), None).unwrap();
        let large = processor().with_chunk_size(100).process(&raw_reports(), None).unwrap();
        assert_eq!(small.reports, large.reports);
        assert_eq!(small.summary, large.summary);
    }

    #[test]
    fn test_from_config() {
        let mut config = AppConfig::default();
        config.processing.max_workers = 3;
        config.processing.chunk_size = 10;
        config.parser.strict = true;
        let processor = BatchProcessor::from_config(&config);
        assert_eq!(processor.max_workers(), 3);
        assert_eq!(processor.chunk_size(), 10);
    }

    #[test]
    fn test_empty_input() {
        let output = processor().process(&[], None).unwrap();
        assert!(output.reports.is_empty());
        assert_eq!(output.summary.total_reports, 0);
    }
}
