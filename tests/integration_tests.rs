use std::io::Write;

use avwx_processor::config::AppConfig;
use avwx_processor::models::{ChangeIndicator, PressureUnit, SkyCoverage, WeatherReport};
use avwx_processor::parsers::{InputFormat, ReportParser, ReportReader};
use avwx_processor::processors::BatchProcessor;
use avwx_processor::services::{DataSource, InMemoryRepository, WeatherRepository};
use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use tempfile::{NamedTempFile, TempDir};

const METAR: &str =
    "METAR KJFK 151151Z 28015G25KT 10SM FEW040 SCT250 23/14 A3012 RMK AO2 PK WND 29032/1125 SLP201 P0002 T02330139";
const SPECI: &str = "SPECI KORD 151153Z AUTO 36012KT 1 1/2SM -SN BR OVC008 M02/M04 A2990";
const TAF: &str = "TAF KJFK 151130Z 1512/1618 28012KT P6SM FEW040 \
                   FM160000 31008KT P6SM SKC \
                   PROB30 1606/1610 2SM BR";

fn reference() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
}

fn parser() -> ReportParser {
    ReportParser::new().with_reference_time(reference())
}

#[test]
fn test_decode_metar_end_to_end() {
    let report = parser().parse(METAR).unwrap();
    let metar = report.as_metar().unwrap();

    assert_eq!(metar.station_id, "KJFK");
    assert_eq!(
        metar.observation_time,
        Utc.with_ymd_and_hms(2024, 3, 15, 11, 51, 0).unwrap()
    );
    assert!(metar.is_fully_decoded());

    let wind = metar.conditions.wind.as_ref().unwrap();
    assert_eq!(wind.direction_degrees(), Some(280));
    assert_eq!(wind.speed_value(), Some(15));
    assert_eq!(wind.gust_value(), Some(25));

    let temperature = metar.conditions.temperature.as_ref().unwrap();
    assert_eq!(temperature.celsius(), 23.0);
    assert_eq!(temperature.dewpoint_celsius(), Some(14.0));

    let pressure = metar.conditions.pressure.as_ref().unwrap();
    assert_eq!(pressure.unit(), PressureUnit::InchesHg);

    assert_eq!(metar.conditions.sky_conditions[1].coverage(), SkyCoverage::Scattered);

    let remarks = metar.remarks.as_ref().unwrap();
    let slp = remarks.sea_level_pressure().unwrap();
    assert!((slp.value() - 1020.1).abs() < 1e-9);
    assert!(remarks.peak_wind().is_some());
    assert!(remarks.hourly_precipitation().is_some());
    let precise = remarks.precise_temperature().unwrap();
    assert!((precise.celsius() - 23.3).abs() < 1e-9);
}

#[test]
fn test_decode_taf_end_to_end() {
    let report = parser().parse(TAF).unwrap();
    let taf = report.as_taf().unwrap();

    assert_eq!(taf.station_id, "KJFK");
    assert_eq!(taf.periods.len(), 3);
    assert_eq!(taf.periods[0].change_indicator(), ChangeIndicator::Base);
    assert_eq!(taf.periods[1].change_indicator(), ChangeIndicator::From);
    assert_eq!(taf.periods[2].probability(), Some(30));

    let evening = Utc.with_ymd_and_hms(2024, 3, 15, 20, 0, 0).unwrap();
    assert!(taf.is_valid_at(evening));
    assert!(taf.period_at(evening).unwrap().is_base_forecast());

    let expired = Utc.with_ymd_and_hms(2024, 3, 16, 19, 0, 0).unwrap();
    assert!(taf.has_expired_at(expired));
}

#[test]
fn test_report_json_round_trip() {
    for raw in [METAR, SPECI, TAF] {
        let report = parser().parse(raw).unwrap();
        let json = serde_json::to_string(&report).unwrap();
        let decoded: WeatherReport = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, report);
    }
}

#[test]
fn test_read_text_and_csv_inputs() {
    let mut text = NamedTempFile::new().unwrap();
    writeln!(text, "# morning observations").unwrap();
    writeln!(text, "{}", SPECI).unwrap();
    writeln!(text).unwrap();
    writeln!(text, "TAF KJFK 151130Z 1512/1618 28012KT P6SM FEW040").unwrap();
    writeln!(text, "    FM160000 31008KT P6SM SKC").unwrap();
    text.flush().unwrap();

    let raw = ReportReader::new(InputFormat::Text).read(text.path()).unwrap();
    assert_eq!(raw.len(), 2);
    assert_eq!(raw[0].line_number, 2);
    assert!(raw[1].text.ends_with("FM160000 31008KT P6SM SKC"));

    let mut csv = NamedTempFile::new().unwrap();
    writeln!(csv, "station_id,raw_text").unwrap();
    writeln!(csv, "KORD,\"{}\"", SPECI).unwrap();
    writeln!(csv, "KJFK,\"{}\"", METAR).unwrap();
    csv.flush().unwrap();

    let raw = ReportReader::new(InputFormat::Csv).read(csv.path()).unwrap();
    assert_eq!(raw.len(), 2);
    assert_eq!(raw[1].text, METAR);
}

#[tokio::test]
async fn test_process_file_counts_failures() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let input = temp_dir.path().join("reports.txt");
    let content = format!("{}\nGARBAGE\n{}\n{}\n", METAR, SPECI, TAF);
    tokio::fs::write(&input, content).await.unwrap();

    let processor = BatchProcessor::new(2)
        .with_chunk_size(1)
        .with_reference_time(reference());
    let batch = processor
        .process_file(&input, InputFormat::Text, false)
        .await
        .unwrap();

    assert_eq!(batch.reports.len(), 3);
    assert_eq!(batch.reports[2].data_type(), "TAF");

    let summary = &batch.summary;
    assert_eq!(summary.total_reports, 4);
    assert_eq!(summary.decoded_reports, 3);
    assert_eq!(summary.failed_reports, 1);
    assert_eq!(summary.failures[0].line_number, 2);
    assert_eq!(summary.metar_count, 1);
    assert_eq!(summary.speci_count, 1);
    assert_eq!(summary.taf_count, 1);
    assert!(summary.generate_report().contains("=== Decode Report ==="));
}

#[tokio::test]
async fn test_process_missing_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = BatchProcessor::new(1)
        .process_file(&temp_dir.path().join("absent.txt"), InputFormat::Text, false)
        .await;
    assert!(result.is_err());
}

#[test]
fn test_repository_with_decoded_batch() {
    let repository = InMemoryRepository::new();
    let reports: Vec<WeatherReport> = [METAR, SPECI, TAF]
        .iter()
        .map(|raw| parser().parse(raw).unwrap())
        .collect();

    assert_eq!(repository.save_batch(&reports, DataSource::Noaa).unwrap(), 3);

    let latest = repository.find_latest_by_station("KJFK").unwrap().unwrap();
    assert_eq!(latest.data_type(), "METAR");

    let from = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
    let to = Utc.with_ymd_and_hms(2024, 3, 16, 0, 0, 0).unwrap();
    let noaa = repository
        .find_by_source_and_time_range(DataSource::Noaa, from, to)
        .unwrap();
    assert_eq!(noaa.len(), 3);
    assert!(repository
        .find_by_source_and_time_range(DataSource::Internal, from, to)
        .unwrap()
        .is_empty());

    let stats = repository.stats().unwrap();
    assert_eq!(stats.total_records, 3);
    assert_eq!(stats.unique_stations, 2);
}

#[test]
fn test_config_file_drives_processor() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        "[parser]\nstrict = true\n\n[processing]\nmax_workers = 2\nchunk_size = 16\n"
    )
    .unwrap();
    file.flush().unwrap();

    let config = AppConfig::load(Some(file.path())).unwrap();
    assert!(config.parser.strict);

    let processor = BatchProcessor::from_config(&config);
    assert_eq!(processor.max_workers(), 2);
    assert_eq!(processor.chunk_size(), 16);
}
