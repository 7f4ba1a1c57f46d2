use std::collections::HashMap;

use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::{MetarReport, TafReport};
use crate::parsers::{is_station_id, MetarParser, TafParser};

/// Source of raw report text for a station.
pub trait WeatherService: Send + Sync {
    fn get_metar_data(&self, station: &str) -> Result<String>;

    fn get_taf_data(&self, station: &str) -> Result<String>;

    /// Four alphanumerics starting with a letter, case-insensitive.
    fn is_valid_station_code(&self, station: &str) -> bool {
        is_station_id(&station.trim().to_uppercase())
    }
}

/// Fetch and decode the latest METAR for `station`.
pub fn fetch_metar(
    service: &dyn WeatherService,
    parser: &MetarParser,
    station: &str,
) -> Result<MetarReport> {
    check_station(service, station)?;
    let raw = service.get_metar_data(station)?;
    parser.parse(&raw)
}

/// Fetch and decode the latest TAF for `station`.
pub fn fetch_taf(service: &dyn WeatherService, parser: &TafParser, station: &str) -> Result<TafReport> {
    check_station(service, station)?;
    let raw = service.get_taf_data(station)?;
    parser.parse(&raw)
}

fn check_station(service: &dyn WeatherService, station: &str) -> Result<()> {
    if service.is_valid_station_code(station) {
        Ok(())
    } else {
        Err(ProcessingError::Service(format!(
            "Invalid station code: '{}'. Must be 4 alphanumerics starting with a letter",
            station
        )))
    }
}

/// Serves fixed report text from memory, e.g. a cached fetch or test fixtures.
#[derive(Debug, Clone, Default)]
pub struct StaticWeatherService {
    metars: HashMap<String, String>,
    tafs: HashMap<String, String>,
}

impl StaticWeatherService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metar(mut self, station: &str, raw: impl Into<String>) -> Self {
        self.metars.insert(station.to_uppercase(), raw.into());
        self
    }

    pub fn with_taf(mut self, station: &str, raw: impl Into<String>) -> Self {
        self.tafs.insert(station.to_uppercase(), raw.into());
        self
    }

    fn lookup(table: &HashMap<String, String>, kind: &str, station: &str) -> Result<String> {
        let key = station.trim().to_uppercase();
        match table.get(&key) {
            Some(raw) => Ok(raw.clone()),
            None => {
                debug!(station = %key, "No {} available", kind);
                Err(ProcessingError::Service(format!(
                    "No {} data available for station {}",
                    kind, key
                )))
            }
        }
    }
}

impl WeatherService for StaticWeatherService {
    fn get_metar_data(&self, station: &str) -> Result<String> {
        Self::lookup(&self.metars, "METAR", station)
    }

    fn get_taf_data(&self, station: &str) -> Result<String> {
        Self::lookup(&self.tafs, "TAF", station)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn service() -> StaticWeatherService {
        StaticWeatherService::new()
            .with_metar("KJFK", "KJFK 151151Z 28015KT 10SM CLR 20/10 A3000")
            .with_taf("kjfk", "TAF KJFK 151130Z 1512/1618 28012KT P6SM SCT040")
    }

    #[test]
    fn test_station_code_validation() {
        let service = service();
        assert!(service.is_valid_station_code("KJFK"));
        assert!(service.is_valid_station_code("egll"));
        assert!(!service.is_valid_station_code("JFK"));
        assert!(!service.is_valid_station_code("1ABC"));
    }

    #[test]
    fn test_fetch_and_decode() {
        let reference = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let metar = fetch_metar(&service(), &MetarParser::new().with_reference_time(reference), "kjfk").unwrap();
        assert_eq!(metar.station_id, "KJFK");

        let taf = fetch_taf(&service(), &TafParser::new().with_reference_time(reference), "KJFK").unwrap();
        assert_eq!(taf.periods.len(), 1);
    }

    #[test]
    fn test_service_errors() {
        let parser = MetarParser::new();
        assert!(matches!(
            fetch_metar(&service(), &parser, "EGLL"),
            Err(ProcessingError::Service(_))
        ));
        assert!(matches!(
            fetch_metar(&service(), &parser, "BAD!"),
            Err(ProcessingError::Service(_))
        ));
    }
}
