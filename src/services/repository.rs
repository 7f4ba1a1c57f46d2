use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::WeatherReport;

/// Where a stored report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    Noaa,
    Internal,
    Unknown,
}

impl DataSource {
    /// Unrecognized or blank names map to `Unknown`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_uppercase().as_str() {
            "NOAA" => Self::Noaa,
            "INTERNAL" => Self::Internal,
            _ => Self::Unknown,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Noaa => "NOAA",
            Self::Internal => "INTERNAL",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Noaa => "NOAA Aviation Weather Center",
            Self::Internal => "Internal System",
            Self::Unknown => "Unknown Source",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Observation (or issue) time as a storage key: RFC 3339, whole seconds, "Z" suffix.
pub fn time_key(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// A report in persisted form: key fields plus a JSON attribute map of the whole report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReport {
    pub station_id: String,
    pub observation_time: String,
    pub source: DataSource,
    pub data_type: String,
    pub attributes: Map<String, Value>,
}

impl StoredReport {
    pub fn from_report(report: &WeatherReport, source: DataSource) -> Result<Self> {
        let attributes = match serde_json::to_value(report)? {
            Value::Object(map) => map,
            other => {
                return Err(ProcessingError::Storage(format!(
                    "Report did not serialize to an attribute map: {}",
                    other
                )))
            }
        };
        Ok(Self {
            station_id: report.station_id().to_string(),
            observation_time: time_key(report.observation_time()),
            source,
            data_type: report.data_type().to_string(),
            attributes,
        })
    }

    pub fn to_report(&self) -> Result<WeatherReport> {
        Ok(serde_json::from_value(Value::Object(self.attributes.clone()))?)
    }

    pub fn observation_instant(&self) -> Result<DateTime<Utc>> {
        Ok(DateTime::parse_from_rfc3339(&self.observation_time)?.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryStats {
    pub total_records: usize,
    pub unique_stations: usize,
    pub oldest_record: Option<String>,
    pub newest_record: Option<String>,
}

/// Persistence contract for decoded reports, keyed by station and observation time.
/// Saving a report whose key already exists replaces it.
pub trait WeatherRepository: Send + Sync {
    fn save(&self, report: &WeatherReport, source: DataSource) -> Result<()>;

    fn save_batch(&self, reports: &[WeatherReport], source: DataSource) -> Result<usize> {
        for report in reports {
            self.save(report, source)?;
        }
        Ok(reports.len())
    }

    fn find_by_station_and_time(
        &self,
        station: &str,
        time: DateTime<Utc>,
    ) -> Result<Option<WeatherReport>>;

    /// Reports for `station` with `start <= time <= end`, oldest first.
    fn find_by_station_and_time_range(
        &self,
        station: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WeatherReport>>;

    fn find_latest_by_station(&self, station: &str) -> Result<Option<WeatherReport>>;

    fn find_by_source_and_time_range(
        &self,
        source: DataSource,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WeatherReport>>;

    /// Remove reports observed before `cutoff`, returning how many were removed.
    fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize>;

    fn stats(&self) -> Result<RepositoryStats>;
}

type RecordKey = (String, String);

/// Repository held in memory, ordered by station then time.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    records: RwLock<BTreeMap<RecordKey, StoredReport>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.read().map_or(0, |records| records.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<RecordKey, StoredReport>>> {
        self.records
            .read()
            .map_err(|e| ProcessingError::Storage(format!("Repository lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<RecordKey, StoredReport>>> {
        self.records
            .write()
            .map_err(|e| ProcessingError::Storage(format!("Repository lock poisoned: {}", e)))
    }
}

fn station_key(station: &str) -> String {
    station.trim().to_uppercase()
}

impl WeatherRepository for InMemoryRepository {
    fn save(&self, report: &WeatherReport, source: DataSource) -> Result<()> {
        let stored = StoredReport::from_report(report, source)?;
        let key = (stored.station_id.clone(), stored.observation_time.clone());
        debug!(station = %key.0, time = %key.1, "Saving {}", stored.data_type);
        self.write()?.insert(key, stored);
        Ok(())
    }

    fn find_by_station_and_time(
        &self,
        station: &str,
        time: DateTime<Utc>,
    ) -> Result<Option<WeatherReport>> {
        let key = (station_key(station), time_key(time));
        self.read()?.get(&key).map(StoredReport::to_report).transpose()
    }

    fn find_by_station_and_time_range(
        &self,
        station: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WeatherReport>> {
        if start > end {
            return Ok(Vec::new());
        }
        let station = station_key(station);
        let from = (station.clone(), time_key(start));
        let to = (station, time_key(end));
        self.read()?
            .range(from..=to)
            .map(|(_, stored)| stored.to_report())
            .collect()
    }

    fn find_latest_by_station(&self, station: &str) -> Result<Option<WeatherReport>> {
        let station = station_key(station);
        self.read()?
            .range((station.clone(), String::new())..)
            .take_while(|((s, _), _)| *s == station)
            .last()
            .map(|(_, stored)| stored.to_report())
            .transpose()
    }

    fn find_by_source_and_time_range(
        &self,
        source: DataSource,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WeatherReport>> {
        let (start, end) = (time_key(start), time_key(end));
        let records = self.read()?;
        let mut matching: Vec<&StoredReport> = records
            .values()
            .filter(|stored| {
                stored.source == source
                    && stored.observation_time >= start
                    && stored.observation_time <= end
            })
            .collect();
        matching.sort_by(|a, b| a.observation_time.cmp(&b.observation_time));
        matching.into_iter().map(StoredReport::to_report).collect()
    }

    fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let cutoff = time_key(cutoff);
        let mut records = self.write()?;
        let before = records.len();
        records.retain(|(_, time), _| *time >= cutoff);
        let removed = before - records.len();
        debug!("Deleted {} reports older than {}", removed, cutoff);
        Ok(removed)
    }

    fn stats(&self) -> Result<RepositoryStats> {
        let records = self.read()?;
        let stations: BTreeSet<&str> = records.keys().map(|(s, _)| s.as_str()).collect();
        Ok(RepositoryStats {
            total_records: records.len(),
            unique_stations: stations.len(),
            oldest_record: records.keys().map(|(_, t)| t).min().cloned(),
            newest_record: records.keys().map(|(_, t)| t).max().cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::ReportParser;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, minute, 0).unwrap()
    }

    fn report(raw: &str) -> WeatherReport {
        ReportParser::new().with_reference_time(at(15, 12, 0)).parse(raw).unwrap()
    }

    fn populated() -> InMemoryRepository {
        let repo = InMemoryRepository::new();
        repo.save(&report("KJFK 150951Z 28015KT 10SM CLR 20/10 A3000"), DataSource::Noaa).unwrap();
        repo.save(&report("KJFK 151051Z 28012KT 10SM CLR 21/10 A3001"), DataSource::Noaa).unwrap();
        repo.save(&report("KJFK 151151Z 28010KT 10SM CLR 22/10 A3002"), DataSource::Internal).unwrap();
        repo.save(&report("EGLL 151050Z 24010KT 9999 BKN030 12/08 Q1015"), DataSource::Noaa).unwrap();
        repo
    }

    #[test]
    fn test_time_key_format() {
        assert_eq!(time_key(at(15, 11, 51)), "2024-03-15T11:51:00Z");
    }

    #[test]
    fn test_stored_report_round_trip() {
        let original = report("KJFK 151151Z 28015G25KT 10SM FEW040 23/14 A3012 RMK AO2 SLP210");
        let stored = StoredReport::from_report(&original, DataSource::Noaa).unwrap();
        assert_eq!(stored.station_id, "KJFK");
        assert_eq!(stored.data_type, "METAR");
        assert_eq!(stored.attributes.get("type"), Some(&Value::String("METAR".to_string())));
        assert_eq!(stored.observation_instant().unwrap(), at(15, 11, 51));
        assert_eq!(stored.to_report().unwrap(), original);
    }

    #[test]
    fn test_find_by_key_and_range() {
        let repo = populated();
        let found = repo.find_by_station_and_time("kjfk", at(15, 10, 51)).unwrap().unwrap();
        assert_eq!(found.observation_time(), at(15, 10, 51));
        assert!(repo.find_by_station_and_time("KJFK", at(15, 10, 0)).unwrap().is_none());

        let range = repo
            .find_by_station_and_time_range("KJFK", at(15, 10, 0), at(15, 12, 0))
            .unwrap();
        assert_eq!(range.len(), 2);
        assert!(range[0].observation_time() < range[1].observation_time());

        let latest = repo.find_latest_by_station("KJFK").unwrap().unwrap();
        assert_eq!(latest.observation_time(), at(15, 11, 51));
    }

    #[test]
    fn test_find_by_source() {
        let repo = populated();
        let noaa = repo
            .find_by_source_and_time_range(DataSource::Noaa, at(15, 0, 0), at(16, 0, 0))
            .unwrap();
        assert_eq!(noaa.len(), 3);
        assert_eq!(noaa[0].station_id(), "KJFK");
        assert_eq!(noaa[1].station_id(), "EGLL");
    }

    #[test]
    fn test_delete_and_stats() {
        let repo = populated();
        assert_eq!(repo.delete_older_than(at(15, 10, 0)).unwrap(), 1);
        let stats = repo.stats().unwrap();
        assert_eq!(stats.total_records, 3);
        assert_eq!(stats.unique_stations, 2);
        assert_eq!(stats.oldest_record.as_deref(), Some("2024-03-15T10:50:00Z"));
    }

    #[test]
    fn test_data_source_names() {
        assert_eq!(DataSource::from_name("noaa"), DataSource::Noaa);
        assert_eq!(DataSource::from_name(""), DataSource::Unknown);
        assert_eq!(DataSource::Internal.to_string(), "INTERNAL");
    }
}
