use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::models::conditions::WeatherConditions;
use crate::models::forecast::{ChangeIndicator, ForecastPeriod};
use crate::models::remarks::NoaaMetarRemarks;
use crate::models::runway::RunwayVisualRange;
use crate::models::validity::ValidityPeriod;
use crate::utils::constants::{MAX_VALID_TEMP, MIN_VALID_TEMP};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetarType {
    #[serde(rename = "METAR")]
    Metar,
    #[serde(rename = "SPECI")]
    Speci,
}

impl MetarType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "METAR" => Some(Self::Metar),
            "SPECI" => Some(Self::Speci),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Metar => "METAR",
            Self::Speci => "SPECI",
        }
    }
}

/// Report modifier following the station and time groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportModifier {
    #[serde(rename = "AUTO")]
    Auto,
    #[serde(rename = "COR")]
    Corrected,
    #[serde(rename = "AMD")]
    Amended,
}

impl ReportModifier {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "AUTO" => Some(Self::Auto),
            "COR" | "CC" => Some(Self::Corrected),
            "AMD" => Some(Self::Amended),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::Corrected => "COR",
            Self::Amended => "AMD",
        }
    }
}

/// A decoded METAR or SPECI observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetarReport {
    pub report_type: MetarType,
    pub station_id: String,
    pub observation_time: DateTime<Utc>,
    pub modifier: Option<ReportModifier>,
    pub conditions: WeatherConditions,
    pub runway_visual_ranges: Vec<RunwayVisualRange>,
    pub no_significant_change: bool,
    pub remarks: Option<NoaaMetarRemarks>,
    pub raw_text: String,
    /// Groups that could not be decoded and were skipped.
    pub unparsed_groups: Vec<String>,
}

impl MetarReport {
    pub fn is_special(&self) -> bool {
        self.report_type == MetarType::Speci
    }

    pub fn is_automated(&self) -> bool {
        self.modifier == Some(ReportModifier::Auto)
    }

    pub fn is_corrected(&self) -> bool {
        self.modifier == Some(ReportModifier::Corrected)
    }

    pub fn is_fully_decoded(&self) -> bool {
        self.unparsed_groups.is_empty()
    }

    pub fn ceiling_feet(&self) -> Option<u32> {
        self.conditions.ceiling_feet()
    }

    pub fn has_remarks(&self) -> bool {
        self.remarks.as_ref().map_or(false, |r| !r.is_empty())
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} {} {}",
            self.report_type.code(),
            self.station_id,
            self.observation_time.format("%d%H%MZ")
        );
        if let Some(modifier) = self.modifier {
            summary.push(' ');
            summary.push_str(modifier.code());
        }
        summary.push_str(": ");
        summary.push_str(&self.conditions.summary());
        if !self.runway_visual_ranges.is_empty() {
            let rvr: Vec<String> = self
                .runway_visual_ranges
                .iter()
                .map(RunwayVisualRange::summary)
                .collect();
            summary.push_str(&format!("; RVR: {}", rvr.join(", ")));
        }
        if self.no_significant_change {
            summary.push_str("; NOSIG");
        }
        summary
    }
}

impl fmt::Display for MetarReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Forecast maximum or minimum temperature with the time it is expected (TX/TN groups).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemperatureForecast {
    celsius: i32,
    time: DateTime<Utc>,
}

impl TemperatureForecast {
    pub fn new(celsius: i32, time: DateTime<Utc>) -> Result<Self> {
        if !(MIN_VALID_TEMP..=MAX_VALID_TEMP).contains(&f64::from(celsius)) {
            return Err(ProcessingError::temperature(format!(
                "Forecast temperature out of reasonable range (-100 to 60°C): {}",
                celsius
            )));
        }
        Ok(Self { celsius, time })
    }

    pub fn celsius(&self) -> i32 {
        self.celsius
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }
}

/// A decoded Terminal Aerodrome Forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TafReport {
    pub station_id: String,
    pub issue_time: DateTime<Utc>,
    pub modifier: Option<ReportModifier>,
    pub validity: ValidityPeriod,
    pub periods: Vec<ForecastPeriod>,
    pub max_temperature: Option<TemperatureForecast>,
    pub min_temperature: Option<TemperatureForecast>,
    pub raw_text: String,
    pub unparsed_groups: Vec<String>,
}

impl TafReport {
    pub fn is_amended(&self) -> bool {
        self.modifier == Some(ReportModifier::Amended)
    }

    pub fn is_corrected(&self) -> bool {
        self.modifier == Some(ReportModifier::Corrected)
    }

    pub fn base_forecast(&self) -> Option<&ForecastPeriod> {
        self.periods.iter().find(|p| p.is_base_forecast())
    }

    pub fn periods_of(&self, indicator: ChangeIndicator) -> Vec<&ForecastPeriod> {
        self.periods
            .iter()
            .filter(|p| p.change_indicator() == indicator)
            .collect()
    }

    /// Every period in effect at `instant`, including overlapping TEMPO and PROB groups.
    pub fn periods_at(&self, instant: DateTime<Utc>) -> Vec<&ForecastPeriod> {
        if !self.validity.contains(instant) {
            return Vec::new();
        }
        self.periods.iter().filter(|p| p.contains(instant)).collect()
    }

    /// The prevailing BASE or FM period at `instant`: the latest FM group that has
    /// started, or the base forecast before any FM group takes over.
    pub fn period_at(&self, instant: DateTime<Utc>) -> Option<&ForecastPeriod> {
        if !self.validity.contains(instant) {
            return None;
        }
        self.periods
            .iter()
            .filter(|p| p.change_indicator() == ChangeIndicator::From && p.contains(instant))
            .max_by_key(|p| p.change_time())
            .or_else(|| self.base_forecast())
    }

    pub fn is_valid_at(&self, instant: DateTime<Utc>) -> bool {
        self.validity.contains(instant)
    }

    pub fn has_expired_at(&self, instant: DateTime<Utc>) -> bool {
        self.validity.has_expired_at(instant)
    }

    pub fn has_significant_weather_forecast(&self) -> bool {
        self.periods.iter().any(ForecastPeriod::has_significant_weather)
    }

    pub fn is_fully_decoded(&self) -> bool {
        self.unparsed_groups.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut summary = String::from("TAF");
        if self.is_amended() {
            summary.push_str(" AMD");
        } else if self.is_corrected() {
            summary.push_str(" COR");
        }
        summary.push_str(&format!(
            " {} {} ({} periods)",
            self.station_id,
            self.validity.to_taf_format(),
            self.periods.len()
        ));

        let mut extremes = Vec::new();
        if let Some(max) = &self.max_temperature {
            extremes.push(format!("TX{}", max.celsius));
        }
        if let Some(min) = &self.min_temperature {
            extremes.push(format!("TN{}", min.celsius));
        }
        if !extremes.is_empty() {
            summary.push_str(&format!(" [{}]", extremes.join(" ")));
        }
        summary
    }
}

impl fmt::Display for TafReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Either kind of decoded report, as handled by the batch processor and repositories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WeatherReport {
    #[serde(rename = "METAR")]
    Metar(MetarReport),
    #[serde(rename = "TAF")]
    Taf(TafReport),
}

impl WeatherReport {
    pub fn station_id(&self) -> &str {
        match self {
            Self::Metar(metar) => &metar.station_id,
            Self::Taf(taf) => &taf.station_id,
        }
    }

    /// Observation time for METARs, issue time for TAFs.
    pub fn observation_time(&self) -> DateTime<Utc> {
        match self {
            Self::Metar(metar) => metar.observation_time,
            Self::Taf(taf) => taf.issue_time,
        }
    }

    pub fn data_type(&self) -> &'static str {
        match self {
            Self::Metar(metar) => metar.report_type.code(),
            Self::Taf(_) => "TAF",
        }
    }

    pub fn raw_text(&self) -> &str {
        match self {
            Self::Metar(metar) => &metar.raw_text,
            Self::Taf(taf) => &taf.raw_text,
        }
    }

    pub fn unparsed_groups(&self) -> &[String] {
        match self {
            Self::Metar(metar) => &metar.unparsed_groups,
            Self::Taf(taf) => &taf.unparsed_groups,
        }
    }

    pub fn as_metar(&self) -> Option<&MetarReport> {
        match self {
            Self::Metar(metar) => Some(metar),
            Self::Taf(_) => None,
        }
    }

    pub fn as_taf(&self) -> Option<&TafReport> {
        match self {
            Self::Taf(taf) => Some(taf),
            Self::Metar(_) => None,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Self::Metar(metar) => metar.summary(),
            Self::Taf(taf) => taf.summary(),
        }
    }
}

impl TryFrom<WeatherReport> for MetarReport {
    type Error = ProcessingError;

    fn try_from(report: WeatherReport) -> Result<Self> {
        match report {
            WeatherReport::Metar(metar) => Ok(metar),
            WeatherReport::Taf(taf) => Err(ProcessingError::InvalidFormat(format!(
                "Expected METAR report, found TAF for {}",
                taf.station_id
            ))),
        }
    }
}

impl TryFrom<WeatherReport> for TafReport {
    type Error = ProcessingError;

    fn try_from(report: WeatherReport) -> Result<Self> {
        match report {
            WeatherReport::Taf(taf) => Ok(taf),
            WeatherReport::Metar(metar) => Err(ProcessingError::InvalidFormat(format!(
                "Expected TAF report, found {} for {}",
                metar.report_type.code(),
                metar.station_id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::wind::Wind;
    use chrono::TimeZone;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, h, 0, 0).unwrap()
    }

    fn taf() -> TafReport {
        let calm = WeatherConditions::builder().wind(Wind::calm()).build();
        TafReport {
            station_id: "KJFK".to_string(),
            issue_time: at(15, 11),
            modifier: Some(ReportModifier::Amended),
            validity: ValidityPeriod::new(at(15, 12), at(16, 18)).unwrap(),
            periods: vec![
                ForecastPeriod::base(None, calm.clone()).unwrap(),
                ForecastPeriod::tempo(at(15, 14), at(15, 18), calm.clone()).unwrap(),
                ForecastPeriod::from(at(15, 20), calm.clone()),
                ForecastPeriod::from(at(16, 6), calm),
            ],
            max_temperature: Some(TemperatureForecast::new(12, at(15, 20)).unwrap()),
            min_temperature: None,
            raw_text: String::new(),
            unparsed_groups: Vec::new(),
        }
    }

    #[test]
    fn test_period_at_prevailing() {
        let taf = taf();
        assert!(taf.period_at(at(15, 15)).unwrap().is_base_forecast());
        assert_eq!(taf.period_at(at(15, 22)).unwrap().change_time(), Some(at(15, 20)));
        assert_eq!(taf.period_at(at(16, 10)).unwrap().change_time(), Some(at(16, 6)));
        assert!(taf.period_at(at(17, 0)).is_none());
    }

    #[test]
    fn test_periods_at_includes_tempo() {
        let taf = taf();
        let active = taf.periods_at(at(15, 15));
        assert_eq!(active.len(), 1);
        assert!(active[0].is_temporary_change());
        assert_eq!(taf.periods_of(ChangeIndicator::From).len(), 2);
    }

    #[test]
    fn test_temperature_forecast_range() {
        let forecast = TemperatureForecast::new(-2, at(16, 6)).unwrap();
        assert_eq!(forecast.celsius(), -2);
        assert_eq!(forecast.time(), at(16, 6));
        assert!(TemperatureForecast::new(99, at(15, 20)).is_err());
        assert!(TemperatureForecast::new(-150, at(16, 6)).is_err());
    }

    #[test]
    fn test_taf_summary() {
        assert_eq!(taf().summary(), "TAF AMD KJFK 1512/1618 (4 periods) [TX12]");
    }

    #[test]
    fn test_report_conversion() {
        let report = WeatherReport::Taf(taf());
        assert_eq!(report.data_type(), "TAF");
        assert_eq!(report.station_id(), "KJFK");
        assert!(MetarReport::try_from(report.clone()).is_err());
        assert!(TafReport::try_from(report).is_ok());
    }
}
