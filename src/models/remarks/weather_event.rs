use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::utils::constants::MISSING_VALUE;

use super::wind_events::format_time;

/// Begin/end time of a weather phenomenon, from remarks such as "RAB05E30" or "-SNB1520".
///
/// Hours are only present when the event crossed into another hour; otherwise only
/// minutes are reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherEvent {
    weather_code: String,
    intensity: Option<String>,
    begin_hour: Option<u32>,
    begin_minute: Option<u32>,
    end_hour: Option<u32>,
    end_minute: Option<u32>,
}

impl WeatherEvent {
    pub fn new(
        weather_code: &str,
        intensity: Option<&str>,
        begin_hour: Option<u32>,
        begin_minute: Option<u32>,
        end_hour: Option<u32>,
        end_minute: Option<u32>,
    ) -> Result<Self> {
        if weather_code.trim().is_empty() {
            return Err(ProcessingError::remark("Weather code cannot be blank"));
        }
        if let Some(intensity) = intensity {
            if intensity != "-" && intensity != "+" {
                return Err(ProcessingError::remark(format!(
                    "Intensity must be '-' (light) or '+' (heavy): {}",
                    intensity
                )));
            }
        }
        check_time("Begin", begin_hour, begin_minute)?;
        check_time("End", end_hour, end_minute)?;
        if begin_minute.is_none() && end_minute.is_none() {
            return Err(ProcessingError::remark(
                "Weather event must have at least a begin or end time",
            ));
        }

        Ok(Self {
            weather_code: weather_code.trim().to_string(),
            intensity: intensity.map(str::to_string),
            begin_hour,
            begin_minute,
            end_hour,
            end_minute,
        })
    }

    pub fn weather_code(&self) -> &str {
        &self.weather_code
    }

    pub fn intensity(&self) -> Option<&str> {
        self.intensity.as_deref()
    }

    pub fn begin_hour(&self) -> Option<u32> {
        self.begin_hour
    }

    pub fn begin_minute(&self) -> Option<u32> {
        self.begin_minute
    }

    pub fn end_hour(&self) -> Option<u32> {
        self.end_hour
    }

    pub fn end_minute(&self) -> Option<u32> {
        self.end_minute
    }

    pub fn has_begin_time(&self) -> bool {
        self.begin_minute.is_some()
    }

    pub fn has_end_time(&self) -> bool {
        self.end_minute.is_some()
    }

    pub fn begin_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.begin_hour?, self.begin_minute?, 0)
    }

    pub fn end_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.end_hour?, self.end_minute?, 0)
    }

    pub fn formatted_begin(&self) -> String {
        format_time(self.begin_hour.map(|h| h as i32), self.begin_minute.map(|m| m as i32))
            .unwrap_or_else(|| MISSING_VALUE.to_string())
    }

    pub fn formatted_end(&self) -> String {
        format_time(self.end_hour.map(|h| h as i32), self.end_minute.map(|m| m as i32))
            .unwrap_or_else(|| MISSING_VALUE.to_string())
    }

    /// Weather code with its intensity prefix, e.g. "-RA".
    pub fn full_weather_code(&self) -> String {
        match &self.intensity {
            Some(intensity) => format!("{}{}", intensity, self.weather_code),
            None => self.weather_code.clone(),
        }
    }

    pub fn summary(&self) -> String {
        let mut summary = self.full_weather_code();
        if self.has_begin_time() {
            summary.push_str(" began ");
            summary.push_str(&self.formatted_begin());
        }
        if self.has_end_time() {
            if self.has_begin_time() {
                summary.push(',');
            }
            summary.push_str(" ended ");
            summary.push_str(&self.formatted_end());
        }
        summary
    }
}

impl fmt::Display for WeatherEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

fn check_time(label: &str, hour: Option<u32>, minute: Option<u32>) -> Result<()> {
    if let Some(hour) = hour {
        if hour > 23 {
            return Err(ProcessingError::remark(format!(
                "{} hour must be between 0 and 23: {}",
                label, hour
            )));
        }
    }
    if let Some(minute) = minute {
        if minute > 59 {
            return Err(ProcessingError::remark(format!(
                "{} minute must be between 0 and 59: {}",
                label, minute
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_and_end() {
        let event = WeatherEvent::new("RA", None, None, Some(5), None, Some(30)).unwrap();
        assert_eq!(event.summary(), "RA began :05, ended :30");
        assert_eq!(event.begin_time(), None);

        let event = WeatherEvent::new("SN", Some("-"), Some(15), Some(20), None, None).unwrap();
        assert_eq!(event.full_weather_code(), "-SN");
        assert_eq!(event.summary(), "-SN began 15:20");
        assert_eq!(event.formatted_end(), "N/A");
        assert_eq!(event.begin_time(), NaiveTime::from_hms_opt(15, 20, 0));
    }

    #[test]
    fn test_validation() {
        assert!(WeatherEvent::new(" ", None, None, Some(5), None, None).is_err());
        assert!(WeatherEvent::new("RA", Some("VC"), None, Some(5), None, None).is_err());
        assert!(WeatherEvent::new("RA", None, Some(24), Some(5), None, None).is_err());
        assert!(WeatherEvent::new("RA", None, None, None, None, Some(60)).is_err());
        let err = WeatherEvent::new("RA", None, None, None, None, None).unwrap_err();
        assert!(err.to_string().contains("at least a begin or end time"));
    }
}
