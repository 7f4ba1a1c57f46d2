use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;
use crate::utils::constants::MPH_PER_KNOT;
use crate::utils::units::cardinal_direction;

/// Peak wind since the last routine report, from "PK WND dddff(f)/(hh)mm".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct PeakWind {
    #[validate(range(min = 0, max = 360, message = "Peak wind direction must be between 0 and 360 degrees"))]
    direction_degrees: Option<i32>,

    #[validate(range(min = 0, message = "Peak wind speed cannot be negative"))]
    speed_knots: Option<i32>,

    #[validate(range(min = 0, max = 23, message = "Hour must be between 0 and 23"))]
    hour: Option<i32>,

    #[validate(range(min = 0, max = 59, message = "Minute must be between 0 and 59"))]
    minute: Option<i32>,
}

impl PeakWind {
    pub fn new(
        direction_degrees: Option<i32>,
        speed_knots: Option<i32>,
        hour: Option<i32>,
        minute: Option<i32>,
    ) -> Result<Self> {
        let peak = Self {
            direction_degrees,
            speed_knots,
            hour,
            minute,
        };
        peak.validate()?;
        Ok(peak)
    }

    pub fn direction_degrees(&self) -> Option<i32> {
        self.direction_degrees
    }

    pub fn speed_knots(&self) -> Option<i32> {
        self.speed_knots
    }

    pub fn hour(&self) -> Option<i32> {
        self.hour
    }

    pub fn minute(&self) -> Option<i32> {
        self.minute
    }

    /// Speed in whole miles per hour.
    pub fn to_mph(&self) -> Option<f64> {
        self.speed_knots
            .map(|kt| (f64::from(kt) * MPH_PER_KNOT).round())
    }

    pub fn cardinal_direction(&self) -> &'static str {
        match self.direction_degrees {
            Some(degrees) => cardinal_direction(degrees as u16),
            None => "UNKNOWN",
        }
    }
}

impl fmt::Display for PeakWind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction_degrees {
            Some(d) => write!(f, "{:03}° ({})", d, self.cardinal_direction())?,
            None => write!(f, "Unknown direction")?,
        }
        if let Some(speed) = self.speed_knots {
            write!(f, " at {} KT", speed)?;
        }
        if let Some(time) = format_time(self.hour, self.minute) {
            write!(f, " at {}", time)?;
        }
        Ok(())
    }
}

/// Wind shift time from "WSHFT (hh)mm", optionally flagged as a frontal passage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct WindShift {
    #[validate(range(min = 0, max = 23, message = "Hour must be between 0 and 23"))]
    hour: Option<i32>,

    #[validate(range(min = 0, max = 59, message = "Minute must be between 0 and 59"))]
    minute: Option<i32>,

    frontal_passage: bool,
}

impl WindShift {
    pub fn new(hour: Option<i32>, minute: Option<i32>, frontal_passage: bool) -> Result<Self> {
        let shift = Self {
            hour,
            minute,
            frontal_passage,
        };
        shift.validate()?;
        Ok(shift)
    }

    pub fn hour(&self) -> Option<i32> {
        self.hour
    }

    pub fn minute(&self) -> Option<i32> {
        self.minute
    }

    pub fn frontal_passage(&self) -> bool {
        self.frontal_passage
    }
}

impl fmt::Display for WindShift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wind shift")?;
        if let Some(time) = format_time(self.hour, self.minute) {
            write!(f, " at {}", time)?;
        }
        if self.frontal_passage {
            write!(f, " (frontal passage)")?;
        }
        Ok(())
    }
}

/// "hh:mm" when the hour is known, ":mm" when only minutes were reported.
pub(crate) fn format_time(hour: Option<i32>, minute: Option<i32>) -> Option<String> {
    match (hour, minute) {
        (Some(h), Some(m)) => Some(format!("{:02}:{:02}", h, m)),
        (None, Some(m)) => Some(format!(":{:02}", m)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_wind_validation() {
        assert!(PeakWind::new(Some(280), Some(45), Some(15), Some(30)).is_ok());
        assert!(PeakWind::new(Some(361), Some(45), None, Some(30)).is_err());
        assert!(PeakWind::new(Some(280), Some(-1), None, Some(30)).is_err());
        assert!(PeakWind::new(Some(280), Some(45), Some(24), Some(30)).is_err());
        assert!(PeakWind::new(Some(280), Some(45), Some(12), Some(60)).is_err());
    }

    #[test]
    fn test_peak_wind_derived() {
        let peak = PeakWind::new(Some(280), Some(45), Some(15), Some(30)).unwrap();
        assert_eq!(peak.cardinal_direction(), "W");
        assert_eq!(peak.to_mph(), Some(52.0));
        assert_eq!(peak.to_string(), "280° (W) at 45 KT at 15:30");

        let peak = PeakWind::new(None, None, None, Some(5)).unwrap();
        assert_eq!(peak.cardinal_direction(), "UNKNOWN");
        assert_eq!(peak.to_mph(), None);
        assert_eq!(peak.to_string(), "Unknown direction at :05");
    }

    #[test]
    fn test_wind_shift() {
        let shift = WindShift::new(Some(15), Some(30), true).unwrap();
        assert!(shift.frontal_passage());
        assert_eq!(shift.to_string(), "Wind shift at 15:30 (frontal passage)");

        let shift = WindShift::new(None, Some(45), false).unwrap();
        assert_eq!(shift.to_string(), "Wind shift at :45");

        assert!(WindShift::new(Some(25), Some(0), false).is_err());
    }
}
