use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::utils::units::parse_digits;

const VALID_PERIODS: [u8; 4] = [1, 3, 6, 24];
const TRACE_THRESHOLD_INCHES: f64 = 0.01;

/// Precipitation accumulated over 1, 3, 6 or 24 hours ("Prrrr", "6rrrr", "7rrrr").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationAmount {
    inches: Option<f64>,
    period_hours: u8,
    trace: bool,
}

impl PrecipitationAmount {
    pub fn new(inches: Option<f64>, period_hours: u8, trace: bool) -> Result<Self> {
        if !VALID_PERIODS.contains(&period_hours) {
            return Err(ProcessingError::remark(format!(
                "Period must be 1, 3, 6, or 24 hours, got: {}",
                period_hours
            )));
        }
        if let Some(inches) = inches {
            if !inches.is_finite() {
                return Err(ProcessingError::remark(format!(
                    "Precipitation amount must be a finite number: {}",
                    inches
                )));
            }
            if inches < 0.0 {
                return Err(ProcessingError::remark(format!(
                    "Precipitation amount cannot be negative: {}",
                    inches
                )));
            }
            if trace && inches >= TRACE_THRESHOLD_INCHES {
                return Err(ProcessingError::remark(format!(
                    "Trace precipitation should have no amount or less than 0.01 inches, got: {}",
                    inches
                )));
            }
        }

        Ok(Self {
            inches,
            period_hours,
            trace,
        })
    }

    pub fn inches(amount: f64, period_hours: u8) -> Result<Self> {
        Self::new(Some(amount), period_hours, false)
    }

    pub fn trace(period_hours: u8) -> Result<Self> {
        Self::new(None, period_hours, true)
    }

    /// Decode a four-digit amount in hundredths of an inch. An all-slash group is a trace.
    pub fn from_encoded(encoded: &str, period_hours: u8) -> Result<Self> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(ProcessingError::remark("Encoded value cannot be blank"));
        }
        if encoded.chars().all(|c| c == '/') {
            return Self::trace(period_hours);
        }
        let hundredths = parse_digits::<u32>(encoded).ok_or_else(|| {
            ProcessingError::remark(format!("Invalid encoded value: {}", encoded))
        })?;
        Self::inches(f64::from(hundredths) / 100.0, period_hours)
    }

    pub fn amount_inches(&self) -> Option<f64> {
        self.inches
    }

    pub fn period_hours(&self) -> u8 {
        self.period_hours
    }

    pub fn is_trace(&self) -> bool {
        self.trace
    }

    pub fn millimeters(&self) -> Option<f64> {
        self.inches.map(|i| i * 25.4)
    }

    pub fn is_measurable(&self) -> bool {
        !self.trace && self.inches.map_or(false, |i| i >= TRACE_THRESHOLD_INCHES)
    }

    pub fn is_hourly(&self) -> bool {
        self.period_hours == 1
    }

    pub fn is_six_hour(&self) -> bool {
        self.period_hours == 6
    }

    pub fn is_twenty_four_hour(&self) -> bool {
        self.period_hours == 24
    }

    pub fn description(&self) -> String {
        match (self.trace, self.inches) {
            (true, _) => format!("Trace precipitation ({} hour)", self.period_hours),
            (false, None) => format!("Precipitation data missing ({} hour)", self.period_hours),
            (false, Some(inches)) => format!("{:.2} inches ({} hour)", inches, self.period_hours),
        }
    }
}
