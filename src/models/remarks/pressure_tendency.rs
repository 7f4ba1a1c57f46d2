use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    HPA_PER_INHG, RAPID_PRESSURE_CHANGE_HPA, SIGNIFICANT_PRESSURE_CHANGE_HPA,
};
use crate::utils::units::parse_digits;

/// Three-hour pressure tendency from the "5appp" remark group.
///
/// `tendency_code` is the WMO characteristic (0-8) and `change_hectopascals`
/// the unsigned magnitude of the change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureTendency {
    tendency_code: u8,
    change_hectopascals: f64,
}

impl PressureTendency {
    pub fn new(tendency_code: u8, change_hectopascals: f64) -> Result<Self> {
        if tendency_code > 8 {
            return Err(ProcessingError::remark(format!(
                "Tendency code must be 0-8, got: {}",
                tendency_code
            )));
        }
        if !change_hectopascals.is_finite() {
            return Err(ProcessingError::remark(format!(
                "Pressure change must be a finite number, got: {}",
                change_hectopascals
            )));
        }
        if change_hectopascals < 0.0 {
            return Err(ProcessingError::remark(format!(
                "Pressure change cannot be negative, got: {:.1}",
                change_hectopascals
            )));
        }
        if change_hectopascals > 50.0 {
            return Err(ProcessingError::remark(format!(
                "Pressure change too large (> 50 hPa), got: {:.1}",
                change_hectopascals
            )));
        }

        Ok(Self {
            tendency_code,
            change_hectopascals,
        })
    }

    /// Build from the tendency digit and the three-digit change in tenths of hPa.
    pub fn from_metar(tendency_code: u8, change_code: &str) -> Result<Self> {
        let tenths = if change_code.len() == 3 {
            parse_digits::<u32>(change_code)
        } else {
            None
        };
        let tenths = tenths.ok_or_else(|| {
            ProcessingError::remark(format!(
                "Change code must be 3 digits, got: {}",
                change_code
            ))
        })?;
        Self::new(tendency_code, f64::from(tenths) / 10.0)
    }

    pub fn tendency_code(&self) -> u8 {
        self.tendency_code
    }

    pub fn change_hectopascals(&self) -> f64 {
        self.change_hectopascals
    }

    pub fn is_increasing(&self) -> bool {
        self.tendency_code <= 3
    }

    pub fn is_steady(&self) -> bool {
        self.tendency_code == 4
    }

    pub fn is_decreasing(&self) -> bool {
        (5..=8).contains(&self.tendency_code)
    }

    pub fn is_significant(&self) -> bool {
        self.change_hectopascals >= SIGNIFICANT_PRESSURE_CHANGE_HPA
    }

    pub fn is_rapid(&self) -> bool {
        self.change_hectopascals >= RAPID_PRESSURE_CHANGE_HPA
    }

    pub fn is_negligible(&self) -> bool {
        self.change_hectopascals < 1.0
    }

    pub fn change_inches_hg(&self) -> f64 {
        self.change_hectopascals / HPA_PER_INHG
    }

    /// Change with the sign implied by the tendency code.
    pub fn signed_change(&self) -> f64 {
        if self.is_decreasing() {
            -self.change_hectopascals
        } else {
            self.change_hectopascals
        }
    }

    pub fn tendency_description(&self) -> &'static str {
        match self.tendency_code {
            0 => "Increasing, then decreasing",
            1 => "Increasing, then steady",
            2 => "Increasing",
            3 => "Increasing rapidly",
            4 => "Steady",
            5 => "Decreasing, then increasing",
            6 => "Decreasing, then steady",
            7 => "Decreasing",
            8 => "Decreasing rapidly",
            _ => "Unknown",
        }
    }

    pub fn short_description(&self) -> &'static str {
        match self.tendency_code {
            0..=3 => "Rising",
            4 => "Steady",
            5..=8 => "Falling",
            _ => "Unknown",
        }
    }

    pub fn magnitude(&self) -> &'static str {
        match self.change_hectopascals {
            c if c >= RAPID_PRESSURE_CHANGE_HPA => "Rapid",
            c if c >= SIGNIFICANT_PRESSURE_CHANGE_HPA => "Significant",
            c if c >= 1.0 => "Moderate",
            c if c > 0.0 => "Slight",
            _ => "None",
        }
    }

    pub fn weather_implication(&self) -> &'static str {
        if self.is_rapid() {
            if self.is_increasing() {
                "Rapid pressure rise - weather likely improving quickly, storm clearing"
            } else if self.is_decreasing() {
                "Rapid pressure fall - severe weather approaching, deteriorating conditions"
            } else {
                "Steady pressure - stable weather conditions"
            }
        } else if self.is_significant() {
            if self.is_increasing() {
                "Rising pressure - improving weather, clearing conditions"
            } else if self.is_decreasing() {
                "Falling pressure - weather deteriorating, potential storm development"
            } else {
                "Steady pressure - weather conditions stable"
            }
        } else if self.is_increasing() {
            "Slight pressure rise - weather becoming more settled"
        } else if self.is_decreasing() {
            "Slight pressure fall - weather may deteriorate slightly"
        } else {
            "Pressure steady - no significant weather change expected"
        }
    }

    fn sign(&self) -> &'static str {
        if self.is_decreasing() {
            "-"
        } else if self.is_increasing() {
            "+"
        } else {
            ""
        }
    }

    pub fn formatted_change(&self) -> String {
        format!("{}{:.1} hPa", self.sign(), self.change_hectopascals)
    }

    pub fn to_metar_code(&self) -> String {
        let tenths = (self.change_hectopascals * 10.0).round() as u32;
        format!("5{}{:03}", self.tendency_code, tenths)
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Pressure tendency: {}, change of {}{:.1} hPa ({:.2} inHg)",
            self.tendency_description(),
            self.sign(),
            self.change_hectopascals,
            self.change_inches_hg()
        );
        if self.is_rapid() {
            summary.push_str(" [RAPID]");
        } else if self.is_significant() {
            summary.push_str(" [SIGNIFICANT]");
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_metar() {
        let tendency = PressureTendency::from_metar(2, "032").unwrap();
        assert_eq!(tendency.tendency_code(), 2);
        assert!((tendency.change_hectopascals() - 3.2).abs() < 1e-9);
        assert!(tendency.is_increasing());
        assert!(tendency.is_significant());
        assert!(!tendency.is_rapid());
        assert_eq!(tendency.to_metar_code(), "52032");

        assert!(PressureTendency::from_metar(2, "32").is_err());
        assert!(PressureTendency::from_metar(2, "0A2").is_err());
    }

    #[test]
    fn test_validation() {
        assert!(PressureTendency::new(9, 1.0).is_err());
        assert!(PressureTendency::new(4, -0.1).is_err());
        let err = PressureTendency::new(4, 50.1).unwrap_err();
        assert!(err.to_string().contains("Pressure change too large"));
        assert!(PressureTendency::new(4, f64::NAN).is_err());
    }

    #[test]
    fn test_signed_change_and_descriptions() {
        let falling = PressureTendency::new(8, 6.5).unwrap();
        assert!(falling.is_decreasing());
        assert!((falling.signed_change() + 6.5).abs() < 1e-9);
        assert_eq!(falling.short_description(), "Falling");
        assert_eq!(falling.magnitude(), "Rapid");
        assert_eq!(falling.formatted_change(), "-6.5 hPa");
        assert!(falling.weather_implication().starts_with("Rapid pressure fall"));
        assert!(falling.summary().ends_with("[RAPID]"));

        let steady = PressureTendency::new(4, 0.0).unwrap();
        assert!(steady.is_steady());
        assert!(steady.is_negligible());
        assert_eq!(steady.magnitude(), "None");
        assert_eq!(steady.formatted_change(), "0.0 hPa");
        assert_eq!(steady.to_metar_code(), "54000");
    }

    #[test]
    fn test_inches_conversion() {
        let tendency = PressureTendency::new(2, 33.8639).unwrap();
        assert!((tendency.change_inches_hg() - 1.0).abs() < 1e-6);
    }
}
