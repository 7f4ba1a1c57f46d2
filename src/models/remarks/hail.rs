use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};

const CM_PER_INCH: f64 = 2.54;
const MM_PER_INCH: f64 = 25.4;

/// Largest hailstone diameter from a "GR" remark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HailSize {
    inches: f64,
}

impl HailSize {
    pub fn new(inches: f64) -> Result<Self> {
        if !inches.is_finite() {
            return Err(ProcessingError::remark(format!(
                "Hail size must be a finite number, got: {}",
                inches
            )));
        }
        if inches <= 0.0 {
            return Err(ProcessingError::remark(format!(
                "Hail size must be positive, got: {}",
                inches
            )));
        }
        if inches > 10.0 {
            return Err(ProcessingError::remark(format!(
                "Hail size unreasonably large, got: {}",
                inches
            )));
        }
        Ok(Self { inches })
    }

    pub fn from_centimeters(cm: f64) -> Result<Self> {
        Self::new(cm / CM_PER_INCH)
    }

    pub fn from_millimeters(mm: f64) -> Result<Self> {
        Self::new(mm / MM_PER_INCH)
    }

    pub fn inches(&self) -> f64 {
        self.inches
    }

    pub fn centimeters(&self) -> f64 {
        self.inches * CM_PER_INCH
    }

    pub fn millimeters(&self) -> f64 {
        self.inches * MM_PER_INCH
    }

    /// Everyday object comparison used in severe weather reporting.
    pub fn size_category(&self) -> &'static str {
        match self.inches {
            i if i < 0.25 => "Pea-sized",
            i if i < 0.50 => "Marble-sized",
            i if i < 0.75 => "Penny-sized",
            i if i < 0.88 => "Nickel-sized",
            i if i < 1.50 => "Quarter-sized",
            i if i < 1.75 => "Golf ball-sized",
            i if i < 2.50 => "Tennis ball-sized",
            i if i < 2.75 => "Baseball-sized",
            i if i < 4.0 => "Softball-sized",
            _ => "Grapefruit-sized or larger",
        }
    }

    pub fn is_severe(&self) -> bool {
        self.inches >= 1.0
    }

    pub fn is_significantly_severe(&self) -> bool {
        self.inches >= 2.0
    }

    pub fn description(&self) -> String {
        format!("{:.2} inches ({})", self.inches, self.size_category())
    }

    pub fn summary(&self) -> String {
        let mut summary = format!("{:.2}\"", self.inches);
        if self.is_significantly_severe() {
            summary.push_str(" (significantly severe)");
        } else if self.is_severe() {
            summary.push_str(" (severe)");
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hail_bounds() {
        assert!(HailSize::new(0.0).is_err());
        assert!(HailSize::new(-0.5).is_err());
        assert!(HailSize::new(10.0).is_ok());
        let err = HailSize::new(10.5).unwrap_err();
        assert!(err.to_string().contains("unreasonably large"));
        assert!(HailSize::new(f64::NAN).is_err());
        assert!(HailSize::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_hail_categories() {
        let hail = HailSize::new(2.0).unwrap();
        assert!(hail.is_severe());
        assert!(hail.is_significantly_severe());
        assert_eq!(hail.size_category(), "Tennis ball-sized");
        assert_eq!(hail.summary(), "2.00\" (significantly severe)");

        let hail = HailSize::new(1.0).unwrap();
        assert!(hail.is_severe());
        assert!(!hail.is_significantly_severe());
        assert_eq!(hail.size_category(), "Quarter-sized");
        assert_eq!(hail.summary(), "1.00\" (severe)");

        let hail = HailSize::new(0.25).unwrap();
        assert_eq!(hail.size_category(), "Marble-sized");
        assert_eq!(hail.description(), "0.25 inches (Marble-sized)");
        assert_eq!(hail.summary(), "0.25\"");
    }

    #[test]
    fn test_metric_conversions() {
        let hail = HailSize::new(1.0).unwrap();
        assert!((hail.centimeters() - 2.54).abs() < 1e-9);
        assert!((hail.millimeters() - 25.4).abs() < 1e-9);

        let hail = HailSize::from_millimeters(50.8).unwrap();
        assert!((hail.inches() - 2.0).abs() < 1e-9);
    }
}
