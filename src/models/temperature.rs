use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{MAGNUS_A, MAGNUS_B, MAGNUS_C, MAX_VALID_TEMP, MIN_VALID_TEMP};

/// Air temperature and optional dewpoint in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    celsius: f64,
    dewpoint_celsius: Option<f64>,
}

impl Temperature {
    pub fn new(celsius: f64, dewpoint_celsius: Option<f64>) -> Result<Self> {
        if !(MIN_VALID_TEMP..=MAX_VALID_TEMP).contains(&celsius) {
            return Err(ProcessingError::temperature(format!(
                "Temperature out of reasonable range (-100 to 60°C): {}",
                celsius
            )));
        }

        if let Some(dewpoint) = dewpoint_celsius {
            if !(MIN_VALID_TEMP..=MAX_VALID_TEMP).contains(&dewpoint) {
                return Err(ProcessingError::temperature(format!(
                    "Dewpoint out of reasonable range (-100 to 60°C): {}",
                    dewpoint
                )));
            }

            if dewpoint > celsius {
                return Err(ProcessingError::temperature(format!(
                    "Dewpoint ({:.1}°C) cannot be higher than temperature ({:.1}°C)",
                    dewpoint, celsius
                )));
            }
        }

        Ok(Self {
            celsius,
            dewpoint_celsius,
        })
    }

    pub fn of(celsius: f64) -> Result<Self> {
        Self::new(celsius, None)
    }

    pub fn from_fahrenheit(fahrenheit: f64, dewpoint_fahrenheit: Option<f64>) -> Result<Self> {
        let to_celsius = |f: f64| (f - 32.0) * 5.0 / 9.0;
        Self::new(to_celsius(fahrenheit), dewpoint_fahrenheit.map(to_celsius))
    }

    /// Decode a METAR temperature group such as "22/12", "M05/M10" or "10/".
    pub fn from_metar(group: &str) -> Result<Self> {
        let (temp, dewpoint) = group.split_once('/').ok_or_else(|| {
            ProcessingError::InvalidFormat(format!("Invalid temperature group: {}", group))
        })?;

        let celsius = parse_metar_value(temp).ok_or_else(|| {
            ProcessingError::InvalidFormat(format!("Invalid temperature group: {}", group))
        })?;

        let dewpoint_celsius = match dewpoint {
            "" | "//" => None,
            value => Some(parse_metar_value(value).ok_or_else(|| {
                ProcessingError::InvalidFormat(format!("Invalid dewpoint in group: {}", group))
            })?),
        };

        Self::new(celsius, dewpoint_celsius)
    }

    pub fn celsius(&self) -> f64 {
        self.celsius
    }

    pub fn dewpoint_celsius(&self) -> Option<f64> {
        self.dewpoint_celsius
    }

    pub fn to_fahrenheit(&self) -> f64 {
        self.celsius * 9.0 / 5.0 + 32.0
    }

    pub fn dewpoint_fahrenheit(&self) -> Option<f64> {
        self.dewpoint_celsius.map(|d| d * 9.0 / 5.0 + 32.0)
    }

    pub fn to_kelvin(&self) -> f64 {
        self.celsius + 273.15
    }

    /// Temperature minus dewpoint.
    pub fn spread(&self) -> Option<f64> {
        self.dewpoint_celsius.map(|d| self.celsius - d)
    }

    /// Relative humidity in percent using the August-Roche-Magnus approximation.
    pub fn relative_humidity(&self) -> Option<f64> {
        let dewpoint = self.dewpoint_celsius?;
        let vapor = |x: f64| MAGNUS_A * (MAGNUS_B * x / (x + MAGNUS_C)).exp();
        let rh = 100.0 * vapor(dewpoint) / vapor(self.celsius);
        Some(rh.clamp(0.0, 100.0))
    }

    /// NOAA heat index in °F, defined only from 27°C upward with a known dewpoint.
    pub fn heat_index(&self) -> Option<f64> {
        if self.celsius < 27.0 {
            return None;
        }
        let rh = self.relative_humidity()?;
        let t = self.to_fahrenheit();

        let simple = 0.5 * (t + 61.0 + (t - 68.0) * 1.2 + rh * 0.094);
        if (simple + t) / 2.0 < 80.0 {
            return Some(simple);
        }

        let mut hi = -42.379 + 2.04901523 * t + 10.14333127 * rh
            - 0.22475541 * t * rh
            - 0.00683783 * t * t
            - 0.05481717 * rh * rh
            + 0.00122874 * t * t * rh
            + 0.00085282 * t * rh * rh
            - 0.00000199 * t * t * rh * rh;

        if rh < 13.0 && (80.0..=112.0).contains(&t) {
            hi -= ((13.0 - rh) / 4.0) * ((17.0 - (t - 95.0).abs()) / 17.0).sqrt();
        } else if rh > 85.0 && (80.0..=87.0).contains(&t) {
            hi += ((rh - 85.0) / 10.0) * ((87.0 - t) / 5.0);
        }

        Some(hi)
    }

    pub fn is_fog_likely(&self) -> bool {
        self.spread().map_or(false, |s| s <= 2.0)
    }

    pub fn is_freezing(&self) -> bool {
        self.celsius <= 0.0
    }

    /// Sub-freezing air near saturation.
    pub fn is_icing_likely(&self) -> bool {
        (-20.0..=0.0).contains(&self.celsius) && self.spread().map_or(false, |s| s <= 3.0)
    }

    pub fn is_very_cold(&self) -> bool {
        self.celsius <= -20.0
    }

    pub fn is_very_hot(&self) -> bool {
        self.celsius >= 35.0
    }

    pub fn to_metar_code(&self) -> String {
        match self.dewpoint_celsius {
            Some(d) => format!("{}/{}", format_metar_value(self.celsius), format_metar_value(d)),
            None => format!("{}/", format_metar_value(self.celsius)),
        }
    }

    pub fn summary(&self) -> String {
        let mut summary = format!("{:.1}°C ({:.1}°F)", self.celsius, self.to_fahrenheit());
        if let Some(d) = self.dewpoint_celsius {
            summary.push_str(&format!(", dewpoint {:.1}°C", d));
        }
        if let Some(rh) = self.relative_humidity() {
            summary.push_str(&format!(", RH {:.0}%", rh));
        }
        summary
    }
}

fn parse_metar_value(value: &str) -> Option<f64> {
    let (negative, digits) = match value.strip_prefix('M') {
        Some(rest) => (true, rest),
        None => (false, value),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let magnitude: f64 = digits.parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn format_metar_value(value: f64) -> String {
    let rounded = value.round() as i64;
    if rounded < 0 || (rounded == 0 && value < 0.0) {
        format!("M{:02}", rounded.abs())
    } else {
        format!("{:02}", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_validation() {
        assert!(Temperature::new(20.0, Some(10.0)).is_ok());
        assert!(Temperature::new(60.0, None).is_ok());
        assert!(Temperature::new(-100.0, Some(-100.0)).is_ok());

        let err = Temperature::new(61.0, None).unwrap_err();
        assert!(err
            .to_string()
            .contains("Temperature out of reasonable range (-100 to 60°C): 61"));

        let err = Temperature::new(20.0, Some(-101.0)).unwrap_err();
        assert!(err.to_string().contains("Dewpoint out of reasonable range"));
    }

    #[test]
    fn test_dewpoint_above_temperature_rejected() {
        let err = Temperature::new(20.0, Some(25.0)).unwrap_err();
        assert!(err
            .to_string()
            .contains("Dewpoint (25.0°C) cannot be higher than temperature (20.0°C)"));
    }

    #[test]
    fn test_conversions() {
        let temp = Temperature::new(20.0, Some(15.0)).unwrap();
        assert!((temp.to_fahrenheit() - 68.0).abs() < 0.01);
        assert!((temp.dewpoint_fahrenheit().unwrap() - 59.0).abs() < 0.01);
        assert!((temp.to_kelvin() - 293.15).abs() < 0.01);

        let from_f = Temperature::from_fahrenheit(68.0, Some(59.0)).unwrap();
        assert!((from_f.celsius() - 20.0).abs() < 0.01);
        assert!((from_f.dewpoint_celsius().unwrap() - 15.0).abs() < 0.01);
    }

    #[test]
    fn test_relative_humidity() {
        let temp = Temperature::new(20.0, Some(10.0)).unwrap();
        let rh = temp.relative_humidity().unwrap();
        assert!(rh > 0.0 && rh < 100.0);
        assert!((rh - 52.5).abs() < 1.0);
        assert_eq!(temp.relative_humidity(), temp.relative_humidity());

        let saturated = Temperature::new(15.0, Some(15.0)).unwrap();
        assert!((saturated.relative_humidity().unwrap() - 100.0).abs() < 0.001);

        assert!(Temperature::of(20.0).unwrap().relative_humidity().is_none());
    }

    #[test]
    fn test_heat_index() {
        assert!(Temperature::new(26.0, Some(20.0)).unwrap().heat_index().is_none());
        assert!(Temperature::of(35.0).unwrap().heat_index().is_none());

        // 90°F with high humidity feels considerably hotter
        let hot = Temperature::new(32.2, Some(25.0)).unwrap();
        let hi = hot.heat_index().unwrap();
        assert!(hi > hot.to_fahrenheit());
    }

    #[test]
    fn test_fog_and_icing() {
        let foggy = Temperature::new(10.0, Some(9.0)).unwrap();
        assert!(foggy.is_fog_likely());
        assert!(!Temperature::new(20.0, Some(10.0)).unwrap().is_fog_likely());

        let icing = Temperature::new(-10.0, Some(-12.0)).unwrap();
        assert!(icing.is_icing_likely());
        assert!(icing.is_freezing());
        assert!(!Temperature::new(-25.0, Some(-26.0)).unwrap().is_icing_likely());
    }

    #[test]
    fn test_metar_group() {
        let temp = Temperature::from_metar("M05/M10").unwrap();
        assert_eq!(temp.celsius(), -5.0);
        assert_eq!(temp.dewpoint_celsius(), Some(-10.0));
        assert_eq!(temp.to_metar_code(), "M05/M10");

        let no_dew = Temperature::from_metar("10/").unwrap();
        assert_eq!(no_dew.dewpoint_celsius(), None);
        assert_eq!(no_dew.to_metar_code(), "10/");

        assert!(Temperature::from_metar("XX/10").is_err());
        assert!(Temperature::from_metar("1010").is_err());
    }

    #[test]
    fn test_summary() {
        let temp = Temperature::new(20.0, Some(10.0)).unwrap();
        assert!(temp.summary().starts_with("20.0°C (68.0°F), dewpoint 10.0°C"));
        assert_eq!(Temperature::of(20.0).unwrap().summary(), "20.0°C (68.0°F)");
    }
}
