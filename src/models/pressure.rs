use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    EXTREMELY_HIGH_PRESSURE_HPA, EXTREMELY_LOW_PRESSURE_HPA, HIGH_PRESSURE_HPA, HPA_PER_INHG,
    LOW_PRESSURE_HPA, MAX_PRESSURE_HPA, MAX_PRESSURE_INHG, MIN_PRESSURE_HPA, MIN_PRESSURE_INHG,
    RAPID_PRESSURE_CHANGE_HPA, STANDARD_PRESSURE_HPA, STANDARD_PRESSURE_INHG, STANDARD_TEMP_C,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PressureUnit {
    InchesHg,
    Hectopascals,
}

impl PressureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            PressureUnit::InchesHg => "inHg",
            PressureUnit::Hectopascals => "hPa",
        }
    }
}

impl fmt::Display for PressureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Station pressure or altimeter setting in its reported unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pressure {
    value: f64,
    unit: PressureUnit,
}

impl Pressure {
    pub fn new(value: f64, unit: PressureUnit) -> Result<Self> {
        let (min, max, range) = match unit {
            PressureUnit::InchesHg => (MIN_PRESSURE_INHG, MAX_PRESSURE_INHG, "25.0-35.0 inHg"),
            PressureUnit::Hectopascals => (MIN_PRESSURE_HPA, MAX_PRESSURE_HPA, "850-1085 hPa"),
        };

        if !value.is_finite() || value < min || value > max {
            return Err(ProcessingError::pressure(format!(
                "Pressure out of reasonable range ({}): {}",
                range, value
            )));
        }

        Ok(Self { value, unit })
    }

    pub fn inches_hg(value: f64) -> Result<Self> {
        Self::new(value, PressureUnit::InchesHg)
    }

    pub fn hectopascals(value: f64) -> Result<Self> {
        Self::new(value, PressureUnit::Hectopascals)
    }

    /// Standard sea-level pressure, 29.92 inHg.
    pub fn standard() -> Self {
        Self {
            value: STANDARD_PRESSURE_INHG,
            unit: PressureUnit::InchesHg,
        }
    }

    /// Decode a North American altimeter group such as "A3015".
    pub fn from_metar_altimeter(group: &str) -> Result<Self> {
        let hundredths = parse_prefixed(group, 'A').ok_or_else(|| {
            ProcessingError::InvalidFormat(format!("Invalid METAR altimeter format: {}", group))
        })?;
        Self::inches_hg(f64::from(hundredths) / 100.0)
    }

    /// Decode an international QNH group such as "Q1013".
    pub fn from_metar_qnh(group: &str) -> Result<Self> {
        let hpa = parse_prefixed(group, 'Q').ok_or_else(|| {
            ProcessingError::InvalidFormat(format!("Invalid METAR QNH format: {}", group))
        })?;
        Self::hectopascals(f64::from(hpa))
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> PressureUnit {
        self.unit
    }

    pub fn to_inches_hg(&self) -> f64 {
        match self.unit {
            PressureUnit::InchesHg => self.value,
            PressureUnit::Hectopascals => self.value / HPA_PER_INHG,
        }
    }

    pub fn to_hectopascals(&self) -> f64 {
        match self.unit {
            PressureUnit::Hectopascals => self.value,
            PressureUnit::InchesHg => self.value * HPA_PER_INHG,
        }
    }

    pub fn to_millibars(&self) -> f64 {
        self.to_hectopascals()
    }

    pub fn deviation_from_standard(&self) -> f64 {
        self.to_hectopascals() - STANDARD_PRESSURE_HPA
    }

    pub fn is_low(&self) -> bool {
        self.to_hectopascals() < LOW_PRESSURE_HPA
    }

    pub fn is_high(&self) -> bool {
        self.to_hectopascals() > HIGH_PRESSURE_HPA
    }

    pub fn is_extremely_low(&self) -> bool {
        self.to_hectopascals() < EXTREMELY_LOW_PRESSURE_HPA
    }

    pub fn is_extremely_high(&self) -> bool {
        self.to_hectopascals() > EXTREMELY_HIGH_PRESSURE_HPA
    }

    pub fn is_below_standard(&self) -> bool {
        self.to_hectopascals() < STANDARD_PRESSURE_HPA
    }

    pub fn is_above_standard(&self) -> bool {
        self.to_hectopascals() > STANDARD_PRESSURE_HPA
    }

    /// Altimeter setting for a field elevation, using one inch per thousand feet.
    pub fn altimeter_setting(&self, elevation_feet: f64) -> f64 {
        self.to_inches_hg() + elevation_feet / 1000.0
    }

    /// ICAO standard atmosphere pressure altitude in feet.
    pub fn pressure_altitude_feet(&self) -> f64 {
        (1.0 - (self.to_hectopascals() / STANDARD_PRESSURE_HPA).powf(0.190284)) * 145_366.45
    }

    /// Density altitude in feet for an outside air temperature in °C.
    pub fn density_altitude(&self, outside_air_temp_c: f64) -> f64 {
        let pressure_altitude = self.pressure_altitude_feet();
        let isa_temp = STANDARD_TEMP_C - 2.0 * pressure_altitude / 1000.0;
        pressure_altitude + 120.0 * (outside_air_temp_c - isa_temp)
    }

    /// Change in hPa since an earlier reading; positive when rising.
    pub fn tendency_from(&self, previous: &Pressure) -> f64 {
        self.to_hectopascals() - previous.to_hectopascals()
    }

    pub fn is_rapid_change(&self, previous: Option<&Pressure>) -> bool {
        previous.map_or(false, |p| {
            self.tendency_from(p).abs() >= RAPID_PRESSURE_CHANGE_HPA
        })
    }

    pub fn tendency_description(&self, previous: &Pressure) -> &'static str {
        let change = self.tendency_from(previous);
        if change >= 3.0 {
            "Rapidly rising"
        } else if change >= 1.0 {
            "Rising"
        } else if change <= -3.0 {
            "Rapidly falling"
        } else if change <= -1.0 {
            "Falling"
        } else {
            "Steady"
        }
    }

    /// Rough outlook from the current value and, if known, the previous reading.
    pub fn weather_condition(&self, previous: Option<&Pressure>) -> &'static str {
        let hpa = self.to_hectopascals();

        let previous = match previous {
            Some(p) => p,
            None => {
                return if hpa < 980.0 {
                    "Stormy conditions likely"
                } else if hpa < LOW_PRESSURE_HPA {
                    "Unsettled weather likely"
                } else if hpa > HIGH_PRESSURE_HPA {
                    "Fair weather likely"
                } else {
                    "Generally fair conditions"
                };
            }
        };

        let change = self.tendency_from(previous);
        let rising = change >= 1.0;
        let falling = change <= -1.0;

        if self.is_low() && falling {
            "Deteriorating weather, storm approaching"
        } else if self.is_low() && rising {
            "Improving weather, storm clearing"
        } else if self.is_high() && rising {
            "Fair weather, becoming more settled"
        } else if self.is_high() && falling {
            "Fair weather, may deteriorate"
        } else if change <= -3.0 {
            "Weather deteriorating"
        } else if change >= 3.0 {
            "Weather improving"
        } else {
            "Weather conditions stable"
        }
    }

    pub fn formatted_value(&self) -> String {
        match self.unit {
            PressureUnit::InchesHg => format!("{:.2} {}", self.value, self.unit),
            PressureUnit::Hectopascals => format!("{:.0} {}", self.value, self.unit),
        }
    }

    pub fn to_metar_altimeter(&self) -> String {
        format!("A{:04}", (self.to_inches_hg() * 100.0).round() as i64)
    }

    pub fn to_metar_qnh(&self) -> String {
        format!("Q{:04}", self.to_hectopascals().round() as i64)
    }

    pub fn summary(&self) -> String {
        match self.unit {
            PressureUnit::InchesHg => format!(
                "{} ({:.0} hPa)",
                self.formatted_value(),
                self.to_hectopascals()
            ),
            PressureUnit::Hectopascals => format!(
                "{} ({:.2} inHg)",
                self.formatted_value(),
                self.to_inches_hg()
            ),
        }
    }
}

fn parse_prefixed(group: &str, prefix: char) -> Option<u32> {
    let digits = group.strip_prefix(prefix)?;
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_validation() {
        assert!(Pressure::inches_hg(25.0).is_ok());
        assert!(Pressure::inches_hg(35.0).is_ok());
        assert!(Pressure::hectopascals(850.0).is_ok());
        assert!(Pressure::hectopascals(1085.0).is_ok());

        let err = Pressure::inches_hg(24.9).unwrap_err();
        assert!(err
            .to_string()
            .contains("Pressure out of reasonable range (25.0-35.0 inHg)"));

        let err = Pressure::hectopascals(1100.0).unwrap_err();
        assert!(err
            .to_string()
            .contains("Pressure out of reasonable range (850-1085 hPa)"));
    }

    #[test]
    fn test_unit_conversion() {
        let p = Pressure::inches_hg(29.92).unwrap();
        assert!((p.to_hectopascals() - 1013.21).abs() < 0.1);
        assert_eq!(p.to_inches_hg(), 29.92);

        let q = Pressure::hectopascals(1013.25).unwrap();
        assert!((q.to_inches_hg() - 29.92).abs() < 0.01);
        assert_eq!(q.to_millibars(), 1013.25);
        assert!(q.deviation_from_standard().abs() < f64::EPSILON);
    }

    #[test]
    fn test_classification() {
        assert!(Pressure::hectopascals(990.0).unwrap().is_low());
        assert!(Pressure::hectopascals(1025.0).unwrap().is_high());
        assert!(Pressure::hectopascals(940.0).unwrap().is_extremely_low());
        assert!(Pressure::hectopascals(1045.0).unwrap().is_extremely_high());

        let standard = Pressure::hectopascals(1013.25).unwrap();
        assert!(!standard.is_below_standard());
        assert!(!standard.is_above_standard());
    }

    #[test]
    fn test_aviation_calculations() {
        let p = Pressure::inches_hg(30.0).unwrap();
        assert!((p.altimeter_setting(0.0) - 30.0).abs() < 0.01);
        assert!((p.altimeter_setting(1000.0) - 31.0).abs() < 0.1);

        let standard = Pressure::hectopascals(1013.25).unwrap();
        assert!(standard.pressure_altitude_feet().abs() < 10.0);
        assert!(standard.density_altitude(15.0).abs() < 50.0);
        assert!(standard.density_altitude(30.0) > 1000.0);
        assert!(standard.density_altitude(0.0) < -1000.0);

        let low = Pressure::hectopascals(1000.0).unwrap();
        let pa = low.pressure_altitude_feet();
        assert!(pa > 300.0 && pa < 400.0);

        let denver = Pressure::inches_hg(28.0).unwrap();
        let pa = denver.pressure_altitude_feet();
        assert!(pa > 1800.0 && pa < 2000.0);
        assert!(Pressure::hectopascals(850.0).unwrap().density_altitude(25.0) > 4000.0);
    }

    #[test]
    fn test_tendency() {
        let current = Pressure::hectopascals(1008.0).unwrap();
        let previous = Pressure::hectopascals(1013.0).unwrap();
        assert!((current.tendency_from(&previous) + 5.0).abs() < 1e-9);
        assert_eq!(current.tendency_description(&previous), "Rapidly falling");
        assert!(!current.is_rapid_change(Some(&previous)));
        assert!(!current.is_rapid_change(None));

        let big_drop = Pressure::hectopascals(1000.0).unwrap();
        assert!(big_drop.is_rapid_change(Some(&previous)));

        let steady = Pressure::hectopascals(1013.5).unwrap();
        assert_eq!(steady.tendency_description(&previous), "Steady");
    }

    #[test]
    fn test_weather_condition() {
        let hpa = |v| Pressure::hectopascals(v).unwrap();
        assert_eq!(hpa(970.0).weather_condition(None), "Stormy conditions likely");
        assert_eq!(hpa(990.0).weather_condition(None), "Unsettled weather likely");
        assert_eq!(hpa(1035.0).weather_condition(None), "Fair weather likely");
        assert_eq!(hpa(1013.0).weather_condition(None), "Generally fair conditions");

        assert_eq!(
            hpa(995.0).weather_condition(Some(&hpa(1000.0))),
            "Deteriorating weather, storm approaching"
        );
        assert_eq!(
            hpa(995.0).weather_condition(Some(&hpa(990.0))),
            "Improving weather, storm clearing"
        );
        assert_eq!(
            hpa(1025.0).weather_condition(Some(&hpa(1023.0))),
            "Fair weather, becoming more settled"
        );
        assert_eq!(
            hpa(1025.0).weather_condition(Some(&hpa(1027.0))),
            "Fair weather, may deteriorate"
        );
        assert_eq!(
            hpa(1010.0).weather_condition(Some(&hpa(1014.0))),
            "Weather deteriorating"
        );
        assert_eq!(
            hpa(1017.0).weather_condition(Some(&hpa(1013.0))),
            "Weather improving"
        );
        assert_eq!(
            hpa(1013.0).weather_condition(Some(&hpa(1013.5))),
            "Weather conditions stable"
        );
    }

    #[test]
    fn test_metar_groups() {
        let p = Pressure::from_metar_altimeter("A3015").unwrap();
        assert_eq!(p.unit(), PressureUnit::InchesHg);
        assert!((p.value() - 30.15).abs() < 1e-9);
        assert_eq!(p.to_metar_altimeter(), "A3015");

        assert_eq!(Pressure::hectopascals(1013.25).unwrap().to_metar_altimeter(), "A2992");
        assert_eq!(Pressure::inches_hg(30.156).unwrap().to_metar_altimeter(), "A3016");

        let q = Pressure::from_metar_qnh("Q1013").unwrap();
        assert_eq!(q.value(), 1013.0);
        assert_eq!(q.to_metar_qnh(), "Q1013");
        assert_eq!(Pressure::hectopascals(998.0).unwrap().to_metar_qnh(), "Q0998");

        let err = Pressure::from_metar_altimeter("A301").unwrap_err();
        assert!(err.to_string().contains("Invalid METAR altimeter format"));
        let err = Pressure::from_metar_qnh("1013").unwrap_err();
        assert!(err.to_string().contains("Invalid METAR QNH format"));
    }

    #[test]
    fn test_altimeter_round_trip_within_tolerance() {
        for value in [25.0, 28.47, 29.92, 30.156, 34.99] {
            let p = Pressure::inches_hg(value).unwrap();
            let decoded = Pressure::from_metar_altimeter(&p.to_metar_altimeter()).unwrap();
            assert!((decoded.to_inches_hg() - p.to_inches_hg()).abs() <= 0.01);
        }
    }

    #[test]
    fn test_formatting() {
        assert_eq!(Pressure::inches_hg(30.15).unwrap().formatted_value(), "30.15 inHg");
        assert_eq!(Pressure::hectopascals(1013.0).unwrap().formatted_value(), "1013 hPa");

        let summary = Pressure::inches_hg(30.15).unwrap().summary();
        assert!(summary.contains("30.15 inHg"));
        assert!(summary.contains("hPa"));

        let summary = Pressure::hectopascals(1013.25).unwrap().summary();
        assert!(summary.contains("1013 hPa"));
        assert!(summary.contains("inHg"));
    }
}
