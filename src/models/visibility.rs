use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    LIFR_MAX_VISIBILITY_SM, METERS_PER_STATUTE_MILE, STATUTE_MILES_PER_KM, VFR_MIN_VISIBILITY_SM,
};
use crate::utils::units::{format_fractional, parse_digits, parse_fractional};

/// Prevailing visibility: a distance with its unit, or a special condition such as CAVOK.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visibility {
    distance_value: Option<f64>,
    unit: Option<String>,
    special_condition: Option<String>,
    less_than: bool,
    greater_than: bool,
}

impl Visibility {
    pub fn new(
        distance_value: Option<f64>,
        unit: Option<&str>,
        special_condition: Option<&str>,
    ) -> Result<Self> {
        Self::with_qualifiers(distance_value, unit, special_condition, false, false)
    }

    /// Construct with the METAR "M" (less than) or "P" (greater than) qualifiers.
    pub fn with_qualifiers(
        distance_value: Option<f64>,
        unit: Option<&str>,
        special_condition: Option<&str>,
        less_than: bool,
        greater_than: bool,
    ) -> Result<Self> {
        if let Some(distance) = distance_value {
            if !distance.is_finite() {
                return Err(ProcessingError::visibility(format!(
                    "Visibility distance must be a finite number: {}",
                    distance
                )));
            }
            if distance < 0.0 {
                return Err(ProcessingError::visibility(format!(
                    "Visibility distance cannot be negative: {}",
                    distance
                )));
            }
        }

        if distance_value.is_none() && special_condition.is_none() {
            return Err(ProcessingError::visibility(
                "Visibility must have either distance or special condition",
            ));
        }

        let unit = unit.map(str::trim).filter(|u| !u.is_empty());
        if distance_value.is_some() && unit.is_none() {
            return Err(ProcessingError::visibility(
                "Visibility unit must be specified when distance is provided",
            ));
        }

        if less_than && greater_than {
            return Err(ProcessingError::visibility(
                "Visibility cannot be both less than and greater than a distance",
            ));
        }

        Ok(Self {
            distance_value,
            unit: unit.map(str::to_uppercase),
            special_condition: special_condition.map(str::to_string),
            less_than,
            greater_than,
        })
    }

    pub fn cavok() -> Self {
        Self {
            distance_value: None,
            unit: None,
            special_condition: Some("CAVOK".to_string()),
            less_than: false,
            greater_than: false,
        }
    }

    pub fn statute_miles(miles: f64) -> Result<Self> {
        Self::new(Some(miles), Some("SM"), None)
    }

    pub fn meters(meters: f64) -> Result<Self> {
        Self::new(Some(meters), Some("M"), None)
    }

    pub fn kilometers(kilometers: f64) -> Result<Self> {
        Self::new(Some(kilometers), Some("KM"), None)
    }

    pub fn less_than_statute_miles(miles: f64) -> Result<Self> {
        Self::with_qualifiers(Some(miles), Some("SM"), None, true, false)
    }

    pub fn greater_than_statute_miles(miles: f64) -> Result<Self> {
        Self::with_qualifiers(Some(miles), Some("SM"), None, false, true)
    }

    /// Decode a visibility group: "10SM", "1 1/2SM", "M1/4SM", "P6SM", "9999", "0800", "5KM" or "CAVOK".
    pub fn from_metar(group: &str) -> Result<Self> {
        let invalid =
            || ProcessingError::InvalidFormat(format!("Invalid visibility group: {}", group));
        let group = group.trim();

        if group == "CAVOK" {
            return Ok(Self::cavok());
        }

        if let Some(distance) = group.strip_suffix("SM") {
            let (less, greater, distance) = if let Some(d) = distance.strip_prefix('M') {
                (true, false, d)
            } else if let Some(d) = distance.strip_prefix('P') {
                (false, true, d)
            } else {
                (false, false, distance)
            };
            let miles = parse_fractional(distance).ok_or_else(invalid)?;
            return Self::with_qualifiers(Some(miles), Some("SM"), None, less, greater);
        }

        if let Some(km) = group.strip_suffix("KM") {
            let km = parse_digits::<u32>(km).ok_or_else(invalid)?;
            return Self::kilometers(f64::from(km));
        }

        let metres = group.strip_suffix("NDV").unwrap_or(group);
        if metres.len() == 4 {
            let metres = parse_digits::<u32>(metres).ok_or_else(invalid)?;
            return Self::meters(f64::from(metres));
        }

        Err(invalid())
    }

    pub fn distance_value(&self) -> Option<f64> {
        self.distance_value
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn special_condition(&self) -> Option<&str> {
        self.special_condition.as_deref()
    }

    pub fn is_less_than(&self) -> bool {
        self.less_than
    }

    pub fn is_greater_than(&self) -> bool {
        self.greater_than
    }

    pub fn is_special_condition(&self) -> bool {
        self.special_condition.is_some()
    }

    pub fn is_cavok(&self) -> bool {
        self.special_condition.as_deref() == Some("CAVOK")
    }

    pub fn to_meters(&self) -> Option<f64> {
        let distance = self.distance_value?;
        Some(match self.unit.as_deref() {
            Some("KM") => distance * 1000.0,
            Some("SM") => distance * METERS_PER_STATUTE_MILE,
            _ => distance,
        })
    }

    pub fn to_statute_miles(&self) -> Option<f64> {
        let distance = self.distance_value?;
        Some(match self.unit.as_deref() {
            Some("M") => distance / METERS_PER_STATUTE_MILE,
            Some("KM") => distance * STATUTE_MILES_PER_KM,
            _ => distance,
        })
    }

    /// Visual flight rules visibility: at least 3 SM, or CAVOK.
    pub fn is_vfr(&self) -> bool {
        self.is_cavok()
            || self
                .to_statute_miles()
                .map_or(false, |sm| sm >= VFR_MIN_VISIBILITY_SM)
    }

    pub fn is_ifr(&self) -> bool {
        self.to_statute_miles()
            .map_or(false, |sm| sm < VFR_MIN_VISIBILITY_SM)
    }

    pub fn is_lifr(&self) -> bool {
        self.to_statute_miles()
            .map_or(false, |sm| sm < LIFR_MAX_VISIBILITY_SM)
    }

    pub fn to_metar_code(&self) -> String {
        let (distance, unit) = match (self.distance_value, self.unit.as_deref()) {
            (Some(d), Some(u)) => (d, u),
            _ => return self.special_condition.clone().unwrap_or_default(),
        };
        let qualifier = if self.less_than {
            "M"
        } else if self.greater_than {
            "P"
        } else {
            ""
        };
        match unit {
            "SM" => format!("{}{}SM", qualifier, format_fractional(distance)),
            "KM" => format!("{}{}KM", qualifier, distance as u32),
            _ => format!("{}{:04}", qualifier, distance as u32),
        }
    }

    pub fn summary(&self) -> String {
        let (distance, unit) = match (self.distance_value, self.unit.as_deref()) {
            (Some(d), Some(u)) => (d, u),
            _ => return self.special_condition.clone().unwrap_or_default(),
        };
        let qualifier = if self.less_than {
            "Less than "
        } else if self.greater_than {
            "Greater than "
        } else {
            ""
        };
        match unit {
            "SM" => format!("{}{} SM", qualifier, format_fractional(distance)),
            _ => format!("{}{} {}", qualifier, distance, unit),
        }
    }
}
