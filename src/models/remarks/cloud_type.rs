use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};

const OVERHEAD_ALL_QUADRANTS: &str = "OHD-ALQDS";
const CLOUD_TYPES: [&str; 12] = [
    "CU", "TCU", "CF", "ST", "SC", "SF", "NS", "AS", "AC", "CS", "CC", "CI",
];
const INTENSITIES: [&str; 1] = ["MDT"];
const LOCATIONS: [&str; 4] = ["OHD", OVERHEAD_ALL_QUADRANTS, "ALQDS", "TR"];
const DIRECTIONS: [&str; 8] = ["N", "S", "E", "W", "NE", "NW", "SE", "SW"];

/// Cloud type remark such as "TCU4", "SC6" or "MDT CU OHD MOV E".
///
/// Unlike present weather codes, every field here is checked against its code table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudType {
    cloud_type: String,
    oktas: Option<u8>,
    intensity: Option<String>,
    location: Option<String>,
    movement_direction: Option<String>,
}

impl CloudType {
    pub fn new(
        cloud_type: &str,
        oktas: Option<u8>,
        intensity: Option<&str>,
        location: Option<&str>,
        movement_direction: Option<&str>,
    ) -> Result<Self> {
        if cloud_type.trim().is_empty() {
            return Err(ProcessingError::remark("Cloud type cannot be blank"));
        }
        let cloud_type = lookup(cloud_type, &CLOUD_TYPES, "Invalid cloud type")?;

        if let Some(oktas) = oktas {
            if !(1..=8).contains(&oktas) {
                return Err(ProcessingError::remark(format!(
                    "Oktas must be between 1 and 8: {}",
                    oktas
                )));
            }
        }

        let intensity = optional_lookup(intensity, &INTENSITIES, "Invalid intensity")?;
        let location = optional_lookup(location, &LOCATIONS, "Invalid location")?;
        let movement_direction =
            optional_lookup(movement_direction, &DIRECTIONS, "Invalid movement direction")?;

        Ok(Self {
            cloud_type,
            oktas,
            intensity,
            location,
            movement_direction,
        })
    }

    pub fn of(cloud_type: &str) -> Result<Self> {
        Self::new(cloud_type, None, None, None, None)
    }

    pub fn with_oktas(cloud_type: &str, oktas: u8) -> Result<Self> {
        Self::new(cloud_type, Some(oktas), None, None, None)
    }

    pub fn with_location(cloud_type: &str, location: &str) -> Result<Self> {
        Self::new(cloud_type, None, None, Some(location), None)
    }

    /// True when the token is a recognised cloud type code.
    pub fn is_known_code(code: &str) -> bool {
        CLOUD_TYPES.contains(&code)
    }

    pub fn cloud_type(&self) -> &str {
        &self.cloud_type
    }

    pub fn oktas(&self) -> Option<u8> {
        self.oktas
    }

    pub fn intensity(&self) -> Option<&str> {
        self.intensity.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn movement_direction(&self) -> Option<&str> {
        self.movement_direction.as_deref()
    }

    pub fn is_trace(&self) -> bool {
        self.location.as_deref() == Some("TR")
    }

    pub fn is_overhead(&self) -> bool {
        matches!(self.location.as_deref(), Some("OHD") | Some(OVERHEAD_ALL_QUADRANTS))
    }

    pub fn is_all_quadrants(&self) -> bool {
        matches!(self.location.as_deref(), Some("ALQDS") | Some(OVERHEAD_ALL_QUADRANTS))
    }

    pub fn oktas_fraction(&self) -> Option<f64> {
        self.oktas.map(|o| f64::from(o) / 8.0)
    }

    pub fn cloud_type_description(&self) -> &str {
        match self.cloud_type.as_str() {
            "CU" => "Cumulus",
            "TCU" => "Towering Cumulus",
            "CF" => "Cumuliform",
            "ST" => "Stratus",
            "SC" => "Stratocumulus",
            "SF" => "Stratiform",
            "NS" => "Nimbostratus",
            "AS" => "Altostratus",
            "AC" => "Altocumulus",
            "CS" => "Cirrostratus",
            "CC" => "Cirrocumulus",
            "CI" => "Cirrus",
            other => other,
        }
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();
        if let Some(intensity) = &self.intensity {
            summary.push_str(&intensity.to_lowercase());
            summary.push(' ');
        }
        summary.push_str(self.cloud_type_description());

        let mut details = Vec::new();
        if let Some(oktas) = self.oktas {
            details.push(format!("{}/8", oktas));
        }
        if let Some(location) = &self.location {
            details.push(location.to_lowercase());
        }
        if let Some(direction) = &self.movement_direction {
            details.push(format!("moving {}", direction));
        }
        if !details.is_empty() {
            summary.push_str(&format!(" ({})", details.join(", ")));
        }
        summary
    }
}

fn lookup(value: &str, table: &[&str], message: &str) -> Result<String> {
    let normalized = value.trim().to_uppercase();
    if table.contains(&normalized.as_str()) {
        Ok(normalized)
    } else {
        Err(ProcessingError::remark(format!("{}: {}", message, value)))
    }
}

fn optional_lookup(value: Option<&str>, table: &[&str], message: &str) -> Result<Option<String>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => lookup(v, table, message).map(Some),
        None => Ok(None),
    }
}
