use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};

pub const MAINTENANCE_CHECK: &str = "$";
const INDICATOR_TYPES: [&str; 8] = [
    "RVRNO", "PWINO", "PNO", "FZRANO", "TSNO", "VISNO", "CHINO", MAINTENANCE_CHECK,
];

/// Sensor outage or maintenance flag reported by an automated station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatedMaintenanceIndicator {
    indicator_type: String,
    location: Option<String>,
}

impl AutomatedMaintenanceIndicator {
    pub fn new(indicator_type: &str, location: Option<&str>) -> Result<Self> {
        let normalized = indicator_type.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(ProcessingError::remark(
                "Maintenance indicator type cannot be blank",
            ));
        }
        if !INDICATOR_TYPES.contains(&normalized.as_str()) {
            return Err(ProcessingError::remark(format!(
                "Invalid maintenance indicator type: {}",
                indicator_type
            )));
        }

        Ok(Self {
            indicator_type: normalized,
            location: location
                .map(|l| l.trim().to_uppercase())
                .filter(|l| !l.is_empty()),
        })
    }

    pub fn of(indicator_type: &str) -> Result<Self> {
        Self::new(indicator_type, None)
    }

    pub fn maintenance_check() -> Self {
        Self {
            indicator_type: MAINTENANCE_CHECK.to_string(),
            location: None,
        }
    }

    pub fn is_known_code(code: &str) -> bool {
        INDICATOR_TYPES.contains(&code)
    }

    pub fn indicator_type(&self) -> &str {
        &self.indicator_type
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn is_rvr_not_available(&self) -> bool {
        self.indicator_type == "RVRNO"
    }

    pub fn is_present_weather_not_available(&self) -> bool {
        self.indicator_type == "PWINO"
    }

    pub fn is_precipitation_not_available(&self) -> bool {
        self.indicator_type == "PNO"
    }

    pub fn is_freezing_rain_not_available(&self) -> bool {
        self.indicator_type == "FZRANO"
    }

    pub fn is_thunderstorm_not_available(&self) -> bool {
        self.indicator_type == "TSNO"
    }

    pub fn is_visibility_not_available(&self) -> bool {
        self.indicator_type == "VISNO"
    }

    pub fn is_cloud_height_not_available(&self) -> bool {
        self.indicator_type == "CHINO"
    }

    pub fn is_maintenance_check(&self) -> bool {
        self.indicator_type == MAINTENANCE_CHECK
    }

    pub fn description(&self) -> String {
        let base = match self.indicator_type.as_str() {
            "RVRNO" => "Runway Visual Range not available",
            "PWINO" => "Precipitation identifier information not available",
            "PNO" => "Precipitation amount not available",
            "FZRANO" => "Freezing rain information not available",
            "TSNO" => "Thunderstorm information not available",
            "VISNO" => "Visibility not available",
            "CHINO" => "Cloud height indicator not available",
            MAINTENANCE_CHECK => "Station requires maintenance",
            other => other,
        };
        match &self.location {
            Some(location) => format!("{} at {}", base, location),
            None => base.to_string(),
        }
    }
}

impl fmt::Display for AutomatedMaintenanceIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} {}", self.indicator_type, location),
            None => write!(f, "{}", self.indicator_type),
        }
    }
}
