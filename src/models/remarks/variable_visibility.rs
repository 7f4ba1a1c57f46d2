use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::models::visibility::Visibility;
use crate::utils::constants::OCTANT_DIRECTIONS;
use crate::utils::units::format_fractional;

/// Prevailing visibility varying between two values, from "VIS 1/2V2" or "VIS NE 2V4".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableVisibility {
    minimum: Visibility,
    maximum: Visibility,
    direction: Option<String>,
    location: Option<String>,
}

impl VariableVisibility {
    pub fn new(
        minimum: Visibility,
        maximum: Visibility,
        direction: Option<&str>,
        location: Option<&str>,
    ) -> Result<Self> {
        if let (Some(min), Some(max)) = (minimum.to_statute_miles(), maximum.to_statute_miles()) {
            if min > max {
                return Err(ProcessingError::remark(format!(
                    "Minimum visibility ({:.2} SM) cannot be greater than maximum ({:.2} SM)",
                    min, max
                )));
            }
        }

        let direction = direction.map(str::trim).filter(|d| !d.is_empty());
        if let Some(direction) = direction {
            if !OCTANT_DIRECTIONS.contains(&direction) {
                return Err(ProcessingError::remark(format!(
                    "Invalid direction: {}. Must be N, NE, E, SE, S, SW, W, or NW",
                    direction
                )));
            }
        }

        Ok(Self {
            minimum,
            maximum,
            direction: direction.map(str::to_string),
            location: location
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
        })
    }

    pub fn of(minimum: Visibility, maximum: Visibility) -> Result<Self> {
        Self::new(minimum, maximum, None, None)
    }

    pub fn with_direction(minimum: Visibility, maximum: Visibility, direction: &str) -> Result<Self> {
        Self::new(minimum, maximum, Some(direction), None)
    }

    pub fn minimum(&self) -> &Visibility {
        &self.minimum
    }

    pub fn maximum(&self) -> &Visibility {
        &self.maximum
    }

    pub fn direction(&self) -> Option<&str> {
        self.direction.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Difference between the bounds in statute miles.
    pub fn spread(&self) -> Option<f64> {
        Some(self.maximum.to_statute_miles()? - self.minimum.to_statute_miles()?)
    }

    pub fn has_significant_variability(&self) -> bool {
        self.spread().map_or(false, |s| s > 1.0)
    }

    pub fn range(&self) -> String {
        format!(
            "{} to {}",
            describe(&self.minimum),
            describe(&self.maximum)
        )
    }

    pub fn description(&self) -> String {
        let mut description = String::new();
        if let Some(direction) = &self.direction {
            description.push_str(direction);
            description.push(' ');
        }
        description.push_str("visibility varying from ");
        description.push_str(&self.range());
        if let Some(location) = &self.location {
            description.push_str(&format!(" ({})", location));
        }
        description
    }
}

impl fmt::Display for VariableVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

fn describe(visibility: &Visibility) -> String {
    if let Some(special) = visibility.special_condition() {
        return special.to_string();
    }
    let (distance, unit) = match (visibility.distance_value(), visibility.unit()) {
        (Some(d), Some(u)) => (d, u),
        _ => return "unknown".to_string(),
    };
    let qualifier = if visibility.is_less_than() {
        "less than "
    } else if visibility.is_greater_than() {
        "greater than "
    } else {
        ""
    };
    format!("{}{} {}", qualifier, format_fractional(distance), unit)
}
