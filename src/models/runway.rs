use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::utils::constants::METERS_PER_FOOT;
use crate::utils::units::parse_digits;

const FEET_PER_STATUTE_MILE: f64 = 5280.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RvrPrefix {
    #[serde(rename = "P")]
    GreaterThan,
    #[serde(rename = "M")]
    LessThan,
}

impl RvrPrefix {
    pub fn code(&self) -> &'static str {
        match self {
            RvrPrefix::GreaterThan => "P",
            RvrPrefix::LessThan => "M",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RvrTrend {
    #[serde(rename = "U")]
    Increasing,
    #[serde(rename = "D")]
    Decreasing,
    #[serde(rename = "N")]
    NoChange,
}

impl RvrTrend {
    pub fn code(&self) -> &'static str {
        match self {
            RvrTrend::Increasing => "U",
            RvrTrend::Decreasing => "D",
            RvrTrend::NoChange => "N",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RvrTrend::Increasing => "Increasing",
            RvrTrend::Decreasing => "Decreasing",
            RvrTrend::NoChange => "No Change",
        }
    }
}

/// Unit the range was reported in. Values are always held in feet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RvrUnit {
    #[default]
    #[serde(rename = "FT")]
    Feet,
    #[serde(rename = "M")]
    Meters,
}

impl RvrUnit {
    /// Suffix written after the range in a METAR group.
    pub fn suffix(&self) -> &'static str {
        match self {
            RvrUnit::Feet => "FT",
            RvrUnit::Meters => "",
        }
    }
}

/// Runway visual range in feet: a single value, a variable pair, or a CLRD report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwayVisualRange {
    runway: String,
    visual_range_feet: Option<i32>,
    variable_low: Option<i32>,
    variable_high: Option<i32>,
    prefix: Option<RvrPrefix>,
    trend: Option<RvrTrend>,
    cleared: bool,
    #[serde(default)]
    reported_unit: RvrUnit,
}

impl RunwayVisualRange {
    pub fn new(
        runway: &str,
        visual_range_feet: Option<i32>,
        variable_low: Option<i32>,
        variable_high: Option<i32>,
        prefix: Option<&str>,
        trend: Option<&str>,
    ) -> Result<Self> {
        let runway = validate_runway(runway)?;

        let has_pair = variable_low.is_some() && variable_high.is_some();
        if visual_range_feet.is_none() && !has_pair {
            return Err(ProcessingError::runway(
                "Must have either visualRangeFeet or both variableLow and variableHigh",
            ));
        }

        if variable_low.is_some() != variable_high.is_some() {
            return Err(ProcessingError::runway(
                "Both variableLow and variableHigh must be provided together",
            ));
        }

        if visual_range_feet.is_some() && has_pair {
            return Err(ProcessingError::runway(
                "Cannot have both visualRangeFeet and a variable range",
            ));
        }

        if let Some(v) = visual_range_feet.filter(|v| *v < 0) {
            return Err(ProcessingError::runway(format!(
                "Visual range cannot be negative: {}",
                v
            )));
        }
        if let Some(low) = variable_low.filter(|v| *v < 0) {
            return Err(ProcessingError::runway(format!(
                "Variable low cannot be negative: {}",
                low
            )));
        }
        if let Some(high) = variable_high.filter(|v| *v < 0) {
            return Err(ProcessingError::runway(format!(
                "Variable high cannot be negative: {}",
                high
            )));
        }

        if let (Some(low), Some(high)) = (variable_low, variable_high) {
            if low >= high {
                return Err(ProcessingError::runway(format!(
                    "Variable low ({}) must be less than variable high ({})",
                    low, high
                )));
            }
        }

        let prefix = match normalize(prefix).as_deref() {
            None => None,
            Some("P") => Some(RvrPrefix::GreaterThan),
            Some("M") => Some(RvrPrefix::LessThan),
            Some(other) => {
                return Err(ProcessingError::runway(format!(
                    "Invalid prefix: {} (valid values: P, M, or none)",
                    other
                )))
            }
        };

        let trend = match normalize(trend).as_deref() {
            None => None,
            Some("U") => Some(RvrTrend::Increasing),
            Some("D") => Some(RvrTrend::Decreasing),
            Some("N") => Some(RvrTrend::NoChange),
            Some(other) => {
                return Err(ProcessingError::runway(format!(
                    "Invalid trend: {} (valid values: D, N, U, or none)",
                    other
                )))
            }
        };

        Ok(Self {
            runway,
            visual_range_feet,
            variable_low,
            variable_high,
            prefix,
            trend,
            cleared: false,
            reported_unit: RvrUnit::Feet,
        })
    }

    pub fn simple(runway: &str, visual_range_feet: i32) -> Result<Self> {
        Self::new(runway, Some(visual_range_feet), None, None, None, None)
    }

    pub fn variable(runway: &str, low: i32, high: i32) -> Result<Self> {
        Self::new(runway, None, Some(low), Some(high), None, None)
    }

    /// Runway reported CLRD: contamination cleared, no range values.
    pub fn cleared(runway: &str) -> Result<Self> {
        Ok(Self {
            runway: validate_runway(runway)?,
            visual_range_feet: None,
            variable_low: None,
            variable_high: None,
            prefix: None,
            trend: None,
            cleared: true,
            reported_unit: RvrUnit::Feet,
        })
    }

    /// Decode an RVR group such as "R04L/2200FT", "R22R/M1200V1800FT/U" or "R04L/CLRD".
    pub fn from_metar(group: &str) -> Result<Self> {
        let invalid = || ProcessingError::InvalidFormat(format!("Invalid RVR group: {}", group));

        let body = group.strip_prefix('R').ok_or_else(invalid)?;
        let (runway, rest) = body.split_once('/').ok_or_else(invalid)?;

        if rest.starts_with("CLRD") {
            return Self::cleared(runway);
        }

        let (range, trend) = match rest.split_once('/') {
            Some((range, trend)) => (range, Some(trend)),
            None => match rest.strip_suffix(['U', 'D', 'N']) {
                Some(range) => (range, rest.get(rest.len() - 1..)),
                None => (rest, None),
            },
        };

        let (range, in_feet) = match range.strip_suffix("FT") {
            Some(r) => (r, true),
            None => (range, false),
        };

        let (prefix, range) = match range.chars().next() {
            Some(c @ ('P' | 'M')) => (Some(c.to_string()), &range[1..]),
            _ => (None, range),
        };

        let to_feet = |value: &str| -> Result<i32> {
            let v = parse_digits::<i32>(value).ok_or_else(invalid)?;
            Ok(if in_feet {
                v
            } else {
                (f64::from(v) / METERS_PER_FOOT).round() as i32
            })
        };

        let rvr = match range.split_once('V') {
            Some((low, high)) => {
                let high = high.strip_prefix(['P', 'M']).unwrap_or(high);
                Self::new(
                    runway,
                    None,
                    Some(to_feet(low)?),
                    Some(to_feet(high)?),
                    prefix.as_deref(),
                    trend,
                )
            }
            None => Self::new(runway, Some(to_feet(range)?), None, None, prefix.as_deref(), trend),
        }?;
        let unit = if in_feet { RvrUnit::Feet } else { RvrUnit::Meters };
        Ok(rvr.with_reported_unit(unit))
    }

    pub fn with_reported_unit(mut self, unit: RvrUnit) -> Self {
        self.reported_unit = unit;
        self
    }

    pub fn reported_unit(&self) -> RvrUnit {
        self.reported_unit
    }

    /// A feet value expressed in the reported unit.
    fn in_reported_unit(&self, feet: i32) -> i32 {
        match self.reported_unit {
            RvrUnit::Feet => feet,
            RvrUnit::Meters => (f64::from(feet) * METERS_PER_FOOT).round() as i32,
        }
    }

    pub fn runway(&self) -> &str {
        &self.runway
    }

    pub fn visual_range_feet(&self) -> Option<i32> {
        self.visual_range_feet
    }

    pub fn variable_low(&self) -> Option<i32> {
        self.variable_low
    }

    pub fn variable_high(&self) -> Option<i32> {
        self.variable_high
    }

    pub fn prefix(&self) -> Option<RvrPrefix> {
        self.prefix
    }

    pub fn trend(&self) -> Option<RvrTrend> {
        self.trend
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    pub fn is_variable(&self) -> bool {
        !self.cleared && self.variable_low.is_some() && self.variable_high.is_some()
    }

    pub fn is_greater_than(&self) -> bool {
        self.prefix == Some(RvrPrefix::GreaterThan)
    }

    pub fn is_less_than(&self) -> bool {
        self.prefix == Some(RvrPrefix::LessThan)
    }

    pub fn trend_description(&self) -> &'static str {
        if self.cleared {
            return "Cleared";
        }
        self.trend.map_or("Unknown", |t| t.description())
    }

    /// Representative range in feet; the midpoint for a variable pair.
    fn representative_feet(&self) -> f64 {
        match (self.visual_range_feet, self.variable_low, self.variable_high) {
            _ if self.cleared => 0.0,
            (_, Some(low), Some(high)) => f64::from(low + high) / 2.0,
            (Some(v), _, _) => f64::from(v),
            _ => 0.0,
        }
    }

    pub fn visual_range_statute_miles(&self) -> f64 {
        self.representative_feet() / FEET_PER_STATUTE_MILE
    }

    pub fn visual_range_meters(&self) -> f64 {
        self.representative_feet() * METERS_PER_FOOT
    }

    pub fn to_metar_code(&self) -> String {
        if self.cleared {
            return format!("R{}/CLRD", self.runway);
        }
        let prefix = self.prefix.map_or("", |p| p.code());
        let suffix = self.reported_unit.suffix();
        let range = match (self.variable_low, self.variable_high, self.visual_range_feet) {
            (Some(low), Some(high), _) => format!(
                "{}{:04}V{:04}{}",
                prefix,
                self.in_reported_unit(low),
                self.in_reported_unit(high),
                suffix
            ),
            (_, _, Some(v)) => format!("{}{:04}{}", prefix, self.in_reported_unit(v), suffix),
            _ => String::new(),
        };
        match self.trend {
            Some(t) => format!("R{}/{}/{}", self.runway, range, t.code()),
            None => format!("R{}/{}", self.runway, range),
        }
    }

    pub fn summary(&self) -> String {
        if self.cleared {
            return format!("Runway {}: CLEARED (conditions improved)", self.runway);
        }

        let qualifier = match self.prefix {
            Some(RvrPrefix::GreaterThan) => "Greater than ",
            Some(RvrPrefix::LessThan) => "Less than ",
            None => "",
        };
        let range = match (self.variable_low, self.variable_high, self.visual_range_feet) {
            (Some(low), Some(high), _) => format!("{} to {} feet", low, high),
            (_, _, Some(v)) => format!("{} feet", v),
            _ => String::new(),
        };

        let mut summary = format!("Runway {}: {}{}", self.runway, qualifier, range);
        if let Some(t) = self.trend {
            summary.push_str(&format!(", {}", t.description()));
        }
        summary
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_uppercase())
        .filter(|v| !v.is_empty())
}

/// Runway designator: 01 through 36, optionally followed by L, C or R.
fn validate_runway(runway: &str) -> Result<String> {
    let trimmed = runway.trim().to_uppercase();
    let invalid = || {
        ProcessingError::runway(format!(
            "Invalid runway identifier format: {} (expected format: 01-36 optionally followed by L, C, or R)",
            runway
        ))
    };

    let (digits, side) = match trimmed.len() {
        2 => (trimmed.as_str(), None),
        3 if trimmed.is_char_boundary(2) => {
            let (d, s) = trimmed.split_at(2);
            (d, Some(s))
        }
        _ => return Err(invalid()),
    };

    let number = parse_digits::<u8>(digits).ok_or_else(invalid)?;
    if !(1..=36).contains(&number) {
        return Err(invalid());
    }
    if let Some(side) = side {
        if !matches!(side, "L" | "C" | "R") {
            return Err(invalid());
        }
    }

    Ok(trimmed)
}
