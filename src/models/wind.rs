use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{BEAUFORT_KNOTS, KMH_PER_KNOT, MPH_PER_KNOT, MPS_PER_KNOT};
use crate::utils::units::{cardinal_direction, parse_digits};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindUnit {
    #[serde(rename = "KT")]
    Knots,
    #[serde(rename = "MPS")]
    MetersPerSecond,
    #[serde(rename = "KMH")]
    KilometersPerHour,
}

impl WindUnit {
    pub fn from_code(code: &str) -> Result<Self> {
        match code.trim().to_uppercase().as_str() {
            "KT" => Ok(WindUnit::Knots),
            "MPS" => Ok(WindUnit::MetersPerSecond),
            "KMH" => Ok(WindUnit::KilometersPerHour),
            _ => Err(ProcessingError::wind(format!(
                "Invalid wind unit: {}. Must be KT, MPS, or KMH",
                code
            ))),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            WindUnit::Knots => "KT",
            WindUnit::MetersPerSecond => "MPS",
            WindUnit::KilometersPerHour => "KMH",
        }
    }

    fn to_knots(self, value: f64) -> f64 {
        match self {
            WindUnit::Knots => value,
            WindUnit::MetersPerSecond => value / MPS_PER_KNOT,
            WindUnit::KilometersPerHour => value / KMH_PER_KNOT,
        }
    }
}

impl fmt::Display for WindUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Surface wind. A missing direction means variable (VRB) or calm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    direction_degrees: Option<i32>,
    speed_value: Option<i32>,
    gust_value: Option<i32>,
    variability_from: Option<i32>,
    variability_to: Option<i32>,
    unit: WindUnit,
}

impl Wind {
    pub fn new(
        direction_degrees: Option<i32>,
        speed_value: Option<i32>,
        gust_value: Option<i32>,
        variability_from: Option<i32>,
        variability_to: Option<i32>,
        unit: &str,
    ) -> Result<Self> {
        if let Some(dir) = direction_degrees {
            if !(0..=360).contains(&dir) {
                return Err(ProcessingError::wind(format!(
                    "Wind direction must be between 0 and 360 degrees, got: {}",
                    dir
                )));
            }
        }

        if let Some(speed) = speed_value {
            if speed < 0 {
                return Err(ProcessingError::wind(format!(
                    "Wind speed cannot be negative: {}",
                    speed
                )));
            }
        }

        if let Some(gust) = gust_value {
            if gust < 0 {
                return Err(ProcessingError::wind(format!(
                    "Gust speed cannot be negative: {}",
                    gust
                )));
            }
            if let Some(speed) = speed_value {
                if gust <= speed {
                    return Err(ProcessingError::wind(format!(
                        "Gust speed ({}) must be greater than sustained wind speed ({})",
                        gust, speed
                    )));
                }
            }
        }

        match (variability_from, variability_to) {
            (None, None) => {}
            (Some(from), Some(to)) => {
                if !(0..=360).contains(&from) {
                    return Err(ProcessingError::wind(format!(
                        "Variability from must be between 0 and 360: {}",
                        from
                    )));
                }
                if !(0..=360).contains(&to) {
                    return Err(ProcessingError::wind(format!(
                        "Variability to must be between 0 and 360: {}",
                        to
                    )));
                }
            }
            _ => {
                return Err(ProcessingError::wind(
                    "Both variability_from and variability_to must be provided together",
                ))
            }
        }

        let unit = WindUnit::from_code(unit)?;

        Ok(Self {
            direction_degrees,
            speed_value,
            gust_value,
            variability_from,
            variability_to,
            unit,
        })
    }

    pub fn calm() -> Self {
        Self {
            direction_degrees: None,
            speed_value: Some(0),
            gust_value: None,
            variability_from: None,
            variability_to: None,
            unit: WindUnit::Knots,
        }
    }

    pub fn variable(speed: i32, unit: &str) -> Result<Self> {
        Self::new(None, Some(speed), None, None, None, unit)
    }

    pub fn of(direction: i32, speed: i32, unit: &str) -> Result<Self> {
        Self::new(Some(direction), Some(speed), None, None, None, unit)
    }

    /// Decode a wind group such as "28015G25KT" or "VRB03KT", with an optional "250V310" group.
    pub fn from_metar(group: &str, variation: Option<&str>) -> Result<Self> {
        let invalid = || ProcessingError::InvalidFormat(format!("Invalid wind group: {}", group));

        let (body, unit) = ["KT", "MPS", "KMH"]
            .iter()
            .find_map(|u| group.strip_suffix(u).map(|b| (b, *u)))
            .ok_or_else(invalid)?;

        if body.len() < 5 || !body.is_char_boundary(3) {
            return Err(invalid());
        }
        let (dir, rest) = body.split_at(3);
        let direction = match dir {
            "VRB" => None,
            d => Some(parse_digits::<i32>(d).ok_or_else(invalid)?),
        };

        let (speed, gust) = match rest.split_once('G') {
            Some((s, g)) => (s, Some(g)),
            None => (rest, None),
        };
        if !(2..=3).contains(&speed.len()) {
            return Err(invalid());
        }
        let speed = parse_digits::<i32>(speed).ok_or_else(invalid)?;
        let gust = match gust {
            Some(g) if (2..=3).contains(&g.len()) => Some(parse_digits::<i32>(g).ok_or_else(invalid)?),
            Some(_) => return Err(invalid()),
            None => None,
        };

        let (var_from, var_to) = match variation {
            Some(v) => {
                let (from, to) = v.split_once('V').ok_or_else(|| {
                    ProcessingError::InvalidFormat(format!("Invalid wind variation group: {}", v))
                })?;
                let parse = |s: &str| {
                    parse_digits::<i32>(s).filter(|_| s.len() == 3).ok_or_else(|| {
                        ProcessingError::InvalidFormat(format!(
                            "Invalid wind variation group: {}",
                            v
                        ))
                    })
                };
                (Some(parse(from)?), Some(parse(to)?))
            }
            None => (None, None),
        };

        // 00000KT is reported calm
        let direction = if direction == Some(0) && speed == 0 {
            None
        } else {
            direction
        };

        Self::new(direction, Some(speed), gust, var_from, var_to, unit)
    }

    pub fn direction_degrees(&self) -> Option<i32> {
        self.direction_degrees
    }

    pub fn speed_value(&self) -> Option<i32> {
        self.speed_value
    }

    pub fn gust_value(&self) -> Option<i32> {
        self.gust_value
    }

    pub fn variability_from(&self) -> Option<i32> {
        self.variability_from
    }

    pub fn variability_to(&self) -> Option<i32> {
        self.variability_to
    }

    pub fn unit(&self) -> WindUnit {
        self.unit
    }

    pub fn is_calm(&self) -> bool {
        self.direction_degrees.map_or(true, |d| d == 0) && self.speed_value.map_or(true, |s| s == 0)
    }

    /// Direction reported as VRB, or swinging between two bearings.
    pub fn is_variable(&self) -> bool {
        self.has_variability() || (self.direction_degrees.is_none() && !self.is_calm())
    }

    pub fn has_variability(&self) -> bool {
        self.variability_from.is_some() && self.variability_to.is_some()
    }

    pub fn has_gusts(&self) -> bool {
        self.gust_value.is_some()
    }

    pub fn cardinal_direction(&self) -> &'static str {
        if self.is_calm() {
            return "CALM";
        }
        match self.direction_degrees {
            Some(d) => cardinal_direction(d as u16),
            None => "VRB",
        }
    }

    pub fn speed_knots(&self) -> f64 {
        self.unit.to_knots(f64::from(self.speed_value.unwrap_or(0)))
    }

    pub fn gust_knots(&self) -> Option<f64> {
        self.gust_value.map(|g| self.unit.to_knots(f64::from(g)))
    }

    pub fn speed_mps(&self) -> f64 {
        self.speed_knots() * MPS_PER_KNOT
    }

    pub fn speed_kmh(&self) -> f64 {
        self.speed_knots() * KMH_PER_KNOT
    }

    pub fn speed_mph(&self) -> f64 {
        self.speed_knots() * MPH_PER_KNOT
    }

    /// Gust minus sustained speed, in the reported unit.
    pub fn gust_factor(&self) -> Option<i32> {
        self.gust_value.map(|g| g - self.speed_value.unwrap_or(0))
    }

    pub fn beaufort_scale(&self) -> u8 {
        let knots = self.speed_knots();
        BEAUFORT_KNOTS.iter().take_while(|&&b| knots >= b).count() as u8
    }

    pub fn beaufort_description(&self) -> &'static str {
        match self.beaufort_scale() {
            0 => "Calm",
            1 => "Light air",
            2 => "Light breeze",
            3 => "Gentle breeze",
            4 => "Moderate breeze",
            5 => "Fresh breeze",
            6 => "Strong breeze",
            7 => "Near gale",
            8 => "Gale",
            9 => "Strong gale",
            10 => "Storm",
            11 => "Violent storm",
            _ => "Hurricane force",
        }
    }

    pub fn to_metar_code(&self) -> String {
        let direction = match self.direction_degrees {
            Some(d) => format!("{:03}", d),
            None if self.is_calm() => "000".to_string(),
            None => "VRB".to_string(),
        };
        let mut code = format!("{}{:02}", direction, self.speed_value.unwrap_or(0));
        if let Some(g) = self.gust_value {
            code.push_str(&format!("G{:02}", g));
        }
        code.push_str(self.unit.code());
        if let (Some(from), Some(to)) = (self.variability_from, self.variability_to) {
            code.push_str(&format!(" {:03}V{:03}", from, to));
        }
        code
    }

    pub fn summary(&self) -> String {
        if self.is_calm() {
            return "Calm".to_string();
        }

        let speed = self.speed_value.unwrap_or(0);
        let mut summary = match self.direction_degrees {
            Some(d) => format!("{}° ({}) at {} {}", d, self.cardinal_direction(), speed, self.unit),
            None => format!("Variable at {} {}", speed, self.unit),
        };
        if let Some(g) = self.gust_value {
            summary.push_str(&format!(" gusting {} {}", g, self.unit));
        }
        if let (Some(from), Some(to)) = (self.variability_from, self.variability_to) {
            summary.push_str(&format!(", variable {}°-{}°", from, to));
        }
        summary
    }
}
