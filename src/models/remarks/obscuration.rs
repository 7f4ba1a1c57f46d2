use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};

/// Layer of obscuring phenomena from remarks such as "FG FEW000" or "FU BKN020".
///
/// Coverage and phenomenon codes are not restricted; unknown codes are echoed in descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObscurationLayer {
    coverage: String,
    phenomenon: String,
    height_feet: u32,
}

impl ObscurationLayer {
    pub fn new(coverage: &str, phenomenon: &str, height_feet: i32) -> Result<Self> {
        if coverage.trim().is_empty() {
            return Err(ProcessingError::remark("Coverage cannot be blank"));
        }
        if phenomenon.trim().is_empty() {
            return Err(ProcessingError::remark("Phenomenon cannot be blank"));
        }
        if height_feet < 0 {
            return Err(ProcessingError::remark(format!(
                "Height cannot be negative: {}",
                height_feet
            )));
        }

        Ok(Self {
            coverage: coverage.trim().to_string(),
            phenomenon: phenomenon.trim().to_string(),
            height_feet: height_feet as u32,
        })
    }

    pub fn from_hundreds(coverage: &str, phenomenon: &str, hundreds: i32) -> Result<Self> {
        Self::new(coverage, phenomenon, hundreds * 100)
    }

    pub fn coverage(&self) -> &str {
        &self.coverage
    }

    pub fn phenomenon(&self) -> &str {
        &self.phenomenon
    }

    pub fn height_feet(&self) -> u32 {
        self.height_feet
    }

    pub fn is_ground_level(&self) -> bool {
        self.height_feet == 0
    }

    pub fn is_low_level(&self) -> bool {
        self.height_feet < 1000
    }

    pub fn coverage_description(&self) -> &str {
        match self.coverage.as_str() {
            "FEW" => "Few",
            "SCT" => "Scattered",
            "BKN" => "Broken",
            "OVC" => "Overcast",
            other => other,
        }
    }

    pub fn phenomenon_description(&self) -> &str {
        match self.phenomenon.as_str() {
            "FG" => "Fog",
            "BR" => "Mist",
            "FU" => "Smoke",
            "HZ" => "Haze",
            "DU" => "Dust",
            "SA" => "Sand",
            "VA" => "Volcanic Ash",
            "PY" => "Spray",
            other => other,
        }
    }

    pub fn summary(&self) -> String {
        if self.is_ground_level() {
            format!(
                "{} {} at ground level",
                self.coverage_description(),
                self.phenomenon_description()
            )
        } else {
            format!(
                "{} {} at {} ft",
                self.coverage_description(),
                self.phenomenon_description(),
                self.height_feet
            )
        }
    }
}

impl fmt::Display for ObscurationLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} ft", self.coverage, self.phenomenon, self.height_feet)
    }
}
