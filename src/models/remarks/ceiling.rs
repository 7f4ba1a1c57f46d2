use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::utils::constants::IMC_CEILING_FT;

/// Ceiling varying between two heights, from "CIG 005V010".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableCeiling {
    minimum_height_feet: u32,
    maximum_height_feet: u32,
}

impl VariableCeiling {
    pub fn new(minimum_height_feet: i32, maximum_height_feet: i32) -> Result<Self> {
        if minimum_height_feet < 0 || maximum_height_feet < 0 {
            return Err(ProcessingError::remark(format!(
                "Ceiling heights cannot be negative: {}-{}",
                minimum_height_feet, maximum_height_feet
            )));
        }
        if minimum_height_feet > maximum_height_feet {
            return Err(ProcessingError::remark(format!(
                "Minimum ceiling ({} ft) cannot exceed maximum ({} ft)",
                minimum_height_feet, maximum_height_feet
            )));
        }

        Ok(Self {
            minimum_height_feet: minimum_height_feet as u32,
            maximum_height_feet: maximum_height_feet as u32,
        })
    }

    pub fn from_hundreds(min_hundreds: i32, max_hundreds: i32) -> Result<Self> {
        Self::new(min_hundreds * 100, max_hundreds * 100)
    }

    pub fn minimum_height_feet(&self) -> u32 {
        self.minimum_height_feet
    }

    pub fn maximum_height_feet(&self) -> u32 {
        self.maximum_height_feet
    }

    pub fn range_feet(&self) -> u32 {
        self.maximum_height_feet - self.minimum_height_feet
    }

    pub fn is_low(&self) -> bool {
        self.minimum_height_feet < IMC_CEILING_FT
    }

    pub fn has_significant_variation(&self) -> bool {
        self.range_feet() >= 500
    }

    pub fn summary(&self) -> String {
        format!(
            "Variable ceiling: {}-{} ft",
            self.minimum_height_feet, self.maximum_height_feet
        )
    }
}

impl fmt::Display for VariableCeiling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} ft", self.minimum_height_feet, self.maximum_height_feet)
    }
}

/// Ceiling observed at a second sensor location, from "CIG 002 RWY11".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CeilingSecondSite {
    height_feet: u32,
    location: String,
}

impl CeilingSecondSite {
    pub fn new(height_feet: i32, location: &str) -> Result<Self> {
        if height_feet < 0 {
            return Err(ProcessingError::remark(format!(
                "Ceiling height cannot be negative: {}",
                height_feet
            )));
        }
        let location = location.trim();
        if location.is_empty() {
            return Err(ProcessingError::remark(
                "Second site location cannot be blank",
            ));
        }

        Ok(Self {
            height_feet: height_feet as u32,
            location: location.to_string(),
        })
    }

    pub fn from_hundreds(hundreds: i32, location: &str) -> Result<Self> {
        Self::new(hundreds * 100, location)
    }

    pub fn height_feet(&self) -> u32 {
        self.height_feet
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn is_low(&self) -> bool {
        self.height_feet < IMC_CEILING_FT
    }

    pub fn summary(&self) -> String {
        format!("Ceiling {} ft at {}", self.height_feet, self.location)
    }
}

impl fmt::Display for CeilingSecondSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ft at {}", self.height_feet, self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_ceiling() {
        let cig = VariableCeiling::from_hundreds(5, 10).unwrap();
        assert_eq!(cig.minimum_height_feet(), 500);
        assert_eq!(cig.range_feet(), 500);
        assert!(cig.is_low());
        assert!(cig.has_significant_variation());
        assert_eq!(cig.summary(), "Variable ceiling: 500-1000 ft");

        let err = VariableCeiling::new(1200, 800).unwrap_err();
        assert!(err.to_string().contains("Minimum ceiling (1200 ft) cannot exceed maximum (800 ft)"));
        assert!(VariableCeiling::new(-100, 800).is_err());
        assert!(VariableCeiling::new(800, 800).is_ok());
    }

    #[test]
    fn test_second_site() {
        let cig = CeilingSecondSite::from_hundreds(2, "RWY11").unwrap();
        assert_eq!(cig.height_feet(), 200);
        assert!(cig.is_low());
        assert_eq!(cig.summary(), "Ceiling 200 ft at RWY11");

        assert!(CeilingSecondSite::new(-1, "RWY11").is_err());
        assert!(CeilingSecondSite::new(200, "  ").is_err());
    }
}
