use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};

/// Automated station type from the AO1/AO2 remark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutomatedStationType {
    #[serde(rename = "AO1")]
    Ao1,
    #[serde(rename = "AO2")]
    Ao2,
}

impl AutomatedStationType {
    /// Accepts "AO1"/"AO2" and the digit-zero misspellings "A01"/"A02".
    pub fn from_code(code: &str) -> Result<Self> {
        match code.trim().to_uppercase().as_str() {
            "AO1" | "A01" => Ok(Self::Ao1),
            "AO2" | "A02" => Ok(Self::Ao2),
            "" => Err(ProcessingError::remark(
                "Automated station type code cannot be blank",
            )),
            _ => Err(ProcessingError::remark(format!(
                "Invalid automated station type code: {}. Must be AO1, AO2, A01, or A02.",
                code
            ))),
        }
    }

    pub fn from_digit(digit: u8) -> Result<Self> {
        match digit {
            1 => Ok(Self::Ao1),
            2 => Ok(Self::Ao2),
            _ => Err(ProcessingError::remark(format!(
                "Invalid automated station type: {}. Must be 1 or 2.",
                digit
            ))),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Ao1 => "AO1",
            Self::Ao2 => "AO2",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Ao1 => "Automated station without precipitation discriminator",
            Self::Ao2 => "Automated station with precipitation discriminator",
        }
    }

    pub fn has_precipitation_discriminator(&self) -> bool {
        matches!(self, Self::Ao2)
    }
}

impl fmt::Display for AutomatedStationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(AutomatedStationType::from_code("AO2").unwrap(), AutomatedStationType::Ao2);
        assert_eq!(AutomatedStationType::from_code(" a01 ").unwrap(), AutomatedStationType::Ao1);
        assert!(AutomatedStationType::from_code("AO3").is_err());
        assert!(AutomatedStationType::from_code("").is_err());
    }

    #[test]
    fn test_from_digit() {
        assert_eq!(AutomatedStationType::from_digit(1).unwrap(), AutomatedStationType::Ao1);
        assert!(AutomatedStationType::from_digit(3).is_err());
    }

    #[test]
    fn test_discriminator() {
        assert!(AutomatedStationType::Ao2.has_precipitation_discriminator());
        assert!(!AutomatedStationType::Ao1.has_precipitation_discriminator());
        assert_eq!(AutomatedStationType::Ao2.to_string(), "AO2");
    }
}
