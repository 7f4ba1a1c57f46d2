use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{MAX_CLOUD_HEIGHT_FT, METERS_PER_FOOT};
use crate::utils::units::parse_digits;

const VALID_CLOUD_TYPES: [&str; 11] = [
    "CB", "TCU", "CU", "SC", "ST", "NS", "AS", "AC", "CI", "CC", "CS",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkyCoverage {
    #[serde(rename = "SKC")]
    SkyClear,
    #[serde(rename = "CLR")]
    Clear,
    #[serde(rename = "NSC")]
    NoSignificantClouds,
    #[serde(rename = "NCD")]
    NoCloudsDetected,
    #[serde(rename = "FEW")]
    Few,
    #[serde(rename = "SCT")]
    Scattered,
    #[serde(rename = "BKN")]
    Broken,
    #[serde(rename = "OVC")]
    Overcast,
    #[serde(rename = "VV")]
    VerticalVisibility,
}

impl SkyCoverage {
    pub fn from_code(code: &str) -> Result<Self> {
        match code {
            "SKC" => Ok(SkyCoverage::SkyClear),
            "CLR" => Ok(SkyCoverage::Clear),
            "NSC" => Ok(SkyCoverage::NoSignificantClouds),
            "NCD" => Ok(SkyCoverage::NoCloudsDetected),
            "FEW" => Ok(SkyCoverage::Few),
            "SCT" => Ok(SkyCoverage::Scattered),
            "BKN" => Ok(SkyCoverage::Broken),
            "OVC" => Ok(SkyCoverage::Overcast),
            "VV" => Ok(SkyCoverage::VerticalVisibility),
            _ => Err(ProcessingError::sky(format!(
                "Unknown sky coverage code: {}",
                code
            ))),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            SkyCoverage::SkyClear => "SKC",
            SkyCoverage::Clear => "CLR",
            SkyCoverage::NoSignificantClouds => "NSC",
            SkyCoverage::NoCloudsDetected => "NCD",
            SkyCoverage::Few => "FEW",
            SkyCoverage::Scattered => "SCT",
            SkyCoverage::Broken => "BKN",
            SkyCoverage::Overcast => "OVC",
            SkyCoverage::VerticalVisibility => "VV",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SkyCoverage::SkyClear => "Sky Clear",
            SkyCoverage::Clear => "Clear",
            SkyCoverage::NoSignificantClouds => "No Significant Clouds",
            SkyCoverage::NoCloudsDetected => "No Clouds Detected",
            SkyCoverage::Few => "Few",
            SkyCoverage::Scattered => "Scattered",
            SkyCoverage::Broken => "Broken",
            SkyCoverage::Overcast => "Overcast",
            SkyCoverage::VerticalVisibility => "Vertical Visibility",
        }
    }

    pub fn oktas(&self) -> u8 {
        match self {
            SkyCoverage::SkyClear
            | SkyCoverage::Clear
            | SkyCoverage::NoSignificantClouds
            | SkyCoverage::NoCloudsDetected => 0,
            SkyCoverage::Few => 1,
            SkyCoverage::Scattered => 3,
            SkyCoverage::Broken => 5,
            SkyCoverage::Overcast | SkyCoverage::VerticalVisibility => 8,
        }
    }

    pub fn is_clear_family(&self) -> bool {
        self.oktas() == 0
    }
}

impl fmt::Display for SkyCoverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One reported cloud layer, clear-sky statement or vertical visibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyCondition {
    coverage: SkyCoverage,
    height_feet: Option<u32>,
    cloud_type: Option<String>,
}

impl SkyCondition {
    pub fn new(coverage: SkyCoverage, height_feet: Option<u32>, cloud_type: Option<&str>) -> Result<Self> {
        if let Some(height) = height_feet {
            if height > MAX_CLOUD_HEIGHT_FT {
                return Err(ProcessingError::sky(format!(
                    "Cloud height out of reasonable range (0-100000 ft): {}",
                    height
                )));
            }
        }

        if coverage.is_clear_family() && height_feet.is_some() {
            return Err(ProcessingError::sky(format!(
                "Clear sky conditions should not have height: {}",
                coverage
            )));
        }

        if coverage == SkyCoverage::VerticalVisibility && height_feet.is_none() {
            return Err(ProcessingError::sky(
                "Vertical visibility must have height specified",
            ));
        }

        let cloud_type = cloud_type.map(str::trim).filter(|t| !t.is_empty());
        if let Some(t) = cloud_type {
            if !VALID_CLOUD_TYPES.contains(&t) {
                return Err(ProcessingError::sky(format!("Invalid cloud type: {}", t)));
            }
        }

        Ok(Self {
            coverage,
            height_feet,
            cloud_type: cloud_type.map(str::to_string),
        })
    }

    pub fn of(coverage: SkyCoverage, height_feet: u32) -> Result<Self> {
        Self::new(coverage, Some(height_feet), None)
    }

    pub fn with_cloud_type(coverage: SkyCoverage, height_feet: u32, cloud_type: &str) -> Result<Self> {
        Self::new(coverage, Some(height_feet), Some(cloud_type))
    }

    pub fn vertical_visibility(height_feet: u32) -> Result<Self> {
        Self::new(SkyCoverage::VerticalVisibility, Some(height_feet), None)
    }

    pub fn clear() -> Self {
        Self {
            coverage: SkyCoverage::Clear,
            height_feet: None,
            cloud_type: None,
        }
    }

    pub fn sky_clear() -> Self {
        Self {
            coverage: SkyCoverage::SkyClear,
            height_feet: None,
            cloud_type: None,
        }
    }

    /// Decode a sky group such as "BKN015CB", "VV002", "FEW///" or "CLR".
    pub fn from_metar(group: &str) -> Result<Self> {
        let invalid = || ProcessingError::InvalidFormat(format!("Invalid sky condition group: {}", group));

        let split = if group.starts_with("VV") { 2 } else { 3 };
        if group.len() < split || !group.is_char_boundary(split) {
            return Err(invalid());
        }
        let (code, rest) = group.split_at(split);
        let coverage = SkyCoverage::from_code(code)?;

        if rest.is_empty() {
            return Self::new(coverage, None, None);
        }
        if rest.len() < 3 || !rest.is_char_boundary(3) {
            return Err(invalid());
        }

        let (height, cloud_type) = rest.split_at(3);
        let height_feet = match height {
            "///" => None,
            h => Some(parse_digits::<u32>(h).ok_or_else(invalid)? * 100),
        };
        let cloud_type = match cloud_type {
            "" | "///" => None,
            t => Some(t),
        };

        Self::new(coverage, height_feet, cloud_type)
    }

    pub fn coverage(&self) -> SkyCoverage {
        self.coverage
    }

    pub fn height_feet(&self) -> Option<u32> {
        self.height_feet
    }

    pub fn cloud_type(&self) -> Option<&str> {
        self.cloud_type.as_deref()
    }

    pub fn is_clear(&self) -> bool {
        self.coverage.is_clear_family()
    }

    /// Broken, overcast and vertical visibility layers form a ceiling.
    pub fn is_ceiling(&self) -> bool {
        matches!(
            self.coverage,
            SkyCoverage::Broken | SkyCoverage::Overcast | SkyCoverage::VerticalVisibility
        )
    }

    pub fn is_cumulonimbus(&self) -> bool {
        self.cloud_type.as_deref() == Some("CB")
    }

    pub fn is_towering_cumulus(&self) -> bool {
        self.cloud_type.as_deref() == Some("TCU")
    }

    pub fn is_convective(&self) -> bool {
        self.is_cumulonimbus() || self.is_towering_cumulus()
    }

    pub fn is_below_altitude(&self, altitude_feet: u32) -> bool {
        self.height_feet.map_or(false, |h| h < altitude_feet)
    }

    pub fn height_meters(&self) -> Option<u32> {
        self.height_feet
            .map(|h| (f64::from(h) * METERS_PER_FOOT) as u32)
    }

    pub fn to_metar_code(&self) -> String {
        let height = self
            .height_feet
            .map(|h| format!("{:03}", h / 100))
            .unwrap_or_else(|| if self.is_clear() { String::new() } else { "///".to_string() });
        format!(
            "{}{}{}",
            self.coverage.code(),
            height,
            self.cloud_type.as_deref().unwrap_or("")
        )
    }

    pub fn summary(&self) -> String {
        if self.is_clear() {
            return self.coverage.description().to_string();
        }
        let mut summary = match self.height_feet {
            Some(h) => format!("{} at {} feet", self.coverage.description(), h),
            None => self.coverage.description().to_string(),
        };
        if let Some(t) = &self.cloud_type {
            summary.push_str(&format!(" ({})", t));
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_codes() {
        assert_eq!(SkyCoverage::from_code("BKN").unwrap(), SkyCoverage::Broken);
        assert_eq!(SkyCoverage::Overcast.oktas(), 8);
        assert_eq!(SkyCoverage::Scattered.oktas(), 3);
        let err = SkyCoverage::from_code("XYZ").unwrap_err();
        assert!(err.to_string().contains("Unknown sky coverage code: XYZ"));
    }

    #[test]
    fn test_validation() {
        let err = SkyCondition::of(SkyCoverage::Broken, 100_001).unwrap_err();
        assert!(err
            .to_string()
            .contains("Cloud height out of reasonable range (0-100000 ft)"));

        let err = SkyCondition::new(SkyCoverage::Clear, Some(1000), None).unwrap_err();
        assert!(err.to_string().contains("Clear sky conditions should not have height"));

        let err = SkyCondition::new(SkyCoverage::VerticalVisibility, None, None).unwrap_err();
        assert!(err
            .to_string()
            .contains("Vertical visibility must have height specified"));

        let err = SkyCondition::with_cloud_type(SkyCoverage::Few, 3000, "XX").unwrap_err();
        assert!(err.to_string().contains("Invalid cloud type"));

        let blank = SkyCondition::new(SkyCoverage::Few, Some(3000), Some("  ")).unwrap();
        assert_eq!(blank.cloud_type(), None);
    }

    #[test]
    fn test_predicates() {
        let cb = SkyCondition::with_cloud_type(SkyCoverage::Broken, 5000, "CB").unwrap();
        assert!(cb.is_ceiling());
        assert!(cb.is_cumulonimbus());
        assert!(cb.is_convective());
        assert!(cb.is_below_altitude(5001));
        assert!(!cb.is_below_altitude(5000));
        assert_eq!(cb.height_meters(), Some(1524));

        assert!(SkyCondition::clear().is_clear());
        assert!(!SkyCondition::clear().is_below_altitude(1000));
        assert!(!SkyCondition::of(SkyCoverage::Scattered, 3000).unwrap().is_ceiling());
    }

    #[test]
    fn test_summaries() {
        assert_eq!(SkyCondition::clear().summary(), "Clear");
        assert_eq!(SkyCondition::sky_clear().summary(), "Sky Clear");
        assert_eq!(
            SkyCondition::new(SkyCoverage::NoSignificantClouds, None, None)
                .unwrap()
                .summary(),
            "No Significant Clouds"
        );
        assert_eq!(
            SkyCondition::of(SkyCoverage::Scattered, 10000).unwrap().summary(),
            "Scattered at 10000 feet"
        );
        assert_eq!(
            SkyCondition::with_cloud_type(SkyCoverage::Broken, 5000, "CB")
                .unwrap()
                .summary(),
            "Broken at 5000 feet (CB)"
        );
        assert_eq!(
            SkyCondition::vertical_visibility(200).unwrap().summary(),
            "Vertical Visibility at 200 feet"
        );
        assert_eq!(
            SkyCondition::with_cloud_type(SkyCoverage::Few, 8000, "TCU")
                .unwrap()
                .summary(),
            "Few at 8000 feet (TCU)"
        );
    }

    #[test]
    fn test_from_metar() {
        let sky = SkyCondition::from_metar("BKN015CB").unwrap();
        assert_eq!(sky.coverage(), SkyCoverage::Broken);
        assert_eq!(sky.height_feet(), Some(1500));
        assert_eq!(sky.cloud_type(), Some("CB"));
        assert_eq!(sky.to_metar_code(), "BKN015CB");

        let vv = SkyCondition::from_metar("VV002").unwrap();
        assert_eq!(vv.height_feet(), Some(200));
        assert_eq!(vv.to_metar_code(), "VV002");

        let clr = SkyCondition::from_metar("CLR").unwrap();
        assert!(clr.is_clear());
        assert_eq!(clr.to_metar_code(), "CLR");

        let unknown = SkyCondition::from_metar("FEW///").unwrap();
        assert_eq!(unknown.height_feet(), None);

        assert!(SkyCondition::from_metar("BKN01").is_err());
        assert!(SkyCondition::from_metar("XYZ015").is_err());
    }
}
