use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};

const DESCRIPTORS: [&str; 8] = ["MI", "PR", "BC", "DR", "BL", "SH", "TS", "FZ"];
const PRECIPITATION: [&str; 9] = ["DZ", "RA", "SN", "SG", "IC", "PL", "GR", "GS", "UP"];
const OBSCURATIONS: [&str; 8] = ["BR", "FG", "FU", "VA", "DU", "SA", "HZ", "PY"];
const OTHER: [&str; 5] = ["PO", "SQ", "FC", "SS", "DS"];

/// A present weather group such as "-SHRA", "+TSRAGR" or "VCFG", split into its slots.
///
/// The precipitation slot may hold several two-letter codes ("RASN") when mixed
/// precipitation is reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentWeather {
    intensity: Option<String>,
    descriptor: Option<String>,
    precipitation: Option<String>,
    obscuration: Option<String>,
    other: Option<String>,
    raw_code: String,
}

impl PresentWeather {
    /// Assemble from already-split slots. Slot values are not checked against the code tables.
    pub fn new(
        intensity: Option<&str>,
        descriptor: Option<&str>,
        precipitation: Option<&str>,
        obscuration: Option<&str>,
        other: Option<&str>,
        raw_code: &str,
    ) -> Result<Self> {
        let raw_code = raw_code.trim().to_uppercase();
        if raw_code.is_empty() {
            return Err(ProcessingError::weather(
                "Raw weather code cannot be blank",
            ));
        }

        Ok(Self {
            intensity: normalize(intensity),
            descriptor: normalize(descriptor),
            precipitation: normalize(precipitation),
            obscuration: normalize(obscuration),
            other: normalize(other),
            raw_code,
        })
    }

    /// Split a raw weather code left to right: intensity, descriptor, precipitation,
    /// obscuration, then other phenomena. Leftover characters are rejected.
    pub fn parse(raw_code: &str) -> Result<Self> {
        let code = raw_code.trim().to_uppercase();
        if code.is_empty() {
            return Err(ProcessingError::weather(
                "Weather code cannot be blank",
            ));
        }

        let mut rest = code.as_str();

        let intensity = if let Some(r) = rest.strip_prefix('-') {
            rest = r;
            Some("-")
        } else if let Some(r) = rest.strip_prefix('+') {
            rest = r;
            Some("+")
        } else if let Some(r) = rest.strip_prefix("VC") {
            rest = r;
            Some("VC")
        } else {
            None
        };

        if rest == "NSW" {
            return Self::new(intensity, None, None, None, Some("NSW"), &code);
        }

        let descriptor = take_code(&mut rest, &DESCRIPTORS);

        let mut precipitation = String::new();
        while let Some(p) = take_code(&mut rest, &PRECIPITATION) {
            precipitation.push_str(p);
        }

        let obscuration = take_code(&mut rest, &OBSCURATIONS);
        let other = take_code(&mut rest, &OTHER);

        if !rest.is_empty() {
            return Err(ProcessingError::weather(format!(
                "Unrecognized present weather code: {} (unparsed '{}')",
                code, rest
            )));
        }

        if descriptor.is_none() && precipitation.is_empty() && obscuration.is_none() && other.is_none() {
            return Err(ProcessingError::weather(format!(
                "Unrecognized present weather code: {}",
                code
            )));
        }

        let precipitation = Some(precipitation.as_str()).filter(|p| !p.is_empty());
        Self::new(intensity, descriptor, precipitation, obscuration, other, &code)
    }

    pub fn intensity(&self) -> Option<&str> {
        self.intensity.as_deref()
    }

    pub fn descriptor(&self) -> Option<&str> {
        self.descriptor.as_deref()
    }

    pub fn precipitation(&self) -> Option<&str> {
        self.precipitation.as_deref()
    }

    pub fn obscuration(&self) -> Option<&str> {
        self.obscuration.as_deref()
    }

    pub fn other(&self) -> Option<&str> {
        self.other.as_deref()
    }

    pub fn raw_code(&self) -> &str {
        &self.raw_code
    }

    pub fn is_no_significant_weather(&self) -> bool {
        self.other.as_deref() == Some("NSW")
    }

    pub fn is_light(&self) -> bool {
        self.intensity.as_deref() == Some("-")
    }

    pub fn is_heavy(&self) -> bool {
        self.intensity.as_deref() == Some("+")
    }

    pub fn is_vicinity(&self) -> bool {
        self.intensity.as_deref() == Some("VC")
    }

    pub fn is_thunderstorm(&self) -> bool {
        self.descriptor.as_deref() == Some("TS")
    }

    pub fn is_freezing(&self) -> bool {
        self.descriptor.as_deref() == Some("FZ")
    }

    pub fn is_showers(&self) -> bool {
        self.descriptor.as_deref() == Some("SH")
    }

    pub fn has_precipitation(&self) -> bool {
        self.precipitation.is_some()
    }

    pub fn has_obscuration(&self) -> bool {
        self.obscuration.is_some()
    }

    pub fn intensity_description(&self) -> &str {
        match self.intensity.as_deref() {
            None => "Moderate",
            Some("-") => "Light",
            Some("+") => "Heavy",
            Some("VC") => "Vicinity",
            Some(other) => other,
        }
    }

    pub fn descriptor_description(&self) -> Option<&str> {
        self.descriptor.as_deref().map(|d| match d {
            "MI" => "Shallow",
            "PR" => "Partial",
            "BC" => "Patches",
            "DR" => "Drifting",
            "BL" => "Blowing",
            "SH" => "Showers",
            "TS" => "Thunderstorm",
            "FZ" => "Freezing",
            unknown => unknown,
        })
    }

    pub fn precipitation_description(&self) -> Option<String> {
        let precipitation = self.precipitation.as_deref()?;
        let known = precipitation.len() % 2 == 0
            && precipitation.is_ascii()
            && (0..precipitation.len())
                .step_by(2)
                .all(|i| PRECIPITATION.contains(&&precipitation[i..i + 2]));
        if !known {
            return Some(precipitation.to_string());
        }

        let parts: Vec<&str> = (0..precipitation.len())
            .step_by(2)
            .map(|i| match &precipitation[i..i + 2] {
                "DZ" => "Drizzle",
                "RA" => "Rain",
                "SN" => "Snow",
                "SG" => "Snow Grains",
                "IC" => "Ice Crystals",
                "PL" => "Ice Pellets",
                "GR" => "Hail",
                "GS" => "Small Hail/Snow Pellets",
                _ => "Unknown Precipitation",
            })
            .collect();
        Some(parts.join(" and "))
    }

    pub fn obscuration_description(&self) -> Option<&str> {
        self.obscuration.as_deref().map(|o| match o {
            "BR" => "Mist",
            "FG" => "Fog",
            "FU" => "Smoke",
            "VA" => "Volcanic Ash",
            "DU" => "Dust",
            "SA" => "Sand",
            "HZ" => "Haze",
            "PY" => "Spray",
            unknown => unknown,
        })
    }

    pub fn other_description(&self) -> Option<&str> {
        self.other.as_deref().map(|o| match o {
            "PO" => "Dust/Sand Whirls",
            "SQ" => "Squall",
            "FC" => "Funnel Cloud/Tornado/Waterspout",
            "SS" => "Sandstorm",
            "DS" => "Duststorm",
            "NSW" => "No Significant Weather",
            unknown => unknown,
        })
    }

    pub fn description(&self) -> String {
        if self.is_no_significant_weather() {
            return "No Significant Weather".to_string();
        }

        let mut parts = vec![self.intensity_description().to_string()];
        parts.extend(self.descriptor_description().map(str::to_string));
        parts.extend(self.precipitation_description());
        parts.extend(self.obscuration_description().map(str::to_string));
        parts.extend(self.other_description().map(str::to_string));
        parts.join(" ")
    }

    pub fn to_metar_code(&self) -> &str {
        &self.raw_code
    }
}

fn take_code<'a>(rest: &mut &str, table: &[&'a str]) -> Option<&'a str> {
    let found = table.iter().find(|c| rest.starts_with(**c)).copied()?;
    *rest = &rest[found.len()..];
    Some(found)
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_uppercase())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slots() {
        let wx = PresentWeather::parse("-SHRA").unwrap();
        assert_eq!(wx.intensity(), Some("-"));
        assert_eq!(wx.descriptor(), Some("SH"));
        assert_eq!(wx.precipitation(), Some("RA"));
        assert!(wx.is_light());
        assert!(wx.is_showers());
        assert!(wx.has_precipitation());
        assert_eq!(wx.description(), "Light Showers Rain");

        let wx = PresentWeather::parse("+TSRA").unwrap();
        assert!(wx.is_heavy());
        assert!(wx.is_thunderstorm());

        let wx = PresentWeather::parse(" vcfg ").unwrap();
        assert!(wx.is_vicinity());
        assert!(wx.has_obscuration());
        assert_eq!(wx.raw_code(), "VCFG");
        assert_eq!(wx.description(), "Vicinity Fog");

        let wx = PresentWeather::parse("FZFG").unwrap();
        assert!(wx.is_freezing());
        assert_eq!(wx.obscuration(), Some("FG"));
    }

    #[test]
    fn test_mixed_precipitation() {
        let wx = PresentWeather::parse("-RASN").unwrap();
        assert_eq!(wx.precipitation(), Some("RASN"));
        assert_eq!(wx.description(), "Light Rain and Snow");
    }

    #[test]
    fn test_other_phenomena() {
        let wx = PresentWeather::parse("+FC").unwrap();
        assert_eq!(wx.other(), Some("FC"));
        assert_eq!(wx.description(), "Heavy Funnel Cloud/Tornado/Waterspout");

        let nsw = PresentWeather::parse("NSW").unwrap();
        assert!(nsw.is_no_significant_weather());
        assert_eq!(nsw.description(), "No Significant Weather");
    }

    #[test]
    fn test_trailing_text_rejected() {
        let err = PresentWeather::parse("RAXX").unwrap_err();
        assert!(err.to_string().contains("Unrecognized present weather code"));
        assert!(PresentWeather::parse("ZZ").is_err());
        assert!(PresentWeather::parse("  ").is_err());
    }

    #[test]
    fn test_unknown_codes_echoed() {
        let wx = PresentWeather::new(None, Some("XX"), Some("QQ"), Some("ZZ"), Some("YY"), "XXQQZZYY")
            .unwrap();
        assert_eq!(wx.description(), "Moderate XX QQ ZZ YY");
        assert!(PresentWeather::new(None, None, None, None, None, " ").is_err());
    }
}
