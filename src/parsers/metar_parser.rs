use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::{ProcessingError, Result};
use crate::models::{MetarReport, MetarType, NoaaMetarRemarks, ReportModifier, WeatherConditions};
use crate::parsers::groups::{
    decode_conditions_group, is_report_time, is_station_id, normalize_report, parse_report_time,
    skip_group,
};
use crate::parsers::remarks_parser::RemarksParser;
use crate::utils::constants::REMARKS_MARKER;

const TREND_MARKERS: [&str; 2] = ["BECMG", "TEMPO"];

/// Decodes METAR and SPECI observations.
#[derive(Debug, Clone)]
pub struct MetarParser {
    reference_time: DateTime<Utc>,
    strict: bool,
    decode_remarks: bool,
}

impl Default for MetarParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MetarParser {
    pub fn new() -> Self {
        Self {
            reference_time: Utc::now(),
            strict: false,
            decode_remarks: true,
        }
    }

    /// Instant used to resolve the day-of-month in the report time group.
    pub fn with_reference_time(mut self, reference_time: DateTime<Utc>) -> Self {
        self.reference_time = reference_time;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_decode_remarks(mut self, decode_remarks: bool) -> Self {
        self.decode_remarks = decode_remarks;
        self
    }

    pub fn parse(&self, raw: &str) -> Result<MetarReport> {
        self.decode(raw).map_err(|e| {
            warn!("Rejected METAR '{}': {}", raw.trim(), e);
            e
        })
    }

    fn decode(&self, raw: &str) -> Result<MetarReport> {
        let raw_text = normalize_report(raw);
        if raw_text.is_empty() {
            return Err(ProcessingError::MissingData("Empty METAR report".to_string()));
        }

        let tokens: Vec<&str> = raw_text.split(' ').collect();
        let remarks_at = tokens.iter().position(|t| *t == REMARKS_MARKER);
        let (body, remark_tokens) = match remarks_at {
            Some(at) => (&tokens[..at], &tokens[at + 1..]),
            None => (&tokens[..], &tokens[tokens.len()..]),
        };

        let mut idx = 0;
        let report_type = match body.first().and_then(|t| MetarType::from_code(t)) {
            Some(report_type) => {
                idx += 1;
                report_type
            }
            None => MetarType::Metar,
        };

        let station_id = body
            .get(idx)
            .filter(|t| is_station_id(t))
            .ok_or_else(|| {
                ProcessingError::InvalidFormat(format!("Missing station identifier in '{}'", raw_text))
            })?
            .to_string();
        idx += 1;

        let time_group = body
            .get(idx)
            .filter(|t| is_report_time(t))
            .ok_or_else(|| {
                ProcessingError::MissingData(format!("Missing observation time for {}", station_id))
            })?;
        let observation_time = parse_report_time(time_group, self.reference_time)?;
        idx += 1;

        let modifier = body.get(idx).and_then(|t| ReportModifier::from_code(t));
        if modifier.is_some() {
            idx += 1;
        }

        let mut conditions = WeatherConditions::default();
        let mut runway_visual_ranges = Vec::new();
        let mut no_significant_change = false;
        let mut unparsed_groups = Vec::new();

        while idx < body.len() {
            let group = body[idx];
            if group == "NOSIG" {
                no_significant_change = true;
                idx += 1;
                continue;
            }
            if TREND_MARKERS.contains(&group) {
                debug!(station = %station_id, "Leaving trend forecast undecoded");
                unparsed_groups.extend(body[idx..].iter().map(|t| t.to_string()));
                break;
            }
            match decode_conditions_group(&body[idx..], &mut conditions, &mut runway_visual_ranges) {
                Ok(used) => idx += used,
                Err(error) => {
                    skip_group(self.strict, &station_id, group, error, &mut unparsed_groups)?;
                    idx += 1;
                }
            }
        }

        let remarks = if remarks_at.is_some() {
            Some(self.decode_remarks(&remark_tokens.join(" "))?)
        } else {
            None
        };

        Ok(MetarReport {
            report_type,
            station_id,
            observation_time,
            modifier,
            conditions,
            runway_visual_ranges,
            no_significant_change,
            remarks,
            raw_text,
            unparsed_groups,
        })
    }

    fn decode_remarks(&self, text: &str) -> Result<NoaaMetarRemarks> {
        if !self.decode_remarks {
            let builder = NoaaMetarRemarks::builder();
            let builder = if text.is_empty() { builder } else { builder.free_text(text) };
            return Ok(builder.build());
        }
        RemarksParser::new().with_strict(self.strict).parse(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::remarks::AutomatedStationType;
    use crate::models::SkyCoverage;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn parser() -> MetarParser {
        MetarParser::new().with_reference_time(Utc.with_ymd_and_hms(2024, 3, 15, 12, 30, 0).unwrap())
    }

    #[test]
    fn test_parse_full_metar() {
        let report = parser()
            .parse("METAR KJFK 151151Z 28015G25KT 250V310 10SM FEW040 SCT250 23/14 A3012 RMK AO2 SLP210 T02330139")
            .unwrap();

        assert_eq!(report.report_type, MetarType::Metar);
        assert_eq!(report.station_id, "KJFK");
        assert_eq!(
            report.observation_time,
            Utc.with_ymd_and_hms(2024, 3, 15, 11, 51, 0).unwrap()
        );
        let wind = report.conditions.wind.as_ref().unwrap();
        assert_eq!(wind.gust_value(), Some(25));
        assert_eq!(report.conditions.sky_conditions.len(), 2);
        assert_eq!(report.conditions.sky_conditions[0].coverage(), SkyCoverage::Few);
        assert!((report.conditions.pressure.unwrap().value() - 30.12).abs() < 1e-9);

        let remarks = report.remarks.as_ref().unwrap();
        assert_eq!(remarks.station_type(), Some(AutomatedStationType::Ao2));
        assert!(report.is_fully_decoded());
    }

    #[test]
    fn test_speci_with_modifier_and_rvr() {
        let report = parser()
            .parse("SPECI KORD 150953Z AUTO 36012KT 1 1/2SM R28L/2400FT -SN BR OVC008 M02/M04 A2990")
            .unwrap();
        assert!(report.is_special());
        assert!(report.is_automated());
        assert_eq!(report.conditions.visibility.as_ref().unwrap().distance_value(), Some(1.5));
        assert_eq!(report.runway_visual_ranges.len(), 1);
        assert_eq!(report.conditions.present_weather.len(), 2);
        assert_eq!(report.ceiling_feet(), Some(800));
    }

    #[test]
    fn test_unknown_groups_are_kept_when_lenient() {
        let report = parser().parse("KJFK 151151Z 28015KT 10SM XYZZY CLR 20/10 A3000").unwrap();
        assert_eq!(report.unparsed_groups, vec!["XYZZY".to_string()]);
        assert!(!report.is_fully_decoded());

        assert!(parser()
            .with_strict(true)
            .parse("KJFK 151151Z 28015KT 10SM XYZZY CLR 20/10 A3000")
            .is_err());
    }

    #[test]
    fn test_trend_and_nosig() {
        let report = parser()
            .parse("EGLL 151150Z 24010KT 9999 BKN030 12/08 Q1015 NOSIG")
            .unwrap();
        assert!(report.no_significant_change);

        let report = parser()
            .parse("EGLL 151150Z 24010KT 9999 BKN030 12/08 Q1015 BECMG 4000 RA")
            .unwrap();
        assert_eq!(report.unparsed_groups, vec!["BECMG", "4000", "RA"]);
    }

    #[test]
    fn test_remarks_kept_as_text_when_not_decoded() {
        let report = parser()
            .with_decode_remarks(false)
            .parse("KJFK 151151Z 28015KT 10SM CLR 20/10 A3000 RMK AO2 SLP123")
            .unwrap();
        let remarks = report.remarks.unwrap();
        assert!(remarks.station_type().is_none());
        assert_eq!(remarks.free_text(), Some("AO2 SLP123"));
    }

    #[test]
    fn test_non_numeric_visibility_is_unparsed() {
        let report = parser().parse("KJFK 151151Z 28015KT NANSM CLR 20/10 A3000").unwrap();
        assert!(report.conditions.visibility.is_none());
        assert_eq!(report.unparsed_groups, vec!["NANSM".to_string()]);
    }

    #[test]
    fn test_missing_header_fields() {
        assert!(parser().parse("").is_err());
        assert!(parser().parse("METAR 151151Z 28015KT").is_err());
        assert!(parser().parse("METAR KJFK 28015KT").is_err());
    }
}
