use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::{ProcessingError, Result};
use crate::models::{
    ForecastPeriod, ReportModifier, TafReport, TemperatureForecast, ValidityPeriod,
    WeatherConditions,
};
use crate::parsers::groups::{
    decode_conditions_group, is_period_group, is_report_time, is_station_id, normalize_report,
    parse_period, parse_report_time, skip_group,
};
use crate::utils::constants::REMARKS_MARKER;
use crate::utils::time::{parse_day_hour, parse_day_hour_minute, resolve_day_time};
use crate::utils::units::parse_digits;

/// Decodes terminal aerodrome forecasts.
#[derive(Debug, Clone)]
pub struct TafParser {
    reference_time: DateTime<Utc>,
    strict: bool,
}

impl Default for TafParser {
    fn default() -> Self {
        Self::new()
    }
}

/// One forecast segment: its change-group header (empty for the base forecast)
/// and the condition groups that follow it.
struct Segment<'a> {
    header: &'a [&'a str],
    groups: Vec<&'a str>,
}

fn is_from_group(token: &str) -> bool {
    token
        .strip_prefix("FM")
        .map_or(false, |rest| parse_day_hour_minute(rest).is_some())
}

fn probability_of(token: &str) -> Option<u8> {
    token
        .strip_prefix("PROB")
        .filter(|p| p.len() == 2)
        .and_then(parse_digits::<u8>)
}

/// Number of tokens in the change-group header at the head of `tokens`, if any.
fn header_len(tokens: &[&str]) -> Option<usize> {
    let first = tokens[0];
    let len = if is_from_group(first) {
        1
    } else if first == "TEMPO" || first == "BECMG" {
        2
    } else if probability_of(first).is_some() {
        if tokens.get(1) == Some(&"TEMPO") {
            3
        } else {
            2
        }
    } else {
        return None;
    };
    Some(len.min(tokens.len()))
}

/// "TX12/1520Z" or "TNM02/1606Z".
fn decode_temperature_forecast(
    token: &str,
    reference: DateTime<Utc>,
) -> Option<Result<(bool, TemperatureForecast)>> {
    let (is_max, body) = match token.get(..2)? {
        "TX" => (true, &token[2..]),
        "TN" => (false, &token[2..]),
        _ => return None,
    };
    let (value, time) = body.split_once('/')?;
    let (day, hour) = parse_day_hour(time.strip_suffix('Z')?)?;
    let celsius = match value.strip_prefix('M') {
        Some(magnitude) => -parse_digits::<i32>(magnitude)?,
        None => parse_digits::<i32>(value)?,
    };
    Some(
        resolve_day_time(reference, day, hour, 0)
            .and_then(|time| TemperatureForecast::new(celsius, time))
            .map(|forecast| (is_max, forecast)),
    )
}

impl TafParser {
    pub fn new() -> Self {
        Self {
            reference_time: Utc::now(),
            strict: false,
        }
    }

    /// Instant used to resolve the day-of-month in the issue time and validity groups.
    pub fn with_reference_time(mut self, reference_time: DateTime<Utc>) -> Self {
        self.reference_time = reference_time;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn parse(&self, raw: &str) -> Result<TafReport> {
        self.decode(raw).map_err(|e| {
            warn!("Rejected TAF '{}': {}", raw.trim(), e);
            e
        })
    }

    fn decode(&self, raw: &str) -> Result<TafReport> {
        let raw_text = normalize_report(raw);
        if raw_text.is_empty() {
            return Err(ProcessingError::MissingData("Empty TAF report".to_string()));
        }

        let all_tokens: Vec<&str> = raw_text.split(' ').collect();
        let tokens = match all_tokens.iter().position(|t| *t == REMARKS_MARKER) {
            Some(at) => {
                debug!("Dropping TAF remarks: {}", all_tokens[at + 1..].join(" "));
                &all_tokens[..at]
            }
            None => &all_tokens[..],
        };

        let mut idx = 0;
        if tokens.first() == Some(&"TAF") {
            idx += 1;
        }
        let modifier = tokens.get(idx).and_then(|t| ReportModifier::from_code(t));
        if modifier.is_some() {
            idx += 1;
        }

        let station_id = tokens
            .get(idx)
            .filter(|t| is_station_id(t))
            .ok_or_else(|| {
                ProcessingError::InvalidFormat(format!("Missing station identifier in '{}'", raw_text))
            })?
            .to_string();
        idx += 1;

        let issue_time = match tokens.get(idx).filter(|t| is_report_time(t)) {
            Some(group) => {
                idx += 1;
                Some(parse_report_time(group, self.reference_time)?)
            }
            None => None,
        };

        let validity_group = tokens
            .get(idx)
            .filter(|t| is_period_group(t))
            .ok_or_else(|| {
                ProcessingError::MissingData(format!("Missing validity period for {}", station_id))
            })?;
        let validity =
            ValidityPeriod::from_taf(validity_group, issue_time.unwrap_or(self.reference_time))?;
        idx += 1;

        let mut max_temperature = None;
        let mut min_temperature = None;
        let mut unparsed_groups = Vec::new();
        let mut segments = vec![Segment {
            header: &tokens[idx..idx],
            groups: Vec::new(),
        }];

        while idx < tokens.len() {
            let rest = &tokens[idx..];
            if let Some(len) = header_len(rest) {
                segments.push(Segment {
                    header: &rest[..len],
                    groups: Vec::new(),
                });
                idx += len;
                continue;
            }
            match decode_temperature_forecast(rest[0], validity.valid_from()) {
                Some(Ok((true, forecast))) => max_temperature = Some(forecast),
                Some(Ok((false, forecast))) => min_temperature = Some(forecast),
                Some(Err(error)) => {
                    skip_group(self.strict, &station_id, rest[0], error, &mut unparsed_groups)?
                }
                None => {
                    if let Some(segment) = segments.last_mut() {
                        segment.groups.push(rest[0]);
                    }
                }
            }
            idx += 1;
        }

        let mut periods = Vec::with_capacity(segments.len());
        for segment in &segments {
            if segment.header.is_empty() && segment.groups.is_empty() {
                continue;
            }
            if let Some(period) =
                self.decode_segment(&station_id, segment, &validity, &mut unparsed_groups)?
            {
                periods.push(period);
            }
        }

        Ok(TafReport {
            station_id,
            issue_time: issue_time.unwrap_or_else(|| validity.valid_from()),
            modifier,
            validity,
            periods,
            max_temperature,
            min_temperature,
            raw_text,
            unparsed_groups,
        })
    }

    /// Decode one segment. A segment whose header or period is invalid is left in
    /// `unparsed` unless parsing is strict.
    fn decode_segment(
        &self,
        station: &str,
        segment: &Segment<'_>,
        validity: &ValidityPeriod,
        unparsed: &mut Vec<String>,
    ) -> Result<Option<ForecastPeriod>> {
        let reference = validity.valid_from();
        let header = match decode_header(segment.header, reference) {
            Ok(header) => header,
            Err(error) => {
                if self.strict {
                    return Err(error);
                }
                debug!(station, %error, "Skipping forecast segment with invalid header");
                unparsed.extend(segment.header.iter().chain(&segment.groups).map(|t| t.to_string()));
                return Ok(None);
            }
        };

        let mut conditions = WeatherConditions::default();
        let mut runway_ranges = Vec::new();
        let mut skipped = Vec::new();
        let mut idx = 0;
        while idx < segment.groups.len() {
            match decode_conditions_group(&segment.groups[idx..], &mut conditions, &mut runway_ranges) {
                Ok(used) => idx += used,
                Err(error) => {
                    skip_group(self.strict, station, segment.groups[idx], error, &mut skipped)?;
                    idx += 1;
                }
            }
        }

        let period = match header {
            SegmentHeader::Base => {
                ForecastPeriod::base(Some((validity.valid_from(), validity.valid_to())), conditions)
            }
            SegmentHeader::From(time) => Ok(ForecastPeriod::from(time, conditions)),
            SegmentHeader::Tempo(start, end) => ForecastPeriod::tempo(start, end, conditions),
            SegmentHeader::Becoming(start, end) => ForecastPeriod::becmg(start, end, conditions),
            SegmentHeader::Probability(probability, start, end) => {
                ForecastPeriod::prob(start, end, probability, conditions)
            }
        };

        match period {
            Ok(period) => {
                unparsed.append(&mut skipped);
                Ok(Some(period))
            }
            Err(error) if !self.strict => {
                debug!(station, %error, "Skipping invalid forecast period");
                unparsed.extend(segment.header.iter().chain(&segment.groups).map(|t| t.to_string()));
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }
}

enum SegmentHeader {
    Base,
    From(DateTime<Utc>),
    Tempo(DateTime<Utc>, DateTime<Utc>),
    Becoming(DateTime<Utc>, DateTime<Utc>),
    Probability(u8, DateTime<Utc>, DateTime<Utc>),
}

fn decode_header(header: &[&str], reference: DateTime<Utc>) -> Result<SegmentHeader> {
    let Some(marker) = header.first() else {
        return Ok(SegmentHeader::Base);
    };
    let period = || {
        let group = header.last().filter(|g| header.len() > 1 && is_period_group(g));
        match group {
            Some(group) => parse_period(group, reference),
            None => Err(ProcessingError::forecast(format!(
                "{} group without a valid period",
                marker
            ))),
        }
    };

    if let Some((day, hour, minute)) = marker.strip_prefix("FM").and_then(parse_day_hour_minute) {
        return Ok(SegmentHeader::From(resolve_day_time(reference, day, hour, minute)?));
    }
    match *marker {
        "TEMPO" => period().map(|(start, end)| SegmentHeader::Tempo(start, end)),
        "BECMG" => period().map(|(start, end)| SegmentHeader::Becoming(start, end)),
        _ => {
            let probability = probability_of(marker).ok_or_else(|| {
                ProcessingError::forecast(format!("Unknown change group: {}", marker))
            })?;
            period().map(|(start, end)| SegmentHeader::Probability(probability, start, end))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChangeIndicator;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    const TAF: &str = "TAF AMD KJFK 151130Z 1512/1618 28012KT P6SM SCT040 \
        TEMPO 1514/1518 5SM -SHRA BKN025 \
        FM160000 31008KT P6SM FEW050 \
        PROB30 1606/1610 2SM BR OVC008 \
        BECMG 1612/1614 VRB03KT TX14/1520Z TNM02/1610Z";

    fn parser() -> TafParser {
        TafParser::new().with_reference_time(Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap())
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_full_taf() {
        let report = parser().parse(TAF).unwrap();
        assert_eq!(report.station_id, "KJFK");
        assert!(report.is_amended());
        assert_eq!(report.validity.valid_from(), at(15, 12));
        assert_eq!(report.validity.valid_to(), at(16, 18));

        let indicators: Vec<ChangeIndicator> =
            report.periods.iter().map(|p| p.change_indicator()).collect();
        assert_eq!(
            indicators,
            vec![
                ChangeIndicator::Base,
                ChangeIndicator::Tempo,
                ChangeIndicator::From,
                ChangeIndicator::Probability,
                ChangeIndicator::Becoming,
            ]
        );
        assert_eq!(report.periods[3].probability(), Some(30));
        assert_eq!(report.max_temperature.as_ref().unwrap().celsius(), 14);
        assert_eq!(report.min_temperature.as_ref().unwrap().celsius(), -2);
        assert!(report.is_fully_decoded());
    }

    #[test]
    fn test_prevailing_period() {
        let report = parser().parse(TAF).unwrap();
        assert!(report.period_at(at(15, 16)).unwrap().is_base_forecast());
        assert_eq!(
            report.period_at(at(16, 3)).unwrap().change_indicator(),
            ChangeIndicator::From
        );
        assert!(report.period_at(at(17, 0)).is_none());
    }

    #[test]
    fn test_missing_issue_time_uses_validity_start() {
        let report = parser().parse("TAF KJFK 1512/1618 28012KT P6SM SCT040").unwrap();
        assert_eq!(report.issue_time, at(15, 12));
        assert_eq!(report.periods.len(), 1);
    }

    #[test]
    fn test_long_tempo_is_rejected_or_skipped() {
        let raw = "TAF KJFK 151130Z 1512/1618 28012KT P6SM TEMPO 1514/1604 3SM RA";
        let report = parser().parse(raw).unwrap();
        assert_eq!(report.periods.len(), 1);
        assert_eq!(report.unparsed_groups, vec!["TEMPO", "1514/1604", "3SM", "RA"]);

        assert!(parser().with_strict(true).parse(raw).is_err());
    }

    #[test]
    fn test_out_of_range_extremes_are_unparsed() {
        let raw = "TAF KJFK 151130Z 1512/1618 28012KT P6SM SCT040 TX99/1520Z TNM150/1610Z";
        let report = parser().parse(raw).unwrap();
        assert!(report.max_temperature.is_none());
        assert!(report.min_temperature.is_none());
        assert_eq!(report.unparsed_groups, vec!["TX99/1520Z", "TNM150/1610Z"]);

        assert!(parser().with_strict(true).parse(raw).is_err());
    }

    #[test]
    fn test_remarks_are_dropped() {
        let report = parser()
            .parse("TAF KJFK 151130Z 1512/1618 28012KT P6SM SCT040 RMK NXT FCST BY 18Z")
            .unwrap();
        assert!(report.is_fully_decoded());
    }

    #[test]
    fn test_missing_validity_is_error() {
        assert!(parser().parse("TAF KJFK 151130Z NIL").is_err());
    }
}
