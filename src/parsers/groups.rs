use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::{
    PresentWeather, Pressure, RunwayVisualRange, SkyCondition, Temperature, Visibility,
    WeatherConditions, Wind,
};
use crate::utils::time::{parse_day_hour, parse_day_hour_minute, resolve_day_time};

const WIND_UNITS: [&str; 3] = ["KT", "MPS", "KMH"];
const SKY_PREFIXES: [&str; 9] = ["SKC", "CLR", "NSC", "NCD", "FEW", "SCT", "BKN", "OVC", "VV"];

fn all_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Four alphanumerics starting with a letter, e.g. "KJFK" or "K1G4".
pub fn is_station_id(token: &str) -> bool {
    token.len() == 4
        && token.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        && token.bytes().next().map_or(false, |b| b.is_ascii_uppercase())
}

pub(crate) fn is_report_time(token: &str) -> bool {
    token
        .strip_suffix('Z')
        .map_or(false, |t| t.len() == 6 && all_digits(t))
}

pub(crate) fn is_period_group(token: &str) -> bool {
    token
        .split_once('/')
        .map_or(false, |(from, to)| parse_day_hour(from).is_some() && parse_day_hour(to).is_some())
}

fn is_wind_group(token: &str) -> bool {
    WIND_UNITS.iter().any(|unit| {
        token.strip_suffix(unit).map_or(false, |body| {
            body.len() >= 5
                && body
                    .get(..3)
                    .map_or(false, |dir| dir == "VRB" || all_digits(dir))
        })
    })
}

fn is_wind_variation(token: &str) -> bool {
    token.len() == 7
        && token
            .split_once('V')
            .map_or(false, |(from, to)| from.len() == 3 && all_digits(from) && all_digits(to))
}

fn is_visibility_group(token: &str) -> bool {
    if token == "CAVOK" || token.ends_with("SM") {
        return true;
    }
    if let Some(km) = token.strip_suffix("KM") {
        return all_digits(km);
    }
    let metres = token.strip_suffix("NDV").unwrap_or(token);
    metres.len() == 4 && all_digits(metres)
}

fn is_runway_group(token: &str) -> bool {
    token.starts_with('R')
        && token.get(1..3).map_or(false, all_digits)
        && token.contains('/')
}

fn is_sky_group(token: &str) -> bool {
    SKY_PREFIXES.iter().any(|prefix| token.starts_with(prefix))
}

fn is_temperature_value(value: &str) -> bool {
    let value = value.strip_prefix('M').unwrap_or(value);
    value.len() == 2 && all_digits(value)
}

fn is_temperature_group(token: &str) -> bool {
    token.split_once('/').map_or(false, |(temp, dewpoint)| {
        is_temperature_value(temp)
            && (dewpoint.is_empty() || dewpoint == "//" || is_temperature_value(dewpoint))
    })
}

fn is_pressure_group(token: &str) -> bool {
    token.len() == 5
        && (token.starts_with('A') || token.starts_with('Q'))
        && all_digits(&token[1..])
}

/// Decode a "ddhhmmZ" group against `reference`.
pub(crate) fn parse_report_time(token: &str, reference: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let (day, hour, minute) = token
        .strip_suffix('Z')
        .and_then(parse_day_hour_minute)
        .ok_or_else(|| ProcessingError::InvalidFormat(format!("Invalid report time: {}", token)))?;
    resolve_day_time(reference, day, hour, minute)
}

/// Decode a "ddhh/ddhh" change period against `reference`.
pub(crate) fn parse_period(
    token: &str,
    reference: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let invalid = || ProcessingError::InvalidFormat(format!("Invalid forecast period: {}", token));
    let (from, to) = token.split_once('/').ok_or_else(invalid)?;
    let (from_day, from_hour) = parse_day_hour(from).ok_or_else(invalid)?;
    let (to_day, to_hour) = parse_day_hour(to).ok_or_else(invalid)?;
    let start = resolve_day_time(reference, from_day, from_hour, 0)?;
    let end = resolve_day_time(start, to_day, to_hour, 0)?;
    Ok((start, end))
}

/// Decode the observation group at the head of `tokens` into `conditions`,
/// returning how many tokens it used. Anything without a recognizable shape is
/// tried as present weather.
pub(crate) fn decode_conditions_group(
    tokens: &[&str],
    conditions: &mut WeatherConditions,
    runway_ranges: &mut Vec<RunwayVisualRange>,
) -> Result<usize> {
    let token = *tokens
        .first()
        .ok_or_else(|| ProcessingError::MissingData("No group to decode".to_string()))?;
    let next = tokens.get(1).copied();

    if is_wind_group(token) {
        let variation = next.filter(|n| is_wind_variation(n));
        conditions.wind = Some(Wind::from_metar(token, variation)?);
        return Ok(if variation.is_some() { 2 } else { 1 });
    }

    if token.len() <= 2 && all_digits(token) {
        if let Some(fraction) = next.filter(|n| n.ends_with("SM") && n.contains('/')) {
            conditions.visibility = Some(Visibility::from_metar(&format!("{} {}", token, fraction))?);
            return Ok(2);
        }
    }

    if is_visibility_group(token) {
        conditions.visibility = Some(Visibility::from_metar(token)?);
    } else if is_runway_group(token) {
        runway_ranges.push(RunwayVisualRange::from_metar(token)?);
    } else if is_sky_group(token) {
        conditions.sky_conditions.push(SkyCondition::from_metar(token)?);
    } else if is_temperature_group(token) {
        conditions.temperature = Some(Temperature::from_metar(token)?);
    } else if is_pressure_group(token) {
        conditions.pressure = Some(if token.starts_with('A') {
            Pressure::from_metar_altimeter(token)?
        } else {
            Pressure::from_metar_qnh(token)?
        });
    } else {
        conditions.present_weather.push(PresentWeather::parse(token)?);
    }
    Ok(1)
}

/// Record a group that failed to decode. Strict parsing turns the failure into an error.
pub(crate) fn skip_group(
    strict: bool,
    station: &str,
    group: &str,
    error: ProcessingError,
    unparsed: &mut Vec<String>,
) -> Result<()> {
    if strict {
        return Err(error);
    }
    debug!(station, group, %error, "Skipping undecodable group");
    unparsed.push(group.to_string());
    Ok(())
}

/// Trim a raw report, drop the trailing "=" terminator and collapse whitespace.
pub(crate) fn normalize_report(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('=').unwrap_or(trimmed);
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}
