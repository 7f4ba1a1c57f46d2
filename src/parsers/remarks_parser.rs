use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::remarks::{
    AutomatedMaintenanceIndicator, AutomatedStationType, CeilingSecondSite, CloudType, HailSize,
    NoaaMetarRemarks, NoaaMetarRemarksBuilder, ObscurationLayer, PeakWind, PrecipitationAmount,
    PressureTendency, ThunderstormLocation, VariableCeiling, VariableVisibility, WeatherEvent,
    WindShift,
};
use crate::models::{Pressure, Temperature, Visibility};
use crate::utils::constants::OCTANT_DIRECTIONS;
use crate::utils::units::{parse_digits, parse_fractional};

const CONVECTIVE_CLOUDS: [&str; 6] = ["TS", "CB", "TCU", "ACC", "CBMAM", "VIRGA"];
const LOCATION_QUALIFIERS: [&str; 7] = ["OHD", "VC", "DSNT", "DSIPTD", "TOP", "TR", "ALQDS"];
const OBSCURING_PHENOMENA: [&str; 8] = ["BR", "FG", "FU", "VA", "DU", "SA", "HZ", "PY"];
const LAYER_COVERAGES: [&str; 4] = ["FEW", "SCT", "BKN", "OVC"];
const CLOUD_LOCATIONS: [&str; 4] = ["OHD", "OHD-ALQDS", "ALQDS", "TR"];
const MAINTENANCE_WITH_LOCATION: [&str; 2] = ["VISNO", "CHINO"];

/// One decoded remark group.
#[derive(Debug)]
enum RemarkGroup {
    StationType(AutomatedStationType),
    SeaLevelPressure(Pressure),
    PreciseTemperature(Temperature, Option<Temperature>),
    PeakWind(PeakWind),
    WindShift(WindShift),
    VariableVisibility(VariableVisibility),
    TowerVisibility(Visibility),
    SurfaceVisibility(Visibility),
    Precipitation(PrecipitationAmount),
    Hail(HailSize),
    PressureTendency(PressureTendency),
    SixHourMaximum(Temperature),
    SixHourMinimum(Temperature),
    TwentyFourHourExtremes(Temperature, Temperature),
    VariableCeiling(VariableCeiling),
    CeilingSecondSite(CeilingSecondSite),
    WeatherEvents(Vec<WeatherEvent>),
    Thunderstorm(ThunderstormLocation),
    Obscuration(ObscurationLayer),
    CloudTypes(Vec<CloudType>),
    Maintenance(AutomatedMaintenanceIndicator),
}

/// `None` when the tokens do not look like the group at all.
type Decoded = Option<Result<(RemarkGroup, usize)>>;

const DECODERS: [fn(&[&str]) -> Decoded; 15] = [
    decode_station_type,
    decode_peak_wind,
    decode_wind_shift,
    decode_tower_surface_visibility,
    decode_variable_visibility,
    decode_ceiling,
    decode_sea_level_pressure,
    decode_precise_temperature,
    decode_numeric_group,
    decode_hail,
    decode_maintenance,
    decode_thunderstorm_location,
    decode_obscuration,
    decode_cloud_types,
    decode_weather_events,
];

/// Decodes the NOAA remarks section (everything after "RMK").
#[derive(Debug, Clone, Copy, Default)]
pub struct RemarksParser {
    strict: bool,
}

impl RemarksParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Decode remark groups left to right. Unrecognized text is kept as free text;
    /// groups that are recognized but invalid are an error only in strict mode.
    pub fn parse(&self, text: &str) -> Result<NoaaMetarRemarks> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let mut builder = NoaaMetarRemarks::builder();
        let mut free_text: Vec<&str> = Vec::new();
        let mut idx = 0;

        while idx < tokens.len() {
            let rest = &tokens[idx..];
            match DECODERS.iter().find_map(|decode| decode(rest)) {
                Some(Ok((group, used))) => {
                    builder = apply(builder, group);
                    idx += used.max(1);
                }
                Some(Err(error)) => {
                    if self.strict {
                        return Err(error);
                    }
                    debug!(group = rest[0], %error, "Keeping invalid remark group as free text");
                    free_text.push(rest[0]);
                    idx += 1;
                }
                None => {
                    free_text.push(rest[0]);
                    idx += 1;
                }
            }
        }

        if !free_text.is_empty() {
            builder = builder.free_text(free_text.join(" "));
        }
        Ok(builder.build())
    }
}

fn apply(builder: NoaaMetarRemarksBuilder, group: RemarkGroup) -> NoaaMetarRemarksBuilder {
    match group {
        RemarkGroup::StationType(station_type) => builder.station_type(station_type),
        RemarkGroup::SeaLevelPressure(pressure) => builder.sea_level_pressure(pressure),
        RemarkGroup::PreciseTemperature(temperature, dewpoint) => {
            let builder = builder.precise_temperature(temperature);
            match dewpoint {
                Some(dewpoint) => builder.precise_dewpoint(dewpoint),
                None => builder,
            }
        }
        RemarkGroup::PeakWind(peak) => builder.peak_wind(peak),
        RemarkGroup::WindShift(shift) => builder.wind_shift(shift),
        RemarkGroup::VariableVisibility(visibility) => builder.variable_visibility(visibility),
        RemarkGroup::TowerVisibility(visibility) => builder.tower_visibility(visibility),
        RemarkGroup::SurfaceVisibility(visibility) => builder.surface_visibility(visibility),
        RemarkGroup::Precipitation(amount) => match amount.period_hours() {
            1 => builder.hourly_precipitation(amount),
            24 => builder.twenty_four_hour_precipitation(amount),
            _ => builder.six_hour_precipitation(amount),
        },
        RemarkGroup::Hail(hail) => builder.hail_size(hail),
        RemarkGroup::PressureTendency(tendency) => builder.pressure_tendency(tendency),
        RemarkGroup::SixHourMaximum(temperature) => builder.six_hour_max_temperature(temperature),
        RemarkGroup::SixHourMinimum(temperature) => builder.six_hour_min_temperature(temperature),
        RemarkGroup::TwentyFourHourExtremes(max, min) => builder
            .twenty_four_hour_max_temperature(max)
            .twenty_four_hour_min_temperature(min),
        RemarkGroup::VariableCeiling(ceiling) => builder.variable_ceiling(ceiling),
        RemarkGroup::CeilingSecondSite(ceiling) => builder.ceiling_second_site(ceiling),
        RemarkGroup::WeatherEvents(events) => events
            .into_iter()
            .fold(builder, |builder, event| builder.weather_event(event)),
        RemarkGroup::Thunderstorm(location) => builder.thunderstorm_location(location),
        RemarkGroup::Obscuration(layer) => builder.obscuration_layer(layer),
        RemarkGroup::CloudTypes(clouds) => clouds
            .into_iter()
            .fold(builder, |builder, cloud| builder.cloud_type(cloud)),
        RemarkGroup::Maintenance(indicator) => builder.maintenance_indicator(indicator),
    }
}

fn all_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

fn is_fraction(value: &str) -> bool {
    value
        .split_once('/')
        .map_or(false, |(num, den)| all_digits(num) && all_digits(den))
}

fn is_compass(value: &str) -> bool {
    (1..=2).contains(&value.len()) && value.bytes().all(|b| b"NSEW".contains(&b))
}

/// Read a statute-mile distance ("2", "1/2" or "1 1/2") from the head of `tokens`.
fn take_distance(tokens: &[&str]) -> Option<(f64, usize)> {
    let first = *tokens.first()?;
    if let Some(second) = tokens.get(1) {
        if all_digits(first) && is_fraction(second) {
            return Some((parse_fractional(&format!("{} {}", first, second))?, 2));
        }
    }
    if all_digits(first) || is_fraction(first) {
        return Some((parse_fractional(first)?, 1));
    }
    None
}

/// "0233" -> 23.3, "1012" -> -1.2
fn signed_tenths(group: &str) -> Option<f64> {
    if group.len() != 4 || !all_digits(group) {
        return None;
    }
    let value = f64::from(parse_digits::<u32>(&group[1..])?) / 10.0;
    match &group[..1] {
        "0" => Some(value),
        "1" => Some(-value),
        _ => None,
    }
}

/// "1530" -> (Some(15), 30), "30" -> (None, 30)
fn hour_minute(group: &str) -> Option<(Option<i32>, i32)> {
    if !all_digits(group) {
        return None;
    }
    match group.len() {
        2 => Some((None, group.parse().ok()?)),
        4 => Some((Some(group[..2].parse().ok()?), group[2..].parse().ok()?)),
        _ => None,
    }
}

fn decode_station_type(tokens: &[&str]) -> Decoded {
    match tokens[0] {
        "AO1" | "AO2" | "A01" | "A02" => {
            Some(AutomatedStationType::from_code(tokens[0]).map(|t| (RemarkGroup::StationType(t), 1)))
        }
        _ => None,
    }
}

fn decode_peak_wind(tokens: &[&str]) -> Decoded {
    if tokens[0] != "PK" || tokens.get(1) != Some(&"WND") {
        return None;
    }
    let (wind, time) = tokens.get(2)?.split_once('/')?;
    if !(5..=6).contains(&wind.len()) || !all_digits(wind) {
        return None;
    }
    let direction = wind[..3].parse().ok()?;
    let speed = wind[3..].parse().ok()?;
    let (hour, minute) = hour_minute(time)?;
    Some(
        PeakWind::new(Some(direction), Some(speed), hour, Some(minute))
            .map(|peak| (RemarkGroup::PeakWind(peak), 3)),
    )
}

fn decode_wind_shift(tokens: &[&str]) -> Decoded {
    if tokens[0] != "WSHFT" {
        return None;
    }
    let (hour, minute) = hour_minute(tokens.get(1)?)?;
    let frontal_passage = tokens.get(2) == Some(&"FROPA");
    let used = if frontal_passage { 3 } else { 2 };
    Some(
        WindShift::new(hour, Some(minute), frontal_passage)
            .map(|shift| (RemarkGroup::WindShift(shift), used)),
    )
}

fn decode_tower_surface_visibility(tokens: &[&str]) -> Decoded {
    let kind = tokens[0];
    if !matches!(kind, "TWR" | "SFC") || tokens.get(1) != Some(&"VIS") {
        return None;
    }
    let (miles, used) = take_distance(&tokens[2..])?;
    Some(Visibility::statute_miles(miles).map(|visibility| {
        let group = if kind == "TWR" {
            RemarkGroup::TowerVisibility(visibility)
        } else {
            RemarkGroup::SurfaceVisibility(visibility)
        };
        (group, 2 + used)
    }))
}

fn decode_variable_visibility(tokens: &[&str]) -> Decoded {
    if tokens[0] != "VIS" {
        return None;
    }
    let mut idx = 1;
    let mut direction = tokens
        .get(idx)
        .copied()
        .filter(|t| OCTANT_DIRECTIONS.contains(t));
    if direction.is_some() {
        idx += 1;
    }

    let mut minimum = String::new();
    if let (Some(whole), Some(range)) = (tokens.get(idx), tokens.get(idx + 1)) {
        if all_digits(whole) && range.contains('V') {
            minimum.push_str(whole);
            minimum.push(' ');
            idx += 1;
        }
    }
    let (min_part, max_part) = tokens.get(idx)?.split_once('V')?;
    idx += 1;
    minimum.push_str(min_part);

    let mut maximum = max_part.to_string();
    if let Some(fraction) = tokens.get(idx).filter(|t| all_digits(max_part) && is_fraction(t)) {
        maximum.push(' ');
        maximum.push_str(fraction);
        idx += 1;
    }

    if direction.is_none() {
        direction = tokens.get(idx).copied().filter(|t| OCTANT_DIRECTIONS.contains(t));
        if direction.is_some() {
            idx += 1;
        }
    }
    let location = tokens.get(idx).copied().filter(|t| t.starts_with("RWY"));
    if location.is_some() {
        idx += 1;
    }

    let min_miles = parse_fractional(&minimum)?;
    let max_miles = parse_fractional(&maximum)?;
    let decoded = Visibility::statute_miles(min_miles)
        .and_then(|min| Ok((min, Visibility::statute_miles(max_miles)?)))
        .and_then(|(min, max)| VariableVisibility::new(min, max, direction, location))
        .map(|visibility| (RemarkGroup::VariableVisibility(visibility), idx));
    Some(decoded)
}

fn decode_ceiling(tokens: &[&str]) -> Decoded {
    if tokens[0] != "CIG" {
        return None;
    }
    let group = *tokens.get(1)?;
    if let Some((low, high)) = group.split_once('V') {
        let low = parse_digits::<i32>(low)?;
        let high = parse_digits::<i32>(high)?;
        return Some(
            VariableCeiling::from_hundreds(low, high)
                .map(|ceiling| (RemarkGroup::VariableCeiling(ceiling), 2)),
        );
    }
    let hundreds = parse_digits::<i32>(group)?;
    let location = tokens.get(2).filter(|t| t.starts_with("RWY"))?;
    Some(
        CeilingSecondSite::from_hundreds(hundreds, location)
            .map(|ceiling| (RemarkGroup::CeilingSecondSite(ceiling), 3)),
    )
}

fn decode_sea_level_pressure(tokens: &[&str]) -> Decoded {
    let digits = tokens[0].strip_prefix("SLP")?;
    if digits.len() != 3 {
        return None;
    }
    let tenths = f64::from(parse_digits::<u32>(digits)?) / 10.0;
    let hpa = if tenths >= 50.0 { 900.0 + tenths } else { 1000.0 + tenths };
    Some(Pressure::hectopascals(hpa).map(|p| (RemarkGroup::SeaLevelPressure(p), 1)))
}

fn decode_precise_temperature(tokens: &[&str]) -> Decoded {
    let body = tokens[0].strip_prefix('T')?;
    if !all_digits(body) || (body.len() != 4 && body.len() != 8) {
        return None;
    }
    let temperature = signed_tenths(&body[..4])?;
    let dewpoint = match body.get(4..) {
        Some(d) if !d.is_empty() => Some(signed_tenths(d)?),
        _ => None,
    };
    let decoded = Temperature::of(temperature).and_then(|t| {
        let d = dewpoint.map(Temperature::of).transpose()?;
        Ok((RemarkGroup::PreciseTemperature(t, d), 1))
    });
    Some(decoded)
}

/// Five-digit groups keyed by their first character: P, 1, 2, 4, 5, 6 and 7.
fn decode_numeric_group(tokens: &[&str]) -> Decoded {
    let token = tokens[0];
    if !token.is_ascii() || token.len() < 5 {
        return None;
    }
    let (kind, body) = token.split_at(1);
    let missing = body.chars().all(|c| c == '/');

    match (kind, body.len()) {
        ("P", 4) if all_digits(body) || missing => Some(
            PrecipitationAmount::from_encoded(body, 1).map(|a| (RemarkGroup::Precipitation(a), 1)),
        ),
        ("6", 4) if all_digits(body) || missing => Some(
            PrecipitationAmount::from_encoded(body, 6).map(|a| (RemarkGroup::Precipitation(a), 1)),
        ),
        ("7", 4) if all_digits(body) || missing => Some(
            PrecipitationAmount::from_encoded(body, 24).map(|a| (RemarkGroup::Precipitation(a), 1)),
        ),
        ("1", 4) => {
            let celsius = signed_tenths(body)?;
            Some(Temperature::of(celsius).map(|t| (RemarkGroup::SixHourMaximum(t), 1)))
        }
        ("2", 4) => {
            let celsius = signed_tenths(body)?;
            Some(Temperature::of(celsius).map(|t| (RemarkGroup::SixHourMinimum(t), 1)))
        }
        ("4", 8) => {
            let max = signed_tenths(&body[..4])?;
            let min = signed_tenths(&body[4..])?;
            Some(Temperature::of(max).and_then(|max| {
                Ok((RemarkGroup::TwentyFourHourExtremes(max, Temperature::of(min)?), 1))
            }))
        }
        ("5", 4) if all_digits(body) => {
            let code = parse_digits::<u8>(&body[..1])?;
            if code > 8 {
                return None;
            }
            Some(
                PressureTendency::from_metar(code, &body[1..])
                    .map(|t| (RemarkGroup::PressureTendency(t), 1)),
            )
        }
        _ => None,
    }
}

fn decode_hail(tokens: &[&str]) -> Decoded {
    if tokens[0] != "GR" {
        return None;
    }
    let (inches, used) = take_distance(&tokens[1..])?;
    Some(HailSize::new(inches).map(|hail| (RemarkGroup::Hail(hail), 1 + used)))
}

fn decode_maintenance(tokens: &[&str]) -> Decoded {
    let code = tokens[0];
    if !AutomatedMaintenanceIndicator::is_known_code(code) {
        return None;
    }
    let location = tokens.get(1).copied().filter(|loc| {
        MAINTENANCE_WITH_LOCATION.contains(&code)
            && loc.starts_with(|c: char| c.is_ascii_alphabetic())
            && loc.ends_with(|c: char| c.is_ascii_digit())
    });
    let used = if location.is_some() { 2 } else { 1 };
    Some(
        AutomatedMaintenanceIndicator::new(code, location)
            .map(|indicator| (RemarkGroup::Maintenance(indicator), used)),
    )
}

fn decode_thunderstorm_location(tokens: &[&str]) -> Decoded {
    let cloud = tokens[0];
    if !CONVECTIVE_CLOUDS.contains(&cloud) {
        return None;
    }
    let mut idx = 1;
    let qualifier = tokens
        .get(idx)
        .copied()
        .filter(|t| LOCATION_QUALIFIERS.contains(t));
    if qualifier.is_some() {
        idx += 1;
    }

    let (mut direction, mut direction_range) = (None, None);
    if let Some(group) = tokens.get(idx) {
        let (first, second) = match group.split_once('-') {
            Some((a, b)) => (a, Some(b)),
            None => (*group, None),
        };
        if is_compass(first) && second.map_or(true, is_compass) {
            direction = Some(first);
            direction_range = second;
            idx += 1;
        }
    }

    let mut moving = None;
    if tokens.get(idx) == Some(&"MOV") {
        if let Some(dir) = tokens.get(idx + 1).filter(|d| is_compass(d)) {
            moving = Some(*dir);
            idx += 2;
        }
    }

    let location = ThunderstormLocation::new(cloud, qualifier, direction, direction_range, moving);
    Some(Ok((RemarkGroup::Thunderstorm(location), idx)))
}

fn decode_obscuration(tokens: &[&str]) -> Decoded {
    let phenomenon = tokens[0];
    if !OBSCURING_PHENOMENA.contains(&phenomenon) {
        return None;
    }
    let layer = *tokens.get(1)?;
    if layer.len() != 6 || !layer.is_ascii() {
        return None;
    }
    let (coverage, height) = layer.split_at(3);
    if !LAYER_COVERAGES.contains(&coverage) {
        return None;
    }
    let hundreds = parse_digits::<i32>(height)?;
    Some(
        ObscurationLayer::from_hundreds(coverage, phenomenon, hundreds)
            .map(|layer| (RemarkGroup::Obscuration(layer), 2)),
    )
}

/// Split "AC8SC1" into [("AC", Some(8)), ("SC", Some(1))].
fn split_cloud_sequence(group: &str) -> Option<Vec<(&str, Option<u8>)>> {
    let mut clouds = Vec::new();
    let mut rest = group;
    while !rest.is_empty() {
        let code = [3, 2]
            .iter()
            .filter_map(|len| rest.get(..*len))
            .find(|code| CloudType::is_known_code(code))?;
        rest = &rest[code.len()..];
        let oktas = rest
            .get(..1)
            .and_then(|d| parse_digits::<u8>(d))
            .filter(|d| (1..=8).contains(d));
        if oktas.is_some() {
            rest = &rest[1..];
        }
        clouds.push((code, oktas));
    }
    if clouds.is_empty() {
        None
    } else {
        Some(clouds)
    }
}

fn decode_cloud_types(tokens: &[&str]) -> Decoded {
    let mut idx = 0;
    let intensity = (tokens[0] == "MDT").then_some("MDT");
    if intensity.is_some() {
        idx += 1;
    }
    let clouds = split_cloud_sequence(tokens.get(idx)?)?;
    idx += 1;

    let location = tokens
        .get(idx)
        .copied()
        .filter(|t| CLOUD_LOCATIONS.contains(t));
    if location.is_some() {
        idx += 1;
    }
    let mut movement = None;
    if matches!(tokens.get(idx), Some(&"MOV") | Some(&"MOVG")) {
        if let Some(dir) = tokens.get(idx + 1).filter(|d| is_compass(d)) {
            movement = Some(*dir);
            idx += 2;
        }
    }

    let qualified = intensity.is_some()
        || location.is_some()
        || movement.is_some()
        || clouds.iter().any(|(_, oktas)| oktas.is_some());
    if !qualified {
        return None;
    }

    let decoded = clouds
        .into_iter()
        .map(|(code, oktas)| CloudType::new(code, oktas, intensity, location, movement))
        .collect::<Result<Vec<_>>>()
        .map(|clouds| (RemarkGroup::CloudTypes(clouds), idx));
    Some(decoded)
}

/// Begin/end times such as "RAB05E30", "-SNB1159" or "TSB0159E30SHRAB25".
fn decode_weather_events(tokens: &[&str]) -> Decoded {
    let token = tokens[0];
    if !token.is_ascii() {
        return None;
    }
    let bytes = token.as_bytes();
    let has_time = bytes
        .windows(2)
        .any(|w| (w[0] == b'B' || w[0] == b'E') && w[1].is_ascii_digit());
    if !has_time {
        return None;
    }

    let mut events = Vec::new();
    let mut rest = token;
    while !rest.is_empty() {
        let intensity = match rest.get(..1) {
            Some(sign @ ("-" | "+")) => Some(sign),
            _ => None,
        };
        if intensity.is_some() {
            rest = &rest[1..];
        }

        let split = rest.char_indices().find_map(|(i, c)| {
            let next_is_digit = rest[i + 1..].starts_with(|d: char| d.is_ascii_digit());
            ((c == 'B' || c == 'E') && next_is_digit).then_some(i)
        })?;
        let code = &rest[..split];
        if code.is_empty() || !code.bytes().all(|b| b.is_ascii_uppercase()) {
            return None;
        }
        rest = &rest[split..];

        let mut begin: Option<(Option<i32>, i32)> = None;
        let mut end: Option<(Option<i32>, i32)> = None;
        while let Some(marker) = rest.chars().next().filter(|c| *c == 'B' || *c == 'E') {
            let digits = rest[1..]
                .find(|c: char| !c.is_ascii_digit())
                .map_or(&rest[1..], |n| &rest[1..1 + n]);
            let time = hour_minute(digits)?;
            if (marker == 'B' && (begin.is_some() || end.is_some()))
                || (marker == 'E' && end.is_some())
            {
                events.push(weather_event(code, intensity, begin.take(), end.take()));
            }
            if marker == 'B' {
                begin = Some(time);
            } else {
                end = Some(time);
            }
            rest = &rest[1 + digits.len()..];
        }
        events.push(weather_event(code, intensity, begin, end));
    }

    let decoded = events
        .into_iter()
        .collect::<Result<Vec<_>>>()
        .map(|events| (RemarkGroup::WeatherEvents(events), 1));
    Some(decoded)
}

fn weather_event(
    code: &str,
    intensity: Option<&str>,
    begin: Option<(Option<i32>, i32)>,
    end: Option<(Option<i32>, i32)>,
) -> Result<WeatherEvent> {
    let to_u32 = |v: i32| {
        u32::try_from(v)
            .map_err(|_| ProcessingError::remark(format!("Invalid weather event time: {}", v)))
    };
    let split = |time: Option<(Option<i32>, i32)>| -> Result<(Option<u32>, Option<u32>)> {
        match time {
            Some((hour, minute)) => Ok((hour.map(to_u32).transpose()?, Some(to_u32(minute)?))),
            None => Ok((None, None)),
        }
    };
    let (begin_hour, begin_minute) = split(begin)?;
    let (end_hour, end_minute) = split(end)?;
    WeatherEvent::new(code, intensity, begin_hour, begin_minute, end_hour, end_minute)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> NoaaMetarRemarks {
        RemarksParser::new().parse(text).unwrap()
    }

    #[test]
    fn test_standard_remarks() {
        let remarks = parse("AO2 SLP210 T02330139 56012");
        assert_eq!(remarks.station_type(), Some(AutomatedStationType::Ao2));
        let slp = remarks.sea_level_pressure().unwrap();
        assert!((slp.value() - 1021.0).abs() < 1e-9);
        assert!((remarks.precise_temperature().unwrap().celsius() - 23.3).abs() < 1e-9);
        assert!((remarks.precise_dewpoint().unwrap().celsius() - 13.9).abs() < 1e-9);
        let tendency = remarks.pressure_tendency().unwrap();
        assert_eq!(tendency.tendency_code(), 6);
        assert!(tendency.is_decreasing());
        assert!(remarks.free_text().is_none());
    }

    #[test]
    fn test_low_sea_level_pressure() {
        let remarks = parse("SLP982");
        assert!((remarks.sea_level_pressure().unwrap().value() - 998.2).abs() < 1e-9);
    }

    #[test]
    fn test_peak_wind_and_shift() {
        let remarks = parse("PK WND 28045/1530 WSHFT 1515 FROPA");
        let peak = remarks.peak_wind().unwrap();
        assert_eq!(peak.direction_degrees(), Some(280));
        assert_eq!(peak.speed_knots(), Some(45));
        assert_eq!(peak.hour(), Some(15));
        assert!(remarks.has_frontal_passage());
    }

    #[test]
    fn test_visibility_remarks() {
        let remarks = parse("VIS 1 1/2V2 TWR VIS 3 SFC VIS 1/2");
        let variable = remarks.variable_visibility().unwrap();
        assert_eq!(variable.minimum().distance_value(), Some(1.5));
        assert_eq!(variable.maximum().distance_value(), Some(2.0));
        assert_eq!(remarks.tower_visibility().unwrap().distance_value(), Some(3.0));
        assert_eq!(remarks.surface_visibility().unwrap().distance_value(), Some(0.5));
    }

    #[test]
    fn test_precipitation_and_temperature_groups() {
        let remarks = parse("P0015 60123 7//// 10142 21001 401001015");
        assert_eq!(remarks.hourly_precipitation().unwrap().amount_inches(), Some(0.15));
        assert_eq!(remarks.six_hour_precipitation().unwrap().amount_inches(), Some(1.23));
        assert!(remarks.twenty_four_hour_precipitation().unwrap().is_trace());
        assert!((remarks.six_hour_max_temperature().unwrap().celsius() - 14.2).abs() < 1e-9);
        assert!((remarks.six_hour_min_temperature().unwrap().celsius() + 0.1).abs() < 1e-9);
        assert!((remarks.twenty_four_hour_max_temperature().unwrap().celsius() - 10.0).abs() < 1e-9);
        assert!((remarks.twenty_four_hour_min_temperature().unwrap().celsius() + 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_ceilings_and_hail() {
        let remarks = parse("CIG 005V010 GR 1 3/4");
        assert_eq!(remarks.variable_ceiling().unwrap().range_feet(), 500);
        assert!((remarks.hail_size().unwrap().inches() - 1.75).abs() < 1e-9);

        let remarks = parse("CIG 002 RWY11");
        assert_eq!(remarks.ceiling_second_site().unwrap().height_feet(), 200);
    }

    #[test]
    fn test_weather_events() {
        let remarks = parse("RAB05E30SNB30 -TSB1159");
        assert_eq!(remarks.weather_events().len(), 3);
        assert_eq!(remarks.weather_events()[0].weather_code(), "RA");
        assert_eq!(remarks.weather_events()[1].weather_code(), "SN");
        assert_eq!(remarks.weather_events()[2].intensity(), Some("-"));
    }

    #[test]
    fn test_locations_layers_and_clouds() {
        let remarks = parse("TS SE MOV NE CB DSNT W-NW FG FEW000 MDT CU OHD AC8SC1");
        assert_eq!(remarks.thunderstorm_locations().len(), 2);
        assert_eq!(remarks.thunderstorm_locations()[0].summary(), "Thunderstorm SE Moving NE");
        assert_eq!(remarks.obscuration_layers().len(), 1);
        assert!(remarks.obscuration_layers()[0].is_ground_level());
        assert_eq!(remarks.cloud_types().len(), 3);
        assert!(remarks.cloud_types()[0].is_overhead());
        assert_eq!(remarks.cloud_types()[1].oktas(), Some(8));
    }

    #[test]
    fn test_maintenance_and_free_text() {
        let remarks = parse("RVRNO VISNO RWY06 LAST STFD OBS $");
        assert_eq!(remarks.maintenance_indicators().len(), 3);
        assert!(remarks.maintenance_required());
        assert_eq!(remarks.free_text(), Some("LAST STFD OBS"));
    }

    #[test]
    fn test_invalid_group_strictness() {
        let lenient = RemarksParser::new().parse("GR 12").unwrap();
        assert!(lenient.hail_size().is_none());
        assert_eq!(lenient.free_text(), Some("GR 12"));

        assert!(RemarksParser::new().with_strict(true).parse("GR 12").is_err());
    }
}
