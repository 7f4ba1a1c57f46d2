use crate::utils::constants::CARDINAL_POINTS;

/// Map a bearing in degrees onto the 16-point compass rose.
pub fn cardinal_direction(degrees: u16) -> &'static str {
    let index = ((f64::from(degrees) / 22.5).round() as usize) % CARDINAL_POINTS.len();
    CARDINAL_POINTS[index]
}

/// Parse a METAR distance such as "3", "1/2" or "1 1/2" into a decimal value.
pub fn parse_fractional(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let mut total = 0.0;
    for part in value.split_whitespace() {
        total += match part.split_once('/') {
            Some((num, den)) => {
                let num = f64::from(parse_digits::<u32>(num)?);
                let den = f64::from(parse_digits::<u32>(den)?);
                if den == 0.0 {
                    return None;
                }
                num / den
            }
            None => f64::from(parse_digits::<u32>(part)?),
        };
    }

    Some(total)
}

/// Render a statute-mile distance the way METAR writes it ("1/2", "1 1/4", "10").
pub fn format_fractional(value: f64) -> String {
    let whole = value.trunc();
    let remainder = value - whole;

    let fraction = [
        (1.0 / 16.0, "1/16"),
        (1.0 / 8.0, "1/8"),
        (3.0 / 16.0, "3/16"),
        (1.0 / 4.0, "1/4"),
        (5.0 / 16.0, "5/16"),
        (3.0 / 8.0, "3/8"),
        (1.0 / 2.0, "1/2"),
        (5.0 / 8.0, "5/8"),
        (3.0 / 4.0, "3/4"),
        (7.0 / 8.0, "7/8"),
    ]
    .iter()
    .find(|(v, _)| (remainder - v).abs() < 0.001)
    .map(|(_, s)| *s);

    match fraction {
        Some(f) if whole == 0.0 => f.to_string(),
        Some(f) => format!("{} {}", whole as i64, f),
        None if remainder.abs() < 0.001 => format!("{}", whole as i64),
        None => format!("{:.2}", value),
    }
}

/// Parse a numeric group field, rejecting anything that is not all ASCII digits.
pub fn parse_digits<T: std::str::FromStr>(value: &str) -> Option<T> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinal_direction() {
        assert_eq!(cardinal_direction(0), "N");
        assert_eq!(cardinal_direction(90), "E");
        assert_eq!(cardinal_direction(280), "W");
        assert_eq!(cardinal_direction(350), "N");
        assert_eq!(cardinal_direction(360), "N");
        assert_eq!(cardinal_direction(225), "SW");
    }

    #[test]
    fn test_parse_fractional() {
        assert_eq!(parse_fractional("10"), Some(10.0));
        assert_eq!(parse_fractional("1/2"), Some(0.5));
        assert_eq!(parse_fractional("1 1/2"), Some(1.5));
        assert_eq!(parse_fractional("1/0"), None);
        assert_eq!(parse_fractional("abc"), None);
    }

    #[test]
    fn test_parse_fractional_rejects_float_syntax() {
        assert_eq!(parse_fractional("NAN"), None);
        assert_eq!(parse_fractional("inf"), None);
        assert_eq!(parse_fractional("1e3"), None);
        assert_eq!(parse_fractional("1.5"), None);
        assert_eq!(parse_fractional("1/-2"), None);
    }

    #[test]
    fn test_format_fractional() {
        assert_eq!(format_fractional(0.5), "1/2");
        assert_eq!(format_fractional(1.25), "1 1/4");
        assert_eq!(format_fractional(10.0), "10");
        assert_eq!(format_fractional(2.33), "2.33");
    }

    #[test]
    fn test_parse_digits() {
        assert_eq!(parse_digits::<u32>("015"), Some(15));
        assert_eq!(parse_digits::<u32>("-15"), None);
        assert_eq!(parse_digits::<u32>(""), None);
    }
}
