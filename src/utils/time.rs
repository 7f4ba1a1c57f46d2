use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, TimeZone, Utc};

use crate::error::{ProcessingError, Result};

/// Resolve a day-of-month/hour/minute triple, as found in "ddhhmmZ" and "ddhh" groups,
/// to the instant closest to `reference`, looking at the reference month and its two
/// neighbours. Hour 24 means midnight at the end of the day.
pub fn resolve_day_time(
    reference: DateTime<Utc>,
    day: u32,
    hour: u32,
    minute: u32,
) -> Result<DateTime<Utc>> {
    if !(1..=31).contains(&day) || hour > 24 || minute > 59 || (hour == 24 && minute != 0) {
        return Err(ProcessingError::InvalidFormat(format!(
            "Invalid day/time: day {} hour {} minute {}",
            day, hour, minute
        )));
    }

    let this_month = month_start(reference);
    let candidates = [
        this_month.checked_sub_months(Months::new(1)),
        Some(this_month),
        this_month.checked_add_months(Months::new(1)),
    ];

    let reference_date = reference.date_naive();
    let date = candidates
        .iter()
        .flatten()
        .filter_map(|month| month.with_day(day))
        .min_by_key(|date| (*date - reference_date).num_days().abs())
        .ok_or_else(|| {
            ProcessingError::InvalidFormat(format!(
                "Day {} cannot be resolved near {}",
                day,
                reference.format("%Y-%m-%d")
            ))
        })?;

    let (hour, extra_days) = if hour == 24 { (0, 1) } else { (hour, 0) };
    let naive = date
        .and_hms_opt(hour, minute, 0)
        .ok_or_else(|| ProcessingError::InvalidFormat(format!("Invalid time {:02}:{:02}", hour, minute)))?;

    Ok(Utc.from_utc_datetime(&naive) + Duration::days(extra_days))
}

/// Parse a "ddhh" group into (day, hour).
pub fn parse_day_hour(group: &str) -> Option<(u32, u32)> {
    if group.len() != 4 || !group.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((group[0..2].parse().ok()?, group[2..4].parse().ok()?))
}

/// Parse a "ddhhmm" group into (day, hour, minute).
pub fn parse_day_hour_minute(group: &str) -> Option<(u32, u32, u32)> {
    if group.len() != 6 || !group.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((
        group[0..2].parse().ok()?,
        group[2..4].parse().ok()?,
        group[4..6].parse().ok()?,
    ))
}

fn month_start(reference: DateTime<Utc>) -> NaiveDate {
    reference.date_naive().with_day(1).unwrap_or_else(|| reference.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_same_month() {
        let reference = at(2024, 3, 15, 12);
        assert_eq!(resolve_day_time(reference, 15, 11, 53).unwrap(), Utc.with_ymd_and_hms(2024, 3, 15, 11, 53, 0).unwrap());
        assert_eq!(resolve_day_time(reference, 16, 6, 0).unwrap(), at(2024, 3, 16, 6));
    }

    #[test]
    fn test_hour_24_rolls_over() {
        let reference = at(2024, 3, 15, 12);
        assert_eq!(resolve_day_time(reference, 15, 24, 0).unwrap(), at(2024, 3, 16, 0));
        assert!(resolve_day_time(reference, 15, 24, 30).is_err());
    }

    #[test]
    fn test_month_boundaries() {
        let reference = at(2024, 1, 31, 18);
        assert_eq!(resolve_day_time(reference, 1, 6, 0).unwrap(), at(2024, 2, 1, 6));

        let reference = at(2024, 3, 1, 2);
        assert_eq!(resolve_day_time(reference, 29, 23, 0).unwrap(), at(2024, 2, 29, 23));
    }

    #[test]
    fn test_invalid_values() {
        let reference = at(2024, 3, 15, 12);
        assert!(resolve_day_time(reference, 0, 12, 0).is_err());
        assert!(resolve_day_time(reference, 32, 12, 0).is_err());
        assert!(resolve_day_time(reference, 15, 25, 0).is_err());
        assert!(resolve_day_time(reference, 15, 12, 60).is_err());
    }

    #[test]
    fn test_group_parsing() {
        assert_eq!(parse_day_hour("1512"), Some((15, 12)));
        assert_eq!(parse_day_hour("151"), None);
        assert_eq!(parse_day_hour_minute("151153"), Some((15, 11, 53)));
        assert_eq!(parse_day_hour_minute("15115A"), None);
    }
}
