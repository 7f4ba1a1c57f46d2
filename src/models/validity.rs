use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{MAX_VALIDITY_HOURS, MIN_VALIDITY_HOURS};
use crate::utils::time::{parse_day_hour, resolve_day_time};

/// Time window a TAF is valid for, e.g. "1512/1618".
///
/// Containment is half-open (`[from, to)`), while `overlaps` treats periods that only
/// share an endpoint as overlapping so back-to-back TAFs chain together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityPeriod {
    valid_from: DateTime<Utc>,
    valid_to: DateTime<Utc>,
}

impl ValidityPeriod {
    pub fn new(valid_from: DateTime<Utc>, valid_to: DateTime<Utc>) -> Result<Self> {
        if valid_from >= valid_to {
            return Err(ProcessingError::validity(format!(
                "Validity start time ({}) must be before end time ({})",
                valid_from.to_rfc3339(),
                valid_to.to_rfc3339()
            )));
        }

        let hours = (valid_to - valid_from).num_hours();
        if hours < MIN_VALIDITY_HOURS {
            return Err(ProcessingError::validity(format!(
                "Validity period too short ({} hours). Minimum is {} hour(s)",
                hours, MIN_VALIDITY_HOURS
            )));
        }
        if hours > MAX_VALIDITY_HOURS {
            return Err(ProcessingError::validity(format!(
                "Validity period too long ({} hours). Maximum is {} hours",
                hours, MAX_VALIDITY_HOURS
            )));
        }

        Ok(Self {
            valid_from,
            valid_to,
        })
    }

    pub fn from_duration(valid_from: DateTime<Utc>, duration: Duration) -> Result<Self> {
        Self::new(valid_from, valid_from + duration)
    }

    pub fn standard_24_hour(valid_from: DateTime<Utc>) -> Result<Self> {
        Self::from_duration(valid_from, Duration::hours(24))
    }

    pub fn thirty_hour(valid_from: DateTime<Utc>) -> Result<Self> {
        Self::from_duration(valid_from, Duration::hours(30))
    }

    /// Decode a "ddhh/ddhh" group, resolving days against `reference` (usually the issue time).
    pub fn from_taf(group: &str, reference: DateTime<Utc>) -> Result<Self> {
        let invalid = || ProcessingError::InvalidFormat(format!("Invalid validity period: {}", group));
        let (from, to) = group.split_once('/').ok_or_else(invalid)?;
        let (from_day, from_hour) = parse_day_hour(from).ok_or_else(invalid)?;
        let (to_day, to_hour) = parse_day_hour(to).ok_or_else(invalid)?;

        let valid_from = resolve_day_time(reference, from_day, from_hour, 0)?;
        let valid_to = resolve_day_time(valid_from, to_day, to_hour, 0)?;
        Self::new(valid_from, valid_to)
    }

    pub fn valid_from(&self) -> DateTime<Utc> {
        self.valid_from
    }

    pub fn valid_to(&self) -> DateTime<Utc> {
        self.valid_to
    }

    pub fn duration(&self) -> Duration {
        self.valid_to - self.valid_from
    }

    pub fn duration_hours(&self) -> i64 {
        self.duration().num_hours()
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.valid_from && instant < self.valid_to
    }

    pub fn overlaps(&self, other: &ValidityPeriod) -> bool {
        self.valid_to >= other.valid_from && other.valid_to >= self.valid_from
    }

    pub fn has_expired_at(&self, instant: DateTime<Utc>) -> bool {
        instant > self.valid_to
    }

    pub fn is_future_at(&self, instant: DateTime<Utc>) -> bool {
        instant < self.valid_from
    }

    pub fn is_currently_valid(&self) -> bool {
        self.contains(Utc::now())
    }

    pub fn is_standard_24_hour(&self) -> bool {
        self.duration_hours() == 24
    }

    pub fn is_30_hour(&self) -> bool {
        self.duration_hours() == 30
    }

    pub fn to_taf_format(&self) -> String {
        format!(
            "{}/{}",
            self.valid_from.format("%d%H"),
            self.valid_to.format("%d%H")
        )
    }

    pub fn full_format(&self) -> String {
        format!(
            "{} to {}",
            self.valid_from.format("%Y-%m-%d %H:%MZ"),
            self.valid_to.format("%Y-%m-%d %H:%MZ")
        )
    }

    /// Summary with the status evaluated at `instant`.
    pub fn summary_at(&self, instant: DateTime<Utc>) -> String {
        let status = if self.contains(instant) {
            "Currently active"
        } else if self.has_expired_at(instant) {
            "Expired"
        } else {
            "Future"
        };
        format!(
            "Valid {} ({} hours) - {}",
            self.to_taf_format(),
            self.duration_hours(),
            status
        )
    }

    pub fn summary(&self) -> String {
        self.summary_at(Utc::now())
    }
}

impl fmt::Display for ValidityPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} hours)", self.to_taf_format(), self.duration_hours())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_half_open_contains() {
        let start = at(15, 12);
        let period = ValidityPeriod::new(start, start + Duration::hours(24)).unwrap();
        assert!(period.contains(start));
        assert!(!period.contains(start + Duration::hours(24)));
        assert!(period.contains(start + Duration::hours(23)));
        assert!(!period.contains(start - Duration::seconds(1)));
        assert!(period.is_standard_24_hour());
    }

    #[test]
    fn test_inclusive_overlaps() {
        let first = ValidityPeriod::standard_24_hour(at(15, 0)).unwrap();
        let second = ValidityPeriod::standard_24_hour(at(16, 0)).unwrap();
        let third = ValidityPeriod::standard_24_hour(at(18, 0)).unwrap();
        assert!(first.overlaps(&second));
        assert!(second.overlaps(&first));
        assert!(!first.overlaps(&third));
    }

    #[test]
    fn test_duration_limits() {
        let start = at(15, 12);
        assert!(ValidityPeriod::new(start, start).is_err());
        assert!(ValidityPeriod::new(start, start + Duration::minutes(30)).is_err());
        assert!(ValidityPeriod::from_duration(start, Duration::hours(48)).is_ok());
        let err = ValidityPeriod::from_duration(start, Duration::hours(49)).unwrap_err();
        assert!(err.to_string().contains("Validity period too long (49 hours)"));
        assert!(ValidityPeriod::thirty_hour(start).unwrap().is_30_hour());
    }

    #[test]
    fn test_from_taf() {
        let reference = Utc.with_ymd_and_hms(2024, 3, 15, 11, 30, 0).unwrap();
        let period = ValidityPeriod::from_taf("1512/1618", reference).unwrap();
        assert_eq!(period.valid_from(), at(15, 12));
        assert_eq!(period.valid_to(), at(16, 18));
        assert_eq!(period.duration_hours(), 30);
        assert_eq!(period.to_taf_format(), "1512/1618");
        assert_eq!(period.full_format(), "2024-03-15 12:00Z to 2024-03-16 18:00Z");

        let period = ValidityPeriod::from_taf("1512/1524", reference).unwrap();
        assert_eq!(period.valid_to(), at(16, 0));

        assert!(ValidityPeriod::from_taf("1512-1618", reference).is_err());
        assert!(ValidityPeriod::from_taf("15/1618", reference).is_err());
    }

    #[test]
    fn test_summary_status() {
        let period = ValidityPeriod::standard_24_hour(at(15, 12)).unwrap();
        assert_eq!(period.summary_at(at(15, 18)), "Valid 1512/1612 (24 hours) - Currently active");
        assert_eq!(period.summary_at(at(17, 0)), "Valid 1512/1612 (24 hours) - Expired");
        assert_eq!(period.summary_at(at(14, 0)), "Valid 1512/1612 (24 hours) - Future");
    }
}
