use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::models::conditions::WeatherConditions;
use crate::utils::constants::MAX_TEMPO_HOURS;

const VALID_PROBABILITIES: [u8; 2] = [30, 40];

/// TAF change group keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeIndicator {
    #[serde(rename = "BASE")]
    Base,
    #[serde(rename = "FM")]
    From,
    #[serde(rename = "TEMPO")]
    Tempo,
    #[serde(rename = "BECMG")]
    Becoming,
    #[serde(rename = "PROB")]
    Probability,
}

impl ChangeIndicator {
    /// Match a change group keyword. Any "PROBnn" maps to `Probability`.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.trim().to_uppercase();
        if normalized.starts_with("PROB") {
            return Some(Self::Probability);
        }
        match normalized.as_str() {
            "BASE" => Some(Self::Base),
            "FM" => Some(Self::From),
            "TEMPO" => Some(Self::Tempo),
            "BECMG" => Some(Self::Becoming),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Base => "BASE",
            Self::From => "FM",
            Self::Tempo => "TEMPO",
            Self::Becoming => "BECMG",
            Self::Probability => "PROB",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Base => "Base Forecast",
            Self::From => "From",
            Self::Tempo => "Temporary",
            Self::Becoming => "Becoming",
            Self::Probability => "Probability",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Base => "Initial conditions for the forecast period",
            Self::From => "Permanent change starting at exact time",
            Self::Tempo => "Temporary fluctuations (< 1hr at a time, < half of period)",
            Self::Becoming => "Gradual change over the specified period",
            Self::Probability => "Probabilistic forecast (PROB30 or PROB40)",
        }
    }

    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Base | Self::From)
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Tempo)
    }

    pub fn is_gradual(&self) -> bool {
        matches!(self, Self::Becoming)
    }

    pub fn is_probabilistic(&self) -> bool {
        matches!(self, Self::Probability)
    }

    pub fn requires_time_period(&self) -> bool {
        matches!(self, Self::Tempo | Self::Becoming | Self::Probability)
    }

    pub fn uses_exact_time(&self) -> bool {
        matches!(self, Self::From)
    }

    pub fn summary(&self) -> String {
        format!("{} ({}): {}", self.code(), self.display_name(), self.description())
    }
}

impl fmt::Display for ChangeIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Timing carried by each kind of forecast segment. Each variant holds exactly
/// the fields that are legal for its change indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "indicator")]
pub enum ForecastKind {
    #[serde(rename = "BASE")]
    Base {
        window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    },
    #[serde(rename = "FM")]
    From { change_time: DateTime<Utc> },
    #[serde(rename = "TEMPO")]
    Tempo {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[serde(rename = "BECMG")]
    Becoming {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[serde(rename = "PROB")]
    Probability {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        probability: u8,
    },
}

/// One segment of a TAF: when it applies and the conditions forecast for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPeriod {
    kind: ForecastKind,
    conditions: WeatherConditions,
}

impl ForecastPeriod {
    /// Build from loose fields, enforcing which fields each change indicator allows.
    pub fn new(
        indicator: ChangeIndicator,
        change_time: Option<DateTime<Utc>>,
        period_start: Option<DateTime<Utc>>,
        period_end: Option<DateTime<Utc>>,
        probability: Option<u8>,
        conditions: WeatherConditions,
    ) -> Result<Self> {
        let kind = match indicator {
            ChangeIndicator::Base => {
                if change_time.is_some() {
                    return Err(ProcessingError::forecast(
                        "BASE forecast should not have exact change time",
                    ));
                }
                let window = match (period_start, period_end) {
                    (Some(start), Some(end)) => {
                        check_order(start, end)?;
                        Some((start, end))
                    }
                    (None, None) => None,
                    _ => {
                        return Err(ProcessingError::forecast(
                            "BASE forecast must have both period start and end times or neither",
                        ))
                    }
                };
                ForecastKind::Base { window }
            }
            ChangeIndicator::From => {
                let change_time = change_time.ok_or_else(|| {
                    ProcessingError::forecast("FM forecast must have changeTime")
                })?;
                if period_start.is_some() || period_end.is_some() {
                    return Err(ProcessingError::forecast(
                        "FM forecast should not have period start/end",
                    ));
                }
                ForecastKind::From { change_time }
            }
            ChangeIndicator::Tempo | ChangeIndicator::Becoming | ChangeIndicator::Probability => {
                let (start, end) = match (period_start, period_end) {
                    (Some(start), Some(end)) => (start, end),
                    _ => {
                        return Err(ProcessingError::forecast(format!(
                            "{} forecast must have period start and end times",
                            indicator
                        )))
                    }
                };
                if change_time.is_some() {
                    return Err(ProcessingError::forecast(format!(
                        "{} forecast should not have exact change time",
                        indicator
                    )));
                }
                check_order(start, end)?;

                match indicator {
                    ChangeIndicator::Tempo => {
                        let hours = (end - start).num_hours();
                        if hours > MAX_TEMPO_HOURS {
                            return Err(ProcessingError::forecast(format!(
                                "Forecast period too long ({} hours). Maximum is {}",
                                hours, MAX_TEMPO_HOURS
                            )));
                        }
                        ForecastKind::Tempo { start, end }
                    }
                    ChangeIndicator::Becoming => ForecastKind::Becoming { start, end },
                    _ => {
                        let probability = probability.ok_or_else(|| {
                            ProcessingError::forecast("PROB forecast must have probability value")
                        })?;
                        if !VALID_PROBABILITIES.contains(&probability) {
                            return Err(ProcessingError::forecast(format!(
                                "Invalid probability: {}. Must be 30 or 40",
                                probability
                            )));
                        }
                        ForecastKind::Probability {
                            start,
                            end,
                            probability,
                        }
                    }
                }
            }
        };

        if indicator != ChangeIndicator::Probability {
            if let Some(probability) = probability {
                return Err(ProcessingError::forecast(format!(
                    "Only PROB forecasts should have probability. Found {} for {}",
                    probability, indicator
                )));
            }
        }

        Ok(Self { kind, conditions })
    }

    pub fn base(
        window: Option<(DateTime<Utc>, DateTime<Utc>)>,
        conditions: WeatherConditions,
    ) -> Result<Self> {
        let (start, end) = window.unzip();
        Self::new(ChangeIndicator::Base, None, start, end, None, conditions)
    }

    pub fn from(change_time: DateTime<Utc>, conditions: WeatherConditions) -> Self {
        Self {
            kind: ForecastKind::From { change_time },
            conditions,
        }
    }

    pub fn tempo(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        conditions: WeatherConditions,
    ) -> Result<Self> {
        Self::new(ChangeIndicator::Tempo, None, Some(start), Some(end), None, conditions)
    }

    pub fn becmg(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        conditions: WeatherConditions,
    ) -> Result<Self> {
        Self::new(ChangeIndicator::Becoming, None, Some(start), Some(end), None, conditions)
    }

    pub fn prob(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        probability: u8,
        conditions: WeatherConditions,
    ) -> Result<Self> {
        Self::new(
            ChangeIndicator::Probability,
            None,
            Some(start),
            Some(end),
            Some(probability),
            conditions,
        )
    }

    pub fn kind(&self) -> &ForecastKind {
        &self.kind
    }

    pub fn conditions(&self) -> &WeatherConditions {
        &self.conditions
    }

    pub fn change_indicator(&self) -> ChangeIndicator {
        match self.kind {
            ForecastKind::Base { .. } => ChangeIndicator::Base,
            ForecastKind::From { .. } => ChangeIndicator::From,
            ForecastKind::Tempo { .. } => ChangeIndicator::Tempo,
            ForecastKind::Becoming { .. } => ChangeIndicator::Becoming,
            ForecastKind::Probability { .. } => ChangeIndicator::Probability,
        }
    }

    pub fn change_time(&self) -> Option<DateTime<Utc>> {
        match self.kind {
            ForecastKind::From { change_time } => Some(change_time),
            _ => None,
        }
    }

    fn window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match self.kind {
            ForecastKind::Base { window } => window,
            ForecastKind::From { .. } => None,
            ForecastKind::Tempo { start, end }
            | ForecastKind::Becoming { start, end }
            | ForecastKind::Probability { start, end, .. } => Some((start, end)),
        }
    }

    pub fn period_start(&self) -> Option<DateTime<Utc>> {
        self.window().map(|(start, _)| start)
    }

    pub fn period_end(&self) -> Option<DateTime<Utc>> {
        self.window().map(|(_, end)| end)
    }

    pub fn probability(&self) -> Option<u8> {
        match self.kind {
            ForecastKind::Probability { probability, .. } => Some(probability),
            _ => None,
        }
    }

    pub fn is_base_forecast(&self) -> bool {
        matches!(self.kind, ForecastKind::Base { .. })
    }

    pub fn is_permanent_change(&self) -> bool {
        self.change_indicator().is_permanent()
    }

    pub fn is_temporary_change(&self) -> bool {
        self.change_indicator().is_temporary()
    }

    pub fn is_gradual_change(&self) -> bool {
        self.change_indicator().is_gradual()
    }

    pub fn is_probabilistic(&self) -> bool {
        self.change_indicator().is_probabilistic()
    }

    pub fn has_time_range(&self) -> bool {
        self.window().is_some() || self.change_time().is_some()
    }

    pub fn effective_start(&self) -> Option<DateTime<Utc>> {
        self.change_time().or_else(|| self.period_start())
    }

    pub fn effective_end(&self) -> Option<DateTime<Utc>> {
        self.period_end()
    }

    pub fn duration_hours(&self) -> Option<i64> {
        self.window().map(|(start, end)| (end - start).num_hours())
    }

    /// FM periods are open-ended from their change time; bounded periods are `[start, end)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        match self.kind {
            ForecastKind::From { change_time } => instant >= change_time,
            _ => self
                .window()
                .map_or(false, |(start, end)| instant >= start && instant < end),
        }
    }

    pub fn has_significant_weather(&self) -> bool {
        self.conditions.has_precipitation()
            || self.conditions.has_thunderstorms()
            || self.conditions.is_likely_imc()
    }

    pub fn to_taf_format(&self) -> String {
        let span = |start: DateTime<Utc>, end: DateTime<Utc>| {
            format!("{}/{}", start.format("%d%H"), end.format("%d%H"))
        };
        match self.kind {
            ForecastKind::Base { window: None } => "BASE".to_string(),
            ForecastKind::Base {
                window: Some((start, end)),
            } => format!("BASE {}", span(start, end)),
            ForecastKind::From { change_time } => format!("FM{}", change_time.format("%d%H%M")),
            ForecastKind::Tempo { start, end } => format!("TEMPO {}", span(start, end)),
            ForecastKind::Becoming { start, end } => format!("BECMG {}", span(start, end)),
            ForecastKind::Probability {
                start,
                end,
                probability,
            } => format!("PROB{} {}", probability, span(start, end)),
        }
    }

    pub fn summary(&self) -> String {
        if self.conditions.has_any_conditions() {
            format!("{}: {}", self.to_taf_format(), self.conditions.summary())
        } else {
            self.to_taf_format()
        }
    }
}

impl fmt::Display for ForecastPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ForecastPeriod[{}]", self.to_taf_format())
    }
}

fn check_order(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if start >= end {
        return Err(ProcessingError::forecast(format!(
            "Period start ({}) must be before end ({})",
            start.to_rfc3339(),
            end.to_rfc3339()
        )));
    }
    Ok(())
}
