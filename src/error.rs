use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Temperature validation error: {message}")]
    TemperatureValidation { message: String },

    #[error("Pressure validation error: {message}")]
    PressureValidation { message: String },

    #[error("Wind validation error: {message}")]
    WindValidation { message: String },

    #[error("Visibility validation error: {message}")]
    VisibilityValidation { message: String },

    #[error("Sky condition validation error: {message}")]
    SkyConditionValidation { message: String },

    #[error("Runway visual range validation error: {message}")]
    RunwayValidation { message: String },

    #[error("Present weather validation error: {message}")]
    WeatherValidation { message: String },

    #[error("Remark validation error: {message}")]
    RemarkValidation { message: String },

    #[error("Forecast period validation error: {message}")]
    ForecastValidation { message: String },

    #[error("Validity period validation error: {message}")]
    ValidityValidation { message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Weather service error: {0}")]
    Service(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl ProcessingError {
    pub fn temperature(message: impl Into<String>) -> Self {
        Self::TemperatureValidation {
            message: message.into(),
        }
    }

    pub fn pressure(message: impl Into<String>) -> Self {
        Self::PressureValidation {
            message: message.into(),
        }
    }

    pub fn wind(message: impl Into<String>) -> Self {
        Self::WindValidation {
            message: message.into(),
        }
    }

    pub fn visibility(message: impl Into<String>) -> Self {
        Self::VisibilityValidation {
            message: message.into(),
        }
    }

    pub fn sky(message: impl Into<String>) -> Self {
        Self::SkyConditionValidation {
            message: message.into(),
        }
    }

    pub fn runway(message: impl Into<String>) -> Self {
        Self::RunwayValidation {
            message: message.into(),
        }
    }

    pub fn weather(message: impl Into<String>) -> Self {
        Self::WeatherValidation {
            message: message.into(),
        }
    }

    pub fn remark(message: impl Into<String>) -> Self {
        Self::RemarkValidation {
            message: message.into(),
        }
    }

    pub fn forecast(message: impl Into<String>) -> Self {
        Self::ForecastValidation {
            message: message.into(),
        }
    }

    pub fn validity(message: impl Into<String>) -> Self {
        Self::ValidityValidation {
            message: message.into(),
        }
    }

    /// True for errors raised while constructing a weather value rather than by I/O or setup.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::TemperatureValidation { .. }
                | Self::PressureValidation { .. }
                | Self::WindValidation { .. }
                | Self::VisibilityValidation { .. }
                | Self::SkyConditionValidation { .. }
                | Self::RunwayValidation { .. }
                | Self::WeatherValidation { .. }
                | Self::RemarkValidation { .. }
                | Self::ForecastValidation { .. }
                | Self::ValidityValidation { .. }
                | Self::InvalidFormat(_)
                | Self::MissingData(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_detail() {
        let err = ProcessingError::wind("Wind speed cannot be negative");
        assert_eq!(
            err.to_string(),
            "Wind validation error: Wind speed cannot be negative"
        );
        assert!(err.is_decode_error());
    }

    #[test]
    fn test_io_is_not_decode_error() {
        let err: ProcessingError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(!err.is_decode_error());
    }
}
