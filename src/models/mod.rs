pub mod conditions;
pub mod forecast;
pub mod present_weather;
pub mod pressure;
pub mod remarks;
pub mod report;
pub mod runway;
pub mod sky;
pub mod temperature;
pub mod validity;
pub mod visibility;
pub mod wind;

pub use conditions::{WeatherConditions, WeatherConditionsBuilder};
pub use forecast::{ChangeIndicator, ForecastKind, ForecastPeriod};
pub use present_weather::PresentWeather;
pub use pressure::{Pressure, PressureUnit};
pub use remarks::NoaaMetarRemarks;
pub use report::{
    MetarReport, MetarType, ReportModifier, TafReport, TemperatureForecast, WeatherReport,
};
pub use runway::{RunwayVisualRange, RvrPrefix, RvrTrend, RvrUnit};
pub use sky::{SkyCondition, SkyCoverage};
pub use temperature::Temperature;
pub use validity::ValidityPeriod;
pub use visibility::Visibility;
pub use wind::{Wind, WindUnit};
