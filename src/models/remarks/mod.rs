pub mod ceiling;
pub mod cloud_type;
pub mod hail;
pub mod maintenance;
pub mod noaa_remarks;
pub mod obscuration;
pub mod precipitation;
pub mod pressure_tendency;
pub mod station_type;
pub mod thunderstorm;
pub mod variable_visibility;
pub mod weather_event;
pub mod wind_events;

pub use ceiling::{CeilingSecondSite, VariableCeiling};
pub use cloud_type::CloudType;
pub use hail::HailSize;
pub use maintenance::AutomatedMaintenanceIndicator;
pub use noaa_remarks::{NoaaMetarRemarks, NoaaMetarRemarksBuilder};
pub use obscuration::ObscurationLayer;
pub use precipitation::PrecipitationAmount;
pub use pressure_tendency::PressureTendency;
pub use station_type::AutomatedStationType;
pub use thunderstorm::ThunderstormLocation;
pub use variable_visibility::VariableVisibility;
pub use weather_event::WeatherEvent;
pub use wind_events::{PeakWind, WindShift};
