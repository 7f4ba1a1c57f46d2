pub mod repository;
pub mod weather_service;

pub use repository::{DataSource, InMemoryRepository, RepositoryStats, StoredReport, WeatherRepository};
pub use weather_service::{fetch_metar, fetch_taf, StaticWeatherService, WeatherService};
