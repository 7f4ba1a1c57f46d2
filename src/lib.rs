//! Decoding and validation of METAR and TAF aviation weather reports.
//!
//! Raw report text goes in through [`parsers`]; strongly-typed, validated
//! [`models`] come out. [`processors`] decodes files of reports in parallel.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod parsers;
pub mod processors;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use error::{ProcessingError, Result};
pub use models::{MetarReport, TafReport, WeatherReport};
pub use parsers::{MetarParser, ReportParser, TafParser};
