//! Core library for the `skycast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstractions over the weather and image services
//! - Forecast extraction, temperature unit conversion, and the view model
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod provider;
pub mod units;

pub use app::{App, View, ViewState};
pub use config::{Config, ServiceConfig};
pub use error::FetchError;
pub use model::{DaySummary, Forecast, ForecastQuery, LocationInfo};
pub use provider::{ImageProvider, ServiceId, WeatherProvider};
pub use units::TemperatureUnit;
