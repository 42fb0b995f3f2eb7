//! Core library for the `meteo` weather dashboard.
//!
//! This crate defines:
//! - The row model shared by the observation and forecast tables
//! - Loading those tables from CSV, behind the `WeatherSource` trait
//! - A time-to-live cache for loaded tables
//! - The country → city → day → hour filter chain and city aggregates
//! - The view model every front-end renders
//! - Configuration handling
//!
//! It is used by `meteo-cli`, but can also be reused by other binaries or services.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod filter;
pub mod model;
pub mod source;
pub mod view;

pub use config::Config;
pub use dashboard::{Dashboard, DashboardError, ForecastError};
pub use filter::{Filters, HourRange};
pub use model::{Forecast, Observation, WeatherRow};
pub use source::{CsvSource, Dataset, InMemorySource, LoadError, WeatherSource};
pub use view::{ForecastSection, Presenter, ViewModel};
