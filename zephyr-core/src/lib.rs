//! Core library for the Zephyr weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client and the abstraction over it
//! - Normalization of raw payloads and per-day forecast reduction
//! - Location resolution (device sensor with fallback, text search)
//! - The fetch orchestrator and its loading/error/data state
//! - The bounded recent-search history
//!
//! It is used by `zephyr-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod forecast;
pub mod history;
pub mod location;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod state;

pub use config::Config;
pub use error::WeatherError;
pub use history::{FileStore, KeyValueStore, SearchHistory};
pub use location::{FALLBACK_COORDINATE, LocationSensor, UnavailableSensor};
pub use model::{Coordinate, CurrentConditions, ForecastDay, ResolvedLocation};
pub use provider::{WeatherBackend, openweather::OpenWeather};
pub use state::{WeatherService, WeatherState};
