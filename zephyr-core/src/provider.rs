use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{
    error::WeatherError,
    model::{Coordinate, ResolvedLocation},
};

pub mod openweather;

/// The external weather/geocoding service, as seen by the orchestrator.
///
/// Implementations return raw wire payloads; normalization into domain
/// types happens downstream so it stays a pure, testable transformation.
#[async_trait]
pub trait WeatherBackend: Send + Sync + Debug {
    /// Current conditions at a coordinate.
    async fn current(&self, coord: Coordinate) -> Result<RawCurrent, WeatherError>;

    /// 3-hour-interval forecast series at a coordinate.
    async fn forecast(&self, coord: Coordinate) -> Result<RawForecast, WeatherError>;

    /// Best-match coordinate for a free-text query.
    ///
    /// # Errors
    ///
    /// [`WeatherError::LocationNotFound`] when the geocoder has no match.
    async fn geocode(&self, query: &str) -> Result<ResolvedLocation, WeatherError>;
}

// Raw wire shapes, shared by the HTTP client and the normalizer.

#[derive(Debug, Clone, Deserialize)]
pub struct RawWeatherTag {
    pub main: String,
    #[serde(default)]
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawWind {
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSys {
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRain {
    /// Rain volume for the last hour, mm. Absent key inside `rain` reads
    /// as 0, but an absent `rain` object altogether stays `None` upstream.
    #[serde(rename = "1h", default)]
    pub one_hour: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCurrent {
    pub name: String,
    pub sys: RawSys,
    pub main: RawMain,
    pub weather: Vec<RawWeatherTag>,
    pub wind: RawWind,
    /// Meters.
    #[serde(default)]
    pub visibility: f64,
    pub rain: Option<RawRain>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawForecastMain {
    pub temp_min: f64,
    pub temp_max: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawForecastEntry {
    /// Epoch seconds, UTC.
    pub dt: i64,
    pub main: RawForecastMain,
    pub weather: Vec<RawWeatherTag>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCity {
    /// Shift from UTC in seconds for the forecast location.
    #[serde(default)]
    pub timezone: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawForecast {
    pub city: RawCity,
    pub list: Vec<RawForecastEntry>,
}
