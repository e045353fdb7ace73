use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    error::WeatherError,
    model::{Coordinate, ResolvedLocation},
};

use super::{RawCurrent, RawForecast, WeatherBackend};

const WEATHER_BASE: &str = "https://api.openweathermap.org/data/2.5";
const GEO_BASE: &str = "https://api.openweathermap.org/geo/1.0";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// OpenWeather HTTP client: current conditions, 5-day/3-hour forecast and
/// direct geocoding, all with `units=metric`.
#[derive(Debug, Clone)]
pub struct OpenWeather {
    api_key: String,
    http: Client,
    weather_base: String,
    geo_base: String,
}

impl OpenWeather {
    /// # Errors
    ///
    /// Fails only if the underlying HTTP client cannot be constructed.
    pub fn new(api_key: String) -> Result<Self, WeatherError> {
        Self::with_base_urls(api_key, WEATHER_BASE.to_string(), GEO_BASE.to_string())
    }

    /// Client with overridden endpoints; used by tests against a mock
    /// server.
    pub fn with_base_urls(
        api_key: String,
        weather_base: String,
        geo_base: String,
    ) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS)).build()?;

        Ok(Self { api_key, http, weather_base, geo_base })
    }

    async fn get_weather_endpoint(
        &self,
        endpoint: &str,
        coord: Coordinate,
    ) -> Result<String, WeatherError> {
        let url = format!("{}/{endpoint}", self.weather_base);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", coord.latitude.to_string()),
                ("lon", coord.longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!("OpenWeather {endpoint} request failed with status {status}: {}", truncate_body(&body));
            return Err(WeatherError::Unavailable);
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherBackend for OpenWeather {
    async fn current(&self, coord: Coordinate) -> Result<RawCurrent, WeatherError> {
        let body = self.get_weather_endpoint("weather", coord).await?;

        serde_json::from_str(&body)
            .map_err(|e| WeatherError::Parse(format!("current conditions JSON: {e}")))
    }

    async fn forecast(&self, coord: Coordinate) -> Result<RawForecast, WeatherError> {
        let body = self.get_weather_endpoint("forecast", coord).await?;

        serde_json::from_str(&body).map_err(|e| WeatherError::Parse(format!("forecast JSON: {e}")))
    }

    async fn geocode(&self, query: &str) -> Result<ResolvedLocation, WeatherError> {
        let url = format!("{}/direct", self.geo_base);

        let res = self
            .http
            .get(&url)
            .query(&[("q", query), ("limit", "1"), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::warn!("geocoding request failed with status {status}: {}", truncate_body(&body));
            return Err(WeatherError::LocationNotFound);
        }

        let results: Vec<GeoResult> = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Parse(format!("geocoding JSON: {e}")))?;

        let best = results.into_iter().next().ok_or(WeatherError::LocationNotFound)?;

        Ok(ResolvedLocation {
            coordinate: Coordinate { latitude: best.lat, longitude: best.lon },
            name: best.name,
            country: best.country.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    lat: f64,
    lon: f64,
    #[serde(default)]
    name: String,
    country: Option<String>,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        // Back off to a char boundary so multi-byte responses can't panic
        // the log path.
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
