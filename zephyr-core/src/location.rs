//! Location resolution: device sensor with a fixed fallback, or free-text
//! geocoding search.

use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

use crate::{
    error::WeatherError,
    model::{Coordinate, ResolvedLocation},
    provider::WeatherBackend,
};

/// Used whenever the positioning capability denies, times out or is
/// missing, so the pipeline always has a usable location. Central London.
pub const FALLBACK_COORDINATE: Coordinate = Coordinate { latitude: 51.5074, longitude: -0.1278 };

/// Positioning capability failures. Recovered locally by
/// [`sensor_location`]; never surfaced to the user.
#[derive(Debug, Error)]
pub enum SensorError {
    #[error("position permission denied")]
    PermissionDenied,
    #[error("positioning capability unavailable")]
    Unavailable,
    #[error("position request timed out")]
    Timeout,
}

/// A device-provided source of coordinates.
#[async_trait]
pub trait LocationSensor: Send + Sync + Debug {
    async fn position(&self) -> Result<Coordinate, SensorError>;
}

/// A host without any positioning capability. Callers end up on the
/// fallback coordinate.
#[derive(Debug, Default)]
pub struct UnavailableSensor;

#[async_trait]
impl LocationSensor for UnavailableSensor {
    async fn position(&self) -> Result<Coordinate, SensorError> {
        Err(SensorError::Unavailable)
    }
}

/// Read the device position, falling back to [`FALLBACK_COORDINATE`] on any
/// sensor failure. The failure is logged but never returned: a denied or
/// absent sensor is a normal condition, not an error.
pub async fn sensor_location(sensor: &dyn LocationSensor) -> Coordinate {
    match sensor.position().await {
        Ok(coord) => coord,
        Err(e) => {
            tracing::debug!("geolocation unavailable ({e}), using fallback location");
            FALLBACK_COORDINATE
        }
    }
}

/// Resolve a free-text query to its best-match coordinate.
///
/// # Errors
///
/// [`WeatherError::LocationNotFound`] when the geocoder has no match for
/// the query; unlike sensor failures this IS surfaced to the caller.
pub async fn search_location<B: WeatherBackend + ?Sized>(
    backend: &B,
    query: &str,
) -> Result<ResolvedLocation, WeatherError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(WeatherError::LocationNotFound);
    }

    backend.geocode(query).await
}
