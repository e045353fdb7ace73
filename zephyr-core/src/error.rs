use thiserror::Error;

/// Errors surfaced by the fetch/search pipeline.
///
/// Everything here terminates in a single user-visible message in
/// [`crate::state::WeatherState::error`]; nothing is fatal. Geolocation
/// failures and malformed persisted history are recovered locally and never
/// reach this type.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The geocoder returned no match (or a non-success status) for the
    /// query.
    #[error("Location not found")]
    LocationNotFound,

    /// Either weather endpoint answered with a non-success status.
    #[error("Weather data not available")]
    Unavailable,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}
