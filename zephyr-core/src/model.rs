use serde::{Deserialize, Serialize};

/// A latitude/longitude pair identifying a location for weather lookup.
///
/// Replaced wholesale on each search or geolocation event, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions for one location, already converted to display units
/// (temperatures in Celsius, wind in km/h, visibility in km).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub country: String,
    pub temperature_c: f64,
    pub condition: String,
    pub description: String,
    pub humidity_pct: u8,
    pub wind_speed_kmh: f64,
    pub visibility_km: f64,
    pub pressure_hpa: f64,
    pub feels_like_c: f64,
    pub sunrise_epoch: i64,
    pub sunset_epoch: i64,
    /// Present only when the provider reported a rain volume; absence means
    /// "no rain data", which the UI renders differently from 0%.
    pub rain_chance_pct: Option<u8>,
    pub icon_code: String,
}

/// One calendar day of forecast, keyed by the provider-local date.
///
/// Uniquely identified by `date_key`; `temp_high_c >= temp_low_c` always
/// holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Locale-independent `%Y-%m-%d` key in the provider's local time.
    pub date_key: String,
    /// Short weekday label, e.g. "Mon".
    pub day_label: String,
    pub temp_high_c: i32,
    pub temp_low_c: i32,
    pub icon_code: String,
    pub condition: String,
}

/// A coordinate resolved from a free-text search, with the canonical
/// display name the geocoder returned for it.
#[derive(Debug, Clone)]
pub struct ResolvedLocation {
    pub coordinate: Coordinate,
    pub name: String,
    pub country: String,
}
