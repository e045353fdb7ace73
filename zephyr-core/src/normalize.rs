//! Pure conversion of raw provider payloads into display-ready records.

use crate::{model::CurrentConditions, provider::RawCurrent};

const MPS_TO_KMH: f64 = 3.6;
const METERS_PER_KM: f64 = 1000.0;

/// Flatten a raw current-conditions payload into [`CurrentConditions`].
///
/// Wind is converted m/s -> km/h and visibility m -> km; temperatures and
/// pressure are already metric and pass through untouched. A missing `rain`
/// object yields `rain_chance_pct = None`, not 0.
#[must_use]
pub fn current_conditions(raw: RawCurrent) -> CurrentConditions {
    let (condition, description, icon_code) = match raw.weather.into_iter().next() {
        Some(w) => (w.main, w.description, w.icon),
        None => ("Unknown".to_string(), "Unknown".to_string(), String::new()),
    };

    CurrentConditions {
        location_name: raw.name,
        country: raw.sys.country,
        temperature_c: raw.main.temp,
        condition,
        description,
        humidity_pct: raw.main.humidity,
        wind_speed_kmh: raw.wind.speed * MPS_TO_KMH,
        visibility_km: raw.visibility / METERS_PER_KM,
        pressure_hpa: raw.main.pressure,
        feels_like_c: raw.main.feels_like,
        sunrise_epoch: raw.sys.sunrise,
        sunset_epoch: raw.sys.sunset,
        rain_chance_pct: raw.rain.map(|r| r.one_hour.round() as u8),
        icon_code,
    }
}
