//! Human-friendly output formatting for conditions and forecast.

use chrono::{DateTime, Local};

use zephyr_core::{CurrentConditions, ForecastDay, WeatherState};

pub fn state(state: &WeatherState) {
    if let Some(error) = &state.error {
        println!("Error: {error}");
    }

    if let Some(current) = &state.conditions {
        conditions(current);
    }

    if !state.forecast.is_empty() {
        forecast(&state.forecast);
    }
}

fn conditions(c: &CurrentConditions) {
    println!("{}, {}", c.location_name, c.country);
    println!("  {:.1}\u{b0}C  {} ({})", c.temperature_c, c.condition, c.description);
    println!("  feels like  {:.1}\u{b0}C", c.feels_like_c);
    println!("  humidity    {}%", c.humidity_pct);
    println!("  wind        {:.1} km/h", c.wind_speed_kmh);
    println!("  visibility  {:.1} km", c.visibility_km);
    println!("  pressure    {:.0} hPa", c.pressure_hpa);
    if let Some(rain) = c.rain_chance_pct {
        println!("  rain        {rain}%");
    }
    println!("  sunrise     {}", local_time(c.sunrise_epoch));
    println!("  sunset      {}", local_time(c.sunset_epoch));
}

fn forecast(days: &[ForecastDay]) {
    println!();
    println!("Forecast:");
    for day in days {
        println!(
            "  {}  {}  {:>3}\u{b0} / {:>3}\u{b0}  {}",
            day.day_label, day.date_key, day.temp_high_c, day.temp_low_c, day.condition
        );
    }
}

fn local_time(epoch: i64) -> String {
    DateTime::from_timestamp(epoch, 0)
        .map_or_else(|| "--:--".to_string(), |dt| dt.with_timezone(&Local).format("%H:%M").to_string())
}
