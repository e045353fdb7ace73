//! Reduction of the 3-hour forecast series into one entry per calendar day.

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::{model::ForecastDay, provider::RawForecastEntry};

/// Upper bound on the number of days emitted.
pub const MAX_DAYS: usize = 7;

/// Collapse a chronological 3-hour forecast series into at most
/// [`MAX_DAYS`] one-per-day summaries.
///
/// Each day is represented by the FIRST entry whose provider-local date has
/// not been seen yet; that entry supplies the icon, condition and its own
/// `temp_max`/`temp_min` (rounded to whole degrees). This is deliberately
/// not a true daily aggregate across all same-day slots. Entries after the
/// seventh unique date are discarded.
#[must_use]
pub fn daily_summaries(entries: &[RawForecastEntry], utc_offset_secs: i32) -> Vec<ForecastDay> {
    let offset = FixedOffset::east_opt(utc_offset_secs).unwrap_or_else(|| Utc.fix());

    let mut days: Vec<ForecastDay> = Vec::with_capacity(MAX_DAYS);

    for entry in entries {
        if days.len() == MAX_DAYS {
            break;
        }

        let Some(utc) = DateTime::from_timestamp(entry.dt, 0) else {
            continue;
        };
        let local = utc.with_timezone(&offset);
        let date_key = local.format("%Y-%m-%d").to_string();

        if days.iter().any(|d| d.date_key == date_key) {
            continue;
        }

        let tag = entry.weather.first();
        let high = entry.main.temp_max.round() as i32;
        let low = entry.main.temp_min.round() as i32;

        days.push(ForecastDay {
            date_key,
            day_label: local.format("%a").to_string(),
            temp_high_c: high.max(low),
            temp_low_c: high.min(low),
            icon_code: tag.map(|w| w.icon.clone()).unwrap_or_default(),
            condition: tag.map_or_else(|| "Unknown".to_string(), |w| w.main.clone()),
        });
    }

    days
}
