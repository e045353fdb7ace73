//! Fetch orchestration and the loading/error/data state machine the UI
//! consumes.

use crate::{
    error::WeatherError,
    forecast,
    location,
    model::{Coordinate, CurrentConditions, ForecastDay, ResolvedLocation},
    normalize,
    provider::WeatherBackend,
};

/// Application weather state, owned by [`WeatherService`] and read by the
/// UI after each operation.
///
/// On a failed fetch the previous `conditions`/`forecast` are preserved;
/// only `error` changes. `loading` is cleared on every completion path.
#[derive(Debug, Clone, Default)]
pub struct WeatherState {
    pub conditions: Option<CurrentConditions>,
    pub forecast: Vec<ForecastDay>,
    pub loading: bool,
    pub error: Option<String>,
    /// Last successfully resolved coordinate; target of [`WeatherService::refresh`].
    pub coordinate: Option<Coordinate>,
}

/// Completion token for one fetch. A completion whose ticket is older than
/// the latest issued fetch is discarded, so overlapping fetches cannot
/// clobber newer state with older data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FetchTicket(u64);

/// Orchestrates concurrent current-conditions and forecast requests against
/// one backend and maintains [`WeatherState`].
#[derive(Debug)]
pub struct WeatherService<B> {
    backend: B,
    state: WeatherState,
    seq: u64,
}

impl<B: WeatherBackend> WeatherService<B> {
    pub fn new(backend: B) -> Self {
        Self { backend, state: WeatherState { loading: true, ..WeatherState::default() }, seq: 0 }
    }

    #[must_use]
    pub fn state(&self) -> &WeatherState {
        &self.state
    }

    /// Fetch current conditions and forecast for `coord` together; both
    /// must succeed or the state keeps its previous data and records the
    /// error. On success, conditions, forecast and the cleared error are
    /// applied as one update.
    pub async fn fetch_weather(&mut self, coord: Coordinate) {
        let ticket = self.begin(coord);
        let result = fetch(&self.backend, coord).await;
        self.complete(ticket, result);
    }

    /// Resolve `query` via geocoding, then fetch for the resolved
    /// coordinate. A resolution failure sets the error state without
    /// issuing any weather request.
    ///
    /// # Errors
    ///
    /// Returns the resolution error (typically
    /// [`WeatherError::LocationNotFound`]) so the caller can react, e.g.
    /// skip recording the query in the search history.
    pub async fn search_and_fetch(&mut self, query: &str) -> Result<ResolvedLocation, WeatherError> {
        self.state.loading = true;

        match location::search_location(&self.backend, query).await {
            Ok(resolved) => {
                self.fetch_weather(resolved.coordinate).await;
                Ok(resolved)
            }
            Err(e) => {
                self.state.loading = false;
                self.state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Re-fetch for the last resolved coordinate. No-op when no coordinate
    /// has ever been resolved.
    pub async fn refresh(&mut self) {
        if let Some(coord) = self.state.coordinate {
            self.fetch_weather(coord).await;
        }
    }

    fn begin(&mut self, coord: Coordinate) -> FetchTicket {
        self.seq += 1;
        self.state.loading = true;
        self.state.coordinate = Some(coord);
        FetchTicket(self.seq)
    }

    fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<(CurrentConditions, Vec<ForecastDay>), WeatherError>,
    ) {
        if ticket.0 != self.seq {
            // A newer fetch has been issued since; its completion owns the
            // state now.
            tracing::debug!("discarding stale fetch completion (ticket {})", ticket.0);
            return;
        }

        self.state.loading = false;

        match result {
            Ok((conditions, days)) => {
                self.state.conditions = Some(conditions);
                self.state.forecast = days;
                self.state.error = None;
            }
            Err(e) => {
                self.state.error = Some(e.to_string());
            }
        }
    }
}

async fn fetch<B: WeatherBackend>(
    backend: &B,
    coord: Coordinate,
) -> Result<(CurrentConditions, Vec<ForecastDay>), WeatherError> {
    let (raw_current, raw_forecast) =
        tokio::try_join!(backend.current(coord), backend.forecast(coord))?;

    let conditions = normalize::current_conditions(raw_current);
    let days = forecast::daily_summaries(&raw_forecast.list, raw_forecast.city.timezone);

    Ok((conditions, days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{
        RawCity, RawCurrent, RawForecast, RawForecastEntry, RawForecastMain, RawMain, RawSys,
        RawWeatherTag, RawWind,
    };
    use async_trait::async_trait;

    fn raw_current(name: &str) -> RawCurrent {
        RawCurrent {
            name: name.to_string(),
            sys: RawSys { country: "GB".to_string(), sunrise: 1_700_000_000, sunset: 1_700_030_000 },
            main: RawMain { temp: 9.0, feels_like: 7.0, humidity: 70, pressure: 1020.0 },
            weather: vec![RawWeatherTag {
                main: "Rain".to_string(),
                description: "light rain".to_string(),
                icon: "10d".to_string(),
            }],
            wind: RawWind { speed: 5.0 },
            visibility: 10_000.0,
            rain: None,
        }
    }

    fn raw_forecast() -> RawForecast {
        RawForecast {
            city: RawCity { timezone: 0 },
            list: vec![RawForecastEntry {
                dt: 1_704_067_200,
                main: RawForecastMain { temp_min: 1.0, temp_max: 6.0 },
                weather: vec![RawWeatherTag {
                    main: "Clear".to_string(),
                    description: "clear sky".to_string(),
                    icon: "01d".to_string(),
                }],
            }],
        }
    }

    /// Backend whose two weather endpoints can fail independently.
    #[derive(Debug)]
    struct FakeBackend {
        current_ok: bool,
        forecast_ok: bool,
        name: String,
    }

    impl FakeBackend {
        fn good(name: &str) -> Self {
            Self { current_ok: true, forecast_ok: true, name: name.to_string() }
        }
    }

    #[async_trait]
    impl WeatherBackend for FakeBackend {
        async fn current(&self, _coord: Coordinate) -> Result<RawCurrent, WeatherError> {
            if self.current_ok {
                Ok(raw_current(&self.name))
            } else {
                Err(WeatherError::Unavailable)
            }
        }

        async fn forecast(&self, _coord: Coordinate) -> Result<RawForecast, WeatherError> {
            if self.forecast_ok {
                Ok(raw_forecast())
            } else {
                Err(WeatherError::Unavailable)
            }
        }

        async fn geocode(&self, query: &str) -> Result<ResolvedLocation, WeatherError> {
            if query == "London" {
                Ok(ResolvedLocation {
                    coordinate: Coordinate { latitude: 51.5074, longitude: -0.1278 },
                    name: "London".to_string(),
                    country: "GB".to_string(),
                })
            } else {
                Err(WeatherError::LocationNotFound)
            }
        }
    }

    const COORD: Coordinate = Coordinate { latitude: 51.5074, longitude: -0.1278 };

    #[tokio::test]
    async fn successful_fetch_populates_state_and_clears_error() {
        let mut svc = WeatherService::new(FakeBackend::good("London"));
        assert!(svc.state().loading);

        svc.fetch_weather(COORD).await;

        let state = svc.state();
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert_eq!(state.conditions.as_ref().map(|c| c.location_name.as_str()), Some("London"));
        assert_eq!(state.forecast.len(), 1);
        assert_eq!(state.coordinate, Some(COORD));
    }

    #[tokio::test]
    async fn failed_forecast_fails_the_whole_fetch() {
        let mut svc = WeatherService::new(FakeBackend {
            current_ok: true,
            forecast_ok: false,
            name: "London".to_string(),
        });

        svc.fetch_weather(COORD).await;

        let state = svc.state();
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Weather data not available"));
        // No partial render: current succeeded but is not applied.
        assert!(state.conditions.is_none());
        assert!(state.forecast.is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_preserves_previous_data() {
        let mut svc = WeatherService::new(FakeBackend::good("London"));
        svc.fetch_weather(COORD).await;
        assert!(svc.state().conditions.is_some());

        svc.backend.current_ok = false;
        svc.fetch_weather(COORD).await;

        let state = svc.state();
        assert_eq!(state.error.as_deref(), Some("Weather data not available"));
        assert_eq!(state.conditions.as_ref().map(|c| c.location_name.as_str()), Some("London"));
        assert_eq!(state.forecast.len(), 1);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn search_failure_sets_error_without_fetching() {
        let mut svc = WeatherService::new(FakeBackend::good("London"));

        let err = svc.search_and_fetch("Zzznotreal").await.unwrap_err();
        assert!(matches!(err, WeatherError::LocationNotFound));

        let state = svc.state();
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Location not found"));
        assert!(state.conditions.is_none());
        assert!(state.coordinate.is_none());
    }

    #[tokio::test]
    async fn search_success_resolves_and_fetches() {
        let mut svc = WeatherService::new(FakeBackend::good("London"));

        let resolved = svc.search_and_fetch("London").await.unwrap();
        assert_eq!(resolved.name, "London");

        let state = svc.state();
        assert!(state.error.is_none());
        assert!(state.conditions.is_some());
    }

    #[tokio::test]
    async fn refresh_without_coordinate_is_a_noop() {
        let mut svc = WeatherService::new(FakeBackend::good("London"));
        svc.refresh().await;

        let state = svc.state();
        assert!(state.conditions.is_none());
        assert!(state.loading);
    }

    #[tokio::test]
    async fn stale_completion_is_discarded() {
        let mut svc = WeatherService::new(FakeBackend::good("Newer"));

        // First fetch is issued, then a second one before the first
        // completes. The first completion must not overwrite the second's.
        let old_ticket = svc.begin(COORD);
        let new_ticket = svc.begin(COORD);

        let newer = fetch(&svc.backend, COORD).await;
        svc.complete(new_ticket, newer);

        let stale = Ok((
            crate::normalize::current_conditions(raw_current("Older")),
            Vec::new(),
        ));
        svc.complete(old_ticket, stale);

        let state = svc.state();
        assert_eq!(state.conditions.as_ref().map(|c| c.location_name.as_str()), Some("Newer"));
        assert_eq!(state.forecast.len(), 1);
        assert!(!state.loading);
    }
}
