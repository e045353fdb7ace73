use anyhow::{Context, ensure};
use clap::{Parser, Subcommand};

use zephyr_core::{
    Config, Coordinate, FileStore, OpenWeather, SearchHistory, UnavailableSensor, WeatherService,
    location,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "zephyr", version, about = "Weather dashboard CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show weather for the device location (falls back to London when no
    /// position is available).
    Here {
        /// Latitude override.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude override.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// Search for a city and show its weather.
    Search {
        /// City name, e.g. "Paris" or "Springfield,US".
        query: String,
    },

    /// List recent searches.
    History {
        /// Forget all recent searches.
        #[arg(long)]
        clear: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Here { lat, lon } => here(lat, lon).await,
            Command::Search { query } => search(&query).await,
            Command::History { clear } => history(clear),
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    if config.is_configured() {
        println!("An API key is already configured; entering a new one replaces it.");
    }

    let key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(key.trim().to_string());
    config.save()?;

    println!("API key saved to {}", Config::config_file_path()?.display());
    Ok(())
}

fn service() -> anyhow::Result<WeatherService<OpenWeather>> {
    let config = Config::load()?;
    let api_key = config.require_api_key()?.to_string();

    Ok(WeatherService::new(OpenWeather::new(api_key)?))
}

async fn here(lat: Option<f64>, lon: Option<f64>) -> anyhow::Result<()> {
    let coordinate = match (lat, lon) {
        (Some(latitude), Some(longitude)) => Coordinate { latitude, longitude },
        _ => location::sensor_location(&UnavailableSensor).await,
    };

    let mut svc = service()?;
    svc.fetch_weather(coordinate).await;
    render::state(svc.state());

    Ok(())
}

async fn search(query: &str) -> anyhow::Result<()> {
    let query = query.trim();
    ensure!(!query.is_empty(), "Search query must not be blank");

    let mut svc = service()?;
    let resolved = svc.search_and_fetch(query).await?;

    // History updates are independent of the fetch pipeline; a persistence
    // hiccup must not hide the weather we already have.
    match FileStore::new().map(SearchHistory::load) {
        Ok(mut history) => {
            if let Err(e) = history.record(query) {
                eprintln!("warning: could not record search: {e}");
            }
        }
        Err(e) => eprintln!("warning: search history unavailable: {e}"),
    }

    println!("Weather for {}, {}", resolved.name, resolved.country);
    render::state(svc.state());

    Ok(())
}

fn history(clear: bool) -> anyhow::Result<()> {
    let mut history = SearchHistory::load(FileStore::new()?);

    if clear {
        history.clear()?;
        println!("Recent searches cleared.");
        return Ok(());
    }

    if history.entries().is_empty() {
        println!("No recent searches.");
    } else {
        for (i, query) in history.entries().iter().enumerate() {
            println!("{}. {query}", i + 1);
        }
    }

    Ok(())
}
