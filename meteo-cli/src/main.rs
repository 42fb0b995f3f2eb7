//! Binary crate for the `meteo` dashboard.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Serving the web dashboard
//! - Human-friendly terminal output

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod configure;
mod render;
mod server;

#[cfg(test)]
mod fixtures {
    use meteo_core::{WeatherRow, model::parse_timestamp};

    pub fn row(country: &str, city: &str, ts: &str, temperature: f64) -> WeatherRow {
        let timestamp = parse_timestamp(ts).expect("valid timestamp");
        WeatherRow {
            country: country.to_string(),
            city: city.to_string(),
            timestamp,
            temperature,
            humidity: 64.0,
            visibility: 10_000.0,
            wind_speed: 9.0,
            wind_direction: 180.0,
            description: "haze".to_string(),
            sunrise: timestamp,
            sunset: timestamp,
            latitude: 12.37,
            longitude: -1.52,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meteo_core=info,meteo_cli=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
