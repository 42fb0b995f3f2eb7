use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Select};
use meteo_core::{
    Config, CsvSource, Dashboard, Filters, ForecastSection, Presenter, ViewModel, WeatherSource,
};
use std::{path::PathBuf, sync::Arc};
use tracing::info;

use crate::{configure, render, server};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Weather observations and forecasts dashboard")]
pub struct Cli {
    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Edit data paths, refresh interval, locale and bind address.
    Configure,

    /// Serve the web dashboard.
    Serve {
        /// Listen address; overrides the configured one.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Print the dashboard for one city to the terminal.
    Show {
        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        city: Option<String>,

        /// Forecast day, YYYY-MM-DD.
        #[arg(long)]
        day: Option<NaiveDate>,

        /// First forecast hour (inclusive).
        #[arg(long)]
        from: Option<u32>,

        /// Last forecast hour (inclusive).
        #[arg(long)]
        to: Option<u32>,

        /// Pick country, city, day and hours from prompts.
        #[arg(short, long)]
        interactive: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config_path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };
        let config = Config::load_from(&config_path)?;

        match self.command {
            Command::Configure => {
                let updated = configure::prompt(&config)?;
                updated.save_to(&config_path)?;
                println!("Configuration saved to {}", config_path.display());
            }
            Command::Serve { bind } => {
                let config = Config {
                    bind: bind.unwrap_or(config.bind),
                    ..config
                };
                let addr = config.socket_addr()?;
                let dashboard = Arc::new(build_dashboard(&config)?);
                server::serve(dashboard, addr).await?;
            }
            Command::Show {
                country,
                city,
                day,
                from,
                to,
                interactive,
            } => {
                let dashboard = build_dashboard(&config)?;
                let filters = Filters {
                    country,
                    city,
                    day,
                    from_hour: from,
                    to_hour: to,
                };

                let view = if interactive {
                    pick_interactively(&dashboard, filters).await?
                } else {
                    dashboard.render(&filters).await?
                };
                print!("{}", render::TextView(&view));
            }
        }

        Ok(())
    }
}

fn build_dashboard(config: &Config) -> anyhow::Result<Dashboard<CsvSource>> {
    let presenter = Presenter::new(config.chrono_locale()?);
    info!(
        observations = %config.observations_path.display(),
        forecasts = %config.forecast_path.display(),
        refresh_secs = config.refresh_interval_secs,
        "using data files"
    );
    Ok(Dashboard::new(
        CsvSource::from_config(config),
        presenter,
        config.refresh_interval(),
    ))
}

/// Walk the selectors one at a time, re-rendering after each choice so the
/// next prompt only offers what the previous one left.
async fn pick_interactively<S: WeatherSource>(
    dashboard: &Dashboard<S>,
    mut filters: Filters,
) -> anyhow::Result<ViewModel> {
    let view = dashboard.render(&filters).await?;
    filters.country = Some(select(
        "Country:",
        view.selection.countries.clone(),
        &view.selection.country,
    )?);

    let view = dashboard.render(&filters).await?;
    filters.city = Some(select("City:", view.selection.cities.clone(), &view.selection.city)?);

    let view = dashboard.render(&filters).await?;
    let ForecastSection::Available(forecast) = &view.forecast else {
        return Ok(view);
    };

    let days: Vec<NaiveDate> = forecast.days.iter().map(|d| d.value).collect();
    filters.day = Some(select("Forecast day:", days, &forecast.day)?);

    let view = dashboard.render(&filters).await?;
    let ForecastSection::Available(forecast) = &view.forecast else {
        return Ok(view);
    };

    let bounds = forecast.available_hours;
    let from = hour_prompt("From hour:", bounds.start, bounds.start, bounds.end)?;
    let to = hour_prompt("To hour:", bounds.end, from, bounds.end)?;
    filters.from_hour = Some(from);
    filters.to_hour = Some(to);

    Ok(dashboard.render(&filters).await?)
}

fn select<T: std::fmt::Display + PartialEq + Clone>(
    message: &str,
    options: Vec<T>,
    current: &T,
) -> anyhow::Result<T> {
    let cursor = options.iter().position(|o| o == current).unwrap_or(0);
    Select::new(message, options)
        .with_starting_cursor(cursor)
        .prompt()
        .with_context(|| format!("No selection made for '{message}'"))
}

fn hour_prompt(message: &str, default: u32, min: u32, max: u32) -> anyhow::Result<u32> {
    CustomType::<u32>::new(message)
        .with_default(default)
        .with_help_message(&format!("between {min} and {max}"))
        .with_validator(move |h: &u32| {
            if (min..=max).contains(h) {
                Ok(inquire::validator::Validation::Valid)
            } else {
                Ok(inquire::validator::Validation::Invalid(
                    format!("hour must be between {min} and {max}").into(),
                ))
            }
        })
        .prompt()
        .with_context(|| format!("No value entered for '{message}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_parses_filters() {
        let cli = Cli::try_parse_from([
            "meteo",
            "show",
            "--country",
            "Senegal",
            "--city",
            "Dakar",
            "--day",
            "2025-06-02",
            "--from",
            "6",
            "--to",
            "18",
        ])
        .expect("valid args");

        match cli.command {
            Command::Show {
                country,
                city,
                day,
                from,
                to,
                interactive,
            } => {
                assert_eq!(country.as_deref(), Some("Senegal"));
                assert_eq!(city.as_deref(), Some("Dakar"));
                assert_eq!(day, NaiveDate::from_ymd_opt(2025, 6, 2));
                assert_eq!((from, to), (Some(6), Some(18)));
                assert!(!interactive);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from([
            "meteo",
            "serve",
            "--config",
            "/tmp/meteo.toml",
            "--bind",
            "0.0.0.0:80",
        ])
        .expect("valid args");

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/meteo.toml")));
        assert!(matches!(cli.command, Command::Serve { bind: Some(ref b) } if b == "0.0.0.0:80"));
    }

    #[test]
    fn bad_day_is_rejected() {
        assert!(Cli::try_parse_from(["meteo", "show", "--day", "tomorrow"]).is_err());
    }

    #[test]
    fn build_dashboard_rejects_unknown_locale() {
        let config = Config {
            locale: "zz_ZZ".to_string(),
            ..Config::default()
        };
        assert!(build_dashboard(&config).is_err());
    }
}
