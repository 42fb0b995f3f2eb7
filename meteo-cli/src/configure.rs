use anyhow::Context;
use inquire::{CustomType, Text, validator::Validation};
use meteo_core::Config;
use std::path::PathBuf;

/// Ask for every setting, offering the current value as the default.
pub fn prompt(current: &Config) -> anyhow::Result<Config> {
    let observations_path = Text::new("Observation CSV:")
        .with_default(&current.observations_path.display().to_string())
        .prompt()
        .context("Configuration cancelled")?;

    let forecast_path = Text::new("Forecast CSV:")
        .with_default(&current.forecast_path.display().to_string())
        .prompt()
        .context("Configuration cancelled")?;

    let refresh_interval_secs = CustomType::<u64>::new("Refresh interval (seconds):")
        .with_default(current.refresh_interval_secs)
        .prompt()
        .context("Configuration cancelled")?;

    let locale = Text::new("Locale:")
        .with_default(&current.locale)
        .with_help_message("e.g. en_US or fr_FR")
        .with_validator(|input: &str| {
            let probe = Config {
                locale: input.to_string(),
                ..Config::default()
            };
            Ok(match probe.chrono_locale() {
                Ok(_) => Validation::Valid,
                Err(e) => Validation::Invalid(e.to_string().into()),
            })
        })
        .prompt()
        .context("Configuration cancelled")?;

    let bind = Text::new("Dashboard address:")
        .with_default(&current.bind)
        .with_validator(|input: &str| {
            Ok(match input.parse::<std::net::SocketAddr>() {
                Ok(_) => Validation::Valid,
                Err(_) => Validation::Invalid("expected host:port, e.g. 127.0.0.1:8501".into()),
            })
        })
        .prompt()
        .context("Configuration cancelled")?;

    Ok(Config {
        observations_path: PathBuf::from(observations_path),
        forecast_path: PathBuf::from(forecast_path),
        refresh_interval_secs,
        locale,
        bind,
    })
}
