use anyhow::{Context, Result, anyhow};
use chrono::Locale;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_OBSERVATIONS_PATH: &str = "weather_data_umoa.csv";
pub const DEFAULT_FORECAST_PATH: &str = "previsions_meteo_7jours_horaire.csv";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_LOCALE: &str = "en_US";
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// observations_path = "weather_data_umoa.csv"
/// forecast_path = "previsions_meteo_7jours_horaire.csv"
/// refresh_interval_secs = 3600
/// locale = "fr_FR"
/// bind = "0.0.0.0:8501"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Observation table, relative to the working directory unless absolute.
    pub observations_path: PathBuf,

    /// Hourly forecast table.
    pub forecast_path: PathBuf,

    /// How long a loaded table is served before it is read again.
    pub refresh_interval_secs: u64,

    /// Locale used for weekday and month names, e.g. "en_US" or "fr_FR".
    pub locale: String,

    /// Address the web dashboard listens on.
    pub bind: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            observations_path: PathBuf::from(DEFAULT_OBSERVATIONS_PATH),
            forecast_path: PathBuf::from(DEFAULT_FORECAST_PATH),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            locale: DEFAULT_LOCALE.to_string(),
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl Config {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn chrono_locale(&self) -> Result<Locale> {
        Locale::try_from(self.locale.as_str()).map_err(|_| {
            anyhow!(
                "Unknown locale '{}'.\n\
                 Hint: use a POSIX locale name such as \"en_US\" or \"fr_FR\".",
                self.locale
            )
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", self.bind))
    }

    /// Check the fields that are parsed lazily elsewhere.
    pub fn validate(&self) -> Result<()> {
        self.chrono_locale()?;
        self.socket_addr()?;
        Ok(())
    }

    /// Load config from the platform config directory, or return defaults
    /// if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load config from an explicit path, or return defaults if it doesn't
    /// exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "meteo", "meteo-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
