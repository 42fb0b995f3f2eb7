use crate::model::{Forecast, Observation};
use async_trait::async_trait;
use std::{
    fmt::Debug,
    io,
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
};
use thiserror::Error;

pub mod csv;

pub use self::csv::CsvSource;

/// The two tables the dashboard reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Observations,
    Forecasts,
}

impl Dataset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Observations => "observations",
            Dataset::Forecasts => "forecasts",
        }
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ::csv::Error,
    },
}

impl LoadError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::Read { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn load_observations(&self) -> Result<Vec<Observation>, LoadError>;
    async fn load_forecasts(&self) -> Result<Vec<Forecast>, LoadError>;
}

/// Tables held in memory. A missing forecast table behaves like a missing
/// file.
#[derive(Debug, Default)]
pub struct InMemorySource {
    observations: Vec<Observation>,
    forecasts: Option<Vec<Forecast>>,
    loads: AtomicUsize,
}

impl InMemorySource {
    pub fn new(observations: Vec<Observation>, forecasts: Option<Vec<Forecast>>) -> Self {
        Self {
            observations,
            forecasts,
            loads: AtomicUsize::new(0),
        }
    }

    /// Number of table loads served so far, both datasets combined.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl WeatherSource for InMemorySource {
    async fn load_observations(&self) -> Result<Vec<Observation>, LoadError> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        Ok(self.observations.clone())
    }

    async fn load_forecasts(&self) -> Result<Vec<Forecast>, LoadError> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        self.forecasts.clone().ok_or_else(|| LoadError::Read {
            path: PathBuf::from("<memory>"),
            source: io::Error::new(io::ErrorKind::NotFound, "no forecast table"),
        })
    }
}

/// Build a row with plausible defaults; tests override what they care about.
#[cfg(test)]
pub(crate) fn sample_row(
    country: &str,
    city: &str,
    timestamp: &str,
    temperature: f64,
) -> crate::model::WeatherRow {
    let ts = crate::model::parse_timestamp(timestamp).expect("valid test timestamp");
    crate::model::WeatherRow {
        country: country.to_string(),
        city: city.to_string(),
        timestamp: ts,
        temperature,
        humidity: 70.0,
        visibility: 10_000.0,
        wind_speed: 12.0,
        wind_direction: 200.0,
        description: "scattered clouds".to_string(),
        sunrise: ts.date().and_hms_opt(6, 45, 0).expect("valid time"),
        sunset: ts.date().and_hms_opt(19, 10, 0).expect("valid time"),
        latitude: 14.69,
        longitude: -17.44,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_names() {
        assert_eq!(Dataset::Observations.to_string(), "observations");
        assert_eq!(Dataset::Forecasts.as_str(), "forecasts");
    }

    #[tokio::test]
    async fn in_memory_source_without_forecasts_reports_not_found() {
        let source =
            InMemorySource::new(vec![sample_row("Senegal", "Dakar", "2025-06-01 12:00", 24.0)], None);

        let rows = source.load_observations().await.expect("observations load");
        assert_eq!(rows.len(), 1);

        let err = source.load_forecasts().await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("no forecast table"));
        assert_eq!(source.load_count(), 2);
    }
}
