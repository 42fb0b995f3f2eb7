use async_trait::async_trait;
use std::{
    io::Read,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::{
    config::Config,
    model::{Forecast, Observation, WeatherRow},
};

use super::{Dataset, LoadError, WeatherSource};

/// Reads both tables from CSV files on local disk.
#[derive(Debug, Clone)]
pub struct CsvSource {
    observations_path: PathBuf,
    forecast_path: PathBuf,
}

impl CsvSource {
    pub fn new(observations_path: impl Into<PathBuf>, forecast_path: impl Into<PathBuf>) -> Self {
        Self {
            observations_path: observations_path.into(),
            forecast_path: forecast_path.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.observations_path, &config.forecast_path)
    }

    pub fn path(&self, dataset: Dataset) -> &Path {
        match dataset {
            Dataset::Observations => &self.observations_path,
            Dataset::Forecasts => &self.forecast_path,
        }
    }

    async fn load(&self, dataset: Dataset) -> Result<Vec<WeatherRow>, LoadError> {
        let path = self.path(dataset);
        debug!(%dataset, path = %path.display(), "reading dataset");

        let bytes = tokio::fs::read(path).await.map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let rows = parse_rows(bytes.as_slice(), path)?;
        info!(%dataset, rows = rows.len(), path = %path.display(), "dataset loaded");
        Ok(rows)
    }
}

#[async_trait]
impl WeatherSource for CsvSource {
    async fn load_observations(&self) -> Result<Vec<Observation>, LoadError> {
        self.load(Dataset::Observations).await
    }

    async fn load_forecasts(&self) -> Result<Vec<Forecast>, LoadError> {
        self.load(Dataset::Forecasts).await
    }
}

/// Parse a headed CSV table. `origin` only labels errors.
pub fn parse_rows<R: Read>(reader: R, origin: &Path) -> Result<Vec<WeatherRow>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    rdr.deserialize()
        .collect::<Result<Vec<WeatherRow>, _>>()
        .map_err(|source| LoadError::Parse {
            path: origin.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use std::io::Write;

    const HEADER: &str =
        "country,city,date,temp,humidity,visibility,wind_speed,wind_deg,description,sunrise,sunset,latitude,longitude";

    fn table(lines: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for line in lines {
            out.push('\n');
            out.push_str(line);
        }
        out
    }

    #[test]
    fn parses_rows_with_timestamps() {
        let data = table(&[
            "Senegal,Dakar,2025-06-01 12:00:00,24.5,78,10000,14.4,250,few clouds,2025-06-01 06:41:00,2025-06-01 19:38:00,14.69,-17.44",
            "Mali,Bamako,2025-06-01T13:00:00,36,20,8000,9,90,clear sky,2025-06-01 06:02,2025-06-01 19:03,12.65,-8.0",
        ]);

        let rows = parse_rows(data.as_bytes(), Path::new("obs.csv")).expect("valid table");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].city, "Dakar");
        assert_eq!(rows[0].temperature, 24.5);
        assert_eq!(rows[0].sunrise.hour(), 6);
        assert_eq!(rows[1].humidity, 20.0);
        assert_eq!(rows[1].timestamp.hour(), 13);
    }

    #[test]
    fn extra_columns_and_reordering_are_accepted() {
        let data = "city,country,extra,date,temp,humidity,visibility,wind_speed,wind_deg,description,sunrise,sunset,latitude,longitude\n\
                    Dakar,Senegal,ignored,2025-06-01 12:00,24,78,10000,14,250,mist,2025-06-01 06:41,2025-06-01 19:38,14.69,-17.44";

        let rows = parse_rows(data.as_bytes(), Path::new("obs.csv")).expect("valid table");
        assert_eq!(rows[0].country, "Senegal");
        assert_eq!(rows[0].description, "mist");
    }

    #[test]
    fn header_only_table_is_empty() {
        let rows = parse_rows(HEADER.as_bytes(), Path::new("empty.csv")).expect("valid table");
        assert!(rows.is_empty());
    }

    #[test]
    fn bad_timestamp_is_a_parse_error_naming_the_file() {
        let data = table(&[
            "Senegal,Dakar,not-a-date,24,78,10000,14,250,mist,2025-06-01 06:41,2025-06-01 19:38,14.69,-17.44",
        ]);

        let err = parse_rows(data.as_bytes(), Path::new("obs.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        let msg = err.to_string();
        assert!(msg.contains("obs.csv"));
        assert!(msg.contains("not-a-date"));
        assert!(msg.contains("line: 2"));
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = CsvSource::new(dir.path().join("obs.csv"), dir.path().join("fc.csv"));

        let err = source.load_forecasts().await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("fc.csv"));
    }

    #[tokio::test]
    async fn loads_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let obs = dir.path().join("obs.csv");
        let mut f = std::fs::File::create(&obs).expect("create obs file");
        write!(
            f,
            "{}",
            table(&[
                "Senegal,Dakar,2025-06-01 12:00,24,78,10000,14,250,mist,2025-06-01 06:41,2025-06-01 19:38,14.69,-17.44",
            ])
        )
        .expect("write obs file");

        let source = CsvSource::new(&obs, dir.path().join("fc.csv"));
        let rows = source.load_observations().await.expect("observations load");
        assert_eq!(rows.len(), 1);
        assert_eq!(source.path(Dataset::Observations), obs.as_path());
    }
}
