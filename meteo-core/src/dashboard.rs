use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    aggregate,
    cache::TtlCache,
    filter::{self, Filters},
    model::{Forecast, Observation},
    source::{Dataset, LoadError, WeatherSource},
    view::{ForecastFailure, ForecastSection, ForecastView, Presenter, Selection, ViewModel},
};

/// Failures that stop a render entirely.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("observations could not be loaded: {0}")]
    Observations(#[from] LoadError),

    #[error("the observation dataset contains no rows")]
    NoObservations,
}

/// Failures confined to the forecast section.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("no forecast rows for {city}, {country}")]
    NoRowsForCity { country: String, city: String },
}

impl ForecastError {
    pub fn failure(&self) -> ForecastFailure {
        match self {
            ForecastError::Load(e) if e.is_not_found() => ForecastFailure::MissingFile,
            ForecastError::Load(LoadError::Read { .. }) => ForecastFailure::Unreadable,
            ForecastError::Load(LoadError::Parse { .. }) => ForecastFailure::Unparseable,
            ForecastError::NoRowsForCity { .. } => ForecastFailure::NoRowsForCity,
        }
    }
}

/// Loads, caches and renders both datasets.
///
/// Each call to [`Dashboard::render`] is a full, independent render of the
/// page for one set of filters; the only state shared between calls is the
/// cached tables.
#[derive(Debug)]
pub struct Dashboard<S> {
    source: S,
    presenter: Presenter,
    observations: Mutex<TtlCache<Vec<Observation>>>,
    forecasts: Mutex<TtlCache<Vec<Forecast>>>,
}

impl<S: WeatherSource> Dashboard<S> {
    pub fn new(source: S, presenter: Presenter, refresh_interval: Duration) -> Self {
        Self {
            source,
            presenter,
            observations: Mutex::new(TtlCache::new(refresh_interval)),
            forecasts: Mutex::new(TtlCache::new(refresh_interval)),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn render(&self, filters: &Filters) -> Result<ViewModel, DashboardError> {
        self.render_at(filters, Instant::now()).await
    }

    /// Render as of `now`, which decides whether cached tables are stale.
    pub async fn render_at(
        &self,
        filters: &Filters,
        now: Instant,
    ) -> Result<ViewModel, DashboardError> {
        let observations = self.observations(now).await?;

        let countries = filter::country_options(&observations);
        let country = filter::choose(&countries, filters.country.as_ref())
            .ok_or(DashboardError::NoObservations)?
            .clone();

        let cities = filter::city_options(&observations, &country);
        let city = filter::choose(&cities, filters.city.as_ref())
            .ok_or(DashboardError::NoObservations)?
            .clone();

        let city_rows = filter::select_city(&observations, &country, &city);
        let summary = aggregate::summarize(&city_rows).ok_or(DashboardError::NoObservations)?;
        debug!(%country, %city, rows = city_rows.len(), "rendering dashboard");

        let forecast = match self.forecast(&country, &city, filters, now).await {
            Ok(view) => ForecastSection::Available(view),
            Err(e) => {
                warn!(%country, %city, error = %e, "forecast unavailable");
                self.presenter.forecast_unavailable(e.failure(), &e.to_string())
            }
        };

        Ok(ViewModel {
            current: self.presenter.current_conditions(&summary),
            highlights: self.presenter.highlights(summary.latest),
            map: self.presenter.map(summary.latest),
            history_chart: self.presenter.history_chart(&city, &city_rows),
            forecast,
            selection: Selection {
                countries,
                country,
                cities,
                city,
            },
        })
    }

    async fn forecast(
        &self,
        country: &str,
        city: &str,
        filters: &Filters,
        now: Instant,
    ) -> Result<ForecastView, ForecastError> {
        let forecasts = self.forecasts(now).await?;
        let city_rows = filter::select_city(&forecasts, country, city);

        let days = filter::day_options(&city_rows);
        let no_rows = || ForecastError::NoRowsForCity {
            country: country.to_string(),
            city: city.to_string(),
        };
        let day = *filter::choose(&days, filters.day.as_ref()).ok_or_else(no_rows)?;

        let day_rows = filter::rows_on_day(&city_rows, day);
        let available = filter::hour_bounds(&day_rows).ok_or_else(no_rows)?;
        let hours = filter::clamp_hour_range(filters.from_hour, filters.to_hour, available);
        let selected = filter::rows_in_hour_range(&day_rows, hours);

        Ok(self
            .presenter
            .forecast_view(city, &days, day, available, hours, &selected))
    }

    async fn observations(&self, now: Instant) -> Result<Arc<Vec<Observation>>, LoadError> {
        let mut cache = self.observations.lock().await;
        log_refresh(&*cache, now, Dataset::Observations);
        cache.get_or_refresh(now, || self.source.load_observations()).await
    }

    async fn forecasts(&self, now: Instant) -> Result<Arc<Vec<Forecast>>, LoadError> {
        let mut cache = self.forecasts.lock().await;
        log_refresh(&*cache, now, Dataset::Forecasts);
        cache.get_or_refresh(now, || self.source.load_forecasts()).await
    }

    /// Drop both cached tables so the next render reloads them.
    pub async fn invalidate(&self) {
        self.observations.lock().await.invalidate();
        self.forecasts.lock().await.invalidate();
    }
}

fn log_refresh<T>(cache: &TtlCache<T>, now: Instant, dataset: Dataset) {
    if !cache.is_fresh(now) {
        debug!(%dataset, ttl_secs = cache.ttl().as_secs(), "cache miss, loading");
    }
}
