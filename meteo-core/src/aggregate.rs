use crate::model::WeatherRow;

/// Headline numbers for one city, computed over its whole series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CitySummary<'a> {
    /// Most recent row; on a timestamp tie, the one that came last.
    pub latest: &'a WeatherRow,
    pub max_temp: f64,
    pub min_temp: f64,
}

pub fn summarize<'a>(rows: &[&'a WeatherRow]) -> Option<CitySummary<'a>> {
    let latest = rows.iter().copied().max_by_key(|r| r.timestamp)?;

    let (min_temp, max_temp) = rows.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), r| (lo.min(r.temperature), hi.max(r.temperature)),
    );

    Some(CitySummary {
        latest,
        max_temp,
        min_temp,
    })
}

pub fn visibility_km(meters: f64) -> f64 {
    meters / 1000.0
}

/// Full bar at 40 km.
const VISIBILITY_PROGRESS_PER_KM: f64 = 2.5;

pub fn humidity_progress(humidity: f64) -> u8 {
    percent(humidity)
}

pub fn visibility_progress(km: f64) -> u8 {
    percent(km * VISIBILITY_PROGRESS_PER_KM)
}

fn percent(value: f64) -> u8 {
    // `as` saturates and maps NaN to 0.
    value.clamp(0.0, 100.0) as u8
}
