//! Turns selected rows and aggregates into display-ready values.
//!
//! Everything a front-end shows is formatted here, so the web page and the
//! terminal renderer print the same strings.

use chrono::{Locale, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;

use crate::{
    aggregate::{self, CitySummary},
    filter::HourRange,
    model::WeatherRow,
};

pub const MAP_ZOOM: u8 = 6;

const LONG_DATETIME: &str = "%A %d %B %Y, %H:%M";
const LONG_DATE: &str = "%A %d %B %Y";
const CLOCK: &str = "%H:%M";
const TABLE_DATETIME: &str = "%Y-%m-%d %H:%M:%S";

pub const FORECAST_COLUMNS: [&str; 9] = [
    "date",
    "temp",
    "humidity",
    "wind_speed",
    "wind_deg",
    "visibility",
    "sunrise",
    "sunset",
    "description",
];

/// Everything one render of the dashboard shows.
#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    pub selection: Selection,
    pub current: CurrentConditions,
    pub highlights: Highlights,
    pub map: MapView,
    pub history_chart: LineChart,
    pub forecast: ForecastSection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub countries: Vec<String>,
    pub country: String,
    pub cities: Vec<String>,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub temperature: String,
    pub description: String,
    pub max_temp: String,
    pub min_temp: String,
    pub observed_at: String,
    pub place: String,
    pub coordinates: String,
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
    /// 0–100, for metrics drawn with a progress bar.
    pub progress: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlights {
    pub humidity: Metric,
    pub visibility: Metric,
    pub wind_direction: Metric,
    pub wind_speed: Metric,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub time: NaiveDateTime,
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub markers: bool,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayOption {
    pub value: NaiveDate,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastView {
    pub heading: String,
    pub days: Vec<DayOption>,
    pub day: NaiveDate,
    /// Hours present on the selected day; the range selector's limits.
    pub available_hours: HourRange,
    pub hours: HourRange,
    pub table: ForecastTable,
    pub chart: LineChart,
}

/// Why the forecast section could not be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastFailure {
    MissingFile,
    Unreadable,
    Unparseable,
    NoRowsForCity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ForecastSection {
    Available(ForecastView),
    Unavailable {
        failure: ForecastFailure,
        warning: String,
    },
}

/// Formats values with a fixed locale.
#[derive(Debug, Clone, Copy)]
pub struct Presenter {
    locale: Locale,
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new(Locale::en_US)
    }
}

impl Presenter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    fn localized(&self, ts: NaiveDateTime, fmt: &str) -> String {
        Utc.from_utc_datetime(&ts)
            .format_localized(fmt, self.locale)
            .to_string()
    }

    pub fn long_datetime(&self, ts: NaiveDateTime) -> String {
        self.localized(ts, LONG_DATETIME)
    }

    pub fn long_date(&self, day: NaiveDate) -> String {
        self.localized(day.and_time(chrono::NaiveTime::MIN), LONG_DATE)
    }

    pub fn clock(&self, ts: NaiveDateTime) -> String {
        self.localized(ts, CLOCK)
    }

    pub fn current_conditions(&self, summary: &CitySummary<'_>) -> CurrentConditions {
        let latest = summary.latest;
        CurrentConditions {
            temperature: format!("{} °C", fmt_float(latest.temperature)),
            description: capitalize(&latest.description),
            max_temp: format!("Max : {:.1} °C", summary.max_temp),
            min_temp: format!("Min : {:.1} °C", summary.min_temp),
            observed_at: self.long_datetime(latest.timestamp),
            place: format!("{}, {}", latest.city, latest.country),
            coordinates: format!("Lat: {:.2} | Lon: {:.2}", latest.latitude, latest.longitude),
            sunrise: self.clock(latest.sunrise),
            sunset: self.clock(latest.sunset),
        }
    }

    pub fn highlights(&self, latest: &WeatherRow) -> Highlights {
        let km = aggregate::visibility_km(latest.visibility);
        Highlights {
            humidity: Metric {
                label: "Humidity".to_string(),
                value: format!("{} %", latest.humidity),
                progress: Some(aggregate::humidity_progress(latest.humidity)),
            },
            visibility: Metric {
                label: "Visibility".to_string(),
                value: format!("{km:.1} km"),
                progress: Some(aggregate::visibility_progress(km)),
            },
            wind_direction: Metric {
                label: "Direction".to_string(),
                value: format!("{}°", latest.wind_direction),
                progress: None,
            },
            wind_speed: Metric {
                label: "Speed".to_string(),
                value: format!("{} km/h", fmt_float(latest.wind_speed)),
                progress: None,
            },
        }
    }

    pub fn map(&self, latest: &WeatherRow) -> MapView {
        MapView {
            latitude: latest.latitude,
            longitude: latest.longitude,
            zoom: MAP_ZOOM,
        }
    }

    pub fn history_chart(&self, city: &str, rows: &[&WeatherRow]) -> LineChart {
        temperature_chart(format!("Temperature trend in {city}"), rows)
    }

    pub fn forecast_view(
        &self,
        city: &str,
        days: &[NaiveDate],
        day: NaiveDate,
        available_hours: HourRange,
        hours: HourRange,
        rows: &[&WeatherRow],
    ) -> ForecastView {
        ForecastView {
            heading: format!(
                "Forecast for {city} on {} between {}h and {}h",
                self.long_date(day),
                hours.start,
                hours.end
            ),
            days: days
                .iter()
                .map(|d| DayOption {
                    value: *d,
                    label: self.long_date(*d),
                })
                .collect(),
            day,
            available_hours,
            hours,
            table: self.forecast_table(rows),
            chart: temperature_chart("Hourly temperature forecast".to_string(), rows),
        }
    }

    pub fn forecast_table(&self, rows: &[&WeatherRow]) -> ForecastTable {
        ForecastTable {
            columns: FORECAST_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| {
                    vec![
                        r.timestamp.format(TABLE_DATETIME).to_string(),
                        fmt_float(r.temperature),
                        r.humidity.to_string(),
                        fmt_float(r.wind_speed),
                        r.wind_direction.to_string(),
                        r.visibility.to_string(),
                        r.sunrise.format(TABLE_DATETIME).to_string(),
                        r.sunset.format(TABLE_DATETIME).to_string(),
                        r.description.clone(),
                    ]
                })
                .collect(),
        }
    }

    pub fn forecast_unavailable(&self, failure: ForecastFailure, reason: &str) -> ForecastSection {
        ForecastSection::Unavailable {
            failure,
            warning: format!("No forecast available. Error: {reason}"),
        }
    }
}

fn temperature_chart(title: String, rows: &[&WeatherRow]) -> LineChart {
    LineChart {
        title,
        x_label: "Time".to_string(),
        y_label: "Temperature (°C)".to_string(),
        markers: true,
        points: rows
            .iter()
            .map(|r| ChartPoint {
                time: r.timestamp,
                temperature: r.temperature,
            })
            .collect(),
    }
}

/// Decimal measurement as the source table shows it: whole values keep
/// their `.0`, anything else prints in its shortest form.
pub fn fmt_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
