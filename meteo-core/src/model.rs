use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, de};

/// One reading for a city at a point in time.
///
/// Both tables (observations and the hourly forecast) share this shape.
/// Column names follow the CSV headers; the Rust field names are the
/// descriptive ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRow {
    pub country: String,
    pub city: String,

    #[serde(rename = "date", deserialize_with = "de_timestamp")]
    pub timestamp: NaiveDateTime,

    /// Degrees Celsius.
    #[serde(rename = "temp")]
    pub temperature: f64,

    /// Relative humidity, 0–100.
    pub humidity: f64,

    /// Meters.
    pub visibility: f64,

    pub wind_speed: f64,

    /// Degrees.
    #[serde(rename = "wind_deg")]
    pub wind_direction: f64,

    pub description: String,

    #[serde(deserialize_with = "de_timestamp")]
    pub sunrise: NaiveDateTime,

    #[serde(deserialize_with = "de_timestamp")]
    pub sunset: NaiveDateTime,

    pub latitude: f64,
    pub longitude: f64,
}

/// A recorded reading.
pub type Observation = WeatherRow;

/// A predicted hourly reading.
pub type Forecast = WeatherRow;

impl WeatherRow {
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn is_in(&self, country: &str, city: &str) -> bool {
        self.country == country && self.city == city
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse the timestamp spellings found in the data files.
///
/// Zoned values (RFC 3339) are converted to their UTC wall clock; everything
/// else is taken as-is.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Some(ts) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(ts);
    }

    if let Ok(zoned) = DateTime::parse_from_rfc3339(raw) {
        return Some(zoned.naive_utc());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn de_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| de::Error::custom(format!("unrecognized timestamp '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_space_and_t_separated_timestamps() {
        let a = parse_timestamp("2025-06-01 14:30:00").expect("space separated");
        let b = parse_timestamp("2025-06-01T14:30:00").expect("T separated");
        assert_eq!(a, b);
        assert_eq!(a.hour(), 14);
    }

    #[test]
    fn parses_fractional_seconds_and_minutes_only() {
        let ts = parse_timestamp("2025-06-01 06:05:09.250").expect("fractional");
        assert_eq!(ts.second(), 9);

        let ts = parse_timestamp("2025-06-01 06:05").expect("minutes only");
        assert_eq!(ts.minute(), 5);
    }

    #[test]
    fn zoned_timestamps_become_utc_wall_clock() {
        let ts = parse_timestamp("2025-06-01T14:00:00+02:00").expect("rfc3339");
        assert_eq!(ts.hour(), 12);
    }

    #[test]
    fn bare_date_is_midnight() {
        let ts = parse_timestamp("2025-06-01").expect("bare date");
        assert_eq!(ts.hour(), 0);
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date"));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
