//! The selection chain: country → city → day → hour range.
//!
//! Every step narrows the rows the next step sees, and the options offered at
//! each step come from whatever the previous step left behind.

use chrono::{NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::WeatherRow;

/// What the user picked. Anything left out (or no longer offered) falls back
/// to the first available option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub country: Option<String>,
    pub city: Option<String>,
    pub day: Option<NaiveDate>,
    #[serde(rename = "from")]
    pub from_hour: Option<u32>,
    #[serde(rename = "to")]
    pub to_hour: Option<u32>,
}

/// Inclusive range of hours of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRange {
    pub start: u32,
    pub end: u32,
}

impl HourRange {
    pub fn contains(&self, hour: u32) -> bool {
        self.start <= hour && hour <= self.end
    }
}

pub fn country_options(rows: &[WeatherRow]) -> Vec<String> {
    rows.iter()
        .map(|r| r.country.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

pub fn city_options(rows: &[WeatherRow], country: &str) -> Vec<String> {
    rows.iter()
        .filter(|r| r.country == country)
        .map(|r| r.city.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// The requested option when it is on offer, otherwise the first one.
pub fn choose<'a, T: PartialEq>(options: &'a [T], requested: Option<&T>) -> Option<&'a T> {
    requested
        .and_then(|want| options.iter().find(|o| *o == want))
        .or_else(|| options.first())
}

/// Rows of one city, oldest first. Rows sharing a timestamp keep file order.
pub fn select_city<'a>(rows: &'a [WeatherRow], country: &str, city: &str) -> Vec<&'a WeatherRow> {
    let mut selected: Vec<&WeatherRow> = rows.iter().filter(|r| r.is_in(country, city)).collect();
    selected.sort_by_key(|r| r.timestamp);
    selected
}

pub fn day_options(rows: &[&WeatherRow]) -> Vec<NaiveDate> {
    rows.iter()
        .map(|r| r.day())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn rows_on_day<'a>(rows: &[&'a WeatherRow], day: NaiveDate) -> Vec<&'a WeatherRow> {
    rows.iter().copied().filter(|r| r.day() == day).collect()
}

/// Lowest and highest hour present, `None` for no rows.
pub fn hour_bounds(rows: &[&WeatherRow]) -> Option<HourRange> {
    let start = rows.iter().map(|r| r.timestamp.hour()).min()?;
    let end = rows.iter().map(|r| r.timestamp.hour()).max()?;
    Some(HourRange { start, end })
}

/// Resolve a requested range against the hours actually available.
///
/// Missing bounds default to the available ones, reversed bounds are swapped,
/// and both ends are clamped into `available`.
pub fn clamp_hour_range(from: Option<u32>, to: Option<u32>, available: HourRange) -> HourRange {
    let mut start = from.unwrap_or(available.start);
    let mut end = to.unwrap_or(available.end);
    if start > end {
        std::mem::swap(&mut start, &mut end);
    }

    HourRange {
        start: start.clamp(available.start, available.end),
        end: end.clamp(available.start, available.end),
    }
}

pub fn rows_in_hour_range<'a>(rows: &[&'a WeatherRow], range: HourRange) -> Vec<&'a WeatherRow> {
    rows.iter()
        .copied()
        .filter(|r| range.contains(r.timestamp.hour()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::sample_row;

    fn rows() -> Vec<WeatherRow> {
        vec![
            sample_row("Senegal", "Dakar", "2025-06-01 15:00", 26.0),
            sample_row("Mali", "Bamako", "2025-06-01 12:00", 36.0),
            sample_row("Senegal", "Thiès", "2025-06-01 12:00", 28.0),
            sample_row("Senegal", "Dakar", "2025-06-01 09:00", 23.0),
            sample_row("Benin", "Cotonou", "2025-06-01 12:00", 29.0),
        ]
    }

    #[test]
    fn countries_are_unique_and_sorted() {
        assert_eq!(country_options(&rows()), vec!["Benin", "Mali", "Senegal"]);
    }

    #[test]
    fn cities_come_from_the_selected_country_only() {
        assert_eq!(city_options(&rows(), "Senegal"), vec!["Dakar", "Thiès"]);
        assert!(city_options(&rows(), "Togo").is_empty());
    }

    #[test]
    fn choose_falls_back_to_first_option() {
        let options = vec!["a".to_string(), "b".to_string()];
        assert_eq!(choose(&options, Some(&"b".to_string())), Some(&options[1]));
        assert_eq!(choose(&options, Some(&"z".to_string())), Some(&options[0]));
        assert_eq!(choose(&options, None), Some(&options[0]));
        assert_eq!(choose::<String>(&[], None), None);
    }

    #[test]
    fn city_rows_are_time_ordered_and_belong_to_the_pair() {
        let data = rows();
        let dakar = select_city(&data, "Senegal", "Dakar");

        assert_eq!(dakar.len(), 2);
        assert!(dakar.iter().all(|r| r.is_in("Senegal", "Dakar")));
        assert!(dakar[0].timestamp < dakar[1].timestamp);
    }

    #[test]
    fn days_are_chronological() {
        let data = vec![
            sample_row("Senegal", "Dakar", "2025-06-03 00:00", 25.0),
            sample_row("Senegal", "Dakar", "2025-06-01 00:00", 25.0),
            sample_row("Senegal", "Dakar", "2025-06-01 05:00", 25.0),
            sample_row("Senegal", "Dakar", "2025-06-02 00:00", 25.0),
        ];
        let refs: Vec<&WeatherRow> = data.iter().collect();
        let days: Vec<String> = day_options(&refs).iter().map(|d| d.to_string()).collect();

        assert_eq!(days, vec!["2025-06-01", "2025-06-02", "2025-06-03"]);
    }

    #[test]
    fn hour_range_is_inclusive_for_the_selected_day() {
        let data: Vec<WeatherRow> = (0..24)
            .flat_map(|h| {
                [
                    sample_row("Senegal", "Dakar", &format!("2025-06-01 {h:02}:00"), h as f64),
                    sample_row("Senegal", "Dakar", &format!("2025-06-02 {h:02}:00"), h as f64),
                ]
            })
            .collect();
        let refs: Vec<&WeatherRow> = data.iter().collect();
        let day = NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date");

        let on_day = rows_on_day(&refs, day);
        assert_eq!(on_day.len(), 24);

        let range = HourRange { start: 6, end: 9 };
        let selected = rows_in_hour_range(&on_day, range);

        let hours: Vec<u32> = selected.iter().map(|r| r.timestamp.hour()).collect();
        assert_eq!(hours, vec![6, 7, 8, 9]);
        assert!(selected.iter().all(|r| r.day() == day));
    }

    #[test]
    fn hour_bounds_of_a_partial_day() {
        let data = vec![
            sample_row("Senegal", "Dakar", "2025-06-07 03:00", 25.0),
            sample_row("Senegal", "Dakar", "2025-06-07 17:00", 25.0),
            sample_row("Senegal", "Dakar", "2025-06-07 11:00", 25.0),
        ];
        let refs: Vec<&WeatherRow> = data.iter().collect();

        assert_eq!(hour_bounds(&refs), Some(HourRange { start: 3, end: 17 }));
        assert_eq!(hour_bounds(&[]), None);
    }

    #[test]
    fn requested_range_is_clamped_and_normalized() {
        let available = HourRange { start: 3, end: 17 };

        assert_eq!(clamp_hour_range(None, None, available), available);
        assert_eq!(clamp_hour_range(Some(0), Some(23), available), available);
        assert_eq!(
            clamp_hour_range(Some(12), Some(5), available),
            HourRange { start: 5, end: 12 }
        );
        assert_eq!(
            clamp_hour_range(Some(20), None, available),
            HourRange { start: 17, end: 17 }
        );
    }
}
