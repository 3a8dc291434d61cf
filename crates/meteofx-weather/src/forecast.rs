//! Helpers for presenting forecast readings.

use crate::types::ForecastTimestamp;
use chrono::{NaiveDate, Timelike};
use std::collections::BTreeMap;

const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// 8-point compass label for a wind direction in degrees.
pub fn wind_direction(degrees: f64) -> &'static str {
    let index = (degrees / 45.0).round() as i64;
    COMPASS[index.rem_euclid(8) as usize]
}

/// Group readings by UTC calendar day, preserving order within each day.
pub fn group_by_day(timestamps: &[ForecastTimestamp]) -> BTreeMap<NaiveDate, Vec<&ForecastTimestamp>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<&ForecastTimestamp>> = BTreeMap::new();
    for ts in timestamps {
        grouped
            .entry(ts.forecast_time_utc.date_naive())
            .or_default()
            .push(ts);
    }
    grouped
}

/// Pick the reading that stands for a whole day: the first one between
/// 11:00 and 13:00, otherwise the middle one.
pub fn daily_representative<'a>(day: &[&'a ForecastTimestamp]) -> Option<&'a ForecastTimestamp> {
    if day.is_empty() {
        return None;
    }

    day.iter()
        .copied()
        .find(|ts| (11..=13).contains(&ts.forecast_time_utc.hour()))
        .or_else(|| day.get(day.len() / 2).copied())
}

/// One representative reading per day for the `days` days after the first.
pub fn upcoming_days(timestamps: &[ForecastTimestamp], days: usize) -> Vec<(NaiveDate, &ForecastTimestamp)> {
    group_by_day(timestamps)
        .into_iter()
        .skip(1)
        .take(days)
        .filter_map(|(date, day)| daily_representative(&day).map(|ts| (date, ts)))
        .collect()
}
