//! Plain-text rendering for terminal output.

use chrono::{DateTime, NaiveDate, Utc};
use meteofx_currency::{
    currency::{format_amount, format_currency_display},
    ConversionRecord, ExchangeRateSet, CURRENCIES,
};
use meteofx_services::SearchHistoryEntry;
use meteofx_weather::{wind_direction, ForecastTimestamp};

const RATE_DECIMALS: usize = 4;

fn format_millis(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "unknown time".to_string())
}

/// `$100.00 = €92.00`
pub fn conversion_line(record: &ConversionRecord) -> String {
    format!(
        "{} = {}",
        format_currency_display(record.amount, &record.from),
        format_currency_display(record.result, &record.to)
    )
}

/// `1 USD = 0.9200 EUR`
pub fn rate_line(record: &ConversionRecord) -> String {
    format!(
        "1 {} = {} {}",
        record.from,
        format_amount(record.rate, RATE_DECIMALS),
        record.to
    )
}

pub fn history_lines(history: &[ConversionRecord]) -> Vec<String> {
    history
        .iter()
        .enumerate()
        .map(|(i, record)| {
            format!(
                "{:>2}. {}  ({})",
                i + 1,
                conversion_line(record),
                format_millis(record.timestamp)
            )
        })
        .collect()
}

/// Supported currencies in display order, favorites marked with `*`.
pub fn rates_lines(rates: &ExchangeRateSet, favorites: &[String]) -> Vec<String> {
    let mut lines = vec![format!("Base: {}  ({})", rates.base, format_millis(rates.timestamp))];
    for currency in CURRENCIES.iter() {
        let Some(rate) = rates.rate(currency.code) else {
            continue;
        };
        let mark = if favorites.iter().any(|f| f == currency.code) {
            "*"
        } else {
            " "
        };
        lines.push(format!(
            "{} {}  {:<18} {:>14}",
            mark,
            currency.code,
            currency.name,
            format_amount(rate, RATE_DECIMALS)
        ));
    }
    lines
}

pub fn current_weather_lines(place_name: &str, ts: &ForecastTimestamp) -> Vec<String> {
    vec![
        format!(
            "{}  {}",
            place_name,
            ts.forecast_time_utc.format("%a, %b %-d at %H:%M UTC")
        ),
        format!(
            "{} {}°C  {}",
            ts.condition_code.icon(),
            ts.air_temperature.round(),
            ts.condition_code.description()
        ),
        format!("Feels like {}°C", ts.feels_like_temperature.round()),
        format!(
            "Wind {} m/s {}  Humidity {}%  Pressure {} hPa",
            ts.wind_speed,
            wind_direction(ts.wind_direction),
            ts.relative_humidity,
            ts.sea_level_pressure
        ),
        format!(
            "Precipitation {} mm  Cloud cover {}%",
            ts.total_precipitation, ts.cloud_cover
        ),
    ]
}

pub fn daily_line(date: NaiveDate, ts: &ForecastTimestamp) -> String {
    format!(
        "{}  {} {:>4}°C  {:<30} 💨 {} m/s  💧 {}%  🌧️ {} mm",
        date.format("%a, %b %-d"),
        ts.condition_code.icon(),
        ts.air_temperature.round(),
        ts.condition_code.description(),
        ts.wind_speed,
        ts.relative_humidity,
        ts.total_precipitation
    )
}

pub fn search_lines(history: &[SearchHistoryEntry]) -> Vec<String> {
    history
        .iter()
        .map(|e| format!("{} ({})  {}", e.city_name, e.city_code, format_millis(e.timestamp)))
        .collect()
}
