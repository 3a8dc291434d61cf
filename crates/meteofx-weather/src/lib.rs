//! Weather service for meteofx
//!
//! Proxies the meteo.lt public API (places list and long-term forecasts)
//! with an in-memory TTL cache, and provides helpers for presenting
//! forecasts.

pub mod cache;
pub mod forecast;
pub mod provider;
pub mod types;

pub use cache::TtlCache;
pub use forecast::{daily_representative, group_by_day, upcoming_days, wind_direction};
pub use provider::{find_place, WeatherProvider};
pub use types::*;
