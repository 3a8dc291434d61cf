use std::sync::Arc;

use meteofx_core::Config;
use meteofx_currency::RateFetcher;
use meteofx_weather::WeatherProvider;

use crate::rate_limit::RateLimiter;

pub struct AppState {
    pub rate_fetcher: RateFetcher,
    pub weather: WeatherProvider,
    pub rate_limiter: RateLimiter,
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let rate_fetcher = RateFetcher::from_config(&config.rates)?;
    let weather = WeatherProvider::from_config(&config.weather)?;
    let rate_limiter = RateLimiter::from_config(&config.rates.rate_limit);

    tracing::info!(
        "Rate sources: {}",
        rate_fetcher
            .sources()
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    tracing::info!("Weather provider: {}", weather.base_url());

    Ok(Arc::new(AppState {
        rate_fetcher,
        weather,
        rate_limiter,
    }))
}
