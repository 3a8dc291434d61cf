use crate::cache::TtlCache;
use crate::types::{PlaceListItem, WeatherError};
use meteofx_core::{ReqwestErrorExt, WeatherConfig};
use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

const USER_AGENT: &str = concat!("meteofx/", env!("CARGO_PKG_VERSION"));

/// Client for the meteo.lt places and forecast endpoints.
///
/// Responses are cached in memory; clones share the same caches.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    places: Arc<TtlCache<(), Value>>,
    forecasts: Arc<TtlCache<String, Value>>,
}

impl WeatherProvider {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        cache_ttl: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WeatherError::Client(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            places: Arc::new(TtlCache::new(cache_ttl)),
            forecasts: Arc::new(TtlCache::new(cache_ttl)),
        })
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self, WeatherError> {
        Self::new(
            config.api_base_url.clone(),
            Duration::from_secs(config.timeout_secs),
            Duration::from_secs(config.cache_ttl_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(&self, url: &str) -> Result<(StatusCode, Option<Value>), WeatherError> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.into_network_error()))?;

        let status = response.status();
        tracing::debug!("Weather API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Weather API error ({}): {}", status, body);
            return Ok((status, None));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;
        Ok((status, Some(body)))
    }

    /// The places payload as received from the provider.
    #[instrument(skip(self), level = "debug")]
    pub async fn places_raw(&self) -> Result<Value, WeatherError> {
        if let Some(cached) = self.places.get(&()) {
            return Ok(cached);
        }

        let url = format!("{}/places", self.base_url);
        let (status, body) = self.get_json(&url).await?;
        let Some(body) = body else {
            return Err(WeatherError::Status(status.as_u16()));
        };

        if let Some(list) = body.as_array() {
            tracing::info!("Fetched {} places successfully", list.len());
        }
        self.places.insert((), body.clone());
        Ok(body)
    }

    /// List every place the provider knows about.
    pub async fn places(&self) -> Result<Vec<PlaceListItem>, WeatherError> {
        let body = self.places_raw().await?;
        serde_json::from_value(body).map_err(|e| WeatherError::Parse(e.to_string()))
    }

    /// Fetch the long-term forecast for a place code.
    ///
    /// The code is lowercased before the request; the payload is returned
    /// as received.
    #[instrument(skip(self), level = "debug")]
    pub async fn long_term_forecast(&self, place_code: &str) -> Result<Value, WeatherError> {
        let code = place_code.trim().to_lowercase();
        if code.is_empty() {
            return Err(WeatherError::InvalidPlaceCode);
        }

        if let Some(cached) = self.forecasts.get(&code) {
            return Ok(cached);
        }

        let url = format!("{}/places/{}/forecasts/long-term", self.base_url, code);
        let (status, body) = self.get_json(&url).await?;
        let forecast = match body {
            Some(forecast) => forecast,
            None if status == StatusCode::NOT_FOUND => {
                return Err(WeatherError::PlaceNotFound(code));
            }
            None => return Err(WeatherError::Status(status.as_u16())),
        };

        tracing::info!("Weather data fetched successfully for: {}", code);
        self.forecasts.insert(code, forecast.clone());
        Ok(forecast)
    }
}

/// Case-insensitive exact match of `query` against place names.
pub fn find_place<'a>(places: &'a [PlaceListItem], query: &str) -> Option<&'a PlaceListItem> {
    let needle = query.trim().to_lowercase();
    places.iter().find(|p| p.name.to_lowercase() == needle)
}
