//! HTTP client for the meteofx API.

use std::sync::Arc;
use std::time::Duration;

use meteofx_core::{ClientConfig, NetworkError, ReqwestErrorExt};
use meteofx_currency::ExchangeRateSet;
use meteofx_weather::{find_place, PlaceListItem, WeatherForecast};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::local::LocalStore;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Place not found: {0}")]
    PlaceNotFound(String),

    /// Error reported by the API, with the message it sent.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// `/api/rates` envelope.
#[derive(Debug, Deserialize)]
struct RatesEnvelope {
    success: bool,
    data: Option<ExchangeRateSet>,
    error: Option<String>,
}

/// Error body of the weather endpoints.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    details: Option<String>,
}

/// Forecast fetched for a user query.
#[derive(Debug, Clone)]
pub struct WeatherLookup {
    pub query: String,
    pub forecast: WeatherForecast,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Arc<Client>,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ClientError::Network(e.into_network_error()))?;

        Ok(Self {
            client: Arc::new(client),
            base_url,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(&config.api_url)
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, ClientError> {
        let url = self.url(path)?;
        tracing::debug!("GET {}", url);
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.into_network_error()))
    }

    async fn error_from(response: reqwest::Response) -> ClientError {
        let status = response.status().as_u16();
        match response.json::<ErrorBody>().await {
            Ok(body) => {
                if let Some(details) = body.details {
                    tracing::debug!("API error details: {}", details);
                }
                ClientError::Api {
                    status,
                    message: body.error,
                }
            }
            Err(_) => ClientError::Api {
                status,
                message: format!("API responded with status: {}", status),
            },
        }
    }

    /// Fetch the current exchange rates.
    pub async fn rates(&self) -> Result<ExchangeRateSet, ClientError> {
        let response = self.get("/api/rates").await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ClientError::RateLimited);
        }

        let envelope: RatesEnvelope = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        match envelope {
            RatesEnvelope {
                success: true,
                data: Some(data),
                ..
            } => Ok(data),
            RatesEnvelope { error, .. } => Err(ClientError::Api {
                status: status.as_u16(),
                message: error.unwrap_or_else(|| "Failed to fetch exchange rates".to_string()),
            }),
        }
    }

    pub async fn places(&self) -> Result<Vec<PlaceListItem>, ClientError> {
        let response = self.get("/api/places").await?;
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub async fn forecast(&self, place_code: &str) -> Result<WeatherForecast, ClientError> {
        let code = place_code.trim().to_lowercase();
        let mut url = self.url("/api/weather/")?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(&code);

        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.into_network_error()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ClientError::PlaceNotFound(code)),
            s if s.is_success() => response
                .json()
                .await
                .map_err(|e| ClientError::Decode(e.to_string())),
            _ => Err(Self::error_from(response).await),
        }
    }

    /// Look up weather for a free-text place name and record the search.
    ///
    /// The name is matched case-insensitively against the places list; if the
    /// list is unavailable or has no match, the lowercased query is tried as
    /// a place code.
    pub async fn lookup_weather(
        &self,
        query: &str,
        store: &LocalStore,
    ) -> Result<WeatherLookup, ClientError> {
        let query = query.trim();

        let code = match self.places().await {
            Ok(places) => find_place(&places, query).map(|p| p.code.clone()),
            Err(e) => {
                tracing::warn!("Failed to fetch places: {}", e);
                None
            }
        }
        .unwrap_or_else(|| query.to_lowercase());

        let forecast = self.forecast(&code).await?;

        if let Err(e) = store.add_search(&forecast.place.code, &forecast.place.name) {
            tracing::warn!("Search not saved to history: {}", e);
        }

        Ok(WeatherLookup {
            query: query.to_string(),
            forecast,
        })
    }
}
