//! Exchange-rate fetch pipeline.
//!
//! Sources are tried in order and the first one that answers wins. A source
//! fails on transport errors, timeouts, non-2xx statuses and undecodable
//! bodies; failures are logged and the next source is tried. When all of them
//! fail the static mock set is returned, so `fetch_exchange_rates` always
//! yields a payload. Validation is a separate step ([`validate_rates`]).

use std::sync::Arc;
use std::time::Duration;

use meteofx_core::{RateSourceConfig, RatesConfig, ReqwestErrorExt, SourceTransform};
use reqwest::{header, Client};
use serde_json::{json, Map, Value};
use tracing::instrument;

use crate::error::RatesError;
use crate::mock::mock_rates;
use crate::rates::{validate_rates, ExchangeRateSet};

const USER_AGENT: &str = concat!("meteofx/", env!("CARGO_PKG_VERSION"));

/// One configured rate endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateSource {
    pub name: String,
    pub url: String,
    /// Currency the endpoint quotes against
    pub base: String,
    pub transform: SourceTransform,
}

impl From<&RateSourceConfig> for RateSource {
    fn from(cfg: &RateSourceConfig) -> Self {
        Self {
            name: cfg.name.clone(),
            url: cfg.url.clone(),
            base: cfg.base.clone(),
            transform: cfg.transform,
        }
    }
}

impl RateSource {
    /// Normalize a decoded response into a `{base, rates}` payload.
    pub fn apply_transform(&self, data: Value) -> Result<Value, RatesError> {
        let Value::Object(mut obj) = data else {
            return Err(self.parse_error("body is not a JSON object"));
        };

        match self.transform {
            SourceTransform::Identity => Ok(json!({
                "base": obj.remove("base").unwrap_or(Value::Null),
                "rates": obj.remove("rates").unwrap_or(Value::Null),
            })),
            SourceTransform::InjectBaseRate => {
                let base = match obj.remove("base") {
                    Some(Value::String(s)) => s,
                    _ => self.base.clone(),
                };

                let upstream = match obj.remove("rates") {
                    Some(Value::Object(map)) => map,
                    _ => return Err(self.parse_error("missing `rates` object")),
                };

                // Some APIs omit the base currency from its own rate table.
                let mut rates = Map::with_capacity(upstream.len() + 1);
                rates.insert(base.clone(), json!(1.0));
                rates.extend(upstream);

                Ok(json!({ "base": base, "rates": rates }))
            }
        }
    }

    fn parse_error(&self, message: &str) -> RatesError {
        RatesError::Parse {
            source_name: self.name.clone(),
            message: message.to_string(),
        }
    }
}

/// Where a fetched payload came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateOrigin {
    Source(String),
    Fallback,
}

#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub payload: Value,
    pub origin: RateOrigin,
}

/// Fetches exchange rates from an ordered list of sources.
#[derive(Debug, Clone)]
pub struct RateFetcher {
    client: Arc<Client>,
    sources: Vec<RateSource>,
}

impl RateFetcher {
    pub fn new(sources: Vec<RateSource>, timeout: Duration) -> Result<Self, RatesError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RatesError::Client(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            sources,
        })
    }

    pub fn from_config(config: &RatesConfig) -> Result<Self, RatesError> {
        let sources = config.sources.iter().map(RateSource::from).collect();
        Self::new(sources, Duration::from_secs(config.timeout_secs))
    }

    pub fn sources(&self) -> &[RateSource] {
        &self.sources
    }

    /// Fetch and transform rates from a single source.
    #[instrument(skip(self, source), fields(source = %source.name), level = "debug")]
    pub async fn fetch_from_source(&self, source: &RateSource) -> Result<Value, RatesError> {
        let response = self
            .client
            .get(&source.url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| RatesError::Network(e.into_network_error()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RatesError::Status {
                source_name: source.name.clone(),
                status: status.as_u16(),
            });
        }

        let data: Value = response.json().await.map_err(|e| RatesError::Parse {
            source_name: source.name.clone(),
            message: e.to_string(),
        })?;

        source.apply_transform(data)
    }

    /// Try every source in order; fall back to mock rates if all fail.
    pub async fn fetch_exchange_rates(&self) -> FetchOutcome {
        let mut last_error: Option<RatesError> = None;

        for source in &self.sources {
            match self.fetch_from_source(source).await {
                Ok(payload) => {
                    tracing::debug!("Fetched exchange rates from {}", source.name);
                    return FetchOutcome {
                        payload,
                        origin: RateOrigin::Source(source.name.clone()),
                    };
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch from {}: {}", source.name, e);
                    last_error = Some(e);
                }
            }
        }

        tracing::warn!("All rate sources failed. Using mock data as fallback.");
        if let Some(e) = last_error {
            tracing::error!("Last error: {}", e);
        }

        FetchOutcome {
            payload: mock_rates(),
            origin: RateOrigin::Fallback,
        }
    }

    /// Fetch, then validate. Only a payload that fails validation is an error.
    pub async fn latest(&self) -> Result<ExchangeRateSet, RatesError> {
        let outcome = self.fetch_exchange_rates().await;
        let set = validate_rates(&outcome.payload)?;
        tracing::info!(
            "Serving {} rates (base {}, origin {:?})",
            set.rates.len(),
            set.base,
            outcome.origin
        );
        Ok(set)
    }
}
