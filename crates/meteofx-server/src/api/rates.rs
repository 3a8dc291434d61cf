use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use meteofx_currency::ExchangeRateSet;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const CACHE_CONTROL: &str = "public, s-maxage=3600, stale-while-revalidate=7200";
const ANONYMOUS: &str = "anonymous";

#[derive(Serialize)]
struct RatesResponse {
    success: bool,
    data: ExchangeRateSet,
}

/// Rate limit key: the raw `x-forwarded-for` value, or `anonymous`.
fn client_identifier(headers: &HeaderMap) -> &str {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(ANONYMOUS)
}

async fn get_rates(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let identifier = client_identifier(&headers);
    if !state.rate_limiter.check(identifier) {
        tracing::warn!("Rate limit exceeded for {}", identifier);
        return Err(ApiError::RateLimited);
    }

    let data = state.rate_fetcher.latest().await?;

    Ok((
        [
            (header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL)),
            (
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ),
        ],
        Json(RatesResponse {
            success: true,
            data,
        }),
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/rates", get(get_rates))
}
