use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

async fn get_places(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let places = state
        .weather
        .places_raw()
        .await
        .map_err(|e| ApiError::from_weather(e, "Failed to fetch places"))?;
    Ok(Json(places))
}

async fn get_forecast(
    Path(place_code): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Value>> {
    let forecast = state
        .weather
        .long_term_forecast(&place_code)
        .await
        .map_err(|e| ApiError::from_weather(e, "Failed to fetch weather data"))?;
    Ok(Json(forecast))
}

/// A request without a code never reaches the `{placeCode}` route.
async fn missing_place_code() -> ApiError {
    ApiError::BadRequest("Place code is required".to_string())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/places", get(get_places))
        .route("/weather", get(missing_place_code))
        .route("/weather/", get(missing_place_code))
        .route("/weather/{place_code}", get(get_forecast))
}
