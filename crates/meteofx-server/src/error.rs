use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use meteofx_core::AppError;
use meteofx_currency::RatesError;
use meteofx_weather::WeatherError;
use serde_json::json;
use thiserror::Error;

/// Errors returned by API handlers.
///
/// The weather endpoints answer `{error, details?}`; the rates endpoint wraps
/// its errors in the `{success: false, error}` envelope.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    /// Upstream failure on a weather endpoint.
    #[error("{error}: {details}")]
    Upstream { error: &'static str, details: String },
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,
    /// Failure on the rates endpoint.
    #[error("{0}")]
    Rates(String),
}

impl ApiError {
    pub fn from_weather(err: WeatherError, error: &'static str) -> Self {
        match err {
            WeatherError::InvalidPlaceCode => ApiError::BadRequest(err.to_string()),
            WeatherError::PlaceNotFound(_) => {
                ApiError::NotFound(AppError::from(err).user_message().to_string())
            }
            other => ApiError::Upstream {
                error,
                details: other.to_string(),
            },
        }
    }
}

impl From<RatesError> for ApiError {
    fn from(err: RatesError) -> Self {
        ApiError::Rates(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::Upstream { error, details } => {
                tracing::error!("{}: {}", error, details);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": error, "details": details }),
                )
            }
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({ "success": false, "error": self.to_string() }),
            ),
            ApiError::Rates(msg) => {
                tracing::error!("Error in exchange rates API: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "error": msg }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_weather_error_mapping() {
        assert!(matches!(
            ApiError::from_weather(WeatherError::InvalidPlaceCode, "x"),
            ApiError::BadRequest(ref m) if m == "Place code is required"
        ));
        assert!(matches!(
            ApiError::from_weather(WeatherError::PlaceNotFound("a".into()), "x"),
            ApiError::NotFound(ref m) if m == "Place not found"
        ));
        assert!(matches!(
            ApiError::from_weather(WeatherError::Status(502), "Failed to fetch weather data"),
            ApiError::Upstream { error: "Failed to fetch weather data", ref details }
                if details == "API responded with status: 502"
        ));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::RateLimited.into_response().status(), 429);
        assert_eq!(ApiError::Rates("x".into()).into_response().status(), 500);
        assert_eq!(ApiError::NotFound("x".into()).into_response().status(), 404);
    }
}
