//! HTTP server for meteofx
//!
//! Serves the weather proxy (`/api/places`, `/api/weather/{placeCode}`) and
//! the rate-limited exchange-rate endpoint (`/api/rates`).

pub mod api;
pub mod error;
pub mod rate_limit;
pub mod scheduler;
pub mod state;

pub use api::app_router;
pub use rate_limit::RateLimiter;
pub use state::{build_state, AppState};
