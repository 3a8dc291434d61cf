use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod health;
pub mod rates;
pub mod weather;

pub fn app_router(state: Arc<AppState>) -> Router {
    let api = Router::new().merge(weather::router()).merge(rates::router());

    Router::new()
        .nest("/api", api)
        .merge(health::router())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
