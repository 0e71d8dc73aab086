use std::sync::Arc;

use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use crate::{
    middleware::{catch_panic_layer, json_error_middleware},
    state::AppState,
};

pub mod todo;
pub mod views;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(views::router(state.clone()))
        .merge(todo::router(state))
}

/// The router with the error and tracing layers the server runs behind.
pub fn app(state: Arc<AppState>) -> Router {
    router(state)
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http())
}
