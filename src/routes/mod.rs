//! Router assembly.

mod common;
mod entity;
pub use common::common_routes;
pub use entity::resource_routes;

use crate::resource::{Employees, Users};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Full application: probes plus the `users` and `employees` resources.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.body_limit;
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(resource_routes::<Users>(state.clone()))
        .merge(resource_routes::<Employees>(state))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(DefaultBodyLimit::max(body_limit)),
        )
}
