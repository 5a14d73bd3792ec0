//! HTTP routes.
//!
//! [`site`] serves the rendered pages, navigation redirects and the sign-up
//! form; [`api`] serves the JSON endpoints under `/v1`.

pub mod api;
pub mod site;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, header};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Concurrent relay requests allowed per sign-up route.
pub(crate) const RELAY_CONCURRENCY: usize = 16;

/// Build the full router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let mut app = Router::new().merge(api::router()).merge(site::router());

    if let Some(dir) = state.config.assets_dir.as_ref() {
        app = app.nest_service("/assets", ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}
