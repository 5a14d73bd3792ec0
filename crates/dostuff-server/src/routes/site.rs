//! Page routes: rendered views, navigation redirects and the sign-up form.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Form, Path, Query, State};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use serde::Deserialize;
use tower::limit::ConcurrencyLimitLayer;
use tracing::{debug, info, warn};

use dostuff_core::notify::{NotifyRequest, NotifyStatus};
use dostuff_core::view::{Navigator, ViewState};

use crate::error::AppError;
use crate::routes::RELAY_CONCURRENCY;
use crate::state::AppState;

/// Build the site router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home))
        .route("/{view}", get(view_page))
        .route("/navigate/{id}", get(navigate))
        .route(
            "/download/notify",
            post(notify_form).layer(ConcurrencyLimitLayer::new(RELAY_CONCURRENCY)),
        )
}

/// Optional status of the sign-up form, carried in the query string.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    notify: Option<String>,
}

impl PageQuery {
    /// Only outcomes of a submitted form are taken from the URL; anything
    /// else renders the idle form.
    fn status(&self) -> NotifyStatus {
        match self.notify.as_deref().and_then(|s| s.parse().ok()) {
            Some(
                status @ (NotifyStatus::Subscribed | NotifyStatus::Failed | NotifyStatus::Invalid),
            ) => status,
            _ => NotifyStatus::Idle,
        }
    }
}

fn render(state: &AppState, view: ViewState, notify: NotifyStatus) -> Html<String> {
    if let Some(monitor) = state.audit_monitor.as_ref() {
        monitor.record_render(view);
    }
    Html(state.renderer.render(view, notify))
}

async fn home(State(state): State<Arc<AppState>>) -> Html<String> {
    render(&state, ViewState::Home, NotifyStatus::Idle)
}

async fn view_page(
    State(state): State<Arc<AppState>>,
    Path(segment): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let view = ViewState::from_path(&segment)?;
    let notify = if view == ViewState::Download {
        query.status()
    } else {
        NotifyStatus::Idle
    };
    Ok(render(&state, view, notify))
}

// ── Navigation ───────────────────────────────────────────────────────

async fn navigate(Path(id): Path<String>) -> Result<Redirect, AppError> {
    let mut navigator = Navigator::new();
    let transition = navigator.navigate_id(&id)?;
    let location = transition.location();
    debug!(route = %id, location = %location, "navigation resolved");
    Ok(Redirect::to(&location))
}

// ── Notify-me form ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NotifyForm {
    #[serde(default)]
    email: String,
}

/// Relay the address, then send the browser back to the download page with
/// the outcome in the query string.
async fn notify_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<NotifyForm>,
) -> Redirect {
    let outcome = match NotifyRequest::new(&form.email) {
        Ok(request) => state.notify_sink.subscribe(&request).await,
        Err(e) => Err(e),
    };

    match &outcome {
        Ok(()) => info!("notify sign-up relayed"),
        Err(e) => warn!(error = %e, "notify sign-up failed"),
    }

    let status = NotifyStatus::after(&outcome);
    Redirect::to(&format!("/download?notify={status}#notify"))
}
