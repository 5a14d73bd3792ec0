//! JSON API under `/v1`: content audit, readability, navigation table and
//! sign-ups, plus the health check.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower::limit::ConcurrencyLimitLayer;
use tracing::{info, warn};

use dostuff_core::audit::{AuditReport, Severity};
use dostuff_core::html::PageSnapshot;
use dostuff_core::notify::{NotifyRequest, NotifyStatus};
use dostuff_core::readability::{
    KeywordReport, ReadabilityReport, analyze_keywords, analyze_readability,
};
use dostuff_core::view::{RouteId, ScrollTarget, ScrollTiming, ViewState};

use crate::error::AppError;
use crate::routes::RELAY_CONCURRENCY;
use crate::state::AppState;

/// Keywords measured when readability is requested for a rendered view.
pub const SITE_KEYWORDS: [&str; 5] = ["exam", "quiz", "online", "teacher", "student"];

/// Build the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/routes", get(route_table))
        .route("/v1/audit/{view}", get(audit_view))
        .route("/v1/readability", post(readability_text))
        .route("/v1/readability/{view}", get(readability_view))
        .route(
            "/v1/notify",
            post(notify).layer(ConcurrencyLimitLayer::new(RELAY_CONCURRENCY)),
        )
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// ── Navigation table ─────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RouteEntry {
    id: &'static str,
    view: ViewState,
    scroll: ScrollTarget,
    timing: ScrollTiming,
    location: String,
}

async fn route_table() -> Json<Vec<RouteEntry>> {
    let entries = RouteId::ALL
        .into_iter()
        .map(|route| {
            let transition = route.resolve();
            RouteEntry {
                id: route.id(),
                view: transition.view,
                scroll: transition.scroll,
                timing: transition.scroll.timing(),
                location: transition.location(),
            }
        })
        .collect();
    Json(entries)
}

// ── Content audit ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    level: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuditResponse {
    view: ViewState,
    scanned_at: DateTime<Utc>,
    #[serde(flatten)]
    report: AuditReport,
}

fn snapshot_view(state: &AppState, segment: &str) -> Result<(ViewState, PageSnapshot), AppError> {
    let view = ViewState::from_path(segment)?;
    let markup = state.renderer.render(view, NotifyStatus::Idle);
    let snapshot = PageSnapshot::from_html(&markup)?;
    Ok((view, snapshot))
}

async fn audit_view(
    State(state): State<Arc<AppState>>,
    Path(segment): Path<String>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<AuditResponse>, AppError> {
    let level = match query.level.as_deref() {
        Some(name) => name.parse::<Severity>()?,
        None => state.config.audit.report_level,
    };
    let (view, snapshot) = snapshot_view(&state, &segment)?;
    let report = AuditReport::build(&snapshot, level);

    info!(
        view = %view,
        score = report.score,
        errors = report.counts.errors,
        warnings = report.counts.warnings,
        "audit requested"
    );

    Ok(Json(AuditResponse {
        view,
        scanned_at: Utc::now(),
        report,
    }))
}

// ── Readability ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ReadabilityResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    view: Option<ViewState>,
    readability: ReadabilityReport,
    keywords: KeywordReport,
}

#[derive(Debug, Deserialize)]
pub struct ReadabilityRequest {
    text: String,
    #[serde(default)]
    keywords: Vec<String>,
}

async fn readability_view(
    State(state): State<Arc<AppState>>,
    Path(segment): Path<String>,
) -> Result<Json<ReadabilityResponse>, AppError> {
    let (view, snapshot) = snapshot_view(&state, &segment)?;
    Ok(Json(ReadabilityResponse {
        view: Some(view),
        readability: analyze_readability(&snapshot.body_text),
        keywords: analyze_keywords(&snapshot.body_text, SITE_KEYWORDS.as_slice()),
    }))
}

async fn readability_text(Json(req): Json<ReadabilityRequest>) -> Json<ReadabilityResponse> {
    Json(ReadabilityResponse {
        view: None,
        readability: analyze_readability(&req.text),
        keywords: analyze_keywords(&req.text, req.keywords.as_slice()),
    })
}

// ── Sign-ups ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NotifyBody {
    email: String,
}

#[derive(Debug, Serialize)]
pub struct NotifyResponse {
    status: NotifyStatus,
}

async fn notify(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NotifyBody>,
) -> Result<(StatusCode, Json<NotifyResponse>), AppError> {
    let request = NotifyRequest::new(&body.email)?;
    if let Err(e) = state.notify_sink.subscribe(&request).await {
        warn!(error = %e, "notify relay failed");
        return Err(e.into());
    }
    info!("notify sign-up relayed");
    Ok((
        StatusCode::ACCEPTED,
        Json(NotifyResponse {
            status: NotifyStatus::Subscribed,
        }),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use dostuff_core::error::NotifyError;

    use crate::config::SiteConfig;
    use crate::notify::{MemorySink, SubscriptionSink};
    use crate::routes::build_router;

    struct UnreachableSink;

    #[async_trait::async_trait]
    impl SubscriptionSink for UnreachableSink {
        async fn subscribe(&self, _request: &NotifyRequest) -> Result<(), NotifyError> {
            Err(NotifyError::Transport {
                reason: "connection refused".to_owned(),
            })
        }
    }

    fn app_with(sink: Arc<dyn SubscriptionSink>) -> Router {
        build_router(Arc::new(AppState::new(SiteConfig::default(), sink)))
    }

    fn app() -> Router {
        app_with(Arc::new(MemorySink::new()))
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn healthz_reports_ok() {
        let (status, body) = send(app(), get("/healthz")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn route_table_lists_every_id() {
        let (status, body) = send(app(), get("/v1/routes")).await;
        assert_eq!(status, StatusCode::OK);
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), RouteId::ALL.len());

        let features = entries.iter().find(|e| e["id"] == "features").unwrap();
        assert_eq!(features["view"], "home");
        assert_eq!(features["location"], "/#features");
        assert_eq!(features["timing"], "after_render");
        assert_eq!(features["scroll"], json!({ "kind": "anchor", "anchor": "features" }));
    }

    #[tokio::test]
    async fn audit_of_rendered_view_is_clean() {
        let (status, body) = send(app(), get("/v1/audit/pricing?level=info")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"], "pricing");
        assert_eq!(body["score"], 100);
        assert_eq!(body["level"], "info");
        assert_eq!(body["findings"], json!([]));
        assert_eq!(body["counts"], json!({ "errors": 0, "warnings": 0, "info": 0 }));
        assert!(body["scanned_at"].is_string());
    }

    #[tokio::test]
    async fn audit_defaults_to_configured_level() {
        let (_, body) = send(app(), get("/v1/audit/home")).await;
        assert_eq!(body["level"], "warning");
    }

    #[tokio::test]
    async fn audit_rejects_unknown_level() {
        let (status, body) = send(app(), get("/v1/audit/home?level=fatal")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }

    #[tokio::test]
    async fn audit_of_unknown_view_is_404() {
        let (status, _) = send(app(), get("/v1/audit/blog")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn readability_of_posted_text() {
        let req = post_json(
            "/v1/readability",
            &json!({ "text": "The cat sat on the mat.", "keywords": ["cat", "dog"] }),
        );
        let (status, body) = send(app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("view").is_none());
        assert_eq!(body["readability"]["words"], 6);
        assert_eq!(body["readability"]["flesch_score"], 144.0);
        assert_eq!(body["readability"]["readability"], "Very Easy");
        assert_eq!(body["keywords"]["keyword_density"], json!({ "cat": 1, "dog": 0 }));
    }

    #[tokio::test]
    async fn readability_of_empty_text_has_no_score() {
        let req = post_json("/v1/readability", &json!({ "text": "" }));
        let (status, body) = send(app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["readability"]["flesch_score"], Value::Null);
        assert_eq!(body["readability"]["readability"], Value::Null);
        assert_eq!(body["keywords"]["total_words"], 0);
    }

    #[tokio::test]
    async fn readability_of_rendered_view() {
        let (status, body) = send(app(), get("/v1/readability/how-it-works")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"], "how-it-works");
        assert!(body["readability"]["words"].as_u64().unwrap() > 50);
        assert!(body["readability"]["flesch_score"].is_number());
        assert!(body["keywords"]["keyword_density"]["quiz"].as_u64().unwrap() >= 1);
    }

    #[tokio::test]
    async fn notify_accepts_valid_address() {
        let sink = Arc::new(MemorySink::new());
        let req = post_json("/v1/notify", &json!({ "email": " a@b.co " }));
        let (status, body) = send(app_with(sink.clone()), req).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body, json!({ "status": "subscribed" }));
        assert_eq!(sink.emails().await, ["a@b.co"]);
    }

    #[tokio::test]
    async fn notify_rejects_invalid_address() {
        let req = post_json("/v1/notify", &json!({ "email": "nobody" }));
        let (status, body) = send(app(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }

    #[tokio::test]
    async fn notify_relay_failure_is_bad_gateway() {
        let req = post_json("/v1/notify", &json!({ "email": "a@b.co" }));
        let (status, body) = send(app_with(Arc::new(UnreachableSink)), req).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "bad_gateway");
    }
}
