//! Relay of "notify me" sign-ups.
//!
//! The [`SubscriptionSink`] trait is the seam between the HTTP handlers and
//! wherever addresses end up. [`FormRelaySink`] posts them to the third-party
//! form endpoint; [`MemorySink`] keeps them in memory for tests.

use std::time::Duration;

use tokio::sync::Mutex;

use dostuff_core::error::NotifyError;
use dostuff_core::notify::NotifyRequest;

/// Destination for validated sign-ups.
#[async_trait::async_trait]
pub trait SubscriptionSink: Send + Sync + 'static {
    /// Deliver one sign-up. No retries; the caller decides what to show.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Rejected`] for a non-success status and
    /// [`NotifyError::Transport`] when no response arrived.
    async fn subscribe(&self, request: &NotifyRequest) -> Result<(), NotifyError>;
}

/// Posts sign-ups as JSON `{ "email": ... }` to a form endpoint.
#[derive(Debug, Clone)]
pub struct FormRelaySink {
    client: reqwest::Client,
    endpoint: String,
}

impl FormRelaySink {
    /// Build a relay for `endpoint` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Transport`] if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Transport {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl SubscriptionSink for FormRelaySink {
    async fn subscribe(&self, request: &NotifyRequest) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| NotifyError::Transport {
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(NotifyError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

/// In-memory sink. Records every address it accepts.
#[derive(Debug, Default)]
pub struct MemorySink {
    emails: Mutex<Vec<String>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Addresses received so far, in arrival order.
    pub async fn emails(&self) -> Vec<String> {
        self.emails.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl SubscriptionSink for MemorySink {
    async fn subscribe(&self, request: &NotifyRequest) -> Result<(), NotifyError> {
        self.emails.lock().await.push(request.email.clone());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_sink_records_addresses() {
        let sink = MemorySink::new();
        sink.subscribe(&NotifyRequest::new("a@b.co").unwrap())
            .await
            .unwrap();
        sink.subscribe(&NotifyRequest::new("c@d.org").unwrap())
            .await
            .unwrap();
        assert_eq!(sink.emails().await, ["a@b.co", "c@d.org"]);
    }

    type Received = std::sync::Arc<Mutex<Vec<serde_json::Value>>>;

    /// Serve a tiny form endpoint on an ephemeral port. `/f/ok` records every
    /// JSON body it receives.
    async fn spawn_endpoint() -> (String, Received) {
        use axum::http::StatusCode;
        use axum::routing::post;
        use axum::{Json, Router};

        let received = Received::default();
        let sink = received.clone();
        let app = Router::new()
            .route(
                "/f/ok",
                post(move |Json(body): Json<serde_json::Value>| {
                    let sink = sink.clone();
                    async move {
                        sink.lock().await.push(body);
                        StatusCode::OK
                    }
                }),
            )
            .route("/f/broken", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), received)
    }

    #[tokio::test]
    async fn relay_posts_email_as_json() {
        let (base, received) = spawn_endpoint().await;
        let sink = FormRelaySink::new(format!("{base}/f/ok"), Duration::from_secs(5)).unwrap();
        sink.subscribe(&NotifyRequest::new(" teacher@school.edu ").unwrap())
            .await
            .unwrap();

        let bodies = received.lock().await;
        assert_eq!(*bodies, [serde_json::json!({ "email": "teacher@school.edu" })]);
    }

    #[tokio::test]
    async fn relay_rejection_carries_status() {
        let (base, _) = spawn_endpoint().await;
        let sink = FormRelaySink::new(format!("{base}/f/broken"), Duration::from_secs(5)).unwrap();
        let err = sink
            .subscribe(&NotifyRequest::new("a@b.co").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Rejected { status: 500 }));
    }

    #[tokio::test]
    async fn closed_port_is_a_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let sink = FormRelaySink::new(format!("http://{addr}/f/ok"), Duration::from_secs(5)).unwrap();
        let err = sink
            .subscribe(&NotifyRequest::new("a@b.co").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Transport { .. }));
    }
}
