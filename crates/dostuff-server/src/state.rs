//! Shared application state for the Do Stuff server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`. It holds the configuration, the page renderer,
//! the sign-up sink, and the optional background audit monitor.

use std::sync::Arc;

use crate::config::SiteConfig;
use crate::monitor::AuditMonitor;
use crate::notify::SubscriptionSink;
use crate::pages::PageRenderer;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Configuration loaded at startup.
    pub config: SiteConfig,
    /// Renders the site's views.
    pub renderer: PageRenderer,
    /// Destination for "notify me" sign-ups.
    pub notify_sink: Arc<dyn SubscriptionSink>,
    /// Background auditor (None unless `DOSTUFF_AUDIT_ON_RENDER` is set).
    pub audit_monitor: Option<AuditMonitor>,
}

impl AppState {
    /// State with the renderer derived from `config`.
    #[must_use]
    pub fn new(config: SiteConfig, notify_sink: Arc<dyn SubscriptionSink>) -> Self {
        let renderer = PageRenderer::new(config.base_url.clone(), config.analytics.clone());
        Self {
            config,
            renderer,
            notify_sink,
            audit_monitor: None,
        }
    }

    /// Attach a running audit monitor.
    #[must_use]
    pub fn with_monitor(mut self, monitor: AuditMonitor) -> Self {
        self.audit_monitor = Some(monitor);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
