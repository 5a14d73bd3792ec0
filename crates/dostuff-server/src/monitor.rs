//! Background content audit.
//!
//! When enabled, every page render is reported to a worker task that runs an
//! [`AuditSession`] against the rendered markup. Renders arriving inside the
//! settle window collapse into a single scan of the most recent view. Results
//! are logged and published on a `watch` channel.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use dostuff_core::audit::{AuditReport, Severity};
use dostuff_core::html::PageSnapshot;
use dostuff_core::notify::NotifyStatus;
use dostuff_core::session::AuditSession;
use dostuff_core::view::ViewState;

use crate::config::AuditMonitorConfig;
use crate::pages::PageRenderer;

/// Renders queued beyond this are dropped; the next one re-arms the scan anyway.
const QUEUE_DEPTH: usize = 64;

/// Latest scan published by the monitor.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorReport {
    pub view: ViewState,
    pub scan: u64,
    pub report: AuditReport,
}

/// Handle held by the HTTP layer.
#[derive(Debug, Clone)]
pub struct AuditMonitor {
    renders: mpsc::Sender<ViewState>,
    latest: watch::Receiver<Option<MonitorReport>>,
}

impl AuditMonitor {
    /// Start the worker. It stops when `shutdown` flips or every handle is dropped.
    #[must_use]
    pub fn spawn(
        renderer: PageRenderer,
        config: &AuditMonitorConfig,
        shutdown: watch::Receiver<bool>,
    ) -> (Self, JoinHandle<()>) {
        let (renders_tx, renders_rx) = mpsc::channel(QUEUE_DEPTH);
        let (latest_tx, latest_rx) = watch::channel(None);
        let worker = Worker {
            renderer,
            settle_delay: config.settle_delay,
            report_level: config.report_level,
            renders: renders_rx,
            latest: latest_tx,
            shutdown,
        };
        let handle = tokio::spawn(worker.run());
        (
            Self {
                renders: renders_tx,
                latest: latest_rx,
            },
            handle,
        )
    }

    /// Record that `view` was rendered. Never blocks the request.
    pub fn record_render(&self, view: ViewState) {
        if self.renders.try_send(view).is_err() {
            debug!(view = %view, "audit queue full or closed, render not recorded");
        }
    }

    /// Most recent scan, if any has run.
    #[must_use]
    pub fn latest(&self) -> Option<MonitorReport> {
        self.latest.borrow().clone()
    }

    /// Receiver that changes every time a scan completes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<MonitorReport>> {
        self.latest.clone()
    }
}

struct Worker {
    renderer: PageRenderer,
    settle_delay: Duration,
    report_level: Severity,
    renders: mpsc::Receiver<ViewState>,
    latest: watch::Sender<Option<MonitorReport>>,
    shutdown: watch::Receiver<bool>,
}

impl Worker {
    async fn run(mut self) {
        let started = Instant::now();
        let mut session = AuditSession::new(self.settle_delay);
        let mut current = ViewState::default();
        session.mount(started.elapsed());
        info!(settle = ?self.settle_delay, "content audit monitor started");

        loop {
            let wait = session
                .next_deadline()
                .map(|deadline| deadline.saturating_sub(started.elapsed()));

            tokio::select! {
                received = self.renders.recv() => {
                    let Some(view) = received else { break };
                    current = view;
                    session.notify_mutation(started.elapsed());
                }
                () = settle(wait) => {
                    self.scan(&mut session, current, started.elapsed());
                }
                _ = self.shutdown.changed() => break,
            }
        }

        session.teardown();
        info!(scans = session.scans(), "content audit monitor stopped");
    }

    fn scan(&self, session: &mut AuditSession, view: ViewState, now: Duration) {
        let polled = session.poll_with(now, || {
            PageSnapshot::from_html(&self.renderer.render(view, NotifyStatus::Idle))
        });
        let findings = match polled {
            None => return,
            Some(Ok(findings)) => findings,
            Some(Err(e)) => {
                warn!(view = %view, error = %e, "failed to snapshot rendered page");
                return;
            }
        };
        let report = AuditReport::from_findings(findings, self.report_level);

        info!(
            view = %view,
            score = report.score,
            errors = report.counts.errors,
            warnings = report.counts.warnings,
            info = report.counts.info,
            "content audit complete"
        );
        for finding in &report.findings {
            match finding.severity {
                Severity::Error | Severity::Warning => warn!(
                    view = %view,
                    severity = finding.severity.as_str(),
                    category = %finding.category,
                    fix = finding.fix.as_deref().unwrap_or(""),
                    "{}",
                    finding.message
                ),
                Severity::Info => info!(
                    view = %view,
                    category = %finding.category,
                    "{}",
                    finding.message
                ),
            }
        }

        let _ = self.latest.send(Some(MonitorReport {
            view,
            scan: session.scans(),
            report,
        }));
    }
}

/// Sleep for `wait`, or forever when no scan is scheduled.
async fn settle(wait: Option<Duration>) {
    match wait {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}
