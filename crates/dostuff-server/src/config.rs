//! Server configuration for the Do Stuff site.
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings can be overridden via `DOSTUFF_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use dostuff_core::audit::Severity;

/// Form endpoint the "notify me" sign-ups are relayed to.
pub const DEFAULT_NOTIFY_ENDPOINT: &str = "https://formspree.io/f/xaqyrnll";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// Public origin used for canonical links and structured data.
    pub base_url: String,
    /// Third-party form endpoint receiving "notify me" sign-ups.
    pub notify_endpoint: String,
    /// Timeout for one relay request to the form endpoint.
    pub notify_timeout: Duration,
    /// Directory served under `/assets` (logo, icons).
    pub assets_dir: Option<PathBuf>,
    /// Run the content auditor in the background after pages render.
    pub audit: AuditMonitorConfig,
    /// Analytics tags injected into every page head.
    pub analytics: AnalyticsConfig,
}

/// Settings for the background content audit monitor.
#[derive(Debug, Clone)]
pub struct AuditMonitorConfig {
    /// Whether the monitor runs at all.
    pub enabled: bool,
    /// Quiet period after the last render before a scan runs.
    pub settle_delay: Duration,
    /// Minimum severity logged per finding.
    pub report_level: Severity,
}

/// Optional third-party analytics ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsConfig {
    /// Google Analytics measurement id (e.g., `G-XXXXXXX`).
    pub google_analytics_id: Option<String>,
    /// Google Tag Manager container id (e.g., `GTM-XXXXXXX`).
    pub tag_manager_id: Option<String>,
    /// Meta (Facebook) Pixel id.
    pub meta_pixel_id: Option<String>,
    /// LinkedIn Insight partner id.
    pub linkedin_partner_id: Option<String>,
    /// Microsoft Clarity project id.
    pub clarity_id: Option<String>,
}

impl AnalyticsConfig {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.google_analytics_id.is_none()
            && self.tag_manager_id.is_none()
            && self.meta_pixel_id.is_none()
            && self.linkedin_partner_id.is_none()
            && self.clarity_id.is_none()
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT`: port to bind on (binds to `0.0.0.0`)
    /// - `DOSTUFF_BIND_ADDR`: full bind address (overrides `PORT`, default: `127.0.0.1:8080`)
    /// - `DOSTUFF_LOG_LEVEL`: log filter (default: `info`)
    /// - `DOSTUFF_BASE_URL`: public origin (default: `https://dostuff.com`)
    /// - `DOSTUFF_NOTIFY_ENDPOINT`: form endpoint for sign-ups
    /// - `DOSTUFF_NOTIFY_TIMEOUT_SECS`: relay timeout in seconds (default: `10`)
    /// - `DOSTUFF_ASSETS_DIR`: static asset directory (optional)
    /// - `DOSTUFF_AUDIT_ON_RENDER`: run the background auditor (default: `false`)
    /// - `DOSTUFF_AUDIT_DEBOUNCE_MS`: settle delay before a scan (default: `100`)
    /// - `DOSTUFF_AUDIT_LEVEL`: `error`, `warning` or `info` (default: `warning`)
    /// - `DOSTUFF_GA_ID`, `DOSTUFF_GTM_ID`, `DOSTUFF_META_PIXEL_ID`,
    ///   `DOSTUFF_LINKEDIN_PARTNER_ID`, `DOSTUFF_CLARITY_ID`: analytics ids (optional)
    #[must_use]
    pub fn from_env() -> Self {
        // Priority: DOSTUFF_BIND_ADDR > PORT > default 127.0.0.1:8080
        let bind_addr = if let Ok(addr) = std::env::var("DOSTUFF_BIND_ADDR") {
            addr.parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8080)))
        } else if let Ok(port_str) = std::env::var("PORT") {
            let port: u16 = port_str.parse().unwrap_or(8080);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(([127, 0, 0, 1], 8080))
        };

        let log_level = std::env::var("DOSTUFF_LOG_LEVEL").unwrap_or_else(|_| "info".to_owned());

        let base_url = env_non_empty("DOSTUFF_BASE_URL")
            .unwrap_or_else(|| "https://dostuff.com".to_owned())
            .trim_end_matches('/')
            .to_owned();

        let notify_endpoint = env_non_empty("DOSTUFF_NOTIFY_ENDPOINT")
            .unwrap_or_else(|| DEFAULT_NOTIFY_ENDPOINT.to_owned());

        let notify_timeout = Duration::from_secs(
            std::env::var("DOSTUFF_NOTIFY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        );

        let assets_dir = env_non_empty("DOSTUFF_ASSETS_DIR").map(PathBuf::from);

        let audit = AuditMonitorConfig {
            enabled: env_flag("DOSTUFF_AUDIT_ON_RENDER", false),
            settle_delay: Duration::from_millis(
                std::env::var("DOSTUFF_AUDIT_DEBOUNCE_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(100),
            ),
            report_level: std::env::var("DOSTUFF_AUDIT_LEVEL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(Severity::Warning),
        };

        let analytics = AnalyticsConfig {
            google_analytics_id: env_non_empty("DOSTUFF_GA_ID"),
            tag_manager_id: env_non_empty("DOSTUFF_GTM_ID"),
            meta_pixel_id: env_non_empty("DOSTUFF_META_PIXEL_ID"),
            linkedin_partner_id: env_non_empty("DOSTUFF_LINKEDIN_PARTNER_ID"),
            clarity_id: env_non_empty("DOSTUFF_CLARITY_ID"),
        };

        Self {
            bind_addr,
            log_level,
            base_url,
            notify_endpoint,
            notify_timeout,
            assets_dir,
            audit,
            analytics,
        }
    }
}

impl Default for SiteConfig {
    /// Defaults without consulting the environment; used by tests.
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            log_level: "info".to_owned(),
            base_url: "https://dostuff.com".to_owned(),
            notify_endpoint: DEFAULT_NOTIFY_ENDPOINT.to_owned(),
            notify_timeout: Duration::from_secs(10),
            assets_dir: None,
            audit: AuditMonitorConfig {
                enabled: false,
                settle_delay: dostuff_core::session::DEFAULT_SETTLE_DELAY,
                report_level: Severity::Warning,
            },
            analytics: AnalyticsConfig::default(),
        }
    }
}
