//! Do Stuff site server.
//!
//! Serves the server-rendered marketing pages, resolves navigation intents to
//! redirects, relays "notify me" sign-ups, and exposes the content auditor
//! and readability analysis as a JSON API under `/v1`.

pub mod analytics;
pub mod config;
pub mod error;
pub mod monitor;
pub mod notify;
pub mod pages;
pub mod routes;
pub mod seo;
pub mod state;
