//! Core library for the Do Stuff site.
//!
//! Contains the view navigation state machine, the SEO content auditor and
//! its document snapshot abstraction, readability and keyword metrics, the
//! debounce timer and audit session that drive re-scans, and the "notify me"
//! sign-up model. This crate performs no I/O; the server and CLI feed it
//! rendered HTML, text, and the current time.

pub mod audit;
pub mod debounce;
pub mod error;
pub mod html;
pub mod notify;
pub mod readability;
pub mod session;
pub mod view;
