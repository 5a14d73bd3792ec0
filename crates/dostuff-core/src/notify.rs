//! "Notify me" sign-up model.
//!
//! The download page collects an email address and hands it to a
//! third-party form endpoint. This module owns the parts that are not I/O:
//! validating the address and the status shown next to the form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

/// Body sent to the form endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyRequest {
    pub email: String,
}

impl NotifyRequest {
    /// Trim and validate a submitted address.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::InvalidEmail`] when the address is empty or
    /// lacks a local part, an `@`, or a dotted domain.
    pub fn new(email: &str) -> Result<Self, NotifyError> {
        let email = email.trim();
        let invalid = |reason: &str| NotifyError::InvalidEmail {
            reason: reason.to_owned(),
        };

        if email.is_empty() {
            return Err(invalid("address is empty"));
        }
        if email.chars().any(char::is_whitespace) {
            return Err(invalid("address contains whitespace"));
        }
        let (local, domain) = email
            .split_once('@')
            .ok_or_else(|| invalid("address has no '@'"))?;
        if local.is_empty() || domain.contains('@') {
            return Err(invalid("address must have exactly one '@' after a local part"));
        }
        let dotted = domain
            .split('.')
            .collect::<Vec<_>>()
            .windows(2)
            .all(|pair| !pair[0].is_empty() && !pair[1].is_empty())
            && domain.contains('.');
        if !dotted {
            return Err(invalid("domain must contain a dot between non-empty labels"));
        }

        Ok(Self {
            email: email.to_owned(),
        })
    }
}

/// State of the sign-up form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyStatus {
    #[default]
    Idle,
    Loading,
    /// The endpoint accepted the address.
    Subscribed,
    /// The submission failed; the form accepts a retry.
    Failed,
    /// The address was rejected before sending.
    Invalid,
}

impl NotifyStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Subscribed => "subscribed",
            Self::Failed => "failed",
            Self::Invalid => "invalid",
        }
    }

    /// Whether the form should accept another submission.
    #[must_use]
    pub const fn accepts_input(self) -> bool {
        !matches!(self, Self::Loading | Self::Subscribed)
    }

    /// Status after a submission finished with `outcome`.
    #[must_use]
    pub fn after(outcome: &Result<(), NotifyError>) -> Self {
        match outcome {
            Ok(()) => Self::Subscribed,
            Err(NotifyError::InvalidEmail { .. }) => Self::Invalid,
            Err(NotifyError::Rejected { .. } | NotifyError::Transport { .. }) => Self::Failed,
        }
    }
}

impl fmt::Display for NotifyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotifyStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "loading" => Ok(Self::Loading),
            "subscribed" => Ok(Self::Subscribed),
            "failed" => Ok(Self::Failed),
            "invalid" => Ok(Self::Invalid),
            _ => Err(()),
        }
    }
}
