// Copyright (c) 2024 Mike Tsao

use super::ValidationError;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Which kind of mutation a [Notification] reports on.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum NotificationKind {
    #[allow(missing_docs)]
    Add,
    #[allow(missing_docs)]
    Update,
    #[allow(missing_docs)]
    Delete,
}

/// Whether the mutation took effect.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum NotificationOutcome {
    #[allow(missing_docs)]
    Success,
    #[allow(missing_docs)]
    Failure,
}

/// A user-facing message about something the engine did (or refused to do).
/// Typically shown as a toast.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Notification {
    /// What was attempted.
    pub kind: NotificationKind,
    /// How it went.
    pub outcome: NotificationOutcome,
    /// A short headline.
    pub title: String,
    /// The details. For a failure, the violated rule.
    pub message: String,
}
impl Notification {
    pub(crate) fn added(name: &str) -> Self {
        Self {
            kind: NotificationKind::Add,
            outcome: NotificationOutcome::Success,
            title: "Parameter Added".to_string(),
            message: format!("{name} has been added to automation."),
        }
    }

    pub(crate) fn add_failed(error: &ValidationError) -> Self {
        Self {
            kind: NotificationKind::Add,
            outcome: NotificationOutcome::Failure,
            title: "Parameter Error".to_string(),
            message: error.to_string(),
        }
    }

    pub(crate) fn updated() -> Self {
        Self {
            kind: NotificationKind::Update,
            outcome: NotificationOutcome::Success,
            title: "Parameter Updated".to_string(),
            message: "Parameter has been updated successfully.".to_string(),
        }
    }

    pub(crate) fn update_failed(error: &ValidationError) -> Self {
        Self {
            kind: NotificationKind::Update,
            outcome: NotificationOutcome::Failure,
            title: "Update Error".to_string(),
            message: error.to_string(),
        }
    }

    pub(crate) fn deleted() -> Self {
        Self {
            kind: NotificationKind::Delete,
            outcome: NotificationOutcome::Success,
            title: "Parameter Deleted".to_string(),
            message: "Parameter has been removed from automation.".to_string(),
        }
    }

    /// Whether this reports a failure.
    pub fn is_failure(&self) -> bool {
        self.outcome == NotificationOutcome::Failure
    }
}
