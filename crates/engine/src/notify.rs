//! User-facing notifications and session lifecycle events.
//!
//! Notifications carry a stable id. While one is active, raising the same id
//! again is collapsed into the existing entry until it is dismissed.

use attractors_core::{AttractorError, DVec3};
use serde::Serialize;

/// Stable identifiers for the notifications a session can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationId {
    /// Trajectory escaped to non-finite values.
    #[serde(rename = "nan-in-points")]
    Divergence,
    HighMaxPoints,
    BulkFailed,
}

impl NotificationId {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationId::Divergence => "nan-in-points",
            NotificationId::HighMaxPoints => "high-max-points",
            NotificationId::BulkFailed => "bulk-failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn divergence(multiplier: f64) -> Self {
        Self {
            id: NotificationId::Divergence,
            title: "Trajectory diverged".into(),
            message: format!(
                "Coordinates became non-finite, usually because the multiplier ({multiplier}) \
                 is too high. The trajectory was restarted; try a value below 0.02."
            ),
            severity: Severity::Error,
        }
    }

    pub fn high_max_points(max_points: usize) -> Self {
        Self {
            id: NotificationId::HighMaxPoints,
            title: "Many points".into(),
            message: format!(
                "{max_points} points may slow the visualizer down noticeably."
            ),
            severity: Severity::Warning,
        }
    }

    pub fn bulk_failed(error: &AttractorError) -> Self {
        Self {
            id: NotificationId::BulkFailed,
            title: "Computation failed".into(),
            message: error.to_string(),
            severity: Severity::Error,
        }
    }
}

/// Active notifications, at most one per id.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    active: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates `notification`. Returns `false` if its id is already active.
    pub fn show(&mut self, notification: Notification) -> bool {
        if self.is_active(notification.id) {
            return false;
        }
        self.active.push(notification);
        true
    }

    /// Removes the notification with `id`. Returns whether one was active.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let before = self.active.len();
        self.active.retain(|n| n.id != id);
        self.active.len() != before
    }

    pub fn is_active(&self, id: NotificationId) -> bool {
        self.active.iter().any(|n| n.id == id)
    }

    pub fn active(&self) -> &[Notification] {
        &self.active
    }
}

/// Events drained from a session by its UI/render collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A newly raised (not collapsed) notification.
    Notification(Notification),
    BulkStarted {
        generation: u64,
        id: String,
        max: usize,
    },
    BulkSucceeded {
        generation: u64,
        points: Vec<DVec3>,
    },
    BulkFailed {
        generation: u64,
        error: AttractorError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_are_collapsed_until_dismissed() {
        let mut center = NotificationCenter::new();
        assert!(center.show(Notification::divergence(0.5)));
        assert!(!center.show(Notification::divergence(0.7)));
        assert_eq!(center.active().len(), 1);

        assert!(center.dismiss(NotificationId::Divergence));
        assert!(!center.dismiss(NotificationId::Divergence));
        assert!(center.show(Notification::divergence(0.7)));
    }

    #[test]
    fn distinct_ids_coexist() {
        let mut center = NotificationCenter::new();
        center.show(Notification::divergence(0.1));
        center.show(Notification::high_max_points(9_000));
        assert!(center.is_active(NotificationId::Divergence));
        assert!(center.is_active(NotificationId::HighMaxPoints));
        assert!(!center.is_active(NotificationId::BulkFailed));
    }

    #[test]
    fn ids_are_stable_strings() {
        assert_eq!(NotificationId::Divergence.as_str(), "nan-in-points");
        assert_eq!(NotificationId::HighMaxPoints.as_str(), "high-max-points");
        assert_eq!(NotificationId::BulkFailed.as_str(), "bulk-failed");
        for id in [
            NotificationId::Divergence,
            NotificationId::HighMaxPoints,
            NotificationId::BulkFailed,
        ] {
            let json = serde_json::to_value(id).unwrap();
            assert_eq!(json, id.as_str());
        }
    }

    #[test]
    fn bulk_failure_message_names_the_error() {
        let n = Notification::bulk_failed(&AttractorError::UnknownAttractor("nope".into()));
        assert!(n.message.contains("nope"));
        assert_eq!(n.severity, Severity::Error);
    }
}
