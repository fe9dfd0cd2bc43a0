use serde::Serialize;
use std::sync::{Mutex, PoisonError};

/// What the user is shown when something needs correcting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub summary: String,
    pub details: Vec<String>,
}

impl Notification {
    pub fn summary_only(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            details: Vec::new(),
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.summary.as_str()).chain(self.details.iter().map(String::as_str))
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary)?;
        for line in &self.details {
            write!(f, "\n  {line}")?;
        }
        Ok(())
    }
}

pub trait NotificationSurface: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Logs every notification at `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSurface;

impl NotificationSurface for TracingSurface {
    fn notify(&self, notification: &Notification) {
        tracing::warn!(details = notification.details.len(), "{}", notification.summary);
        for line in &notification.details {
            tracing::warn!("  {line}");
        }
    }
}

/// Keeps every notification for later inspection.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.seen.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn last(&self) -> Option<Notification> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl NotificationSurface for RecordingSurface {
    fn notify(&self, notification: &Notification) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_indents_details() {
        let n = Notification {
            summary: "Please fix".into(),
            details: vec!["a".into(), "b".into()],
        };
        assert_eq!(n.to_string(), "Please fix\n  a\n  b");
        assert_eq!(n.lines().count(), 3);
    }

    #[test]
    fn recording_surface_keeps_order() {
        let surface = RecordingSurface::new();
        surface.notify(&Notification::summary_only("one"));
        surface.notify(&Notification::summary_only("two"));
        assert_eq!(surface.last().unwrap().summary, "two");
        let all = surface.take();
        assert_eq!(all.len(), 2);
        assert!(surface.take().is_empty());
    }
}
