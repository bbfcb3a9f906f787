//! Fire-and-forget user notifications.
//!
//! The dialog reports outcomes through [`Notifier`]; the TUI implementation is
//! [`Toasts`], a short-lived stack drawn over the top-right corner.

use std::time::{Duration, Instant};

/// Messages shown for the edit dialog outcomes.
pub const MSG_MISSING_ID: &str = "User ID is missing";
pub const MSG_UPDATE_OK: &str = "User updated successfully";
pub const MSG_UPDATE_FAILED: &str = "Failed to update user";

pub trait Notifier {
    fn success(&mut self, message: &str);
    fn error(&mut self, message: &str);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub created_at: Instant,
}

/// Visible toasts, oldest first.
#[derive(Clone, Debug)]
pub struct Toasts {
    items: Vec<Toast>,
    ttl: Duration,
    max: usize,
}

impl Toasts {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(4);

    pub fn new(ttl: Duration, max: usize) -> Self {
        Self {
            items: Vec::new(),
            ttl,
            max: max.max(1),
        }
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.items.push(Toast {
            kind,
            message: message.into(),
            created_at: Instant::now(),
        });
        if self.items.len() > self.max {
            let overflow = self.items.len() - self.max;
            self.items.drain(..overflow);
        }
    }

    /// Drop toasts older than the TTL.
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.items
            .retain(|t| now.saturating_duration_since(t.created_at) < ttl);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL, 4)
    }
}

impl Notifier for Toasts {
    fn success(&mut self, message: &str) {
        self.push(ToastKind::Success, message);
    }

    fn error(&mut self, message: &str) {
        self.push(ToastKind::Error, message);
    }
}
