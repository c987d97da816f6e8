//! Transient notifications shown in the corner of the screen.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long an error toast stays visible.
pub const TOAST_TTL: Duration = Duration::from_secs(4);
const MAX_TOASTS: usize = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub created_at: Instant,
}

/// Most recent toasts, newest last.
#[derive(Debug)]
pub struct Toasts {
    items: VecDeque<Toast>,
    ttl: Duration,
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new(TOAST_TTL)
    }
}

impl Toasts {
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: VecDeque::new(),
            ttl,
        }
    }

    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>, now: Instant) {
        let message = message.into();
        tracing::info!(?level, %message, "toast");
        if self.items.len() == MAX_TOASTS {
            self.items.pop_front();
        }
        self.items.push_back(Toast {
            message,
            level,
            created_at: now,
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message, Instant::now());
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message, Instant::now());
    }

    /// Drop toasts older than the TTL.
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.items
            .retain(|t| now.saturating_duration_since(t.created_at) < ttl);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
