//! Transient, self-clearing error messages.
//!
//! A notice is visible for [`NOTICE_TTL`] after it was raised and then
//! disappears on its own; nothing has to clear it explicitly. Expiry is
//! measured with `tokio::time::Instant` so paused-clock tests can advance it.

use std::time::Duration;

use tokio::time::Instant;

/// How long a notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Notice {
    message: String,
    raised_at: Instant,
}

/// Holds at most one current message. Raising a new one replaces the old.
#[derive(Debug, Clone)]
pub struct TransientNotice {
    current: Option<Notice>,
    ttl: Duration,
}

impl Default for TransientNotice {
    fn default() -> Self {
        Self::new(NOTICE_TTL)
    }
}

impl TransientNotice {
    pub fn new(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn raise(&mut self, message: impl Into<String>) {
        self.current = Some(Notice {
            message: message.into(),
            raised_at: Instant::now(),
        });
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The message, if one was raised less than `ttl` ago.
    pub fn current(&self) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|n| n.raised_at.elapsed() < self.ttl)
            .map(|n| n.message.as_str())
    }

    /// Instant at which the current message disappears.
    pub fn expires_at(&self) -> Option<Instant> {
        self.current
            .as_ref()
            .map(|n| n.raised_at + self.ttl)
            .filter(|deadline| *deadline > Instant::now())
    }
}
