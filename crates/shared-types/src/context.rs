//! # Operation Context
//!
//! Ambient cancellation and deadline carried by every block operation and
//! handed, unchanged, to each collaborator call. The block layer itself
//! never short-circuits on it; collaborators decide how to report a
//! cancelled or expired context.

use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Why a context is no longer live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// Still usable.
    Live,
    /// Explicitly cancelled.
    Cancelled,
    /// Deadline passed.
    DeadlineExceeded,
}

/// Cancellation token plus optional deadline.
#[derive(Debug, Clone, Default)]
pub struct OpContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl OpContext {
    /// Context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Context bounded by `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(Instant::now() + timeout),
        }
    }

    /// Child context: cancelled with its parent, may tighten the deadline.
    pub fn child(&self, timeout: Option<Duration>) -> Self {
        let deadline = match (self.deadline, timeout.map(|t| Instant::now() + t)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        Self {
            token: self.token.child_token(),
            deadline,
        }
    }

    /// Cancel this context and all of its children.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Underlying token, for `select!`-style waiting.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Current state; cancellation wins over an expired deadline.
    pub fn state(&self) -> ContextState {
        if self.token.is_cancelled() {
            ContextState::Cancelled
        } else if matches!(self.deadline, Some(d) if Instant::now() >= d) {
            ContextState::DeadlineExceeded
        } else {
            ContextState::Live
        }
    }

    /// Whether the context is still usable.
    pub fn is_live(&self) -> bool {
        self.state() == ContextState::Live
    }
}
