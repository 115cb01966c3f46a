use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one play session. A fresh id is minted on every reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Work deferred by wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredKind {
    /// Place a fresh pickup batch for the given level.
    RespawnPickups { level: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeferredAction {
    pub session: SessionId,
    /// Session clock time, in seconds, at which the action becomes due.
    pub fire_at: f64,
    pub kind: DeferredKind,
}

/// Deferred actions tied to the session that scheduled them.
///
/// An action never fires for a session other than its own: cancelled and
/// stale entries are discarded instead.
#[derive(Debug, Default)]
pub struct Scheduler {
    pending: Vec<DeferredAction>,
}

impl Scheduler {
    pub fn schedule(&mut self, session: SessionId, fire_at: f64, kind: DeferredKind) {
        self.pending.push(DeferredAction {
            session,
            fire_at,
            kind,
        });
    }

    /// Drop every action owned by `session`. Returns how many were dropped.
    pub fn cancel_session(&mut self, session: SessionId) -> usize {
        let before = self.pending.len();
        self.pending.retain(|a| a.session != session);
        before - self.pending.len()
    }

    /// Remove and return actions due at `now` for `current`, in schedule
    /// order. Actions belonging to any other session are discarded.
    pub fn take_due(&mut self, now: f64, current: SessionId) -> Vec<DeferredKind> {
        let mut due = Vec::new();
        self.pending.retain(|action| {
            if action.session != current {
                tracing::debug!(
                    session = %action.session,
                    kind = ?action.kind,
                    "Discarded stale deferred action"
                );
                return false;
            }
            if action.fire_at <= now {
                due.push(action.kind);
                return false;
            }
            true
        });
        due
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
