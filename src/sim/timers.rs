//! Deferred single-shot timers
//!
//! Every timer is tagged with the session that scheduled it. Draining against
//! the current session drops anything left over from a superseded session, so
//! a restart can never receive a stale trap reveal or respawn.

use serde::{Deserialize, Serialize};

use super::state::SessionId;

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// Make a hidden trap visible and lethal
    RevealTrap { trap_id: u32 },
    /// Reinitialize the level after a death
    Respawn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Pending {
    session: SessionId,
    due_ms: f64,
    kind: TimerKind,
}

/// Timer queue driven by simulation time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timers {
    now_ms: f64,
    pending: Vec<Pending>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Fire `kind` once, `delay_ms` from now, on behalf of `session`
    pub fn schedule(&mut self, session: SessionId, delay_ms: f32, kind: TimerKind) {
        self.pending.push(Pending {
            session,
            due_ms: self.now_ms + delay_ms.max(0.0) as f64,
            kind,
        });
    }

    pub fn advance(&mut self, dt_ms: f32) {
        self.now_ms += dt_ms as f64;
    }

    /// Remove and return every due timer of `current`, oldest deadline first.
    /// Timers of any other session are discarded whether due or not.
    pub fn drain_due(&mut self, current: SessionId) -> Vec<TimerKind> {
        let now = self.now_ms;
        let mut due = Vec::new();
        let mut stale = 0usize;

        self.pending.retain(|p| {
            if p.session != current {
                stale += 1;
                false
            } else if p.due_ms <= now {
                due.push((p.due_ms, p.kind));
                false
            } else {
                true
            }
        });

        if stale > 0 {
            log::debug!("Discarded {} stale timer(s) from superseded sessions", stale);
        }

        // Stable sort keeps scheduling order for equal deadlines
        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, kind)| kind).collect()
    }

    /// Cancel everything (host teardown)
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
