//! Per-slip disposition lifecycle
//!
//! Active -> PendingRemoval -> Removed. Placing or ignoring a slip starts a
//! fixed delay before it leaves the working set; while that delay runs the
//! slip is in flight and further actions on it are rejected.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Terminal outcome for a slip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Placed,
    Ignored,
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Disposition::Placed => write!(f, "placed"),
            Disposition::Ignored => write!(f, "ignored"),
        }
    }
}

/// Where a slip is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlipLifecycle {
    Active,
    PendingRemoval {
        disposition: Disposition,
        deadline: Instant,
    },
    Removed(Disposition),
}

impl SlipLifecycle {
    pub fn is_active(&self) -> bool {
        matches!(self, SlipLifecycle::Active)
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, SlipLifecycle::PendingRemoval { .. })
    }
}

/// A removal waiting for its delay to elapse
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRemoval {
    pub slip_id: String,
    pub disposition: Disposition,
    pub deadline: Instant,
}

/// A committed disposition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispositionRecord {
    pub slip_id: String,
    pub disposition: Disposition,
    /// Stake in effect when the slip left the working set
    pub stake: f64,
    pub at: DateTime<Utc>,
}

/// In-flight removals, ordered by deadline
#[derive(Debug, Clone, Default)]
pub struct RemovalQueue {
    pending: Vec<PendingRemoval>,
}

impl RemovalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slip_id: &str) -> Option<&PendingRemoval> {
        self.pending.iter().find(|p| p.slip_id == slip_id)
    }

    pub fn contains(&self, slip_id: &str) -> bool {
        self.get(slip_id).is_some()
    }

    /// Queue a removal. Returns false if the slip is already queued.
    pub fn push(&mut self, removal: PendingRemoval) -> bool {
        if self.contains(&removal.slip_id) {
            return false;
        }
        let idx = self
            .pending
            .iter()
            .position(|p| p.deadline > removal.deadline)
            .unwrap_or(self.pending.len());
        self.pending.insert(idx, removal);
        true
    }

    /// Remove and return every removal due at `now`, earliest first
    pub fn take_due(&mut self, now: Instant) -> Vec<PendingRemoval> {
        let split = self
            .pending
            .iter()
            .position(|p| p.deadline > now)
            .unwrap_or(self.pending.len());
        self.pending.drain(..split).collect()
    }

    /// Earliest deadline still waiting
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.first().map(|p| p.deadline)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn removal(id: &str, deadline: Instant) -> PendingRemoval {
        PendingRemoval {
            slip_id: id.to_string(),
            disposition: Disposition::Placed,
            deadline,
        }
    }

    #[test]
    fn test_rejects_duplicate() {
        let now = Instant::now();
        let mut queue = RemovalQueue::new();
        assert!(queue.push(removal("a", now)));
        assert!(!queue.push(removal("a", now + Duration::from_secs(1))));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_take_due_in_deadline_order() {
        let now = Instant::now();
        let mut queue = RemovalQueue::new();
        queue.push(removal("late", now + Duration::from_millis(800)));
        queue.push(removal("early", now + Duration::from_millis(400)));
        queue.push(removal("mid", now + Duration::from_millis(500)));

        let due: Vec<String> = queue
            .take_due(now + Duration::from_millis(500))
            .into_iter()
            .map(|p| p.slip_id)
            .collect();
        assert_eq!(due, vec!["early", "mid"]);
        assert_eq!(queue.next_deadline(), Some(now + Duration::from_millis(800)));
    }
}
