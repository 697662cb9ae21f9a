//! Session progress statistics

use serde::Serialize;

use crate::slip::{RiskDistribution, Slip};

/// Placement progress across the batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub placed: usize,
    pub ignored: usize,
    pub remaining: usize,
    /// placed + ignored + remaining
    pub total: usize,
    /// Share of the batch processed, 0..=100
    pub progress_pct: f64,
    pub placed_pct: f64,
    pub ignored_pct: f64,
    /// Distribution over the remaining slips
    pub risk: RiskDistribution,
}

impl SessionStats {
    pub fn compute(placed: usize, ignored: usize, remaining: &[Slip]) -> Self {
        let total = placed + ignored + remaining.len();
        let pct = |n: usize| {
            if total == 0 {
                0.0
            } else {
                (n as f64 / total as f64 * 100.0).min(100.0)
            }
        };

        Self {
            placed,
            ignored,
            remaining: remaining.len(),
            total,
            progress_pct: pct(placed + ignored),
            placed_pct: pct(placed),
            ignored_pct: pct(ignored),
            risk: RiskDistribution::from_slips(remaining),
        }
    }

    pub fn processed(&self) -> usize {
        self.placed + self.ignored
    }
}

impl std::fmt::Display for SessionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} placed • {} ignored • {} remaining ({:.0}% done)",
            self.placed, self.ignored, self.remaining, self.progress_pct
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress() {
        let remaining = vec![Slip::default(), Slip::default()];
        let stats = SessionStats::compute(1, 1, &remaining);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.processed(), 2);
        assert_eq!(stats.progress_pct, 50.0);
        assert_eq!(stats.placed_pct, 25.0);
        assert_eq!(stats.risk.unknown, 2);
    }

    #[test]
    fn test_empty_batch() {
        let stats = SessionStats::compute(0, 0, &[]);
        assert_eq!(stats.progress_pct, 0.0);
        assert_eq!(stats.to_string(), "0 placed • 0 ignored • 0 remaining (0% done)");
    }
}
