//! Operator stake overrides keyed by slip id

use std::collections::HashMap;

use super::allocator::Allocation;
use crate::slip::{self, Slip};

/// Operator-chosen stakes. An entry, when present, is the effective stake
/// of its slip for display, sorting and return computation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StakeOverrides {
    stakes: HashMap<String, f64>,
}

impl StakeOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slip_id: &str) -> Option<f64> {
        self.stakes.get(slip_id).copied()
    }

    pub fn set(&mut self, slip_id: impl Into<String>, stake: f64) {
        self.stakes.insert(slip_id.into(), stake);
    }

    pub fn remove(&mut self, slip_id: &str) -> Option<f64> {
        self.stakes.remove(slip_id)
    }

    pub fn clear(&mut self) {
        self.stakes.clear();
    }

    pub fn len(&self) -> usize {
        self.stakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stakes.is_empty()
    }

    /// Copy of the map with every allocated stake applied. Entries for slips
    /// outside the allocation are kept as they are.
    pub fn with_allocation(&self, allocation: &Allocation) -> Self {
        let mut next = self.clone();
        for (slip_id, stake) in allocation.iter() {
            next.set(slip_id, stake);
        }
        next
    }

    /// Override stake or the slip's own
    pub fn effective_stake(&self, slip: &Slip) -> f64 {
        slip::effective_stake(slip, self.get(&slip.id))
    }

    /// Override-aware expected return
    pub fn expected_return(&self, slip: &Slip) -> f64 {
        slip::calculate_return(slip, self.get(&slip.id))
    }
}
