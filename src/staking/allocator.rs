//! Bankroll distribution
//!
//! Splits a bankroll across slips weighted by inverse total odds, so
//! shorter-priced slips get more of the money. Stakes are rounded to the
//! cent and the rounding drift is pushed onto a single slip, which keeps
//! the allocated total equal to the bankroll to the cent.

use serde::Serialize;

use crate::slip::Slip;

/// Reason an allocation was declined
#[derive(Debug, Clone, PartialEq)]
pub enum AllocationDeclined {
    /// Bankroll missing, non-positive or not finite
    InvalidBankroll(f64),
    /// Nothing to allocate across
    NoSlips,
    /// Allocation across every risk bucket is not allowed
    NoRiskFilter,
    /// Bankroll too large to count in whole cents
    BankrollTooLarge(f64),
}

impl std::fmt::Display for AllocationDeclined {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocationDeclined::InvalidBankroll(b) => write!(f, "bankroll {} is not a positive amount", b),
            AllocationDeclined::NoSlips => write!(f, "no slips to distribute across"),
            AllocationDeclined::NoRiskFilter => write!(f, "select a specific risk filter first"),
            AllocationDeclined::BankrollTooLarge(b) => {
                write!(f, "bankroll {} exceeds the maximum of {}", b, MAX_BANKROLL)
            }
        }
    }
}

/// How shares were computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// Share proportional to 1 / total_odds
    Proportional,
    /// Every slip had non-positive odds, so each gets 1 / n
    EqualFallback,
}

/// Stake assigned to one slip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocatedStake {
    pub slip_id: String,
    pub weight: f64,
    pub share: f64,
    /// Whole cents
    pub cents: i64,
}

impl AllocatedStake {
    /// Two-decimal currency amount
    pub fn stake(&self) -> f64 {
        cents_to_amount(self.cents)
    }
}

/// Result of a successful distribution, in input order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    pub bankroll: f64,
    pub weighting: Weighting,
    /// Cents moved onto the adjusted slip (may be negative)
    pub residual_cents: i64,
    /// Index of the slip that absorbed the residual, if any
    pub adjusted_index: Option<usize>,
    pub stakes: Vec<AllocatedStake>,
}

impl Allocation {
    /// Sum of all allocated stakes
    pub fn total(&self) -> f64 {
        cents_to_amount(self.total_cents())
    }

    pub fn total_cents(&self) -> i64 {
        self.stakes.iter().map(|s| s.cents).sum()
    }

    /// Stake for a slip id
    pub fn get(&self, slip_id: &str) -> Option<f64> {
        self.stakes
            .iter()
            .find(|s| s.slip_id == slip_id)
            .map(AllocatedStake::stake)
    }

    /// (slip id, stake) pairs in input order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.stakes.iter().map(|s| (s.slip_id.as_str(), s.stake()))
    }

    pub fn len(&self) -> usize {
        self.stakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stakes.is_empty()
    }
}

/// Largest bankroll whose cent count is an exact f64 integer (2^53 cents)
pub const MAX_BANKROLL: f64 = 90_071_992_547_409.92;

/// Round half up to whole cents
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0 + 0.5).floor() as i64
}

/// Whole cents back to a currency amount
pub fn cents_to_amount(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Round an amount to the nearest cent (half up)
pub fn round_cents(amount: f64) -> f64 {
    cents_to_amount(to_cents(amount))
}

/// Distribute `bankroll` across `slips`.
///
/// Declines when the bankroll is not a positive finite number or there are
/// no slips. The risk-filter policy is enforced by the caller.
pub fn distribute(bankroll: f64, slips: &[Slip]) -> Result<Allocation, AllocationDeclined> {
    if !bankroll.is_finite() || bankroll <= 0.0 {
        return Err(AllocationDeclined::InvalidBankroll(bankroll));
    }
    if bankroll > MAX_BANKROLL {
        return Err(AllocationDeclined::BankrollTooLarge(bankroll));
    }
    if slips.is_empty() {
        return Err(AllocationDeclined::NoSlips);
    }

    let n = slips.len();
    let weights: Vec<f64> = slips
        .iter()
        .map(|s| if s.total_odds > 0.0 { 1.0 / s.total_odds } else { 0.0 })
        .collect();
    let weight_sum: f64 = weights.iter().sum();

    let weighting = if weight_sum > 0.0 {
        Weighting::Proportional
    } else {
        Weighting::EqualFallback
    };

    let mut stakes: Vec<AllocatedStake> = slips
        .iter()
        .zip(&weights)
        .map(|(slip, &weight)| {
            let share = match weighting {
                Weighting::Proportional => weight / weight_sum,
                Weighting::EqualFallback => 1.0 / n as f64,
            };
            AllocatedStake {
                slip_id: slip.id.clone(),
                weight,
                share,
                cents: to_cents(bankroll * share),
            }
        })
        .collect();

    let target_cents = to_cents(bankroll);
    let allocated_cents: i64 = stakes.iter().map(|s| s.cents).sum();
    let residual_cents = target_cents - allocated_cents;

    let adjusted_index = if residual_cents != 0 {
        let idx = match weighting {
            Weighting::Proportional => largest_weight_index(&weights),
            Weighting::EqualFallback => 0,
        };
        stakes[idx].cents += residual_cents;
        Some(idx)
    } else {
        None
    };

    Ok(Allocation {
        bankroll,
        weighting,
        residual_cents,
        adjusted_index,
        stakes,
    })
}

/// First index holding the largest weight
fn largest_weight_index(weights: &[f64]) -> usize {
    let mut best = 0;
    for (i, &w) in weights.iter().enumerate() {
        if w > weights[best] {
            best = i;
        }
    }
    best
}
