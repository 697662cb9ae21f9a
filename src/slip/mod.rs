//! Slip data model and per-slip classifiers

pub mod metrics;
pub mod risk;
pub mod types;

pub use metrics::{calculate_return, effective_stake, normalize_confidence};
pub use risk::{normalize_risk, RiskDistribution, RiskLevel};
pub use types::{Leg, Slip, SlipBatch};
