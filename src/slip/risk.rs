//! Risk classification
//!
//! Upstream risk labels are free text ("Low Risk", "moderate", "HIGH").
//! They are folded into four canonical levels on read.

use serde::{Deserialize, Serialize};

use super::types::Slip;

/// Canonical risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Unknown,
}

impl RiskLevel {
    /// All levels in severity order
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Unknown,
    ];

    /// Severity rank used by the risk sort (LOW first, UNKNOWN last)
    pub fn severity(&self) -> u8 {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Medium => 1,
            RiskLevel::High => 2,
            RiskLevel::Unknown => 3,
        }
    }

    /// Canonical upper-case name
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Unknown => "UNKNOWN",
        }
    }

    /// Human label
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
            RiskLevel::Unknown => "Unknown Risk",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a free-text risk label.
///
/// Exact (case-insensitive) canonical names win. Otherwise the first
/// substring hit in the order LOW, MEDIUM/MODERATE, HIGH decides, so
/// "low to high" is LOW.
pub fn normalize_risk(raw: Option<&str>) -> RiskLevel {
    let raw = match raw {
        Some(r) if !r.trim().is_empty() => r,
        _ => return RiskLevel::Unknown,
    };

    let upper = raw.to_uppercase();
    if let Some(level) = RiskLevel::ALL.iter().find(|l| l.as_str() == upper) {
        return *level;
    }

    if upper.contains("LOW") {
        RiskLevel::Low
    } else if upper.contains("MEDIUM") || upper.contains("MODERATE") {
        RiskLevel::Medium
    } else if upper.contains("HIGH") {
        RiskLevel::High
    } else {
        RiskLevel::Unknown
    }
}

/// Slip counts per risk level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskDistribution {
    pub all: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub unknown: usize,
}

impl RiskDistribution {
    pub fn from_slips(slips: &[Slip]) -> Self {
        let mut dist = Self {
            all: slips.len(),
            ..Default::default()
        };
        for slip in slips {
            match slip.risk() {
                RiskLevel::Low => dist.low += 1,
                RiskLevel::Medium => dist.medium += 1,
                RiskLevel::High => dist.high += 1,
                RiskLevel::Unknown => dist.unknown += 1,
            }
        }
        dist
    }

    pub fn count(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::Low => self.low,
            RiskLevel::Medium => self.medium,
            RiskLevel::High => self.high,
            RiskLevel::Unknown => self.unknown,
        }
    }
}
