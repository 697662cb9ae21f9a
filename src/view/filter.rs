//! Slip filtering: risk bucket and free-text search

use serde::{Deserialize, Serialize};

use crate::slip::{RiskLevel, Slip};

/// Risk bucket selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskFilter {
    #[default]
    All,
    Low,
    Medium,
    High,
}

impl RiskFilter {
    /// Selectable filters in display order
    pub const OPTIONS: [RiskFilter; 4] = [
        RiskFilter::All,
        RiskFilter::Low,
        RiskFilter::Medium,
        RiskFilter::High,
    ];

    /// Risk level this filter keeps, `None` for all
    pub fn target(&self) -> Option<RiskLevel> {
        match self {
            RiskFilter::All => None,
            RiskFilter::Low => Some(RiskLevel::Low),
            RiskFilter::Medium => Some(RiskLevel::Medium),
            RiskFilter::High => Some(RiskLevel::High),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, RiskFilter::All)
    }

    pub fn keeps(&self, slip: &Slip) -> bool {
        match self.target() {
            None => true,
            Some(level) => slip.risk() == level,
        }
    }
}

impl std::fmt::Display for RiskFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskFilter::All => write!(f, "all"),
            RiskFilter::Low => write!(f, "LOW"),
            RiskFilter::Medium => write!(f, "MEDIUM"),
            RiskFilter::High => write!(f, "HIGH"),
        }
    }
}

impl std::str::FromStr for RiskFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(RiskFilter::All),
            "low" => Ok(RiskFilter::Low),
            "medium" => Ok(RiskFilter::Medium),
            "high" => Ok(RiskFilter::High),
            other => Err(format!(
                "unknown risk filter '{}' (expected all, low, medium or high)",
                other
            )),
        }
    }
}

/// Everything the filter stage looks at
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub risk: RiskFilter,
    /// Search term already past the debounce
    pub search: String,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.risk.is_all() && self.search.trim().is_empty()
    }
}

/// Keep slips in the selected risk bucket whose id or team names contain
/// the search term. Input order is preserved.
///
/// A blank term disables the search; otherwise the term is matched as
/// typed, surrounding whitespace included.
pub fn filter_slips(slips: &[Slip], criteria: &FilterCriteria) -> Vec<Slip> {
    let active = !criteria.search.trim().is_empty();
    let term = criteria.search.to_lowercase();

    slips
        .iter()
        .filter(|slip| criteria.risk.keeps(slip))
        .filter(|slip| !active || slip.matches_search(&term))
        .cloned()
        .collect()
}
