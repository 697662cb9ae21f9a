//! Slip ordering

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::slip::{normalize_confidence, Slip};
use crate::staking::StakeOverrides;

/// Sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Normalized confidence, highest first
    #[default]
    Confidence,
    /// Total odds, highest first
    Odds,
    /// Effective stake, highest first
    Stake,
    /// Severity, LOW first
    Risk,
    /// Expected return, highest first
    Return,
    /// Unrecognised key: keep filtered order
    Unsorted,
}

impl SortKey {
    pub const OPTIONS: [SortKey; 5] = [
        SortKey::Confidence,
        SortKey::Odds,
        SortKey::Stake,
        SortKey::Risk,
        SortKey::Return,
    ];

    /// Parse a sort key name. Anything unrecognised maps to `Unsorted`.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "confidence" => SortKey::Confidence,
            "odds" => SortKey::Odds,
            "stake" => SortKey::Stake,
            "risk" => SortKey::Risk,
            "return" => SortKey::Return,
            other => {
                debug!("Unknown sort key '{}', keeping filtered order", other);
                SortKey::Unsorted
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Confidence => "confidence",
            SortKey::Odds => "odds",
            SortKey::Stake => "stake",
            SortKey::Risk => "risk",
            SortKey::Return => "return",
            SortKey::Unsorted => "unsorted",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for SortKey {
    fn from(name: &str) -> Self {
        SortKey::parse(name)
    }
}

/// Descending total order; NaN sorts last
fn descending(a: f64, b: f64) -> Ordering {
    sort_value(b).total_cmp(&sort_value(a))
}

fn sort_value(v: f64) -> f64 {
    if v.is_nan() {
        f64::NEG_INFINITY
    } else {
        // folds -0.0 into 0.0
        v + 0.0
    }
}

/// Return a sorted copy of `slips`. The sort is stable, so ties keep their
/// filtered order.
pub fn sort_slips(slips: &[Slip], key: SortKey, overrides: &StakeOverrides) -> Vec<Slip> {
    let mut sorted = slips.to_vec();

    match key {
        SortKey::Confidence => {
            sorted.sort_by(|a, b| descending(normalize_confidence(a), normalize_confidence(b)))
        }
        SortKey::Odds => sorted.sort_by(|a, b| descending(a.total_odds, b.total_odds)),
        SortKey::Stake => sorted.sort_by(|a, b| {
            descending(overrides.effective_stake(a), overrides.effective_stake(b))
        }),
        SortKey::Risk => sorted.sort_by_key(|s| s.risk().severity()),
        SortKey::Return => sorted.sort_by(|a, b| {
            descending(overrides.expected_return(a), overrides.expected_return(b))
        }),
        SortKey::Unsorted => {}
    }

    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(slips: &[Slip]) -> Vec<&str> {
        slips.iter().map(|s| s.id.as_str()).collect()
    }

    fn slip(id: &str) -> Slip {
        Slip {
            id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_sort_by_risk_severity() {
        let slips: Vec<Slip> = [("h", "HIGH"), ("l", "LOW"), ("u", "???"), ("m", "MEDIUM")]
            .iter()
            .map(|(id, risk)| Slip {
                risk_category: Some(risk.to_string()),
                ..slip(id)
            })
            .collect();

        let sorted = sort_slips(&slips, SortKey::Risk, &StakeOverrides::new());
        assert_eq!(ids(&sorted), vec!["l", "m", "h", "u"]);
    }

    #[test]
    fn test_sort_by_confidence_descending() {
        let slips = vec![
            Slip { confidence_score: json!(0.2), ..slip("a") },
            Slip { confidence_score: json!("0.9"), ..slip("b") },
            Slip { confidence_score: json!("n/a"), ..slip("c") },
            Slip { confidence_score: json!(4.0), ..slip("d") },
        ];

        let sorted = sort_slips(&slips, SortKey::Confidence, &StakeOverrides::new());
        assert_eq!(ids(&sorted), vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_sort_by_stake_uses_overrides() {
        let slips = vec![
            Slip { stake: 10.0, ..slip("a") },
            Slip { stake: 5.0, ..slip("b") },
        ];
        let mut overrides = StakeOverrides::new();
        overrides.set("b", 20.0);

        let sorted = sort_slips(&slips, SortKey::Stake, &overrides);
        assert_eq!(ids(&sorted), vec!["b", "a"]);
    }

    #[test]
    fn test_sort_by_return_and_odds() {
        let slips = vec![
            Slip { stake: 10.0, total_odds: 2.0, ..slip("a") },
            Slip { stake: 1.0, total_odds: 5.0, estimated_return: 50.0, ..slip("b") },
            Slip { stake: 4.0, total_odds: 3.0, ..slip("c") },
        ];
        let overrides = StakeOverrides::new();

        assert_eq!(ids(&sort_slips(&slips, SortKey::Return, &overrides)), vec!["b", "a", "c"]);
        assert_eq!(ids(&sort_slips(&slips, SortKey::Odds, &overrides)), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let slips = vec![
            Slip { total_odds: 2.0, ..slip("first") },
            Slip { total_odds: 2.0, ..slip("second") },
            Slip { total_odds: f64::NAN, ..slip("nan") },
        ];
        let sorted = sort_slips(&slips, SortKey::Odds, &StakeOverrides::new());
        assert_eq!(ids(&sorted), vec!["first", "second", "nan"]);
    }

    #[test]
    fn test_unknown_key_is_noop() {
        let slips = vec![
            Slip { total_odds: 1.0, ..slip("x") },
            Slip { total_odds: 9.0, ..slip("y") },
        ];
        let key = SortKey::parse("popularity");
        assert_eq!(key, SortKey::Unsorted);
        assert_eq!(ids(&sort_slips(&slips, key, &StakeOverrides::new())), vec!["x", "y"]);
    }
}
