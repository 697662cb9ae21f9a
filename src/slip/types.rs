//! Slip and leg types as received from the placement API
//!
//! Records are deserialized leniently: numeric fields that are missing,
//! null or non-numeric become zero, numeric strings are parsed, and string
//! fields accept numbers and null. `confidence_score` keeps its raw JSON
//! value, since upstream data is not always well-typed. Derived values
//! (classified risk, normalized confidence, effective stake) are recomputed
//! on read, never stored.

use serde::{Deserialize, Deserializer, Serialize};

/// One match within a slip
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Leg {
    #[serde(default, deserialize_with = "lenient_string")]
    pub home_team: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub away_team: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub market: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub selection: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub odds: f64,
}

impl Leg {
    /// "Home vs Away" label
    pub fn fixture(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }
}

/// A candidate multi-leg bet
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Slip {
    #[serde(rename = "slip_id", deserialize_with = "lenient_string")]
    pub id: String,
    /// Free-text risk label, classified with [`super::normalize_risk`]
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub risk_category: Option<String>,
    /// Raw confidence, nominally a number in 0..1
    #[serde(default)]
    pub confidence_score: serde_json::Value,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub legs: Vec<Leg>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub stake: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_odds: f64,
    /// Zero means "derive from stake x odds"
    #[serde(default, deserialize_with = "lenient_f64")]
    pub estimated_return: f64,
}

impl Slip {
    /// Classified risk level
    pub fn risk(&self) -> super::RiskLevel {
        super::normalize_risk(self.risk_category.as_deref())
    }

    /// Case-insensitive match of `needle_lower` against the slip id and
    /// every leg's team names. `needle_lower` must already be lowercase.
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        self.id.to_lowercase().contains(needle_lower)
            || self.legs.iter().any(|leg| {
                leg.home_team.to_lowercase().contains(needle_lower)
                    || leg.away_team.to_lowercase().contains(needle_lower)
            })
    }
}

/// A fetched batch of slips keyed by its master slip id
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SlipBatch {
    pub master_slip_id: String,
    pub slips: Vec<Slip>,
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    })
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_record() {
        let json = r#"{
            "slip_id": "S-1",
            "risk_category": "Low Risk",
            "confidence_score": "0.82",
            "legs": [
                {"home_team": "Chelsea", "away_team": "Arsenal", "market": "1X2", "selection": "2", "odds": 2.1}
            ],
            "stake": 5.0,
            "total_odds": 2.1
        }"#;

        let slip: Slip = serde_json::from_str(json).unwrap();
        assert_eq!(slip.id, "S-1");
        assert_eq!(slip.legs.len(), 1);
        assert_eq!(slip.legs[0].fixture(), "Chelsea vs Arsenal");
        assert_eq!(slip.estimated_return, 0.0);
        assert_eq!(slip.confidence_score, serde_json::json!("0.82"));
    }

    #[test]
    fn test_tolerates_missing_legs_and_risk() {
        let slip: Slip = serde_json::from_str(r#"{"slip_id": "S-2"}"#).unwrap();
        assert!(slip.legs.is_empty());
        assert!(slip.risk_category.is_none());
        assert!(slip.confidence_score.is_null());
    }

    #[test]
    fn test_matches_search_on_id_and_teams() {
        let slip = Slip {
            id: "ACCA-77".to_string(),
            legs: vec![Leg {
                home_team: "Everton".to_string(),
                away_team: "Arsenal".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };

        assert!(slip.matches_search("acca"));
        assert!(slip.matches_search("arsenal"));
        assert!(slip.matches_search("ever"));
        assert!(!slip.matches_search("liverpool"));
    }

    #[test]
    fn test_null_and_string_fields_are_tolerated() {
        let json = r#"{
            "slip_id": 7,
            "risk_category": null,
            "legs": null,
            "stake": "5.00",
            "total_odds": null,
            "estimated_return": "n/a"
        }"#;

        let slip: Slip = serde_json::from_str(json).unwrap();
        assert_eq!(slip.id, "7");
        assert!(slip.risk_category.is_none());
        assert!(slip.legs.is_empty());
        assert_eq!(slip.stake, 5.0);
        assert_eq!(slip.total_odds, 0.0);
        assert_eq!(slip.estimated_return, 0.0);
    }

    #[test]
    fn test_leg_with_null_teams_and_string_odds() {
        let leg: Leg =
            serde_json::from_str(r#"{"home_team": null, "away_team": "Leeds", "odds": "1.9"}"#)
                .unwrap();
        assert_eq!(leg.home_team, "");
        assert_eq!(leg.away_team, "Leeds");
        assert_eq!(leg.odds, 1.9);
    }

    #[test]
    fn test_missing_slip_id_is_rejected() {
        assert!(serde_json::from_str::<Slip>(r#"{"stake": 1}"#).is_err());
    }
}
