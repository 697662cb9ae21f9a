//! Derived per-slip values: confidence, effective stake, expected return

use regex::Regex;

use super::types::Slip;

lazy_static::lazy_static! {
    /// Numeric prefix accepted by a lenient float parse. The exponent is only
    /// taken when it has digits.
    static ref LEADING_FLOAT: Regex =
        Regex::new(r"^[+-]?(?:Infinity|(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?)")
            .expect("Invalid leading float pattern");
}

/// Normalized confidence in [0, 1].
///
/// Numbers are taken as-is, strings are parsed leniently (leading numeric
/// prefix), anything else counts as 0.
pub fn normalize_confidence(slip: &Slip) -> f64 {
    let raw = match &slip.confidence_score {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => parse_leading_float(s),
        _ => None,
    };

    match raw {
        Some(v) if !v.is_nan() => v.clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Parse the longest numeric prefix of `s` ("0.75abc" -> 0.75, "Infinity" -> inf)
fn parse_leading_float(s: &str) -> Option<f64> {
    LEADING_FLOAT
        .find(s.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Override stake when present, else the slip's own stake
pub fn effective_stake(slip: &Slip, override_stake: Option<f64>) -> f64 {
    override_stake.unwrap_or(slip.stake)
}

/// Expected payout of a slip.
///
/// An override stake always wins: `override x total_odds`. Without one,
/// a strictly positive stored `estimated_return` is authoritative and
/// otherwise the return is `stake x total_odds`.
pub fn calculate_return(slip: &Slip, override_stake: Option<f64>) -> f64 {
    match override_stake {
        Some(stake) => stake * slip.total_odds,
        None if slip.estimated_return > 0.0 => slip.estimated_return,
        None => slip.stake * slip.total_odds,
    }
}
