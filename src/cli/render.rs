//! Plain-text rendering for the terminal

use std::fmt::Write;

use crate::session::{SessionStats, SlipDetail, SlipLifecycle, SlipRow};
use crate::staking::{Allocation, Weighting};
use crate::view::PageInfo;

/// Format an amount as `"EUR 1,234.56"`. Negative amounts keep their sign
/// in front of the code: `"-EUR 12.30"`.
pub fn format_currency(value: f64, code: &str) -> String {
    if !value.is_finite() {
        return format!("{} {}", code, value);
    }

    let cents = (value.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{} {}.{:02}", sign, code, whole, cents % 100)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Slip table for one page
pub fn slip_table(rows: &[SlipRow], currency: &str) -> String {
    if rows.is_empty() {
        return "No slips match the current filters.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<16} {:<7} {:>5} {:>4} {:>8} {:>16} {:>16}",
        "#", "SLIP", "RISK", "CONF", "LEGS", "ODDS", "STAKE", "RETURN"
    );
    for row in rows {
        let mut stake = format_currency(row.stake, currency);
        if row.has_override {
            stake.push('*');
        }
        let _ = writeln!(
            out,
            "{:>4}  {:<16} {:<7} {:>4}% {:>4} {:>8.2} {:>16} {:>16}{}",
            row.rank,
            truncate(&row.slip_id, 16),
            row.risk.as_str(),
            row.confidence_pct,
            row.legs,
            row.total_odds,
            stake,
            format_currency(row.expected_return, currency),
            if row.removing { "  (removing)" } else { "" }
        );
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// "Showing 1-10 of 42 slips (filtered from 50) | Page 1 of 5"
pub fn page_summary(info: &PageInfo) -> String {
    let mut out = format!(
        "Showing {}-{} of {} slips",
        info.showing_start, info.showing_end, info.total_filtered
    );
    if info.is_filtered() {
        let _ = write!(out, " (filtered from {})", info.total_all);
    }
    let _ = write!(out, " | Page {} of {}", info.page, info.total_pages);
    out
}

/// Progress line plus risk distribution of the remaining slips
pub fn stats_summary(stats: &SessionStats) -> String {
    format!(
        "{}\nRisk: {} low, {} medium, {} high, {} unknown",
        stats, stats.risk.low, stats.risk.medium, stats.risk.high, stats.risk.unknown
    )
}

pub fn slip_detail(detail: &SlipDetail, currency: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== SLIP {} ===\n", detail.slip_id);
    let _ = writeln!(out, "Risk:        {}", detail.risk.label());
    let _ = writeln!(out, "Confidence:  {:.0}%", detail.confidence * 100.0);
    let _ = writeln!(out, "Total odds:  {:.2}", detail.total_odds);
    let _ = writeln!(
        out,
        "Stake:       {}{}",
        format_currency(detail.stake, currency),
        if detail.has_override { " (override)" } else { "" }
    );
    let _ = writeln!(
        out,
        "Return:      {}",
        format_currency(detail.expected_return, currency)
    );
    if let SlipLifecycle::PendingRemoval { disposition, .. } = detail.lifecycle {
        let _ = writeln!(out, "Status:      being {}", disposition);
    }

    let _ = writeln!(out, "\nLegs ({}):", detail.legs.len());
    for (i, leg) in detail.legs.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {}  {} / {} @ {:.2}",
            i + 1,
            leg.fixture(),
            leg.market,
            leg.selection,
            leg.odds
        );
    }
    out
}

pub fn allocation_summary(allocation: &Allocation, currency: &str) -> String {
    let mut out = String::new();
    let basis = match allocation.weighting {
        Weighting::Proportional => "proportional to odds",
        Weighting::EqualFallback => "equal split",
    };
    let _ = writeln!(
        out,
        "Distributed {} across {} slips ({})",
        format_currency(allocation.bankroll, currency),
        allocation.len(),
        basis
    );
    for (i, stake) in allocation.stakes.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:<16} {:>6.2}%  {:>16}{}",
            truncate(&stake.slip_id, 16),
            stake.share * 100.0,
            format_currency(stake.stake(), currency),
            if allocation.adjusted_index == Some(i) && allocation.residual_cents != 0 {
                " (rounding adjusted)"
            } else {
                ""
            }
        );
    }
    let _ = writeln!(out, "Total: {}", format_currency(allocation.total(), currency));
    out
}
