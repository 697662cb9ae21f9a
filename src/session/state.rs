//! Session state
//!
//! Owns the slip collection, view settings, overrides and disposition
//! bookkeeping. Every setter mutates state and then re-derives the whole
//! view; there is no other update path.

use std::time::{Duration, Instant};

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::debounce::Debouncer;
use super::lifecycle::{Disposition, DispositionRecord, PendingRemoval, RemovalQueue, SlipLifecycle};
use super::stats::SessionStats;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::slip::{normalize_confidence, Leg, RiskLevel, Slip, SlipBatch};
use crate::staking::{self, Allocation, AllocationDeclined, StakeOverrides};
use crate::view::{self, DerivedView, RiskFilter, SortKey, ViewSettings};

lazy_static::lazy_static! {
    /// Bankroll text: ASCII digits with at most one decimal point
    static ref DECIMAL_INPUT: Regex =
        Regex::new(r"^[0-9]*\.?[0-9]*$").expect("Invalid bankroll pattern");
}

/// Session tunables, usually taken from [`Config`]
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub currency: String,
    pub default_page_size: usize,
    pub search_debounce: Duration,
    pub removal_delay: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            currency: config.display.currency.clone(),
            default_page_size: config.display.page_size,
            search_debounce: config.session.search_debounce(),
            removal_delay: config.session.removal_delay(),
        }
    }
}

/// Where the slip collection came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    /// Fetch failed; the message is shown to the operator as-is
    Failed(String),
}

/// One rendered table row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlipRow {
    /// 1-based position in the remaining collection
    pub rank: usize,
    pub slip_id: String,
    pub risk: RiskLevel,
    /// Rounded normalized confidence, 0..=100
    pub confidence_pct: u8,
    pub legs: usize,
    pub stake: f64,
    pub total_odds: f64,
    pub expected_return: f64,
    pub has_override: bool,
    pub removing: bool,
}

/// Full detail of one slip
#[derive(Debug, Clone, PartialEq)]
pub struct SlipDetail {
    pub slip_id: String,
    pub risk: RiskLevel,
    pub confidence: f64,
    pub legs: Vec<Leg>,
    pub stake: f64,
    pub total_odds: f64,
    pub expected_return: f64,
    pub has_override: bool,
    pub lifecycle: SlipLifecycle,
}

/// Review session over one fetched batch
#[derive(Debug)]
pub struct SessionState {
    settings: SessionSettings,
    status: LoadStatus,
    master_slip_id: Option<String>,
    slips: Vec<Slip>,

    view_settings: ViewSettings,
    /// Raw search input; `view_settings.criteria.search` holds the debounced term
    search_input: String,
    search: Debouncer<String>,
    bankroll_input: String,

    overrides: StakeOverrides,
    last_allocation: Option<Allocation>,

    removals: RemovalQueue,
    history: Vec<DispositionRecord>,
    placed_count: usize,
    ignored_count: usize,
    selected: Option<String>,

    view: DerivedView,
}

impl SessionState {
    pub fn new(settings: SessionSettings) -> Self {
        let view_settings = ViewSettings {
            page_size: settings.default_page_size,
            ..Default::default()
        };
        let view = DerivedView::empty(&view_settings);

        Self {
            search: Debouncer::new(settings.search_debounce),
            settings,
            status: LoadStatus::Loading,
            master_slip_id: None,
            slips: Vec::new(),
            view_settings,
            search_input: String::new(),
            bankroll_input: String::new(),
            overrides: StakeOverrides::new(),
            last_allocation: None,
            removals: RemovalQueue::new(),
            history: Vec::new(),
            placed_count: 0,
            ignored_count: 0,
            selected: None,
            view,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(SessionSettings::from(config))
    }

    // ---- loading ----

    /// Replace the collection with a fetched batch
    pub fn load(&mut self, batch: SlipBatch) {
        info!(
            "Loaded {} slips for master slip {}",
            batch.slips.len(),
            batch.master_slip_id
        );
        self.master_slip_id = Some(batch.master_slip_id);
        self.slips = batch.slips;
        self.status = LoadStatus::Ready;
        self.removals.clear();
        self.selected = None;
        self.refresh();
    }

    /// Record a fetch failure. The collection is treated as empty.
    pub fn fail_load(&mut self, error: &Error) {
        warn!("Slip fetch failed: {}", error);
        self.status = LoadStatus::Failed(error.to_string());
        self.slips.clear();
        self.removals.clear();
        self.selected = None;
        self.refresh();
    }

    /// Load a fetch result, success or failure
    pub fn apply_fetch(&mut self, result: Result<SlipBatch>) {
        match result {
            Ok(batch) => self.load(batch),
            Err(e) => self.fail_load(&e),
        }
    }

    // ---- pipeline ----

    /// Re-run filter -> sort -> paginate over the current state
    fn refresh(&mut self) {
        self.view = view::derive(&self.slips, &self.view_settings, &self.overrides);
    }

    // ---- setters ----

    /// Record raw search input. It is applied once `poll_search` sees the
    /// debounce period elapse.
    pub fn set_search(&mut self, term: impl Into<String>, now: Instant) {
        let term = term.into();
        self.search_input = term.clone();
        self.search.submit(term, now);
    }

    /// Apply the pending search term if it has settled. Returns true when
    /// the view changed.
    pub fn poll_search(&mut self, now: Instant) -> bool {
        match self.search.poll(now) {
            Some(term) => {
                self.apply_search(term);
                true
            }
            None => false,
        }
    }

    /// Apply the pending search term immediately
    pub fn flush_search(&mut self) -> bool {
        match self.search.flush() {
            Some(term) => {
                self.apply_search(term);
                true
            }
            None => false,
        }
    }

    fn apply_search(&mut self, term: String) {
        debug!("Search applied: {:?}", term);
        self.view_settings.criteria.search = term;
        self.view_settings.page = 1;
        self.refresh();
    }

    /// When the pending search term becomes due
    pub fn search_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    pub fn set_risk_filter(&mut self, filter: RiskFilter) {
        self.view_settings.criteria.risk = filter;
        self.view_settings.page = 1;
        self.refresh();
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.view_settings.sort = key;
        self.refresh();
    }

    pub fn set_page(&mut self, page: usize) {
        self.view_settings.page = page;
        self.refresh();
    }

    pub fn set_page_size(&mut self, size: usize) -> Result<()> {
        if size == 0 {
            return Err(Error::InvalidPageSize(size));
        }
        self.view_settings.page_size = size;
        self.view_settings.page = 1;
        self.refresh();
        Ok(())
    }

    /// Set the bankroll text. Accepts an empty string or a plain decimal
    /// (digits with at most one dot); anything else leaves the value as is.
    pub fn set_bankroll(&mut self, input: &str) -> Result<()> {
        let input = input.trim();
        if !is_decimal_input(input) {
            return Err(Error::InvalidBankroll(input.to_string()));
        }
        self.bankroll_input = input.to_string();
        self.refresh();
        Ok(())
    }

    /// Parsed bankroll, `None` when empty or not a number
    pub fn bankroll(&self) -> Option<f64> {
        if self.bankroll_input.is_empty() {
            return None;
        }
        self.bankroll_input.parse::<f64>().ok()
    }

    // ---- staking ----

    /// Whether a distribution would currently succeed
    pub fn can_distribute(&self) -> bool {
        self.check_distribution().is_ok()
    }

    fn check_distribution(&self) -> std::result::Result<f64, AllocationDeclined> {
        if self.view_settings.criteria.risk.is_all() {
            return Err(AllocationDeclined::NoRiskFilter);
        }
        let bankroll = self.bankroll().unwrap_or(0.0);
        if !bankroll.is_finite() || bankroll <= 0.0 {
            return Err(AllocationDeclined::InvalidBankroll(bankroll));
        }
        if bankroll > staking::allocator::MAX_BANKROLL {
            return Err(AllocationDeclined::BankrollTooLarge(bankroll));
        }
        if self.view.filtered.is_empty() {
            return Err(AllocationDeclined::NoSlips);
        }
        Ok(bankroll)
    }

    /// Helper text for the bankroll input
    pub fn distribute_hint(&self) -> String {
        if self.view_settings.criteria.risk.is_all() {
            return "Select a specific risk filter first".to_string();
        }
        let count = self.view.filtered.len();
        format!(
            "Will distribute across {} slip{}",
            count,
            if count != 1 { "s" } else { "" }
        )
    }

    /// Distribute the bankroll across the filtered slips and store the
    /// stakes as overrides. Declines without touching state when a
    /// precondition fails.
    pub fn distribute_bankroll(&mut self) -> std::result::Result<&Allocation, AllocationDeclined> {
        let bankroll = match self.check_distribution() {
            Ok(b) => b,
            Err(reason) => {
                debug!("Distribution declined: {}", reason);
                return Err(reason);
            }
        };

        let allocation = staking::distribute(bankroll, &self.view.filtered).map_err(|reason| {
            debug!("Distribution declined: {}", reason);
            reason
        })?;

        info!(
            "Distributed {:.2} {} across {} slips ({:?})",
            allocation.total(),
            self.settings.currency,
            allocation.len(),
            allocation.weighting
        );

        self.overrides = self.overrides.with_allocation(&allocation);
        self.refresh();
        let stored: &Allocation = self.last_allocation.insert(allocation);
        Ok(stored)
    }

    /// Set a single stake override by hand
    pub fn set_override(&mut self, slip_id: &str, stake: f64) -> Result<()> {
        if !stake.is_finite() || stake < 0.0 {
            return Err(Error::InvalidStake(stake));
        }
        if !self.slips.iter().any(|s| s.id == slip_id) {
            return Err(Error::SlipNotFound(slip_id.to_string()));
        }
        self.overrides.set(slip_id, staking::allocator::round_cents(stake));
        self.refresh();
        Ok(())
    }

    pub fn clear_overrides(&mut self) {
        self.overrides.clear();
        self.last_allocation = None;
        self.refresh();
    }

    /// Reset search, risk filter, sort, page, bankroll and overrides
    pub fn clear_filters(&mut self) {
        self.search_input.clear();
        self.search.cancel();
        self.view_settings.criteria = Default::default();
        self.view_settings.sort = SortKey::default();
        self.view_settings.page = 1;
        self.bankroll_input.clear();
        self.overrides.clear();
        self.last_allocation = None;
        self.refresh();
    }

    // ---- dispositions ----

    /// Lifecycle state of a slip id
    pub fn lifecycle(&self, slip_id: &str) -> Option<SlipLifecycle> {
        if let Some(p) = self.removals.get(slip_id) {
            return Some(SlipLifecycle::PendingRemoval {
                disposition: p.disposition,
                deadline: p.deadline,
            });
        }
        if self.slips.iter().any(|s| s.id == slip_id) {
            return Some(SlipLifecycle::Active);
        }
        self.history
            .iter()
            .rev()
            .find(|r| r.slip_id == slip_id)
            .map(|r| SlipLifecycle::Removed(r.disposition))
    }

    /// Start placing a slip. Returns when it will leave the working set.
    pub fn begin_place(&mut self, slip_id: &str, now: Instant) -> Result<Instant> {
        self.begin_removal(slip_id, Disposition::Placed, now)
    }

    /// Start ignoring a slip. Returns when it will leave the working set.
    pub fn begin_ignore(&mut self, slip_id: &str, now: Instant) -> Result<Instant> {
        self.begin_removal(slip_id, Disposition::Ignored, now)
    }

    fn begin_removal(&mut self, slip_id: &str, disposition: Disposition, now: Instant) -> Result<Instant> {
        match self.lifecycle(slip_id) {
            Some(SlipLifecycle::Active) => {}
            Some(SlipLifecycle::PendingRemoval { .. }) => {
                return Err(Error::SlipInFlight(slip_id.to_string()))
            }
            Some(SlipLifecycle::Removed(_)) | None => {
                return Err(Error::SlipNotFound(slip_id.to_string()))
            }
        }

        let deadline = now + self.settings.removal_delay;
        self.removals.push(PendingRemoval {
            slip_id: slip_id.to_string(),
            disposition,
            deadline,
        });
        debug!("Slip {} pending removal ({})", slip_id, disposition);
        Ok(deadline)
    }

    /// Commit every removal whose delay has elapsed
    pub fn complete_removals(&mut self, now: Instant) -> Vec<DispositionRecord> {
        let due = self.removals.take_due(now);
        if due.is_empty() {
            return Vec::new();
        }

        let mut committed = Vec::with_capacity(due.len());
        for removal in due {
            let Some(idx) = self.slips.iter().position(|s| s.id == removal.slip_id) else {
                continue;
            };
            let slip = self.slips.remove(idx);
            let stake = self.overrides.effective_stake(&slip);
            self.overrides.remove(&slip.id);

            match removal.disposition {
                Disposition::Placed => self.placed_count += 1,
                Disposition::Ignored => self.ignored_count += 1,
            }
            if self.selected.as_deref() == Some(slip.id.as_str()) {
                self.selected = None;
            }

            info!("Slip {} {} (stake {:.2})", slip.id, removal.disposition, stake);
            let record = DispositionRecord {
                slip_id: slip.id,
                disposition: removal.disposition,
                stake,
                at: chrono::Utc::now(),
            };
            self.history.push(record.clone());
            committed.push(record);
        }

        self.refresh();
        committed
    }

    /// Earliest pending removal deadline
    pub fn next_removal_deadline(&self) -> Option<Instant> {
        self.removals.next_deadline()
    }

    // ---- detail ----

    /// Detail view of a slip still in the working set
    pub fn slip_detail(&self, slip_id: &str) -> Option<SlipDetail> {
        let slip = self.slips.iter().find(|s| s.id == slip_id)?;
        let override_stake = self.overrides.get(&slip.id);

        Some(SlipDetail {
            slip_id: slip.id.clone(),
            risk: slip.risk(),
            confidence: normalize_confidence(slip),
            legs: slip.legs.clone(),
            stake: self.overrides.effective_stake(slip),
            total_odds: slip.total_odds,
            expected_return: self.overrides.expected_return(slip),
            has_override: override_stake.is_some(),
            lifecycle: self.lifecycle(&slip.id).unwrap_or(SlipLifecycle::Active),
        })
    }

    /// Open the detail view for a slip
    pub fn select(&mut self, slip_id: &str) -> Result<SlipDetail> {
        let detail = self
            .slip_detail(slip_id)
            .ok_or_else(|| Error::SlipNotFound(slip_id.to_string()))?;
        self.selected = Some(slip_id.to_string());
        Ok(detail)
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    // ---- read accessors ----

    /// Rows of the current page
    pub fn page_rows(&self) -> Vec<SlipRow> {
        self.view
            .page
            .iter()
            .map(|slip| {
                let rank = self
                    .slips
                    .iter()
                    .position(|s| s.id == slip.id)
                    .map(|i| i + 1)
                    .unwrap_or(0);
                SlipRow {
                    rank,
                    slip_id: slip.id.clone(),
                    risk: slip.risk(),
                    confidence_pct: (normalize_confidence(slip) * 100.0).round() as u8,
                    legs: slip.legs.len(),
                    stake: self.overrides.effective_stake(slip),
                    total_odds: slip.total_odds,
                    expected_return: self.overrides.expected_return(slip),
                    has_override: self.overrides.get(&slip.id).is_some(),
                    removing: self.removals.contains(&slip.id),
                }
            })
            .collect()
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats::compute(self.placed_count, self.ignored_count, &self.slips)
    }

    /// Whether anything differs from the default filters
    pub fn has_active_filters(&self) -> bool {
        !self.search_input.is_empty()
            || !self.view_settings.criteria.risk.is_all()
            || self.view_settings.sort != SortKey::default()
            || !self.bankroll_input.is_empty()
    }

    pub fn has_overrides(&self) -> bool {
        !self.overrides.is_empty()
    }

    pub fn view(&self) -> &DerivedView {
        &self.view
    }

    pub fn view_settings(&self) -> &ViewSettings {
        &self.view_settings
    }

    pub fn slips(&self) -> &[Slip] {
        &self.slips
    }

    pub fn overrides(&self) -> &StakeOverrides {
        &self.overrides
    }

    pub fn last_allocation(&self) -> Option<&Allocation> {
        self.last_allocation.as_ref()
    }

    pub fn history(&self) -> &[DispositionRecord] {
        &self.history
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn master_slip_id(&self) -> Option<&str> {
        self.master_slip_id.as_deref()
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn bankroll_input(&self) -> &str {
        &self.bankroll_input
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn placed_count(&self) -> usize {
        self.placed_count
    }

    pub fn ignored_count(&self) -> usize {
        self.ignored_count
    }
}

/// Empty, or digits with at most one decimal point
fn is_decimal_input(input: &str) -> bool {
    DECIMAL_INPUT.is_match(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn slip(id: &str, risk: &str, odds: f64, away: &str) -> Slip {
        Slip {
            id: id.to_string(),
            risk_category: Some(risk.to_string()),
            confidence_score: json!(0.5),
            legs: vec![Leg {
                home_team: "Home FC".to_string(),
                away_team: away.to_string(),
                market: "1X2".to_string(),
                selection: "2".to_string(),
                odds,
            }],
            stake: 5.0,
            total_odds: odds,
            estimated_return: 0.0,
        }
    }

    fn session() -> SessionState {
        let mut state = SessionState::new(SessionSettings::default());
        state.load(SlipBatch {
            master_slip_id: "M-1".to_string(),
            slips: vec![
                slip("s1", "LOW", 2.0, "Arsenal"),
                slip("s2", "HIGH", 6.0, "Spurs"),
                slip("s3", "low", 4.0, "Chelsea"),
                slip("s4", "MEDIUM", 3.0, "arsenal u21"),
            ],
        });
        state
    }

    fn page_ids(state: &SessionState) -> Vec<String> {
        state.view().page.iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn test_load_derives_view() {
        let state = session();
        assert_eq!(state.status(), &LoadStatus::Ready);
        assert_eq!(state.master_slip_id(), Some("M-1"));
        assert_eq!(state.view().filtered.len(), 4);
        assert_eq!(state.stats().remaining, 4);
    }

    #[test]
    fn test_fail_load_empties_collection() {
        let mut state = session();
        state.apply_fetch(Err(Error::MissingSlipId));
        assert_eq!(
            state.status(),
            &LoadStatus::Failed("No master slip ID provided".to_string())
        );
        assert!(state.slips().is_empty());
        assert!(state.view().is_empty());
    }

    #[test]
    fn test_search_is_debounced_and_resets_page() {
        let mut state = session();
        state.set_page_size(1).unwrap();
        state.set_page(3);
        let t0 = Instant::now();

        state.set_search("arsenal", t0);
        assert_eq!(state.view().filtered.len(), 4);
        assert!(!state.poll_search(t0 + Duration::from_millis(100)));

        assert!(state.poll_search(t0 + Duration::from_millis(300)));
        assert_eq!(state.view().filtered.len(), 2);
        assert_eq!(state.view_settings().page, 1);
    }

    #[test]
    fn test_risk_filter_resets_page() {
        let mut state = session();
        state.set_page_size(1).unwrap();
        state.set_page(2);
        state.set_risk_filter(RiskFilter::Low);

        assert_eq!(state.view_settings().page, 1);
        assert_eq!(state.view().filtered.len(), 2);
    }

    #[test]
    fn test_sort_and_paginate() {
        let mut state = session();
        state.set_sort_key(SortKey::Odds);
        state.set_page_size(3).unwrap();
        assert_eq!(page_ids(&state), vec!["s2", "s3", "s4"]);
        state.set_page(2);
        assert_eq!(page_ids(&state), vec!["s1"]);
        state.set_page(9);
        assert!(page_ids(&state).is_empty());
        assert!(state.set_page_size(0).is_err());
    }

    #[test]
    fn test_bankroll_input_validation() {
        let mut state = session();
        assert!(state.set_bankroll("12.50").is_ok());
        assert_eq!(state.bankroll(), Some(12.5));

        assert!(state.set_bankroll("12,50").is_err());
        assert!(state.set_bankroll("1.2.3").is_err());
        assert!(state.set_bankroll("-4").is_err());
        assert_eq!(state.bankroll_input(), "12.50");

        assert!(state.set_bankroll("").is_ok());
        assert_eq!(state.bankroll(), None);
        assert!(state.set_bankroll(".").is_ok());
        assert_eq!(state.bankroll(), None);
    }

    #[test]
    fn test_distribution_requires_risk_filter() {
        let mut state = session();
        state.set_bankroll("100").unwrap();

        assert_eq!(
            state.distribute_bankroll().unwrap_err(),
            AllocationDeclined::NoRiskFilter
        );
        assert!(!state.has_overrides());
        assert_eq!(state.distribute_hint(), "Select a specific risk filter first");
    }

    #[test]
    fn test_distribution_declines_silently_without_bankroll() {
        let mut state = session();
        state.set_risk_filter(RiskFilter::Low);

        assert!(matches!(
            state.distribute_bankroll(),
            Err(AllocationDeclined::InvalidBankroll(_))
        ));
        state.set_bankroll("0").unwrap();
        assert!(state.distribute_bankroll().is_err());
        assert!(!state.has_overrides());
    }

    #[test]
    fn test_distribution_declines_oversized_bankroll() {
        let mut state = session();
        state.set_risk_filter(RiskFilter::Low);
        state.set_bankroll("100000000000000000").unwrap();

        assert!(!state.can_distribute());
        assert!(matches!(
            state.distribute_bankroll(),
            Err(AllocationDeclined::BankrollTooLarge(_))
        ));
        assert!(!state.has_overrides());
    }

    #[test]
    fn test_distribution_writes_overrides_for_filtered_slips_only() {
        let mut state = session();
        state.set_override("s2", 7.0).unwrap();
        state.set_risk_filter(RiskFilter::Low);
        state.set_bankroll("100").unwrap();
        assert_eq!(state.distribute_hint(), "Will distribute across 2 slips");

        let alloc = state.distribute_bankroll().unwrap().clone();
        assert_eq!(alloc.total(), 100.0);
        assert_eq!(state.overrides().get("s1"), Some(66.67));
        assert_eq!(state.overrides().get("s3"), Some(33.33));
        assert_eq!(state.overrides().get("s2"), Some(7.0));
        assert_eq!(state.overrides().get("s4"), None);

        // overrides drive displayed stake and return
        let rows = state.page_rows();
        let s1 = rows.iter().find(|r| r.slip_id == "s1").unwrap();
        assert_eq!(s1.stake, 66.67);
        assert!((s1.expected_return - 133.34).abs() < 1e-9);
        assert!(s1.has_override);
    }

    #[test]
    fn test_place_removes_slip_and_override() {
        let mut state = session();
        state.set_override("s1", 12.0).unwrap();
        state.select("s1").unwrap();
        let t0 = Instant::now();

        let deadline = state.begin_place("s1", t0).unwrap();
        assert_eq!(deadline, t0 + Duration::from_millis(400));
        assert!(state.page_rows().iter().any(|r| r.slip_id == "s1" && r.removing));

        // still in the working set until the delay elapses
        assert!(state.complete_removals(t0 + Duration::from_millis(399)).is_empty());
        assert_eq!(state.slips().len(), 4);

        let done = state.complete_removals(deadline);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].disposition, Disposition::Placed);
        assert_eq!(done[0].stake, 12.0);

        assert_eq!(state.slips().len(), 3);
        assert_eq!(state.placed_count(), 1);
        assert_eq!(state.overrides().get("s1"), None);
        assert_eq!(state.selected(), None);
        assert_eq!(
            state.lifecycle("s1"),
            Some(SlipLifecycle::Removed(Disposition::Placed))
        );
        assert_eq!(state.stats().total, 4);
    }

    #[test]
    fn test_in_flight_slip_rejects_further_actions() {
        let mut state = session();
        let t0 = Instant::now();

        state.begin_ignore("s2", t0).unwrap();
        let err = state.begin_place("s2", t0 + Duration::from_millis(10)).unwrap_err();
        assert!(matches!(err, Error::SlipInFlight(_)));

        state.complete_removals(t0 + Duration::from_secs(1));
        assert_eq!(state.ignored_count(), 1);
        assert_eq!(state.placed_count(), 0);

        let err = state.begin_ignore("s2", t0 + Duration::from_secs(2)).unwrap_err();
        assert!(matches!(err, Error::SlipNotFound(_)));
        assert!(state.begin_place("nope", t0).is_err());
    }

    #[test]
    fn test_clear_filters_resets_everything() {
        let mut state = session();
        let t0 = Instant::now();
        state.set_search("spurs", t0);
        state.flush_search();
        state.set_risk_filter(RiskFilter::High);
        state.set_sort_key(SortKey::Return);
        state.set_bankroll("50").unwrap();
        state.distribute_bankroll().unwrap();
        assert!(state.has_active_filters());
        assert!(state.has_overrides());

        state.clear_filters();

        assert!(!state.has_active_filters());
        assert!(!state.has_overrides());
        assert_eq!(state.view_settings(), &ViewSettings::default());
        assert_eq!(state.view().filtered.len(), 4);
        assert!(state.last_allocation().is_none());
    }

    #[test]
    fn test_slip_detail() {
        let mut state = session();
        state.set_override("s3", 10.0).unwrap();

        let detail = state.select("s3").unwrap();
        assert_eq!(detail.risk, RiskLevel::Low);
        assert_eq!(detail.stake, 10.0);
        assert_eq!(detail.expected_return, 40.0);
        assert_eq!(detail.legs.len(), 1);
        assert!(detail.lifecycle.is_active());
        assert!(state.select("missing").is_err());
    }

    #[test]
    fn test_row_rank_follows_collection_order() {
        let mut state = session();
        state.set_sort_key(SortKey::Odds);
        let ranks: Vec<usize> = state.page_rows().iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![2, 3, 4, 1]);
    }

    #[test]
    fn test_decimal_input() {
        assert!(is_decimal_input(""));
        assert!(is_decimal_input("10"));
        assert!(is_decimal_input(".5"));
        assert!(!is_decimal_input("1e3"));
        assert!(is_decimal_input("12.50"));
        assert!(!is_decimal_input("1.2.3"));
        assert!(!is_decimal_input("-5"));
        // Non-ASCII digits are not accepted
        assert!(!is_decimal_input("١٠"));
    }
}
