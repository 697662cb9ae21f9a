//! Derived-view pipeline
//!
//! filter -> sort -> paginate, always in that order and always in full.
//! Each stage takes a slice and returns a fresh `Vec`; the slip collection
//! itself is never touched.

pub mod filter;
pub mod paginate;
pub mod sort;

use tracing::debug;

use crate::slip::Slip;
use crate::staking::StakeOverrides;

pub use filter::{filter_slips, FilterCriteria, RiskFilter};
pub use paginate::{paginate, total_pages, PageInfo};
pub use sort::{sort_slips, SortKey};

/// Default rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Inputs of the pipeline other than the slips themselves
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    pub criteria: FilterCriteria,
    pub sort: SortKey,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            criteria: FilterCriteria::default(),
            sort: SortKey::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Output of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView {
    pub filtered: Vec<Slip>,
    pub sorted: Vec<Slip>,
    pub page: Vec<Slip>,
    pub info: PageInfo,
}

impl DerivedView {
    /// View of an empty collection
    pub fn empty(settings: &ViewSettings) -> Self {
        Self {
            filtered: Vec::new(),
            sorted: Vec::new(),
            page: Vec::new(),
            info: PageInfo::new(settings.page, settings.page_size, 0, 0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }
}

/// Run the full pipeline
pub fn derive(slips: &[Slip], settings: &ViewSettings, overrides: &StakeOverrides) -> DerivedView {
    let filtered = filter_slips(slips, &settings.criteria);
    let sorted = sort_slips(&filtered, settings.sort, overrides);
    let page = paginate(&sorted, settings.page, settings.page_size);
    let info = PageInfo::new(settings.page, settings.page_size, filtered.len(), slips.len());

    debug!(
        total = slips.len(),
        filtered = filtered.len(),
        page = settings.page,
        rows = page.len(),
        sort = %settings.sort,
        "View derived"
    );

    DerivedView {
        filtered,
        sorted,
        page,
        info,
    }
}
