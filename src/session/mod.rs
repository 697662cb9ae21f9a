//! Review session: state, debounced search, disposition lifecycle, stats

pub mod debounce;
pub mod lifecycle;
pub mod state;
pub mod stats;

pub use debounce::Debouncer;
pub use lifecycle::{Disposition, DispositionRecord, SlipLifecycle};
pub use state::{LoadStatus, SessionSettings, SessionState, SlipDetail, SlipRow};
pub use stats::SessionStats;
