//! Slip Desk Library
//!
//! Review engine for batches of candidate betting slips: derived views
//! (filter, sort, paginate), bankroll distribution across a risk bucket,
//! and placement/ignore bookkeeping for one review session.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod session;
pub mod slip;
pub mod staking;
pub mod view;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use session::SessionState;
pub use slip::{Slip, SlipBatch};
