//! Stake allocation and operator overrides

pub mod allocator;
pub mod overrides;

pub use allocator::{distribute, AllocatedStake, Allocation, AllocationDeclined, Weighting};
pub use overrides::StakeOverrides;
