//! The ABI of the rollup contracts on L1.

pub mod calls;
pub mod logs;
