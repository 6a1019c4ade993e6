//! Primitive types shared by the rollup chain crates.

#![cfg_attr(not(feature = "std"), no_std)]
#[cfg(not(feature = "std"))]
extern crate alloc as std;

pub use batch::{BatchInfo, FinalizedBatch};
mod batch;

pub use transaction::L1Message;
mod transaction;
