//! A library containing the logic required to interact with the L1 contracts of the rollup: the
//! commit calldata, the emitted logs and the hashing of the L1 messages.

pub mod abi;

mod constants;
pub use constants::*;

mod message;
pub use message::{apply_l1_to_l2_alias, compute_message_hash, undo_l1_to_l2_alias, L1MessageExt};
