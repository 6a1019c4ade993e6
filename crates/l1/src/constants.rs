use alloy_primitives::{address, Address};

/// The EIP-2718 type of the L1 message transaction on L2.
pub const L1_MESSAGE_TRANSACTION_TYPE: u8 = 0x7E;

/// The offset added to the address of a L1 contract sending a message to L2.
pub const L1_TO_L2_ALIAS_OFFSET: Address = address!("1111000000000000000000000000000000001111");

/// The maximum amount of L1 messages popped in a single call to the queue, bounded by the size
/// of a skipped bitmap word.
pub const MAX_POP_COUNT: u64 = 256;
