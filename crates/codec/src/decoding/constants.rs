/// The length in bytes of each item in the skipped L1 messages bitmap.
pub const SKIPPED_L1_MESSAGE_BITMAP_ITEM_BYTES_SIZE: usize = 32;

/// The number of L1 messages covered by each item in the skipped L1 messages bitmap.
pub const SKIPPED_L1_MESSAGE_BITMAP_ITEM_BITS: u64 = 256;

/// The length in bytes of the length prefix of each L2 transaction in a V0 chunk.
pub const TRANSACTION_LENGTH_BYTES_SIZE: usize = 4;
