//! L2 block and block context implementations.

use crate::from_be_bytes_slice_and_advance_buf;

use alloy_primitives::{
    bytes::{Buf, BufMut},
    Bytes, U256,
};

/// A L2 block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct L2Block {
    /// The L2 transactions of the block, excluding the L1 messages. Empty for codecs which commit
    /// the transactions in a blob.
    pub transactions: Vec<Bytes>,
    /// The context for the block.
    pub context: BlockContext,
}

impl L2Block {
    /// Returns a new instance of a [`L2Block`].
    pub const fn new(transactions: Vec<Bytes>, context: BlockContext) -> Self {
        Self { transactions, context }
    }
}

/// The block's context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockContext {
    /// The block number.
    pub number: u64,
    /// The block timestamp.
    pub timestamp: u64,
    /// The block base fee.
    pub base_fee: U256,
    /// The block gas limit.
    pub gas_limit: u64,
    /// The block's transaction count, including the L1 messages.
    pub num_transactions: u16,
    /// The block's l1 message count.
    pub num_l1_messages: u16,
}

impl BlockContext {
    /// The length of the encoded block context.
    pub const BYTES_LENGTH: usize = 60;

    /// Returns a new [`BlockContext`] with zeroed metadata and the provided counts.
    pub fn with_counts(num_transactions: u16, num_l1_messages: u16) -> Self {
        Self { num_transactions, num_l1_messages, ..Default::default() }
    }

    /// Tries to read from the input buffer into the [`BlockContext`].
    /// Returns [`None`] if the buffer.len() < [`BlockContext::BYTES_LENGTH`].
    pub fn try_from_buf(buf: &mut &[u8]) -> Option<Self> {
        if buf.len() < Self::BYTES_LENGTH {
            return None
        }
        let number = from_be_bytes_slice_and_advance_buf!(u64, buf);
        let timestamp = from_be_bytes_slice_and_advance_buf!(u64, buf);

        let base_fee = U256::from_be_slice(&buf[0..32]);
        buf.advance(32);

        let gas_limit = from_be_bytes_slice_and_advance_buf!(u64, buf);
        let num_transactions = from_be_bytes_slice_and_advance_buf!(u16, buf);
        let num_l1_messages = from_be_bytes_slice_and_advance_buf!(u16, buf);

        Some(Self { number, timestamp, base_fee, gas_limit, num_transactions, num_l1_messages })
    }

    /// Returns the big endian encoding of the block context.
    pub fn to_be_bytes(&self) -> [u8; Self::BYTES_LENGTH] {
        let mut bytes = [0u8; Self::BYTES_LENGTH];
        let mut buf = &mut bytes[..];
        buf.put_u64(self.number);
        buf.put_u64(self.timestamp);
        buf.put_slice(&self.base_fee.to_be_bytes::<32>());
        buf.put_u64(self.gas_limit);
        buf.put_u16(self.num_transactions);
        buf.put_u16(self.num_l1_messages);
        bytes
    }

    /// Returns the L2 transaction count for the block, excluding L1 messages.
    pub const fn l2_transactions_count(&self) -> usize {
        self.num_transactions.saturating_sub(self.num_l1_messages) as usize
    }
}
