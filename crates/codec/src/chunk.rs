//! The chunk of a batch.

use crate::{
    decoding::constants::TRANSACTION_LENGTH_BYTES_SIZE, BlockContext, Codec, EncodingError,
    L2Block,
};

use alloy_primitives::bytes::BufMut;

/// A chunk of L2 blocks committed as part of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunk {
    /// The blocks of the chunk.
    pub blocks: Vec<L2Block>,
}

impl Chunk {
    /// Returns a new [`Chunk`].
    pub const fn new(blocks: Vec<L2Block>) -> Self {
        Self { blocks }
    }

    /// Returns an iterator over the block contexts of the chunk.
    pub fn contexts(&self) -> impl Iterator<Item = &BlockContext> + Clone {
        self.blocks.iter().map(|block| &block.context)
    }

    /// Returns the total transactions count of the chunk, including the L1 messages.
    pub fn num_transactions(&self) -> u64 {
        self.contexts().map(|c| c.num_transactions as u64).sum()
    }

    /// Returns the L1 messages count of the chunk.
    pub fn num_l1_messages(&self) -> u64 {
        self.contexts().map(|c| c.num_l1_messages as u64).sum()
    }

    /// Encodes the chunk for the provided codec. The L2 transactions are only written for
    /// [`Codec::V0`].
    pub fn encode(&self, codec: Codec) -> Result<Vec<u8>, EncodingError> {
        let blocks = u8::try_from(self.blocks.len())
            .map_err(|_| EncodingError::TooManyBlocksInChunk(self.blocks.len()))?;

        let mut buf = Vec::with_capacity(1 + self.blocks.len() * BlockContext::BYTES_LENGTH);
        buf.put_u8(blocks);
        for block in &self.blocks {
            buf.put_slice(&block.context.to_be_bytes());
        }
        if codec == Codec::V0 {
            for tx in self.blocks.iter().flat_map(|b| &b.transactions) {
                let len = u32::try_from(tx.len())
                    .map_err(|_| EncodingError::TransactionTooLarge(tx.len()))?;
                buf.put_slice(&len.to_be_bytes()[..TRANSACTION_LENGTH_BYTES_SIZE]);
                buf.put_slice(tx);
            }
        }
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_reject_chunk_with_too_many_blocks() -> eyre::Result<()> {
        let block = L2Block::new(vec![], BlockContext::with_counts(0, 0));

        let chunk = Chunk::new(vec![block.clone(); 255]);
        let raw = chunk.encode(Codec::V1)?;
        assert_eq!(raw[0], 255);
        assert_eq!(raw.len(), 1 + 255 * BlockContext::BYTES_LENGTH);

        let chunk = Chunk::new(vec![block; 256]);
        assert_eq!(chunk.encode(Codec::V1), Err(EncodingError::TooManyBlocksInChunk(256)));
        assert_eq!(chunk.encode(Codec::V0), Err(EncodingError::TooManyBlocksInChunk(256)));

        Ok(())
    }
}
