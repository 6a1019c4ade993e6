//! Implements the V0 decoding of the chunks into a list of L2 blocks.

pub use batch_header::BatchHeaderV0;
mod batch_header;

use crate::{
    decoding::constants::TRANSACTION_LENGTH_BYTES_SIZE, error::DecodingError,
    from_be_bytes_slice_and_advance_buf, BlockContext, Chunk, L2Block,
};

use alloy_primitives::{bytes::Buf, Bytes};

/// Decodes the V0 chunk: the block count, the block contexts and the L2 transactions of each
/// block, each prefixed by its 4 bytes length.
pub fn decode_chunk_v0(chunk: &[u8]) -> Result<Chunk, DecodingError> {
    let buf = &mut &*chunk;
    let contexts = decode_block_contexts(buf)?;

    let mut blocks = Vec::with_capacity(contexts.len());
    for context in contexts {
        let transactions_count = context.l2_transactions_count();
        let mut transactions = Vec::with_capacity(transactions_count);
        for _ in 0..transactions_count {
            if buf.len() < TRANSACTION_LENGTH_BYTES_SIZE {
                return Err(DecodingError::IncorrectChunkLength(chunk.len()))
            }
            let length = from_be_bytes_slice_and_advance_buf!(u32, buf) as usize;
            if buf.len() < length {
                return Err(DecodingError::IncorrectChunkLength(chunk.len()))
            }
            transactions.push(Bytes::copy_from_slice(&buf[..length]));
            buf.advance(length);
        }
        blocks.push(L2Block::new(transactions, context));
    }

    if !buf.is_empty() {
        return Err(DecodingError::IncorrectChunkLength(chunk.len()))
    }

    Ok(Chunk::new(blocks))
}

/// Decodes the block count and the block contexts, leaving the buffer on the first byte after
/// the contexts.
pub(crate) fn decode_block_contexts(buf: &mut &[u8]) -> Result<Vec<BlockContext>, DecodingError> {
    let length = buf.len();
    let blocks_count = buf.first().copied().unwrap_or_default() as usize;
    if blocks_count == 0 {
        return Err(DecodingError::NoBlockInChunk)
    }
    buf.advance(1);

    let mut contexts = Vec::with_capacity(blocks_count);
    for _ in 0..blocks_count {
        let context =
            BlockContext::try_from_buf(buf).ok_or(DecodingError::IncorrectChunkLength(length))?;
        contexts.push(context);
    }
    Ok(contexts)
}
