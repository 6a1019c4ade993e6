//! Implements the V1 decoding of the chunks. The L2 transactions of the chunks are committed in
//! a blob, so the chunks only carry the block contexts.

pub use batch_header::BatchHeaderV1;
mod batch_header;

use crate::{decoding::v0::decode_block_contexts, error::DecodingError, Chunk, L2Block};

/// Decodes the V1 chunk: the block count followed by the block contexts.
pub fn decode_chunk_v1(chunk: &[u8]) -> Result<Chunk, DecodingError> {
    let buf = &mut &*chunk;
    let contexts = decode_block_contexts(buf)?;
    if !buf.is_empty() {
        return Err(DecodingError::IncorrectChunkLength(chunk.len()))
    }

    Ok(Chunk::new(contexts.into_iter().map(|c| L2Block::new(vec![], c)).collect()))
}
