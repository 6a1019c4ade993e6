//! The codec implementation for Scroll batches.
//!
//! Covers the versioned batch headers, the chunk encoding committed to L1, the skipped L1
//! message bitmap and the data hash binding the chunks to the batch header.

pub use bitmap::{validate_skip_bitmap, BitCursor, SkipBitmap};
pub mod bitmap;

pub use block::{BlockContext, L2Block};
pub mod block;

pub use chunk::Chunk;
pub mod chunk;

pub mod decoding;
pub use decoding::{batch_header::BatchHeader, v0::BatchHeaderV0, v1::BatchHeaderV1};

pub use error::{BitmapError, CodecError, DecodingError, EncodingError};
mod error;

pub use hash::{compute_batch_data_hash, compute_chunk_data_hash};
mod hash;

use crate::decoding::{v0::decode_chunk_v0, v1::decode_chunk_v1};

/// The Codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    /// V0 variant of the codec, carrying the L2 transactions in the chunks.
    /// <https://github.com/scroll-tech/scroll-contracts/blob/81f0db72ca5335e0dddfaa99cb415e3d1cee895f/src/libraries/codec/ChunkCodecV0.sol>
    V0,
    /// V1 variant of the codec, where the L2 transactions are moved to a blob and the chunks only
    /// carry the block contexts.
    /// <https://github.com/scroll-tech/scroll-contracts/blob/81f0db72ca5335e0dddfaa99cb415e3d1cee895f/src/libraries/codec/ChunkCodecV1.sol>
    V1,
}

impl Codec {
    /// Returns the codec for the provided batch version.
    pub const fn try_from_version(version: u8) -> Result<Self, DecodingError> {
        match version {
            0 => Ok(Self::V0),
            1 => Ok(Self::V1),
            v => Err(DecodingError::InvalidBatchHeaderVersion(v)),
        }
    }

    /// Returns the batch version of the codec.
    pub const fn version(&self) -> u8 {
        match self {
            Self::V0 => 0,
            Self::V1 => 1,
        }
    }

    /// Returns true if the batches of this codec commit their transactions in a blob.
    pub const fn is_blob_backed(&self) -> bool {
        matches!(self, Self::V1)
    }

    /// Decodes a single chunk.
    pub fn decode_chunk(&self, chunk: &[u8]) -> Result<Chunk, DecodingError> {
        match self {
            Self::V0 => decode_chunk_v0(chunk),
            Self::V1 => decode_chunk_v1(chunk),
        }
    }

    /// Decodes the chunks of a batch, failing on the first invalid chunk.
    pub fn decode_chunks<T: AsRef<[u8]>>(&self, chunks: &[T]) -> Result<Vec<Chunk>, DecodingError> {
        chunks.iter().map(|chunk| self.decode_chunk(chunk.as_ref())).collect()
    }
}
