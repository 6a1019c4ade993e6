use crate::{
    decoding::{v0::BatchHeaderV0, v1::BatchHeaderV1},
    DecodingError, SkipBitmap,
};

use alloy_primitives::B256;

/// The batch header.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::From)]
pub enum BatchHeader {
    /// The batch header for V0.
    V0(BatchHeaderV0),
    /// The batch header for V1.
    V1(BatchHeaderV1),
}

impl BatchHeader {
    /// Returns the minimum length of a header for the provided version.
    pub const fn min_len(version: u8) -> Result<usize, DecodingError> {
        match version {
            0 => Ok(BatchHeaderV0::BYTES_LENGTH),
            1 => Ok(BatchHeaderV1::BYTES_LENGTH),
            v => Err(DecodingError::InvalidBatchHeaderVersion(v)),
        }
    }

    /// Returns the version of the header.
    pub const fn version(&self) -> u8 {
        match self {
            Self::V0(header) => header.version,
            Self::V1(header) => header.version,
        }
    }

    /// Returns the index of the batch.
    pub const fn index(&self) -> u64 {
        match self {
            Self::V0(header) => header.batch_index,
            Self::V1(header) => header.batch_index,
        }
    }

    /// Returns the number of L1 messages popped in the batch.
    pub const fn l1_message_popped(&self) -> u64 {
        match self {
            Self::V0(header) => header.l1_message_popped,
            Self::V1(header) => header.l1_message_popped,
        }
    }

    /// Returns the total number of L1 messages popped after the batch.
    pub const fn total_l1_message_popped(&self) -> u64 {
        match self {
            Self::V0(header) => header.total_l1_message_popped,
            Self::V1(header) => header.total_l1_message_popped,
        }
    }

    /// Returns the data hash of the batch.
    pub const fn data_hash(&self) -> B256 {
        match self {
            Self::V0(header) => header.data_hash,
            Self::V1(header) => header.data_hash,
        }
    }

    /// Returns the hash of the parent batch.
    pub const fn parent_batch_hash(&self) -> B256 {
        match self {
            Self::V0(header) => header.parent_batch_hash,
            Self::V1(header) => header.parent_batch_hash,
        }
    }

    /// Returns the blob versioned hash, if the version commits to a blob.
    pub const fn blob_versioned_hash(&self) -> Option<B256> {
        match self {
            Self::V0(_) => None,
            Self::V1(header) => Some(header.blob_versioned_hash),
        }
    }

    /// Returns the skipped L1 message bitmap.
    pub const fn skipped_l1_message_bitmap(&self) -> &SkipBitmap {
        match self {
            Self::V0(header) => &header.skipped_l1_message_bitmap,
            Self::V1(header) => &header.skipped_l1_message_bitmap,
        }
    }

    /// Tries to decode the header from the slice, which should contain exactly one header.
    pub fn try_from_slice(header: &[u8]) -> Result<Self, DecodingError> {
        Self::try_from_buf(&mut &*header)
    }

    /// Tries to read from the input buffer into the appropriate batch header version.
    /// Returns [`DecodingError::BatchHeaderLengthTooSmall`] if the buffer is empty or does not
    /// contain enough bytes for the specific version.
    pub fn try_from_buf(buf: &mut &[u8]) -> Result<Self, DecodingError> {
        let Some(version) = buf.first().copied() else {
            return Err(DecodingError::BatchHeaderLengthTooSmall {
                length: 0,
                minimum: BatchHeaderV0::BYTES_LENGTH,
            })
        };

        match version {
            0 => Ok(Self::V0(BatchHeaderV0::try_from_buf(buf)?)),
            1 => Ok(Self::V1(BatchHeaderV1::try_from_buf(buf)?)),
            v => Err(DecodingError::InvalidBatchHeaderVersion(v)),
        }
    }

    /// Returns the canonical encoding of the header.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::V0(header) => header.encode(),
            Self::V1(header) => header.encode(),
        }
    }

    /// Computes the hash for the header.
    pub fn hash_slow(&self) -> B256 {
        match self {
            Self::V0(header) => header.hash_slow(),
            Self::V1(header) => header.hash_slow(),
        }
    }
}
