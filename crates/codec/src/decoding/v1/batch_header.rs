use crate::{
    error::DecodingError, from_be_bytes_slice_and_advance_buf, from_slice_and_advance_buf,
    SkipBitmap,
};

use alloy_primitives::{
    bytes::{Buf, BufMut},
    keccak256, B256,
};

/// The batch header for V1.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchHeaderV1 {
    /// The batch version.
    pub version: u8,
    /// The index of the batch.
    pub batch_index: u64,
    /// Number of L1 messages popped in the batch.
    pub l1_message_popped: u64,
    /// Number of total L1 messages popped after the batch.
    pub total_l1_message_popped: u64,
    /// The data hash of the batch.
    pub data_hash: B256,
    /// The blob versioned hash for the batch.
    pub blob_versioned_hash: B256,
    /// The parent batch hash.
    pub parent_batch_hash: B256,
    /// A bitmap to indicate which L1 messages are skipped in the batch.
    pub skipped_l1_message_bitmap: SkipBitmap,
}

impl BatchHeaderV1 {
    /// The length of the fixed part of the header, preceding the bitmap.
    pub const BYTES_LENGTH: usize = 121;

    /// Returns a new instance [`BatchHeaderV1`].
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        version: u8,
        batch_index: u64,
        l1_message_popped: u64,
        total_l1_message_popped: u64,
        data_hash: B256,
        blob_versioned_hash: B256,
        parent_batch_hash: B256,
        skipped_l1_message_bitmap: SkipBitmap,
    ) -> Self {
        Self {
            version,
            batch_index,
            l1_message_popped,
            total_l1_message_popped,
            data_hash,
            blob_versioned_hash,
            parent_batch_hash,
            skipped_l1_message_bitmap,
        }
    }

    /// Tries to read from the input buffer into the [`BatchHeaderV1`]. The bitmap is expected to
    /// span the rest of the buffer.
    /// Returns [`DecodingError::BatchHeaderLengthTooSmall`] if the buffer.len() <
    /// [`BatchHeaderV1::BYTES_LENGTH`].
    pub fn try_from_buf(buf: &mut &[u8]) -> Result<Self, DecodingError> {
        if buf.len() < Self::BYTES_LENGTH {
            return Err(DecodingError::BatchHeaderLengthTooSmall {
                length: buf.len(),
                minimum: Self::BYTES_LENGTH,
            })
        }

        let version = from_be_bytes_slice_and_advance_buf!(u8, buf);
        let batch_index = from_be_bytes_slice_and_advance_buf!(u64, buf);

        let l1_message_popped = from_be_bytes_slice_and_advance_buf!(u64, buf);
        let total_l1_message_popped = from_be_bytes_slice_and_advance_buf!(u64, buf);

        let data_hash = from_slice_and_advance_buf!(B256, buf);
        let blob_versioned_hash = from_slice_and_advance_buf!(B256, buf);
        let parent_batch_hash = from_slice_and_advance_buf!(B256, buf);

        // check leftover bytes are correct.
        let expected = SkipBitmap::expected_len(l1_message_popped);
        if buf.len() != expected {
            return Err(DecodingError::IncorrectBitmapLength { expected, got: buf.len() })
        }
        let skipped_l1_message_bitmap = SkipBitmap::from(buf.to_vec());
        buf.advance(expected);

        Ok(Self {
            version,
            batch_index,
            l1_message_popped,
            total_l1_message_popped,
            data_hash,
            blob_versioned_hash,
            parent_batch_hash,
            skipped_l1_message_bitmap,
        })
    }

    /// Returns the canonical encoding of the header.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes =
            Vec::<u8>::with_capacity(Self::BYTES_LENGTH + self.skipped_l1_message_bitmap.len());
        bytes.put_slice(&self.version.to_be_bytes());
        bytes.put_slice(&self.batch_index.to_be_bytes());
        bytes.put_slice(&self.l1_message_popped.to_be_bytes());
        bytes.put_slice(&self.total_l1_message_popped.to_be_bytes());
        bytes.put_slice(&self.data_hash.0);
        bytes.put_slice(&self.blob_versioned_hash.0);
        bytes.put_slice(&self.parent_batch_hash.0);
        bytes.put_slice(&self.skipped_l1_message_bitmap);
        bytes
    }

    /// Computes the hash for the header.
    pub fn hash_slow(&self) -> B256 {
        keccak256(self.encode())
    }
}
