use crate::{BatchVersion, ChainError, L1MessageQueue, VersionSchedule};

use alloy_primitives::{Bytes, B256};
use scroll_codec::{BatchHeader, BitCursor, Chunk, Codec, DecodingError};
use scroll_l1::abi::calls::CommitBatchCall;

/// A request to commit a batch on top of a committed parent batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitBatchInput {
    /// The version of the committed batch.
    pub version: u8,
    /// The encoded header of the parent batch.
    pub parent_batch_header: Bytes,
    /// The encoded chunks of the batch.
    pub chunks: Vec<Bytes>,
    /// The bitmap of the L1 messages skipped by the batch.
    pub skipped_l1_message_bitmap: Bytes,
    /// The versioned hashes of the blobs attached to the commit.
    pub blob_versioned_hashes: Vec<B256>,
}

impl CommitBatchInput {
    /// Returns the input from the calldata of a commit call and the blobs attached to the
    /// transaction.
    pub fn from_calldata(
        calldata: &[u8],
        blob_versioned_hashes: Vec<B256>,
    ) -> Result<Self, ChainError> {
        let call = CommitBatchCall::try_decode(calldata).ok_or(ChainError::InvalidCalldata)?;
        Ok(Self {
            version: call.version(),
            parent_batch_header: call.parent_batch_header().clone(),
            chunks: call.chunks().into_iter().map(Bytes::copy_from_slice).collect(),
            skipped_l1_message_bitmap: call.skipped_l1_message_bitmap().clone(),
            blob_versioned_hashes,
        })
    }
}

/// Decodes the batch header. An unsupported version byte is reported with the index read from
/// the header, as for a version which doesn't follow the schedule.
pub(crate) fn decode_batch_header(header: &[u8]) -> Result<BatchHeader, ChainError> {
    BatchHeader::try_from_slice(header).map_err(|err| match err {
        DecodingError::InvalidBatchHeaderVersion(version) => header
            .get(1..9)
            .and_then(|index| <[u8; 8]>::try_from(index).ok())
            .map_or_else(
                || err.into(),
                |index| ChainError::InvalidBatchHeaderVersion {
                    index: u64::from_be_bytes(index),
                    version,
                },
            ),
        err => err.into(),
    })
}

/// Checks the version of the batch at `index` matches the schedule.
pub(crate) fn check_scheduled_version(
    schedule: &VersionSchedule,
    index: u64,
    version: u8,
) -> Result<BatchVersion, ChainError> {
    let scheduled = schedule.version_at(index);
    match BatchVersion::try_from(version) {
        Ok(version) if Some(version) == scheduled => Ok(version),
        _ => Err(ChainError::InvalidBatchHeaderVersion { index, version }),
    }
}

/// Decodes the chunks, checking the transactions count of each chunk.
pub(crate) fn decode_chunks(
    codec: Codec,
    chunks: &[Bytes],
    max_num_tx_in_chunk: u64,
) -> Result<Vec<Chunk>, ChainError> {
    chunks
        .iter()
        .enumerate()
        .map(|(position, bytes)| {
            let chunk = codec.decode_chunk(bytes)?;
            let count = chunk.num_transactions();
            if count > max_num_tx_in_chunk {
                return Err(ChainError::TooManyTxsInOneChunk {
                    chunk: position,
                    count,
                    max: max_num_tx_in_chunk,
                })
            }
            Ok(chunk)
        })
        .collect()
}

/// Returns the blob versioned hash of the commit for blob backed codecs.
pub(crate) fn blob_versioned_hash(
    codec: Codec,
    hashes: &[B256],
) -> Result<Option<B256>, ChainError> {
    if !codec.is_blob_backed() {
        return Ok(None)
    }
    match hashes {
        [] => Err(ChainError::NoBlobFound),
        [hash] => Ok(Some(*hash)),
        _ => Err(ChainError::FoundMultipleBlob(hashes.len())),
    }
}

/// Loads from the queue the hashes of the L1 messages included by each block of the chunk. The
/// cursor tracks the position of the block messages in the batch, from the queue index `start`.
pub(crate) fn load_l1_message_hashes(
    queue: &L1MessageQueue,
    chunk: &Chunk,
    cursor: &mut BitCursor<'_>,
    start: u64,
) -> Result<Vec<Vec<B256>>, ChainError> {
    let mut hashes = Vec::with_capacity(chunk.blocks.len());
    for context in chunk.contexts() {
        let mut block_hashes = Vec::with_capacity(context.num_l1_messages as usize);
        for _ in 0..context.num_l1_messages {
            if !cursor.peek(0) {
                let queue_index = start + cursor.offset();
                let hash = queue
                    .get_cross_domain_message(queue_index)
                    .ok_or(ChainError::MessageNotFound(queue_index))?;
                block_hashes.push(hash);
            }
            cursor.advance(1);
        }
        hashes.push(block_hashes);
    }
    Ok(hashes)
}
