use alloy_primitives::B256;
use scroll_codec::{BitmapError, CodecError, DecodingError};
use scroll_zktrie::ZkTrieError;

/// An error occurring while applying a state transition to the [`crate::ScrollChain`].
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// An error occurred while decoding or validating the batch data.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// The commit doesn't carry any chunk.
    #[error("batch is empty")]
    BatchIsEmpty,
    /// The provided batch header doesn't hash to the committed batch at its index.
    #[error("incorrect batch hash {hash} for batch {index}")]
    IncorrectBatchHash {
        /// The index read from the batch header.
        index: u64,
        /// The hash of the provided batch header.
        hash: B256,
    },
    /// The batch at the provided index is already committed.
    #[error("batch {0} is already committed")]
    BatchIsAlreadyCommitted(u64),
    /// The batch version is not supported or doesn't match the version scheduled for its index.
    #[error("invalid batch header version {version} for batch {index}")]
    InvalidBatchHeaderVersion {
        /// The batch index.
        index: u64,
        /// The provided version.
        version: u8,
    },
    /// A chunk holds more transactions than allowed.
    #[error("too many transactions in chunk {chunk}: {count} > {max}")]
    TooManyTxsInOneChunk {
        /// The position of the chunk in the batch.
        chunk: usize,
        /// The transactions count of the chunk.
        count: u64,
        /// The configured maximum.
        max: u64,
    },
    /// A blob backed batch was committed without blob.
    #[error("no blob found")]
    NoBlobFound,
    /// A blob backed batch was committed with more than one blob.
    #[error("found {0} blobs, expected one")]
    FoundMultipleBlob(usize),
    /// A batch includes a L1 message missing from the queue.
    #[error("L1 message {0} not found in the queue")]
    MessageNotFound(u64),
    /// The batch is not the next batch to finalize.
    #[error("incorrect batch index {got}, expected {expected}")]
    IncorrectBatchIndex {
        /// The expected batch index.
        expected: u64,
        /// The provided batch index.
        got: u64,
    },
    /// A revert of zero batches was requested.
    #[error("revert zero batches")]
    RevertZeroBatches,
    /// A revert targeted a finalized batch.
    #[error("cannot revert finalized batch {0}")]
    RevertFinalizedBatch(u64),
    /// A revert doesn't reach the last committed batch.
    #[error("reverting must start from the ending")]
    RevertNotStartFromEnd,
    /// The batch is already finalized.
    #[error("batch {0} is already finalized")]
    BatchIsAlreadyFinalized(u64),
    /// The previous state root doesn't match the finalized state root of the parent batch.
    #[error("incorrect previous state root {0}")]
    IncorrectPreviousStateRoot(B256),
    /// A zero state root was provided.
    #[error("zero state root")]
    ZeroStateRoot,
    /// The validity proof of the batch was rejected.
    #[error("invalid proof for batch {0}")]
    InvalidProof(u64),
    /// The genesis batch was already imported.
    #[error("genesis batch already imported")]
    GenesisAlreadyImported,
    /// The genesis batch header is not a valid genesis.
    #[error("invalid genesis batch: {0}")]
    InvalidGenesisBatch(&'static str),
    /// The batch is not finalized.
    #[error("batch {0} is not finalized")]
    BatchNotFinalized(u64),
    /// The proof doesn't open the finalized state root of the batch.
    #[error("state root mismatch: expected {expected}, got {got}")]
    StateRootMismatch {
        /// The finalized state root.
        expected: B256,
        /// The root proven by the trie proof.
        got: B256,
    },
    /// The calldata is not a known commit call.
    #[error("invalid commit calldata")]
    InvalidCalldata,
    /// An error occurred in the L1 message queue.
    #[error(transparent)]
    Queue(#[from] QueueError),
    /// An error occurred while verifying a trie proof.
    #[error(transparent)]
    ZkTrie(#[from] ZkTrieError),
}

impl From<DecodingError> for ChainError {
    fn from(value: DecodingError) -> Self {
        Self::Codec(value.into())
    }
}

impl From<BitmapError> for ChainError {
    fn from(value: BitmapError) -> Self {
        Self::Codec(value.into())
    }
}

/// An error occurring in the [`crate::L1MessageQueue`].
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum QueueError {
    /// The gas limit of the message exceeds the maximum.
    #[error("Gas limit must not exceed maxGasLimit: {gas_limit} > {max}")]
    GasLimitExceeded {
        /// The gas limit of the message.
        gas_limit: u64,
        /// The configured maximum.
        max: u64,
    },
    /// The gas limit of the message is below its intrinsic gas.
    #[error("Insufficient gas limit, must be above intrinsic gas: {gas_limit} < {intrinsic}")]
    InsufficientGasLimit {
        /// The gas limit of the message.
        gas_limit: u64,
        /// The intrinsic gas of the message.
        intrinsic: u64,
    },
    /// More than a bitmap word of messages were popped at once.
    #[error("pop too many messages: {0}")]
    PopTooManyMessages(u64),
    /// The pop doesn't start at the pending queue index.
    #[error("start index mismatch: expected {expected}, got {got}")]
    StartIndexMismatch {
        /// The pending queue index.
        expected: u64,
        /// The provided start index.
        got: u64,
    },
    /// The pop goes past the last appended message.
    #[error("pop beyond the queue: {end} > {next}")]
    PopBeyondQueue {
        /// The end of the popped range.
        end: u64,
        /// The next message index.
        next: u64,
    },
    /// The dropped message was not skipped.
    #[error("drop non-skipped message {0}")]
    DropNonSkippedMessage(u64),
    /// The dropped message was not popped yet.
    #[error("cannot drop pending message {0}")]
    DropPendingMessage(u64),
    /// The message is already dropped.
    #[error("message {0} already dropped")]
    MessageAlreadyDropped(u64),
}
