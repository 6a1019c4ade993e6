/// An error occurring during the codec process.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    /// An error occurring at the decoding stage.
    #[error(transparent)]
    Decoding(#[from] DecodingError),
    /// An error occurring while validating the skipped L1 message bitmap.
    #[error(transparent)]
    Bitmap(#[from] BitmapError),
    /// An error occurring at the encoding stage.
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// An error occurring during the encoding.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EncodingError {
    /// The chunk holds more blocks than its block count byte can express.
    #[error("too many blocks in chunk: {0}")]
    TooManyBlocksInChunk(usize),
    /// The transaction length doesn't fit its length prefix.
    #[error("transaction too large: {0} bytes")]
    TransactionTooLarge(usize),
}

/// An error occurring during the decoding.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodingError {
    /// The batch header version is not supported.
    #[error("invalid batch header version {0}")]
    InvalidBatchHeaderVersion(u8),
    /// The batch header is shorter than the fixed part of its version.
    #[error("batch header length too small: got {length}, minimum {minimum}")]
    BatchHeaderLengthTooSmall {
        /// The length of the provided header.
        length: usize,
        /// The minimum length for the header version.
        minimum: usize,
    },
    /// The bitmap trailing the batch header does not match the popped L1 messages count.
    #[error("incorrect bitmap length in batch header: expected {expected}, got {got}")]
    IncorrectBitmapLength {
        /// The expected length in bytes.
        expected: usize,
        /// The provided length in bytes.
        got: usize,
    },
    /// The chunk doesn't contain any block.
    #[error("no block in chunk")]
    NoBlockInChunk,
    /// The chunk length doesn't match the encoded blocks and transactions.
    #[error("incorrect chunk length {0}")]
    IncorrectChunkLength(usize),
}

/// An error occurring while validating the skipped L1 message bitmap against the blocks of a
/// batch.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BitmapError {
    /// A block declares more L1 messages than transactions.
    #[error(
        "block {block} has fewer transactions ({num_transactions}) than L1 messages ({num_l1_messages})"
    )]
    NumTxsLessThanNumL1Msgs {
        /// The position of the block in the batch.
        block: usize,
        /// The transactions count of the block.
        num_transactions: u16,
        /// The L1 messages count of the block.
        num_l1_messages: u16,
    },
    /// The bitmap length doesn't match the L1 messages popped by the batch.
    #[error("incorrect bitmap length: expected {expected}, got {got}")]
    IncorrectBitmapLength {
        /// The expected length in bytes.
        expected: usize,
        /// The provided length in bytes.
        got: usize,
    },
    /// The last L1 message of a block is marked as skipped.
    #[error("last L1 message of block is skipped at batch position {0}")]
    LastL1MessageSkipped(u64),
}
