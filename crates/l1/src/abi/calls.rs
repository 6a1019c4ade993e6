use alloy_primitives::Bytes;
use alloy_sol_types::{sol, SolCall};

sol! {
    #[cfg_attr(feature = "test-utils", derive(arbitrary::Arbitrary))]
    #[derive(Debug, PartialEq, Eq)]
    function commitBatch(
        uint8 version,
        bytes calldata parentBatchHeader,
        bytes[] memory chunks,
        bytes calldata skippedL1MessageBitmap
    ) external;

    #[cfg_attr(feature = "test-utils", derive(arbitrary::Arbitrary))]
    #[derive(Debug, PartialEq, Eq)]
    function commitBatchWithBlobProof(
        uint8 version,
        bytes calldata parentBatchHeader,
        bytes[] memory chunks,
        bytes calldata skippedL1MessageBitmap,
        bytes calldata blobDataProof
    ) external;
}

/// A call to commit a batch on the L1 Scroll Rollup contract.
#[derive(Debug, PartialEq, Eq, derive_more::From)]
pub enum CommitBatchCall {
    /// A plain call to commit the batch.
    CommitBatch(commitBatchCall),
    /// A call to commit the batch with a blob proof.
    CommitBatchWithBlobProof(commitBatchWithBlobProofCall),
}

impl CommitBatchCall {
    /// Tries to decode the calldata into a [`CommitBatchCall`].
    pub fn try_decode(calldata: &[u8]) -> Option<Self> {
        let selector: [u8; 4] = calldata.get(0..4)?.try_into().ok()?;
        match selector {
            commitBatchCall::SELECTOR => commitBatchCall::abi_decode(calldata).map(Into::into).ok(),
            commitBatchWithBlobProofCall::SELECTOR => {
                commitBatchWithBlobProofCall::abi_decode(calldata).map(Into::into).ok()
            }
            _ => None,
        }
    }

    /// Returns the version for the commit call.
    pub const fn version(&self) -> u8 {
        match self {
            Self::CommitBatch(b) => b.version,
            Self::CommitBatchWithBlobProof(b) => b.version,
        }
    }

    /// Returns the parent batch header for the commit call.
    pub const fn parent_batch_header(&self) -> &Bytes {
        match self {
            Self::CommitBatch(b) => &b.parentBatchHeader,
            Self::CommitBatchWithBlobProof(b) => &b.parentBatchHeader,
        }
    }

    /// Returns the chunks for the commit call.
    pub fn chunks(&self) -> Vec<&[u8]> {
        let chunks = match self {
            Self::CommitBatch(b) => &b.chunks,
            Self::CommitBatchWithBlobProof(b) => &b.chunks,
        };
        chunks.iter().map(|c| c.as_ref()).collect()
    }

    /// Returns the skipped L1 message bitmap for the commit call.
    pub const fn skipped_l1_message_bitmap(&self) -> &Bytes {
        match self {
            Self::CommitBatch(b) => &b.skippedL1MessageBitmap,
            Self::CommitBatchWithBlobProof(b) => &b.skippedL1MessageBitmap,
        }
    }

    /// Returns the blob data proof, if the call carries one.
    pub const fn blob_data_proof(&self) -> Option<&Bytes> {
        match self {
            Self::CommitBatch(_) => None,
            Self::CommitBatchWithBlobProof(b) => Some(&b.blobDataProof),
        }
    }
}
