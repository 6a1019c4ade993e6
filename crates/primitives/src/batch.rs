use alloy_primitives::B256;

/// The index and hash of a committed batch.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BatchInfo {
    /// The index of the batch.
    pub index: u64,
    /// The hash of the batch.
    pub hash: B256,
}

impl BatchInfo {
    /// Returns a new instance of [`BatchInfo`].
    pub const fn new(index: u64, hash: B256) -> Self {
        Self { index, hash }
    }
}

/// The roots attached to a batch once its validity proof has been accepted.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct FinalizedBatch {
    /// The finalized batch.
    pub batch_info: BatchInfo,
    /// The L2 state root before the batch.
    pub prev_state_root: B256,
    /// The L2 state root after the batch.
    pub state_root: B256,
    /// The withdraw trie root after the batch.
    pub withdraw_root: B256,
}

#[cfg(feature = "arbitrary")]
mod arbitrary_impl {
    use super::*;

    impl arbitrary::Arbitrary<'_> for BatchInfo {
        fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
            let index = u.arbitrary::<u32>()? as u64;
            let hash = u.arbitrary::<B256>()?;
            Ok(Self { index, hash })
        }
    }

    impl arbitrary::Arbitrary<'_> for FinalizedBatch {
        fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
            Ok(Self {
                batch_info: u.arbitrary()?,
                prev_state_root: u.arbitrary()?,
                state_root: u.arbitrary()?,
                withdraw_root: u.arbitrary()?,
            })
        }
    }
}
