use std::collections::BTreeMap;

use crate::ChainError;

use alloy_primitives::B256;
use rollup_node_primitives::{BatchInfo, FinalizedBatch};

/// The store of the committed batches, keyed by their index.
///
/// Batches are only appended at the tip and removed from the tip. Finalized batches can't be
/// removed.
#[derive(Debug, Default, Clone)]
pub struct BatchStore {
    /// The committed batch hashes, at the position of their index.
    committed: Vec<B256>,
    /// The finalized batches.
    finalized: BTreeMap<u64, FinalizedBatch>,
}

impl BatchStore {
    /// Returns true if no batch was committed.
    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    /// Returns the last committed batch.
    pub fn tip(&self) -> Option<BatchInfo> {
        let index = self.committed.len().checked_sub(1)?;
        Some(BatchInfo::new(index as u64, self.committed[index]))
    }

    /// Returns the hash of the committed batch at the provided index.
    pub fn get(&self, index: u64) -> Option<B256> {
        usize::try_from(index).ok().and_then(|index| self.committed.get(index)).copied()
    }

    /// Appends the batch if it directly follows the tip.
    pub fn append(&mut self, batch: BatchInfo) -> Result<(), ChainError> {
        let next = self.committed.len() as u64;
        if batch.index < next {
            return Err(ChainError::BatchIsAlreadyCommitted(batch.index))
        }
        if batch.index > next {
            return Err(ChainError::IncorrectBatchIndex { expected: next, got: batch.index })
        }
        self.committed.push(batch.hash);
        Ok(())
    }

    /// Removes the batches from the provided index up to the tip and returns them in index order.
    /// Finalized batches are kept.
    pub fn truncate(&mut self, from: u64) -> Vec<BatchInfo> {
        let from = self.last_finalized_index().map_or(from, |last| from.max(last + 1));
        let Ok(start) = usize::try_from(from) else { return Vec::new() };
        if start >= self.committed.len() {
            return Vec::new()
        }
        self.committed
            .drain(start..)
            .enumerate()
            .map(|(offset, hash)| BatchInfo::new(from + offset as u64, hash))
            .collect()
    }

    /// Records the finalized batch. The batch must be committed.
    pub fn finalize(&mut self, batch: FinalizedBatch) -> Result<(), ChainError> {
        let index = batch.batch_info.index;
        if self.get(index) != Some(batch.batch_info.hash) {
            return Err(ChainError::IncorrectBatchHash { index, hash: batch.batch_info.hash })
        }
        self.finalized.insert(index, batch);
        Ok(())
    }

    /// Returns the finalized batch at the provided index.
    pub fn finalized(&self, index: u64) -> Option<&FinalizedBatch> {
        self.finalized.get(&index)
    }

    /// Returns the index of the last finalized batch.
    pub fn last_finalized_index(&self) -> Option<u64> {
        self.finalized.last_key_value().map(|(index, _)| *index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(batches: u64) -> eyre::Result<BatchStore> {
        let mut store = BatchStore::default();
        for index in 0..batches {
            store.append(BatchInfo::new(index, B256::with_last_byte(index as u8 + 1)))?;
        }
        Ok(store)
    }

    #[test]
    fn test_should_append_at_tip() -> eyre::Result<()> {
        let mut store = store_with(3)?;
        assert_eq!(store.tip(), Some(BatchInfo::new(2, B256::with_last_byte(3))));
        assert_eq!(store.get(1), Some(B256::with_last_byte(2)));
        assert_eq!(store.get(3), None);

        assert!(matches!(
            store.append(BatchInfo::new(1, B256::ZERO)),
            Err(ChainError::BatchIsAlreadyCommitted(1))
        ));
        assert!(matches!(
            store.append(BatchInfo::new(5, B256::ZERO)),
            Err(ChainError::IncorrectBatchIndex { expected: 3, got: 5 })
        ));
        store.append(BatchInfo::new(3, B256::ZERO))?;
        assert_eq!(store.tip().map(|tip| tip.index), Some(3));

        Ok(())
    }

    #[test]
    fn test_should_truncate_unfinalized_batches() -> eyre::Result<()> {
        let mut store = store_with(5)?;
        store.finalize(FinalizedBatch {
            batch_info: BatchInfo::new(1, B256::with_last_byte(2)),
            ..Default::default()
        })?;

        let removed = store.truncate(0);
        assert_eq!(
            removed.iter().map(|batch| batch.index).collect::<Vec<_>>(),
            vec![2, 3, 4]
        );
        assert_eq!(removed[0].hash, B256::with_last_byte(3));
        assert_eq!(store.tip().map(|tip| tip.index), Some(1));
        assert!(store.truncate(7).is_empty());

        Ok(())
    }

    #[test]
    fn test_should_only_finalize_committed_batches() -> eyre::Result<()> {
        let mut store = store_with(2)?;
        let batch = FinalizedBatch {
            batch_info: BatchInfo::new(1, B256::with_last_byte(9)),
            ..Default::default()
        };
        assert!(matches!(store.finalize(batch), Err(ChainError::IncorrectBatchHash { .. })));
        assert_eq!(store.last_finalized_index(), None);
        Ok(())
    }
}
