//! The rollup chain: commits batches on top of the last committed batch, reverts unfinalized
//! batches, finalizes batches against their validity proof and serves the L2 state proven under
//! the finalized state roots.

use std::time::Instant;

use alloy_primitives::{keccak256, Address, B256};
use rollup_node_primitives::{BatchInfo, FinalizedBatch};
use scroll_codec::{
    compute_batch_data_hash, compute_chunk_data_hash, validate_skip_bitmap, BatchHeader,
    BatchHeaderV0, BatchHeaderV1, SkipBitmap,
};
use scroll_l1::MAX_POP_COUNT;
use scroll_zktrie::{ZkTrieProofResult, ZkTrieVerifier};

pub use commit::CommitBatchInput;
mod commit;
use commit::{
    blob_versioned_hash, check_scheduled_version, decode_batch_header, decode_chunks,
    load_l1_message_hashes,
};

pub use config::{
    BatchVersion, ChainConfig, QueueConfig, VersionActivation, VersionSchedule,
    DEFAULT_MAX_GAS_LIMIT, DEFAULT_MAX_NUM_TX_IN_CHUNK, SCROLL_MAINNET_CHAIN_ID,
};
mod config;

pub use error::{ChainError, QueueError};
mod error;

pub use event::{ChainEvent, QueueEvent};
mod event;

mod metrics;
use metrics::ChainMetrics;

pub use queue::L1MessageQueue;
mod queue;

pub use store::BatchStore;
mod store;

pub use verifier::{compute_public_input_hash, ProofVerifier};
mod verifier;

/// The rollup chain state: the committed batches, the finalized batches and the L1 message
/// queue.
#[derive(Debug)]
pub struct ScrollChain<V> {
    /// The chain configuration.
    config: ChainConfig,
    /// The committed and finalized batches.
    store: BatchStore,
    /// The L1 message queue.
    queue: L1MessageQueue,
    /// The verifier of the batches validity proofs.
    verifier: V,
    /// The verifier of the state proofs.
    trie_verifier: ZkTrieVerifier,
    /// The events not yet drained by the observers.
    events: Vec<ChainEvent>,
    /// The chain metrics.
    metrics: ChainMetrics,
}

impl<V: ProofVerifier> ScrollChain<V> {
    /// Returns a new empty chain.
    pub fn new(config: ChainConfig, verifier: V) -> Result<Self, ChainError> {
        Ok(Self {
            store: BatchStore::default(),
            queue: L1MessageQueue::new(config.queue),
            trie_verifier: ZkTrieVerifier::poseidon()?,
            config,
            verifier,
            events: Vec::new(),
            metrics: ChainMetrics::default(),
        })
    }

    /// Imports the genesis batch, committed and finalized with the provided state root.
    pub fn import_genesis(
        &mut self,
        batch_header: &[u8],
        state_root: B256,
    ) -> Result<BatchInfo, ChainError> {
        if !self.store.is_empty() {
            return Err(ChainError::GenesisAlreadyImported)
        }
        if state_root.is_zero() {
            return Err(ChainError::ZeroStateRoot)
        }

        let header = decode_batch_header(batch_header)?;
        if header.index() != 0 {
            return Err(ChainError::InvalidGenesisBatch("nonzero batch index"))
        }
        if header.l1_message_popped() != 0 || header.total_l1_message_popped() != 0 {
            return Err(ChainError::InvalidGenesisBatch("nonzero popped L1 messages"))
        }
        if !header.parent_batch_hash().is_zero() {
            return Err(ChainError::InvalidGenesisBatch("nonzero parent batch hash"))
        }
        if header.data_hash().is_zero() {
            return Err(ChainError::InvalidGenesisBatch("zero data hash"))
        }
        check_scheduled_version(&self.config.version_schedule, 0, header.version())?;

        let batch_info = BatchInfo::new(0, keccak256(batch_header));
        let genesis = FinalizedBatch {
            batch_info,
            prev_state_root: B256::ZERO,
            state_root,
            withdraw_root: B256::ZERO,
        };
        self.store.append(batch_info)?;
        self.store.finalize(genesis)?;

        tracing::info!(target: "scroll::chain", hash = ?batch_info.hash, ?state_root, "imported genesis batch");
        self.events.push(ChainEvent::BatchCommitted(batch_info));
        self.events.push(ChainEvent::BatchFinalized(genesis));

        Ok(batch_info)
    }

    /// Commits the batch on top of its parent and returns the header of the new batch.
    ///
    /// The commit is checked in order: the batch is not empty, the parent header decodes and is
    /// committed, the parent and batch versions follow the schedule, the chunks decode within
    /// the transactions limit, the skipped L1 message bitmap is valid and blob backed versions
    /// carry exactly one blob. No state is modified on failure.
    pub fn commit_batch(&mut self, input: &CommitBatchInput) -> Result<BatchHeader, ChainError> {
        let start = Instant::now();
        let result = self.try_commit_batch(input);
        match &result {
            Ok(header) => {
                self.metrics.committed_batches.increment(1);
                self.metrics.commit_duration.record(start.elapsed().as_secs_f64());
                tracing::info!(
                    target: "scroll::chain",
                    index = header.index(),
                    hash = ?header.hash_slow(),
                    l1_message_popped = header.l1_message_popped(),
                    "committed batch"
                );
            }
            Err(err) => {
                self.metrics.rejected_commits.increment(1);
                tracing::warn!(target: "scroll::chain", %err, version = input.version, "rejected batch commit");
            }
        }
        result
    }

    /// Commits the batch from the calldata of a commit call.
    pub fn commit_batch_calldata(
        &mut self,
        calldata: &[u8],
        blob_versioned_hashes: Vec<B256>,
    ) -> Result<BatchHeader, ChainError> {
        let input = CommitBatchInput::from_calldata(calldata, blob_versioned_hashes)?;
        self.commit_batch(&input)
    }

    fn try_commit_batch(&mut self, input: &CommitBatchInput) -> Result<BatchHeader, ChainError> {
        if input.chunks.is_empty() {
            return Err(ChainError::BatchIsEmpty)
        }

        let parent = decode_batch_header(&input.parent_batch_header)?;
        let parent_hash = keccak256(&input.parent_batch_header);
        if self.store.get(parent.index()) != Some(parent_hash) {
            return Err(ChainError::IncorrectBatchHash { index: parent.index(), hash: parent_hash })
        }
        let index = parent.index() + 1;
        if self.store.get(index).is_some() {
            return Err(ChainError::BatchIsAlreadyCommitted(index))
        }

        let schedule = &self.config.version_schedule;
        check_scheduled_version(schedule, parent.index(), parent.version())?;
        let codec = check_scheduled_version(schedule, index, input.version)?.codec();

        let chunks = decode_chunks(codec, &input.chunks, self.config.max_num_tx_in_chunk)?;

        let bitmap = SkipBitmap::from(input.skipped_l1_message_bitmap.clone());
        let l1_message_popped =
            validate_skip_bitmap(chunks.iter().flat_map(|chunk| chunk.contexts()), &bitmap)?;

        let blob_versioned_hash = blob_versioned_hash(codec, &input.blob_versioned_hashes)?;

        let start = parent.total_l1_message_popped();
        let mut cursor = bitmap.cursor();
        let mut chunk_hashes = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let l1_message_hashes = load_l1_message_hashes(&self.queue, chunk, &mut cursor, start)?;
            chunk_hashes.push(compute_chunk_data_hash(codec, chunk, &l1_message_hashes));
        }
        let data_hash = compute_batch_data_hash(&chunk_hashes);

        let total_l1_message_popped = start + l1_message_popped;
        let header: BatchHeader = match blob_versioned_hash {
            None => BatchHeaderV0::new(
                input.version,
                index,
                l1_message_popped,
                total_l1_message_popped,
                data_hash,
                parent_hash,
                bitmap,
            )
            .into(),
            Some(blob_versioned_hash) => BatchHeaderV1::new(
                input.version,
                index,
                l1_message_popped,
                total_l1_message_popped,
                data_hash,
                blob_versioned_hash,
                parent_hash,
                bitmap,
            )
            .into(),
        };

        let batch_info = BatchInfo::new(index, header.hash_slow());
        self.store.append(batch_info)?;
        self.events.push(ChainEvent::BatchCommitted(batch_info));

        Ok(header)
    }

    /// Reverts `count` batches from the provided committed batch. The reverted range must reach
    /// the last committed batch and can't include finalized batches. Returns the reverted batches.
    pub fn revert_batches(
        &mut self,
        batch_header: &[u8],
        count: u64,
    ) -> Result<Vec<BatchInfo>, ChainError> {
        if count == 0 {
            return Err(ChainError::RevertZeroBatches)
        }

        let header = decode_batch_header(batch_header)?;
        let index = header.index();
        let hash = keccak256(batch_header);
        if self.store.get(index) != Some(hash) {
            return Err(ChainError::IncorrectBatchHash { index, hash })
        }
        if self.store.last_finalized_index().is_some_and(|last| index <= last) {
            return Err(ChainError::RevertFinalizedBatch(index))
        }
        let tip = self.store.tip().map(|tip| tip.index).unwrap_or_default();
        if index.saturating_add(count) <= tip {
            return Err(ChainError::RevertNotStartFromEnd)
        }

        let reverted = self.store.truncate(index);
        for batch in &reverted {
            tracing::info!(target: "scroll::chain", index = batch.index, hash = ?batch.hash, "reverted batch");
            self.events.push(ChainEvent::BatchReverted(*batch));
        }
        self.metrics.reverted_batches.increment(reverted.len() as u64);

        Ok(reverted)
    }

    /// Finalizes the committed batch with its validity proof. The previous state root must be
    /// the finalized state root of the parent batch. Pops the L1 messages of the batch from the
    /// queue.
    pub fn finalize_batch(
        &mut self,
        batch_header: &[u8],
        prev_state_root: B256,
        post_state_root: B256,
        withdraw_root: B256,
        proof: &[u8],
    ) -> Result<FinalizedBatch, ChainError> {
        if prev_state_root.is_zero() || post_state_root.is_zero() {
            return Err(ChainError::ZeroStateRoot)
        }

        let header = decode_batch_header(batch_header)?;
        let index = header.index();
        let hash = keccak256(batch_header);
        if self.store.get(index) != Some(hash) {
            return Err(ChainError::IncorrectBatchHash { index, hash })
        }

        let last_finalized = self.store.last_finalized_index().unwrap_or_default();
        if index <= last_finalized {
            return Err(ChainError::BatchIsAlreadyFinalized(index))
        }
        if index != last_finalized + 1 {
            return Err(ChainError::IncorrectBatchIndex { expected: last_finalized + 1, got: index })
        }
        let parent_state_root = self.finalized_state_root(index - 1);
        if parent_state_root != Some(prev_state_root) {
            return Err(ChainError::IncorrectPreviousStateRoot(prev_state_root))
        }

        let public_input_hash = compute_public_input_hash(
            self.config.layer2_chain_id,
            prev_state_root,
            post_state_root,
            withdraw_root,
            header.data_hash(),
        );
        if !self.verifier.verify_proof(index, proof, public_input_hash) {
            return Err(ChainError::InvalidProof(index))
        }

        let l1_message_popped = header.l1_message_popped();
        let start = header.total_l1_message_popped().saturating_sub(l1_message_popped);
        self.queue.check_pop(start, l1_message_popped)?;

        let finalized = FinalizedBatch {
            batch_info: BatchInfo::new(index, hash),
            prev_state_root,
            state_root: post_state_root,
            withdraw_root,
        };
        self.store.finalize(finalized)?;

        let bitmap = header.skipped_l1_message_bitmap();
        for (word, offset) in (0..l1_message_popped).step_by(MAX_POP_COUNT as usize).enumerate() {
            let count = (l1_message_popped - offset).min(MAX_POP_COUNT);
            let skipped = bitmap.word(word).unwrap_or_default();
            self.queue.pop_cross_domain_message(start + offset, count, skipped)?;
        }

        tracing::info!(target: "scroll::chain", index, ?hash, state_root = ?post_state_root, "finalized batch");
        self.events.push(ChainEvent::BatchFinalized(finalized));
        self.metrics.finalized_batches.increment(1);

        Ok(finalized)
    }

    /// Verifies the storage proof of `account` at `storage_key` against the state root of the
    /// finalized batch and returns the proven value.
    pub fn verify_state_at(
        &self,
        batch_index: u64,
        account: Address,
        storage_key: B256,
        proof: &[u8],
    ) -> Result<ZkTrieProofResult, ChainError> {
        let expected = self
            .finalized_state_root(batch_index)
            .ok_or(ChainError::BatchNotFinalized(batch_index))?;
        let result = self.trie_verifier.verify(account, storage_key, proof)?;
        if result.state_root != expected {
            return Err(ChainError::StateRootMismatch { expected, got: result.state_root })
        }
        tracing::trace!(
            target: "scroll::chain",
            batch_index,
            ?account,
            ?storage_key,
            value = ?result.storage_value,
            "verified state"
        );
        Ok(result)
    }
}

impl<V> ScrollChain<V> {
    /// Returns the chain configuration.
    pub const fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Returns the batch store.
    pub const fn store(&self) -> &BatchStore {
        &self.store
    }

    /// Returns the L1 message queue.
    pub const fn queue(&self) -> &L1MessageQueue {
        &self.queue
    }

    /// Returns a mutable reference to the L1 message queue.
    pub fn queue_mut(&mut self) -> &mut L1MessageQueue {
        &mut self.queue
    }

    /// Returns the hash of the committed batch at the provided index.
    pub fn committed_batch_hash(&self, index: u64) -> Option<B256> {
        self.store.get(index)
    }

    /// Returns the index of the last finalized batch.
    pub fn last_finalized_batch_index(&self) -> Option<u64> {
        self.store.last_finalized_index()
    }

    /// Returns true if the batch at the provided index is finalized.
    pub fn is_batch_finalized(&self, index: u64) -> bool {
        self.store.finalized(index).is_some()
    }

    /// Returns the state root of the finalized batch at the provided index.
    pub fn finalized_state_root(&self, index: u64) -> Option<B256> {
        self.store.finalized(index).map(|batch| batch.state_root)
    }

    /// Returns the withdraw root of the finalized batch at the provided index.
    pub fn withdraw_root(&self, index: u64) -> Option<B256> {
        self.store.finalized(index).map(|batch| batch.withdraw_root)
    }

    /// Drains the events emitted by the chain.
    pub fn take_events(&mut self) -> Vec<ChainEvent> {
        std::mem::take(&mut self.events)
    }
}
