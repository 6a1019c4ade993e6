use alloy_primitives::{Address, Log, B256, U256};
use alloy_sol_types::SolEvent;
use rollup_node_primitives::{BatchInfo, FinalizedBatch, L1Message};
use scroll_l1::abi::logs::{
    CommitBatch, DequeueTransaction, DropTransaction, FinalizeBatch, QueueTransaction, RevertBatch,
};

/// An event emitted by the [`crate::ScrollChain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainEvent {
    /// A new batch was committed.
    BatchCommitted(BatchInfo),
    /// A committed batch was reverted.
    BatchReverted(BatchInfo),
    /// A batch was finalized.
    BatchFinalized(FinalizedBatch),
}

impl ChainEvent {
    /// Returns the log emitted by the rollup contract at `address` for the event.
    pub fn into_log(self, address: Address) -> Log {
        let data = match self {
            Self::BatchCommitted(info) => CommitBatch {
                batchIndex: U256::from(info.index),
                batchHash: info.hash,
            }
            .encode_log_data(),
            Self::BatchReverted(info) => RevertBatch {
                batchIndex: U256::from(info.index),
                batchHash: info.hash,
            }
            .encode_log_data(),
            Self::BatchFinalized(batch) => FinalizeBatch {
                batchIndex: U256::from(batch.batch_info.index),
                batchHash: batch.batch_info.hash,
                stateRoot: batch.state_root,
                withdrawRoot: batch.withdraw_root,
            }
            .encode_log_data(),
        };
        Log { address, data }
    }
}

/// An event emitted by the [`crate::L1MessageQueue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEvent {
    /// A message was appended to the queue.
    QueueTransaction {
        /// The appended message.
        message: L1Message,
        /// The hash of the message.
        hash: B256,
    },
    /// Messages were popped from the queue.
    DequeueTransaction {
        /// The index of the first popped message.
        start_index: u64,
        /// The count of popped messages.
        count: u64,
        /// The bitmap of the skipped messages, relative to the start index.
        skipped_bitmap: U256,
    },
    /// A skipped message was dropped.
    DropTransaction(u64),
}

impl QueueEvent {
    /// Returns the log emitted by the queue contract at `address` for the event.
    pub fn into_log(self, address: Address) -> Log {
        let data = match self {
            Self::QueueTransaction { message, .. } => {
                QueueTransaction::from(&message).encode_log_data()
            }
            Self::DequeueTransaction { start_index, count, skipped_bitmap } => DequeueTransaction {
                startIndex: U256::from(start_index),
                count: U256::from(count),
                skippedBitmap: skipped_bitmap,
            }
            .encode_log_data(),
            Self::DropTransaction(index) => {
                DropTransaction { index: U256::from(index) }.encode_log_data()
            }
        };
        Log { address, data }
    }
}
