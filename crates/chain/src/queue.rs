//! The L1 message queue.
//!
//! Messages sent from L1 to L2 are appended to the queue, where they are identified by their
//! index and hash. Batches include the messages in order: finalizing a batch pops its messages
//! from the queue, marking the ones skipped by the batch. A skipped message can later be dropped.

use std::collections::BTreeSet;

use crate::{metrics::QueueMetrics, QueueConfig, QueueError, QueueEvent};

use alloy_primitives::{Address, Bytes, B256, U256};
use rollup_node_primitives::L1Message;
use scroll_l1::{apply_l1_to_l2_alias, L1MessageExt, MAX_POP_COUNT};

/// A message stored in the queue along with its hash.
#[derive(Debug, Clone, PartialEq, Eq)]
struct QueuedMessage {
    message: L1Message,
    hash: B256,
}

/// An append-only queue of L1 messages.
#[derive(Debug)]
pub struct L1MessageQueue {
    /// The queue configuration.
    config: QueueConfig,
    /// The messages, indexed by their queue index.
    messages: Vec<QueuedMessage>,
    /// The index of the next message to pop.
    pending_queue_index: u64,
    /// The indexes of the popped messages marked as skipped.
    skipped: BTreeSet<u64>,
    /// The indexes of the dropped messages.
    dropped: BTreeSet<u64>,
    /// The events not yet drained by the observers.
    events: Vec<QueueEvent>,
    /// The queue metrics.
    metrics: QueueMetrics,
}

impl L1MessageQueue {
    /// Returns a new empty queue.
    pub fn new(config: QueueConfig) -> Self {
        Self {
            config,
            messages: Vec::new(),
            pending_queue_index: 0,
            skipped: BTreeSet::new(),
            dropped: BTreeSet::new(),
            events: Vec::new(),
            metrics: QueueMetrics::default(),
        }
    }

    /// Appends a message sent by the L1 contract `sender`. The L2 sender of the message is the
    /// alias of `sender`. Returns the index of the message.
    pub fn append_cross_domain_message(
        &mut self,
        sender: Address,
        target: Address,
        gas_limit: u64,
        data: Bytes,
    ) -> Result<u64, QueueError> {
        self.append(apply_l1_to_l2_alias(sender), target, U256::ZERO, gas_limit, data)
    }

    /// Appends a transaction enforced from L1 by `sender`, which is used as is for the L2 sender.
    /// Returns the index of the message.
    pub fn append_enforced_transaction(
        &mut self,
        sender: Address,
        target: Address,
        value: U256,
        gas_limit: u64,
        data: Bytes,
    ) -> Result<u64, QueueError> {
        self.append(sender, target, value, gas_limit, data)
    }

    fn append(
        &mut self,
        sender: Address,
        target: Address,
        value: U256,
        gas_limit: u64,
        data: Bytes,
    ) -> Result<u64, QueueError> {
        if gas_limit > self.config.max_gas_limit {
            return Err(QueueError::GasLimitExceeded { gas_limit, max: self.config.max_gas_limit })
        }
        let intrinsic = self.config.intrinsic_gas(&data);
        if gas_limit < intrinsic {
            return Err(QueueError::InsufficientGasLimit { gas_limit, intrinsic })
        }

        let queue_index = self.next_cross_domain_message_index();
        let message = L1Message {
            queue_index,
            sender,
            target,
            value,
            gas_limit: U256::from(gas_limit),
            data,
        };
        let hash = message.hash_slow();
        tracing::debug!(target: "scroll::chain::queue", queue_index, ?hash, ?sender, "appended L1 message");

        self.events.push(QueueEvent::QueueTransaction { message: message.clone(), hash });
        self.messages.push(QueuedMessage { message, hash });
        self.metrics.appended_messages.increment(1);

        Ok(queue_index)
    }

    /// Returns the index of the next appended message.
    pub fn next_cross_domain_message_index(&self) -> u64 {
        self.messages.len() as u64
    }

    /// Returns the hash of the message at the provided index.
    pub fn get_cross_domain_message(&self, index: u64) -> Option<B256> {
        self.get(index).map(|queued| queued.hash)
    }

    /// Returns the message at the provided index.
    pub fn get_message(&self, index: u64) -> Option<&L1Message> {
        self.get(index).map(|queued| &queued.message)
    }

    fn get(&self, index: u64) -> Option<&QueuedMessage> {
        usize::try_from(index).ok().and_then(|index| self.messages.get(index))
    }

    /// Returns the index of the next message to pop.
    pub const fn pending_queue_index(&self) -> u64 {
        self.pending_queue_index
    }

    /// Returns true if the message was popped and marked as skipped.
    pub fn is_message_skipped(&self, index: u64) -> bool {
        self.skipped.contains(&index)
    }

    /// Returns true if the message was dropped.
    pub fn is_message_dropped(&self, index: u64) -> bool {
        self.dropped.contains(&index)
    }

    /// Checks `count` messages can be popped from `start_index`, in calls of at most
    /// [`MAX_POP_COUNT`] messages.
    pub fn check_pop(&self, start_index: u64, count: u64) -> Result<(), QueueError> {
        if start_index != self.pending_queue_index {
            return Err(QueueError::StartIndexMismatch {
                expected: self.pending_queue_index,
                got: start_index,
            })
        }
        let next = self.next_cross_domain_message_index();
        let end = start_index.saturating_add(count);
        if end > next {
            return Err(QueueError::PopBeyondQueue { end, next })
        }
        Ok(())
    }

    /// Pops `count` messages from `start_index`. The bit `i` of `skipped_bitmap`, counted from the
    /// least significant bit, marks the message `start_index + i` as skipped. Bits beyond `count`
    /// are ignored.
    pub fn pop_cross_domain_message(
        &mut self,
        start_index: u64,
        count: u64,
        skipped_bitmap: U256,
    ) -> Result<(), QueueError> {
        if count > MAX_POP_COUNT {
            return Err(QueueError::PopTooManyMessages(count))
        }
        self.check_pop(start_index, count)?;

        let skipped_bitmap = if count < MAX_POP_COUNT {
            skipped_bitmap & ((U256::from(1) << count as usize) - U256::from(1))
        } else {
            skipped_bitmap
        };

        let mut skipped = 0;
        for offset in 0..count {
            if skipped_bitmap.bit(offset as usize) {
                self.skipped.insert(start_index + offset);
                skipped += 1;
            }
        }
        self.pending_queue_index = start_index + count;

        tracing::debug!(target: "scroll::chain::queue", start_index, count, skipped, "popped L1 messages");
        self.events.push(QueueEvent::DequeueTransaction { start_index, count, skipped_bitmap });
        self.metrics.popped_messages.increment(count);
        self.metrics.skipped_messages.increment(skipped);
        self.metrics.pending_queue_index.set(self.pending_queue_index as f64);

        Ok(())
    }

    /// Drops the skipped message at the provided index.
    pub fn drop_cross_domain_message(&mut self, index: u64) -> Result<(), QueueError> {
        if index >= self.pending_queue_index {
            return Err(QueueError::DropPendingMessage(index))
        }
        if !self.is_message_skipped(index) {
            return Err(QueueError::DropNonSkippedMessage(index))
        }
        if !self.dropped.insert(index) {
            return Err(QueueError::MessageAlreadyDropped(index))
        }

        tracing::debug!(target: "scroll::chain::queue", index, "dropped L1 message");
        self.events.push(QueueEvent::DropTransaction(index));
        self.metrics.dropped_messages.increment(1);

        Ok(())
    }

    /// Drains the events emitted by the queue.
    pub fn take_events(&mut self) -> Vec<QueueEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for L1MessageQueue {
    fn default() -> Self {
        Self::new(QueueConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use alloy_primitives::{address, b256, bytes};
    use arbitrary::{Arbitrary, Unstructured};
    use rand::Rng;
    use scroll_l1::compute_message_hash;

    fn queue_with(messages: u64) -> eyre::Result<L1MessageQueue> {
        let mut queue = L1MessageQueue::default();
        for _ in 0..messages {
            queue.append_cross_domain_message(
                Address::ZERO,
                Address::ZERO,
                1_000_000,
                Bytes::new(),
            )?;
        }
        queue.take_events();
        Ok(queue)
    }

    #[test]
    fn test_should_append_cross_domain_message() -> eyre::Result<()> {
        let mut queue = L1MessageQueue::default();
        let messenger = address!("7885BcBd5CeCEf1336b5300fb5186A12DDD8c478");
        let target = address!("2b5AD5c4795c026514f8317c7a215E218DcCD6cF");

        assert_eq!(queue.next_cross_domain_message_index(), 0);
        let index = queue.append_cross_domain_message(messenger, target, 100_000, bytes!("01"))?;
        assert_eq!(index, 0);
        assert_eq!(queue.next_cross_domain_message_index(), 1);

        let sender = address!("8996BcBd5CeCEf1336b5300fb5186A12DDD8d589");
        let expected = compute_message_hash(
            sender,
            U256::ZERO,
            U256::ZERO,
            target,
            U256::from(100_000),
            &[1],
        );
        assert_eq!(queue.get_cross_domain_message(0), Some(expected));
        assert_eq!(queue.get_cross_domain_message(1), None);

        let events = queue.take_events();
        let [QueueEvent::QueueTransaction { message, hash }] = events.as_slice() else {
            eyre::bail!("expected a single queue event, got {events:?}")
        };
        assert_eq!(message.sender, sender);
        assert_eq!(message.queue_index, 0);
        assert_eq!(*hash, expected);
        assert!(queue.take_events().is_empty());

        Ok(())
    }

    #[test]
    fn test_should_append_enforced_transaction_without_alias() -> eyre::Result<()> {
        let mut queue = queue_with(3)?;
        let sender = address!("b2a70fab1a45b1b9be443b6567849a1702bc1232");
        let index = queue.append_enforced_transaction(
            sender,
            sender,
            U256::from(200),
            100_000,
            bytes!("01"),
        )?;
        assert_eq!(index, 3);

        let message = queue.get_message(3).ok_or_else(|| eyre::eyre!("missing message"))?;
        assert_eq!(message.sender, sender);
        assert_eq!(message.value, U256::from(200));
        assert_eq!(queue.get_cross_domain_message(3), Some(message.hash_slow()));

        Ok(())
    }

    #[test]
    fn test_should_reject_invalid_gas_limit() -> eyre::Result<()> {
        let mut queue = L1MessageQueue::default();

        let err = queue.append_cross_domain_message(
            Address::ZERO,
            Address::ZERO,
            10_000_001,
            Bytes::new(),
        );
        assert_eq!(
            err,
            Err(QueueError::GasLimitExceeded { gas_limit: 10_000_001, max: 10_000_000 })
        );

        let err = queue.append_enforced_transaction(
            Address::ZERO,
            Address::ZERO,
            U256::ZERO,
            0,
            Bytes::new(),
        );
        assert_eq!(err, Err(QueueError::InsufficientGasLimit { gas_limit: 0, intrinsic: 21_000 }));

        // the intrinsic gas accounts for the calldata.
        let err = queue.append_cross_domain_message(
            Address::ZERO,
            Address::ZERO,
            21_000,
            bytes!("0001"),
        );
        assert_eq!(
            err,
            Err(QueueError::InsufficientGasLimit { gas_limit: 21_000, intrinsic: 21_020 })
        );
        queue.append_cross_domain_message(Address::ZERO, Address::ZERO, 21_020, bytes!("0001"))?;

        assert_eq!(queue.next_cross_domain_message_index(), 1);
        Ok(())
    }

    #[test]
    fn test_should_pop_cross_domain_messages() -> eyre::Result<()> {
        let mut queue = queue_with(512)?;

        assert_eq!(
            queue.pop_cross_domain_message(0, 257, U256::ZERO),
            Err(QueueError::PopTooManyMessages(257))
        );
        assert_eq!(
            queue.pop_cross_domain_message(1, 256, U256::ZERO),
            Err(QueueError::StartIndexMismatch { expected: 0, got: 1 })
        );

        // pop 50 messages with no skip.
        queue.pop_cross_domain_message(0, 50, U256::ZERO)?;
        assert_eq!(queue.pending_queue_index(), 50);
        assert!((0..50).all(|i| !queue.is_message_skipped(i) && !queue.is_message_dropped(i)));

        // pop 10 messages, all skipped.
        queue.pop_cross_domain_message(50, 10, U256::from(1023))?;
        assert_eq!(queue.pending_queue_index(), 60);
        assert!((50..60).all(|i| queue.is_message_skipped(i)));

        // pop 20 messages, skip the first 5.
        queue.pop_cross_domain_message(60, 20, U256::from(31))?;
        assert_eq!(queue.pending_queue_index(), 80);
        assert!((60..65).all(|i| queue.is_message_skipped(i)));
        assert!((65..80).all(|i| !queue.is_message_skipped(i)));

        // pop 256 messages with a random skip.
        let bitmap = U256::from_be_bytes(
            b256!("496525059c3f33758d17030403e45afe067b8a0ae1317cda0487fd2932cbea1a").0,
        );
        queue.pop_cross_domain_message(80, 256, bitmap)?;
        for i in 80..336u64 {
            assert_eq!(queue.is_message_skipped(i), bitmap.bit((i - 80) as usize));
            assert!(!queue.is_message_dropped(i));
        }

        let events = queue.take_events();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[1],
            QueueEvent::DequeueTransaction {
                start_index: 50,
                count: 10,
                skipped_bitmap: U256::from(1023)
            }
        );

        Ok(())
    }

    #[test]
    fn test_should_ignore_bitmap_bits_beyond_count() -> eyre::Result<()> {
        let mut queue = queue_with(10)?;
        queue.pop_cross_domain_message(0, 4, U256::MAX)?;

        assert!((0..4).all(|i| queue.is_message_skipped(i)));
        assert!(!queue.is_message_skipped(4));
        assert_eq!(
            queue.take_events(),
            vec![QueueEvent::DequeueTransaction {
                start_index: 0,
                count: 4,
                skipped_bitmap: U256::from(0b1111)
            }]
        );

        Ok(())
    }

    #[test]
    fn test_should_not_pop_beyond_queue() -> eyre::Result<()> {
        let mut queue = queue_with(10)?;
        assert_eq!(
            queue.pop_cross_domain_message(0, 11, U256::ZERO),
            Err(QueueError::PopBeyondQueue { end: 11, next: 10 })
        );
        assert_eq!(queue.pending_queue_index(), 0);
        assert!(queue.take_events().is_empty());
        Ok(())
    }

    #[test]
    fn test_should_drop_skipped_messages() -> eyre::Result<()> {
        let mut queue = queue_with(10)?;
        queue.pop_cross_domain_message(0, 5, U256::ZERO)?;

        for i in 0..5 {
            assert_eq!(
                queue.drop_cross_domain_message(i),
                Err(QueueError::DropNonSkippedMessage(i))
            );
        }
        for i in 5..10 {
            assert_eq!(queue.drop_cross_domain_message(i), Err(QueueError::DropPendingMessage(i)));
        }

        queue.pop_cross_domain_message(5, 5, U256::from(0x1f))?;
        queue.take_events();
        for i in 5..10 {
            assert!(queue.is_message_skipped(i));
            assert!(!queue.is_message_dropped(i));
            queue.drop_cross_domain_message(i)?;
            assert_eq!(
                queue.drop_cross_domain_message(i),
                Err(QueueError::MessageAlreadyDropped(i))
            );
            assert!(queue.is_message_skipped(i));
            assert!(queue.is_message_dropped(i));
        }
        assert_eq!(queue.take_events().len(), 5);

        Ok(())
    }

    #[test]
    fn test_should_store_arbitrary_messages() -> eyre::Result<()> {
        let mut bytes = [0u8; 2048];
        rand::rng().fill(bytes.as_mut_slice());
        let mut u = Unstructured::new(&bytes);

        let mut queue = L1MessageQueue::default();
        for index in 0..4 {
            let message = L1Message::arbitrary(&mut u)?;
            let data: Bytes = message.data.iter().copied().take(64).collect::<Vec<_>>().into();
            queue.append_enforced_transaction(
                message.sender,
                message.target,
                message.value,
                1_000_000,
                data.clone(),
            )?;

            let stored = queue.get_message(index).ok_or_else(|| eyre::eyre!("missing message"))?;
            assert_eq!(stored.queue_index, index);
            assert_eq!(stored.sender, message.sender);
            assert_eq!(stored.data, data);
        }

        Ok(())
    }
}
