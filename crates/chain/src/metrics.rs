use metrics::{Counter, Gauge, Histogram};
use metrics_derive::Metrics;

/// The metrics for the [`super::ScrollChain`].
#[derive(Metrics, Clone)]
#[metrics(scope = "chain")]
pub struct ChainMetrics {
    /// A counter on the committed batches.
    pub committed_batches: Counter,
    /// A counter on the rejected commits.
    pub rejected_commits: Counter,
    /// A counter on the reverted batches.
    pub reverted_batches: Counter,
    /// A counter on the finalized batches.
    pub finalized_batches: Counter,
    /// The duration of a batch commit, in seconds.
    pub commit_duration: Histogram,
}

/// The metrics for the [`super::L1MessageQueue`].
#[derive(Metrics, Clone)]
#[metrics(scope = "l1_message_queue")]
pub struct QueueMetrics {
    /// A counter on the appended messages.
    pub appended_messages: Counter,
    /// A counter on the popped messages.
    pub popped_messages: Counter,
    /// A counter on the popped messages marked as skipped.
    pub skipped_messages: Counter,
    /// A counter on the dropped messages.
    pub dropped_messages: Counter,
    /// The index of the next message to pop.
    pub pending_queue_index: Gauge,
}
