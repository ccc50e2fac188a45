use super::{ConsumerGroupDescriptor, QueueDescriptor, QueueEntry};
use crate::BoxedError;
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::time::Duration;

/// Allows consumption of notification queues using [consumer groups](ConsumerGroupDescriptor)
#[async_trait]
pub trait QueueProvider {
    /// Type of [`QueueEntry`] returned by the provider
    type Entry: QueueEntry + Send + Sync;

    /// Subscribes to new notifications on a given queue joining the specified
    /// [`ConsumerGroup`](ConsumerGroupDescriptor) with the given
    /// [`ConsumerIdentifier`](super::ConsumerIdentifier) or creates it if it does not exist.
    ///
    /// Previously delivered but unacknowledged entries assigned to this consumer
    /// are replayed first. The stream then long-polls for new entries, blocking
    /// for at most `poll_timeout` per attempt, and never terminates on an empty
    /// queue.
    async fn consume(
        &self,
        queue: QueueDescriptor,
        group: &ConsumerGroupDescriptor,
        consumer: &str,
        batch_size: usize,
        poll_timeout: Duration,
    ) -> Result<BoxStream<'static, Result<Self::Entry, BoxedError>>, BoxedError>;
}
