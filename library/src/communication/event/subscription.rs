use super::{QueueDescriptor, TopicDescriptor};
use crate::EmptyResult;
use async_trait::async_trait;

/// Manages the set of queues subscribed to a topic
#[async_trait]
pub trait SubscriptionManager {
    /// Subscribes a queue to a topic so that every message published to the
    /// topic is delivered to the queue
    ///
    /// Subscribing the same queue twice is a no-op.
    async fn subscribe(&self, topic: &TopicDescriptor, queue: &QueueDescriptor) -> EmptyResult;
}
