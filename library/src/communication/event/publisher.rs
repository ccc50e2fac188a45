use super::{AttributeMap, Notification, QueueDescriptor, TopicDescriptor};
use crate::{BoxedError, EmptyResult};
use async_trait::async_trait;

/// Unique identifier assigned to a message when it is published to a topic
pub type MessageId = String;

/// Structure which allows publishing of serialized data directly into a queue
#[async_trait]
pub trait RawNotificationPublisher {
    /// Sends an opaque payload to a [`Queue`](QueueDescriptor), bypassing any topic fan-out
    async fn publish_raw(&self, data: &[u8], descriptor: QueueDescriptor) -> EmptyResult;
}

/// Structure which allows publishing of serialized data to a fan-out topic
#[async_trait]
pub trait RawTopicPublisher {
    /// Wraps an opaque payload in a delivery envelope and sends a copy to
    /// every queue subscribed to the [`Topic`](TopicDescriptor)
    async fn publish_raw(
        &self,
        data: &[u8],
        descriptor: &TopicDescriptor,
        attributes: AttributeMap,
    ) -> Result<MessageId, BoxedError>;
}

/// Publisher for [`Notifications`](Notification) addressed to a single queue
#[async_trait]
pub trait NotificationPublisher {
    /// Publishes a [`Notification`] to the given queue
    async fn publish<N: Notification + Send + Sync>(
        &self,
        notification: &N,
        queue: QueueDescriptor,
    ) -> EmptyResult;
}

/// Publisher for [`Notifications`](Notification) addressed to their designated topic
#[async_trait]
pub trait TopicPublisher {
    /// Publishes a [`Notification`] to its designated topic, returning the
    /// message identifier assigned by the transport
    async fn publish<N: Notification + Send + Sync>(
        &self,
        notification: &N,
        attributes: AttributeMap,
    ) -> Result<MessageId, BoxedError>;
}
