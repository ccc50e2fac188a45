use super::super::json::{JsonNotificationPublisher, JsonTopicPublisher};
use super::MockBroker;
use crate::communication::event::{
    AttributeMap, MessageId, QueueDescriptor, RawNotificationPublisher, RawTopicPublisher,
    SubscriptionManager, TopicDescriptor,
};
use crate::communication::DeliveryEnvelope;
use crate::{BoxedError, EmptyResult};
use async_trait::async_trait;

/// Publisher writing into a [`MockBroker`]
///
/// Topic publishes wrap the payload in a [`DeliveryEnvelope`] just like the
/// redis implementation so consumers exercise the unwrap path in tests.
#[derive(Clone)]
pub struct MockPublisher {
    broker: MockBroker,
}

impl MockPublisher {
    /// Creates a new instance writing into the given broker
    pub fn new(broker: MockBroker) -> Self {
        Self { broker }
    }
}

impl JsonNotificationPublisher for MockPublisher {}
impl JsonTopicPublisher for MockPublisher {}

#[async_trait]
impl RawNotificationPublisher for MockPublisher {
    async fn publish_raw(&self, data: &[u8], descriptor: QueueDescriptor) -> EmptyResult {
        self.broker.push(descriptor.key(), data.to_vec());
        Ok(())
    }
}

#[async_trait]
impl RawTopicPublisher for MockPublisher {
    async fn publish_raw(
        &self,
        data: &[u8],
        descriptor: &TopicDescriptor,
        attributes: AttributeMap,
    ) -> Result<MessageId, BoxedError> {
        let payload = std::str::from_utf8(data)?;
        let envelope = DeliveryEnvelope::wrap(descriptor.key(), payload, attributes);

        self.broker.fan_out(descriptor.key(), &envelope.encode()?);

        Ok(envelope.message_id.unwrap_or_default())
    }
}

/// Subscription manager recording subscriptions in a [`MockBroker`]
#[derive(Clone)]
pub struct MockSubscriptionManager {
    broker: MockBroker,
}

impl MockSubscriptionManager {
    /// Creates a new instance operating on the given broker
    pub fn new(broker: MockBroker) -> Self {
        Self { broker }
    }
}

#[async_trait]
impl SubscriptionManager for MockSubscriptionManager {
    async fn subscribe(&self, topic: &TopicDescriptor, queue: &QueueDescriptor) -> EmptyResult {
        self.broker.subscribe(topic.key(), queue.key());
        Ok(())
    }
}
