use super::super::json::{JsonNotificationPublisher, JsonTopicPublisher};
use super::{RedisConnectionVariant, RedisFactory, FANOUT_QUEUE_LIMIT};
use super::{STREAM_ID_NEW, STREAM_PAYLOAD_KEY};
use crate::communication::event::{
    AttributeMap, MessageId, QueueDescriptor, RawNotificationPublisher, RawTopicPublisher,
    TopicDescriptor,
};
use crate::communication::DeliveryEnvelope;
use crate::{BoxedError, EmptyResult};
use async_trait::async_trait;
use redis::streams::StreamMaxlen;
use redis::AsyncCommands;

/// Multi-purpose publisher implementation using redis
///
/// - [`NotificationPublisher`](crate::communication::event::NotificationPublisher) implementation
///   writing directly into a stream using [`XADD`](https://redis.io/commands/xadd)
/// - [`TopicPublisher`](crate::communication::event::TopicPublisher) implementation wrapping the
///   payload in a [`DeliveryEnvelope`] and copying it into every subscribed stream
#[derive(Clone)]
pub struct RedisPublisher<F: RedisFactory> {
    factory: F,
}

impl<F> RedisPublisher<F>
where
    F: RedisFactory,
{
    /// Creates a new instance with a given [`RedisFactory`]
    pub fn new(factory: F) -> Self {
        Self { factory }
    }
}

impl<F> JsonNotificationPublisher for RedisPublisher<F> where F: RedisFactory + Send + Sync {}
impl<F> JsonTopicPublisher for RedisPublisher<F> where F: RedisFactory + Send + Sync {}

#[async_trait]
impl<F> RawNotificationPublisher for RedisPublisher<F>
where
    F: RedisFactory + Send + Sync,
{
    async fn publish_raw(&self, data: &[u8], descriptor: QueueDescriptor) -> EmptyResult {
        let limit = StreamMaxlen::Approx(descriptor.limit());

        let mut con = self
            .factory
            .connection(RedisConnectionVariant::Multiplexed)
            .await?;

        con.xadd_maxlen::<_, _, _, _, ()>(
            descriptor.key(),
            limit,
            STREAM_ID_NEW,
            &[(STREAM_PAYLOAD_KEY, data)],
        )
        .await?;

        Ok(())
    }
}

#[async_trait]
impl<F> RawTopicPublisher for RedisPublisher<F>
where
    F: RedisFactory + Send + Sync,
{
    async fn publish_raw(
        &self,
        data: &[u8],
        descriptor: &TopicDescriptor,
        attributes: AttributeMap,
    ) -> Result<MessageId, BoxedError> {
        let payload = std::str::from_utf8(data)?;
        let envelope = DeliveryEnvelope::wrap(descriptor.key(), payload, attributes);
        let encoded = envelope.encode()?;

        let mut con = self
            .factory
            .connection(RedisConnectionVariant::Multiplexed)
            .await?;

        let subscribers: Vec<String> = con.smembers(descriptor.subscription_key()).await?;

        for queue_key in subscribers {
            con.xadd_maxlen::<_, _, _, _, ()>(
                queue_key,
                StreamMaxlen::Approx(FANOUT_QUEUE_LIMIT),
                STREAM_ID_NEW,
                &[(STREAM_PAYLOAD_KEY, encoded.as_slice())],
            )
            .await?;
        }

        // `wrap` always assigns an identifier
        Ok(envelope.message_id.unwrap_or_default())
    }
}
