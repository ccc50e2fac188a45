use super::{RedisConnectionVariant, RedisFactory};
use crate::communication::event::{QueueDescriptor, SubscriptionManager, TopicDescriptor};
use crate::EmptyResult;
use async_trait::async_trait;
use redis::AsyncCommands;

/// Subscription manager storing the subscribed queue keys in a redis set
///
/// Since the keys live in a set, subscribing the same queue repeatedly
/// is idempotent.
#[derive(Clone)]
pub struct RedisSubscriptionManager<F: RedisFactory> {
    factory: F,
}

impl<F> RedisSubscriptionManager<F>
where
    F: RedisFactory,
{
    /// Creates a new instance with a given [`RedisFactory`]
    pub fn new(factory: F) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl<F> SubscriptionManager for RedisSubscriptionManager<F>
where
    F: RedisFactory + Send + Sync,
{
    async fn subscribe(&self, topic: &TopicDescriptor, queue: &QueueDescriptor) -> EmptyResult {
        let mut con = self
            .factory
            .connection(RedisConnectionVariant::Multiplexed)
            .await?;

        con.sadd::<_, _, ()>(topic.subscription_key(), queue.key())
            .await?;

        Ok(())
    }
}
