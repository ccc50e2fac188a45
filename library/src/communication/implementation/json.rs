//! Serialization and deserialization provided by [`serde_json`] using marker traits
//!
//! This module allows implementors of traits that allow raw access to underlying messaging systems
//! to provide the higher-level traits relying on serialization. It does so by providing a number of
//! marker traits which, when implemented, provide default implementations of the higher-level traits
//! by translating between lower-level serialized data and higher-level strongly typed data by using
//! [`serde_json`]. In the future, this will allow for an easy exchange of serialization algorithms by
//! changing the marker traits.

use super::super::event::{
    AttributeMap, MessageId, Notification, NotificationPublisher, QueueDescriptor, QueueEntry,
    RawNotificationPublisher, RawQueueEntry, RawTopicPublisher, TopicPublisher,
};
use super::super::{decode, DecodeError, Delivery};
use crate::{BoxedError, EmptyResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Marker trait providing a default [`NotificationPublisher`] implementation based on [`serde_json`]
pub trait JsonNotificationPublisher: RawNotificationPublisher + Send + Sync {}

#[async_trait]
impl<P> NotificationPublisher for P
where
    P: JsonNotificationPublisher,
{
    /// Serializes the notification using [`serde_json::to_string`]
    async fn publish<N: Notification + Send + Sync>(
        &self,
        notification: &N,
        queue: QueueDescriptor,
    ) -> EmptyResult {
        let data = serde_json::to_string(notification)?;
        self.publish_raw(data.as_bytes(), queue).await
    }
}

/// Marker trait providing a default [`TopicPublisher`] implementation based on [`serde_json`]
pub trait JsonTopicPublisher: RawTopicPublisher + Send + Sync {}

#[async_trait]
impl<P> TopicPublisher for P
where
    P: JsonTopicPublisher,
{
    /// Serializes the notification using [`serde_json::to_string`]
    async fn publish<N: Notification + Send + Sync>(
        &self,
        notification: &N,
        attributes: AttributeMap,
    ) -> Result<MessageId, BoxedError> {
        let data = serde_json::to_string(notification)?;
        self.publish_raw(data.as_bytes(), &N::topic(), attributes)
            .await
    }
}

/// Marker trait providing a default [`QueueEntry`] implementation based on [`serde_json`]
pub trait JsonQueueEntry: RawQueueEntry {}

impl<E> QueueEntry for E
where
    E: JsonQueueEntry,
{
    /// Parses the payload using the [`envelope`](crate::communication::decode) codec
    fn parse_delivery<T>(&self) -> Result<Delivery<T>, DecodeError>
    where
        T: DeserializeOwned,
    {
        decode(self.payload())
    }
}
