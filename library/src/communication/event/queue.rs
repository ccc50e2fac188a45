use super::super::{DecodeError, Delivery};
use crate::EmptyResult;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Describes a notification queue and its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueDescriptor {
    key: String,
    limit: usize,
}

impl QueueDescriptor {
    /// Creates a new instance from raw parts
    pub fn new<K: Into<String>>(key: K, limit: usize) -> Self {
        Self {
            key: key.into(),
            limit,
        }
    }

    /// Value which may be used by queue implementations to identify a queue
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Maximum number of notifications to be retained in the queue
    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// Location within the queue
#[derive(Debug, Clone)]
pub enum QueueLocation {
    /// Start of the queue (not necessarily the first notification as a queue is limited in length)
    Head,
    /// End of the queue (exclusive of the last message)
    Tail,
}

/// Entry retrieved from a [`Queue`](QueueDescriptor) providing a raw payload
#[async_trait]
pub trait RawQueueEntry {
    /// Payload of the item
    fn payload(&self) -> &[u8];

    /// Acknowledge the item as processed, removing it from the pending set
    async fn acknowledge(&mut self) -> EmptyResult;
}

/// Useful functions for [`QueueEntry`] implementations with default implementations
pub trait QueueEntry: RawQueueEntry {
    /// Attempts to parse the wire-format payload into a [`Delivery`],
    /// transparently unwrapping the fan-out envelope when one is present
    fn parse_delivery<T>(&self) -> Result<Delivery<T>, DecodeError>
    where
        T: DeserializeOwned;
}
