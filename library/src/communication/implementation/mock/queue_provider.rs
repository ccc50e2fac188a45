use super::super::json::JsonQueueEntry;
use super::MockBroker;
use crate::communication::event::{
    ConsumerGroupDescriptor, QueueDescriptor, QueueProvider, RawQueueEntry,
};
use crate::{BoxedError, EmptyResult};
use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Entry handed out by the [`MockQueueProvider`]
pub struct MockQueueEntry {
    payload: Vec<u8>,
    acknowledged: Arc<AtomicBool>,
}

#[async_trait]
impl RawQueueEntry for MockQueueEntry {
    fn payload(&self) -> &[u8] {
        &self.payload
    }

    async fn acknowledge(&mut self) -> EmptyResult {
        self.acknowledged.store(true, Ordering::SeqCst);
        Ok(())
    }
}

impl JsonQueueEntry for MockQueueEntry {}

/// Queue provider draining a [`MockBroker`] queue
///
/// The returned stream yields everything queued at the time of the call and
/// then stays pending forever, mirroring a transport that long-polls an empty
/// queue. Tests terminate the consumption through its shutdown future.
pub struct MockQueueProvider {
    broker: MockBroker,
}

impl MockQueueProvider {
    /// Creates a new instance draining the given broker
    pub fn new(broker: MockBroker) -> Self {
        Self { broker }
    }
}

#[async_trait]
impl QueueProvider for MockQueueProvider {
    type Entry = MockQueueEntry;

    async fn consume(
        &self,
        queue: QueueDescriptor,
        _group: &ConsumerGroupDescriptor,
        _consumer: &str,
        _batch_size: usize,
        _poll_timeout: Duration,
    ) -> Result<BoxStream<'static, Result<Self::Entry, BoxedError>>, BoxedError> {
        let entries: Vec<Result<MockQueueEntry, BoxedError>> = self
            .broker
            .take(queue.key())
            .into_iter()
            .map(|(payload, acknowledged)| {
                Ok(MockQueueEntry {
                    payload,
                    acknowledged,
                })
            })
            .collect();

        Ok(stream::iter(entries).chain(stream::pending()).boxed())
    }
}
