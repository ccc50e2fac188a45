use super::{ConsumerGroupDescriptor, Notification, QueueDescriptor};
use super::{QueueEntry, QueueProvider, RawQueueEntry};
use crate::communication::Delivery;
use crate::metrics::{MetricsEntry, MetricsRegistry};
use crate::EmptyResult;
use async_trait::async_trait;
use futures::{Future, StreamExt};
use std::any::type_name;
use std::time::{Duration, Instant};
use tracing::warn;

/// Number of entries to request from the transport per read
pub const DEFAULT_BATCH_SIZE: usize = 10;
/// Upper bound for a single long-poll attempt on an empty queue
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(20);

/// Entity which may consume and process [`Notifications`](Notification)
#[async_trait]
pub trait Consumer {
    /// Notification to consume
    type Notification: Notification;

    /// Queue from which instances of the notification are consumed
    fn queue() -> QueueDescriptor;

    /// Processes an event notification and returns whether it succeeded or failed
    ///
    /// Implementations are expected to be idempotent as redeliveries of
    /// already processed notifications may occur.
    async fn consume(&self, delivery: Delivery<Self::Notification>) -> EmptyResult;
}

/// Helper functions to aid the consumption of messages
#[async_trait]
pub trait ConsumerExt {
    /// Consumes notifications from a queue using the given provider and acknowledges
    /// those that have been successfully processed.
    ///
    /// Failed or undecodable entries are left unacknowledged so the transport
    /// redelivers them once their visibility timeout expires. The loop runs
    /// until the `shutdown` future resolves, at which point the entry currently
    /// being processed is completed before the function returns.
    async fn consume_queue<Q, F>(
        &self,
        provider: Q,
        group: &ConsumerGroupDescriptor,
        consumer: &str,
        registry: &MetricsRegistry,
        shutdown: F,
    ) -> EmptyResult
    where
        Q: QueueProvider + Send + Sync,
        F: Future<Output = ()> + Send;
}

#[async_trait]
impl<C> ConsumerExt for C
where
    C: Consumer + Send + Sync,
    C::Notification: Send + Sync,
{
    async fn consume_queue<Q, F>(
        &self,
        provider: Q,
        group: &ConsumerGroupDescriptor,
        consumer: &str,
        registry: &MetricsRegistry,
        shutdown: F,
    ) -> EmptyResult
    where
        Q: QueueProvider + Send + Sync,
        F: Future<Output = ()> + Send,
    {
        let queue = C::queue();
        let queue_key = queue.key().to_owned();

        let mut stream = provider
            .consume(queue, group, consumer, DEFAULT_BATCH_SIZE, DEFAULT_POLL_TIMEOUT)
            .await?;

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                item = stream.next() => match item {
                    Some(Ok(mut entry)) => {
                        registry.submit(MetricsEntry::NotificationReceived {
                            queue: queue_key.clone(),
                        });

                        let start = Instant::now();

                        match entry.parse_delivery::<C::Notification>() {
                            Ok(delivery) => match self.consume(delivery).await {
                                Ok(_) => {
                                    registry.submit(MetricsEntry::NotificationProcessed {
                                        queue: queue_key.clone(),
                                        duration: start.elapsed(),
                                    });

                                    if let Err(e) = entry.acknowledge().await {
                                        warn!(
                                            "Failed to acknowledge {}: {}",
                                            type_name::<C::Notification>(),
                                            e
                                        );
                                    }
                                }
                                Err(e) => {
                                    registry.submit(MetricsEntry::NotificationFailed {
                                        queue: queue_key.clone(),
                                    });

                                    warn!(
                                        "Failed to consume {}: {}",
                                        type_name::<C::Notification>(),
                                        e
                                    );
                                }
                            },
                            Err(e) => {
                                registry.submit(MetricsEntry::NotificationFailed {
                                    queue: queue_key.clone(),
                                });

                                warn!(
                                    "Failed to deserialize {}: {}",
                                    type_name::<C::Notification>(),
                                    e
                                );
                            }
                        }
                    }
                    Some(Err(e)) => warn!(
                        "Failed to receive notification {}: {}",
                        type_name::<C::Notification>(),
                        e
                    ),
                    None => return Err("queue entry stream terminated unexpectedly".into()),
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod does {
    use super::*;
    use crate::communication::event::{
        NotificationPublisher, SubscriptionManager, TopicDescriptor, TopicPublisher,
    };
    use crate::communication::implementation::mock::MockCommunicationFactory;
    use crate::communication::CommunicationFactory;
    use serde::{Deserialize, Serialize};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    const SHUTDOWN_AFTER: Duration = Duration::from_millis(50);

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct TestNotification {
        value: u32,
    }

    impl Notification for TestNotification {
        fn topic() -> TopicDescriptor {
            TopicDescriptor::new("test")
        }
    }

    #[derive(Default)]
    struct CountingConsumer {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Consumer for CountingConsumer {
        type Notification = TestNotification;

        fn queue() -> QueueDescriptor {
            QueueDescriptor::new("test.queue", 64)
        }

        async fn consume(&self, delivery: Delivery<Self::Notification>) -> EmptyResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(delivery.value, 42);

            if self.fail {
                Err("processing failed".into())
            } else {
                Ok(())
            }
        }
    }

    async fn publish(factory: &MockCommunicationFactory) {
        factory
            .subscription_manager()
            .subscribe(&TestNotification::topic(), &CountingConsumer::queue())
            .await
            .unwrap();

        TopicPublisher::publish(
            &factory.topic_publisher(),
            &TestNotification { value: 42 },
            Default::default(),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn process_and_acknowledge_published_notifications() {
        let factory = MockCommunicationFactory::default();
        let registry = MetricsRegistry::new();
        let consumer = CountingConsumer::default();

        publish(&factory).await;

        consumer
            .consume_queue(
                factory.queue_provider(),
                &ConsumerGroupDescriptor::default(),
                "consumer-1",
                &registry,
                sleep(SHUTDOWN_AFTER),
            )
            .await
            .unwrap();

        assert_eq!(consumer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(factory.broker().unacknowledged(), 0);
        assert_eq!(registry.received_total(), 1);
        assert_eq!(registry.processed_total(), 1);
        assert_eq!(registry.failed_total(), 0);
    }

    #[tokio::test]
    async fn process_directly_published_notifications() {
        struct DirectConsumer {
            calls: AtomicUsize,
        }

        #[async_trait]
        impl Consumer for DirectConsumer {
            type Notification = TestNotification;

            fn queue() -> QueueDescriptor {
                QueueDescriptor::new("test.queue", 64)
            }

            async fn consume(&self, delivery: Delivery<Self::Notification>) -> EmptyResult {
                self.calls.fetch_add(1, Ordering::SeqCst);

                // Queue writes bypassing the topic arrive without an envelope
                assert!(delivery.metadata().is_none());
                assert_eq!(delivery.value, 42);

                Ok(())
            }
        }

        let factory = MockCommunicationFactory::default();
        let registry = MetricsRegistry::new();
        let consumer = DirectConsumer {
            calls: AtomicUsize::new(0),
        };

        NotificationPublisher::publish(
            &factory.notification_publisher(),
            &TestNotification { value: 42 },
            DirectConsumer::queue(),
        )
        .await
        .unwrap();

        consumer
            .consume_queue(
                factory.queue_provider(),
                &ConsumerGroupDescriptor::default(),
                "consumer-1",
                &registry,
                sleep(SHUTDOWN_AFTER),
            )
            .await
            .unwrap();

        assert_eq!(consumer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(factory.broker().unacknowledged(), 0);
    }

    #[tokio::test]
    async fn leave_failed_entries_unacknowledged() {
        let factory = MockCommunicationFactory::default();
        let registry = MetricsRegistry::new();
        let consumer = CountingConsumer {
            fail: true,
            ..Default::default()
        };

        publish(&factory).await;

        consumer
            .consume_queue(
                factory.queue_provider(),
                &ConsumerGroupDescriptor::default(),
                "consumer-1",
                &registry,
                sleep(SHUTDOWN_AFTER),
            )
            .await
            .unwrap();

        assert_eq!(registry.failed_total(), 1);
        assert_eq!(factory.broker().unacknowledged(), 1);

        // Once the visibility timeout expires the entry becomes available again
        factory.broker().requeue_unacknowledged();
        assert_eq!(factory.broker().queue_len("test.queue"), 1);
    }

    #[tokio::test]
    async fn leave_undecodable_entries_unacknowledged() {
        let factory = MockCommunicationFactory::default();
        let registry = MetricsRegistry::new();
        let consumer = CountingConsumer::default();

        factory.broker().push("test.queue", b"not json".to_vec());

        consumer
            .consume_queue(
                factory.queue_provider(),
                &ConsumerGroupDescriptor::default(),
                "consumer-1",
                &registry,
                sleep(SHUTDOWN_AFTER),
            )
            .await
            .unwrap();

        assert_eq!(consumer.calls.load(Ordering::SeqCst), 0);
        assert_eq!(registry.failed_total(), 1);
        assert_eq!(factory.broker().unacknowledged(), 1);
    }

    #[tokio::test]
    async fn finish_cleanly_on_an_empty_queue() {
        let factory = MockCommunicationFactory::default();
        let registry = MetricsRegistry::new();
        let consumer = CountingConsumer::default();

        consumer
            .consume_queue(
                factory.queue_provider(),
                &ConsumerGroupDescriptor::default(),
                "consumer-1",
                &registry,
                sleep(SHUTDOWN_AFTER),
            )
            .await
            .unwrap();

        assert_eq!(registry.received_total(), 0);
    }
}
