use async_trait::async_trait;
use chrono::Utc;
use domain::event::OrderPlacedNotification;
use domain::OrderSequence;
use harness::RedisCommunicationFactory;
use jatsl::Job;
use library::communication::event::{Notification, TopicPublisher};
use library::communication::CommunicationFactory;
use library::metrics::{MetricsEntry, MetricsRegistry};
use library::EmptyResult;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{error, info};

/// Job generating orders from the template catalogue at a fixed interval
///
/// Each order is published to the orders topic with its derived attributes.
/// A failed publish is dropped and counted, the next tick simply generates
/// a fresh order.
pub struct OrderGeneratorJob {
    redis_url: String,
    publish_interval: Duration,
    registry: Arc<MetricsRegistry>,
}

impl OrderGeneratorJob {
    /// Creates a new instance publishing through the given redis server
    pub fn new(redis_url: String, publish_interval: Duration, registry: Arc<MetricsRegistry>) -> Self {
        Self {
            redis_url,
            publish_interval,
            registry,
        }
    }
}

#[async_trait]
impl Job for OrderGeneratorJob {
    const NAME: &'static str = module_path!();
    const SUPPORTS_GRACEFUL_TERMINATION: bool = true;

    async fn execute(&self, manager: jatsl::JobManager) -> EmptyResult {
        let factory = RedisCommunicationFactory::new(self.redis_url.clone());
        let publisher = factory.topic_publisher();

        let topic = OrderPlacedNotification::topic().key().to_owned();
        let mut sequence = OrderSequence::new();
        let mut ticker = interval(self.publish_interval);

        let shutdown = manager.termination_signal();
        tokio::pin!(shutdown);

        manager.ready().await;

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    let notification = OrderPlacedNotification::new(sequence.next_order(Utc::now()));
                    let attributes = notification.publish_attributes();

                    let start = Instant::now();

                    match publisher.publish(&notification, attributes).await {
                        Ok(message_id) => {
                            self.registry.submit(MetricsEntry::NotificationPublished {
                                topic: topic.clone(),
                                duration: start.elapsed(),
                            });

                            info!(
                                order_id = %notification.order_id,
                                customer = %notification.customer_id,
                                total = %notification.total_amount,
                                priority = %notification.priority(),
                                %message_id,
                                "Published order"
                            );
                        }
                        Err(error) => {
                            self.registry.submit(MetricsEntry::PublishFailed {
                                topic: topic.clone(),
                            });

                            error!(?error, order_id = %notification.order_id, "Failed to publish order");
                        }
                    }
                }
            }
        }

        info!(generated = sequence.generated(), "Order generation stopped");

        Ok(())
    }
}
