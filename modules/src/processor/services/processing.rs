use async_trait::async_trait;
use chrono::Utc;
use domain::event::OrderPlacedNotification;
use harness::Service;
use library::communication::event::{Consumer, QueueDescriptor};
use library::communication::{CommunicationFactory, Delivery};
use library::EmptyResult;
use tracing::{debug, info};

/// Queue holding order notifications destined for processing
pub const PROCESSING_QUEUE: &str = "orders.processing";
const QUEUE_LIMIT: usize = 10_000;

/// Consumer transitioning incoming orders into the processing state
pub struct OrderProcessingService;

impl<F> Service<F> for OrderProcessingService
where
    F: CommunicationFactory + Send + Sync,
{
    const NAME: &'static str = "OrderProcessingService";

    type Instance = OrderProcessingService;
    type Config = ();

    fn instantiate(_factory: F, _config: &Self::Config) -> Self::Instance {
        Self
    }
}

#[async_trait]
impl Consumer for OrderProcessingService {
    type Notification = OrderPlacedNotification;

    fn queue() -> QueueDescriptor {
        QueueDescriptor::new(PROCESSING_QUEUE, QUEUE_LIMIT)
    }

    async fn consume(&self, delivery: Delivery<Self::Notification>) -> EmptyResult {
        let mut order = delivery.into_inner().order;

        order.validate()?;

        info!(
            order_id = %order.order_id,
            customer = %order.customer_id,
            items = ?order.items,
            total = %order.total_amount,
            status = %order.status,
            "Processing order"
        );

        order.begin_processing(Utc::now());

        debug!(
            order_id = %order.order_id,
            processed_at = ?order.processed_at,
            "Order transitioned into processing"
        );

        Ok(())
    }
}

#[cfg(test)]
mod does {
    use super::*;
    use chrono::TimeZone;
    use domain::{Order, OrderStatus};
    use library::communication::event::{
        ConsumerExt, ConsumerGroupDescriptor, Notification, SubscriptionManager, TopicPublisher,
    };
    use library::communication::implementation::mock::MockCommunicationFactory;
    use library::metrics::MetricsRegistry;
    use rust_decimal::Decimal;
    use std::time::Duration;
    use tokio::time::sleep;

    fn order() -> Order {
        Order {
            order_id: "ORD-001".into(),
            customer_id: "CUST-001".into(),
            items: vec!["Laptop".into(), "Mouse".into()],
            total_amount: Decimal::new(120_000, 2),
            status: OrderStatus::Pending,
            timestamp: Utc.ymd(2024, 3, 1).and_hms(12, 0, 0),
            processed_at: None,
        }
    }

    #[tokio::test]
    async fn accept_direct_deliveries() {
        let service = OrderProcessingService;
        let delivery = Delivery::Direct(OrderPlacedNotification::new(order()));

        service.consume(delivery).await.unwrap();
    }

    #[tokio::test]
    async fn reject_orders_without_items() {
        let service = OrderProcessingService;
        let mut invalid = order();
        invalid.items.clear();

        let delivery = Delivery::Direct(OrderPlacedNotification::new(invalid));

        assert!(service.consume(delivery).await.is_err());
    }

    #[tokio::test]
    async fn process_and_acknowledge_published_orders() {
        let factory = MockCommunicationFactory::default();
        let registry = MetricsRegistry::new();

        factory
            .subscription_manager()
            .subscribe(
                &OrderPlacedNotification::topic(),
                &OrderProcessingService::queue(),
            )
            .await
            .unwrap();

        let notification = OrderPlacedNotification::new(order());
        factory
            .topic_publisher()
            .publish(&notification, notification.publish_attributes())
            .await
            .unwrap();

        let service =
            <OrderProcessingService as Service<MockCommunicationFactory>>::instantiate(
                factory.clone(),
                &(),
            );

        service
            .consume_queue(
                factory.queue_provider(),
                &ConsumerGroupDescriptor::default(),
                "processor-1",
                &registry,
                sleep(Duration::from_millis(50)),
            )
            .await
            .unwrap();

        assert_eq!(registry.received_total(), 1);
        assert_eq!(registry.processed_total(), 1);
        assert_eq!(registry.failed_total(), 0);
        assert_eq!(factory.broker().unacknowledged(), 0);
    }
}
