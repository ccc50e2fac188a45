use async_trait::async_trait;
use chrono::Utc;
use domain::event::OrderPlacedNotification;
use domain::OrderConfirmation;
use harness::Service;
use library::communication::event::{Consumer, QueueDescriptor};
use library::communication::{CommunicationFactory, Delivery};
use library::EmptyResult;
use tracing::{debug, info};

/// Queue holding order notifications destined for customer confirmations
pub const NOTIFICATION_QUEUE: &str = "orders.notification";
const QUEUE_LIMIT: usize = 10_000;

/// Consumer dispatching an order confirmation for every incoming order
pub struct OrderConfirmationService;

impl<F> Service<F> for OrderConfirmationService
where
    F: CommunicationFactory + Send + Sync,
{
    const NAME: &'static str = "OrderConfirmationService";

    type Instance = OrderConfirmationService;
    type Config = ();

    fn instantiate(_factory: F, _config: &Self::Config) -> Self::Instance {
        Self
    }
}

#[async_trait]
impl Consumer for OrderConfirmationService {
    type Notification = OrderPlacedNotification;

    fn queue() -> QueueDescriptor {
        QueueDescriptor::new(NOTIFICATION_QUEUE, QUEUE_LIMIT)
    }

    async fn consume(&self, delivery: Delivery<Self::Notification>) -> EmptyResult {
        let order = delivery.into_inner().order;

        order.validate()?;

        let confirmation = OrderConfirmation::for_order(&order, Utc::now());

        info!(
            order_id = %order.order_id,
            to = %confirmation.to,
            subject = %confirmation.subject,
            "Dispatched order confirmation"
        );
        debug!(body = %confirmation.body, sent_at = %confirmation.sent_at, "Confirmation content");

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
            order_id: "ORD-002".into(),
            customer_id: "CUST-002".into(),
            items: vec!["Keyboard".into(), "Monitor".into()],
            total_amount: Decimal::new(45_000, 2),
            status: OrderStatus::Pending,
            timestamp: Utc.ymd(2024, 3, 1).and_hms(12, 0, 0),
            processed_at: None,
        }
    }

    #[tokio::test]
    async fn accept_direct_deliveries() {
        let service = OrderConfirmationService;
        let delivery = Delivery::Direct(OrderPlacedNotification::new(order()));

        service.consume(delivery).await.unwrap();
    }

    #[tokio::test]
    async fn confirm_and_acknowledge_published_orders() {
        let factory = MockCommunicationFactory::default();
        let registry = MetricsRegistry::new();

        factory
            .subscription_manager()
            .subscribe(
                &OrderPlacedNotification::topic(),
                &OrderConfirmationService::queue(),
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
            <OrderConfirmationService as Service<MockCommunicationFactory>>::instantiate(
                factory.clone(),
                &(),
            );

        service
            .consume_queue(
                factory.queue_provider(),
                &ConsumerGroupDescriptor::default(),
                "notifier-1",
                &registry,
                sleep(Duration::from_millis(50)),
            )
            .await
            .unwrap();

        assert_eq!(registry.processed_total(), 1);
        assert_eq!(factory.broker().unacknowledged(), 0);
    }
}
