use crate::Order;
use library::communication::event::{Notification, TopicDescriptor};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Notification published whenever a new [`Order`] has been placed
///
/// The order fields are flattened into the top level of the serialized
/// document, matching the wire format consumers of the `orders` topic expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPlacedNotification {
    /// The order that was placed
    #[serde(flatten)]
    pub order: Order,
}

impl OrderPlacedNotification {
    /// Creates a new instance for a given order
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}

impl Deref for OrderPlacedNotification {
    type Target = Order;

    fn deref(&self) -> &Self::Target {
        &self.order
    }
}

impl Notification for OrderPlacedNotification {
    fn topic() -> TopicDescriptor {
        TopicDescriptor::new("orders")
    }
}

#[cfg(test)]
mod does {
    use super::*;
    use crate::OrderStatus;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    #[test]
    fn flatten_the_order_into_the_top_level() {
        let notification = OrderPlacedNotification::new(Order {
            order_id: "ORD-001".into(),
            customer_id: "CUST-001".into(),
            items: vec!["Laptop".into()],
            total_amount: Decimal::new(120_000, 2),
            status: OrderStatus::Pending,
            timestamp: Utc.ymd(2024, 3, 1).and_hms(12, 0, 0),
            processed_at: None,
        });

        let value = serde_json::to_value(&notification).unwrap();

        assert_eq!(value["order_id"], "ORD-001");
        assert_eq!(value["status"], "pending");
        assert!(value.get("order").is_none());
    }

    #[test]
    fn publish_on_the_orders_topic() {
        assert_eq!(OrderPlacedNotification::topic().key(), "orders");
    }
}
