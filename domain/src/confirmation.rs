use crate::Order;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Confirmation message sent to a customer once their order has been processed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Message body
    pub body: String,
    /// Instant at which the confirmation was dispatched
    pub sent_at: DateTime<Utc>,
}

impl OrderConfirmation {
    /// Builds the confirmation for an order
    pub fn for_order(order: &Order, sent_at: DateTime<Utc>) -> Self {
        Self {
            to: format!("{}@example.com", order.customer_id),
            subject: format!("Order Confirmation - {}", order.order_id),
            body: format!(
                "Thank you for your order! Your order {} totaling ${} has been received and is being processed.",
                order.order_id, order.total_amount
            ),
            sent_at,
        }
    }
}

#[cfg(test)]
mod does {
    use super::*;
    use crate::OrderStatus;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    #[test]
    fn address_the_customer() {
        let order = Order {
            order_id: "ORD-007".into(),
            customer_id: "CUST-002".into(),
            items: vec!["Keyboard".into()],
            total_amount: Decimal::new(45_000, 2),
            status: OrderStatus::Processing,
            timestamp: Utc.ymd(2024, 3, 1).and_hms(12, 0, 0),
            processed_at: None,
        };

        let sent_at = Utc.ymd(2024, 3, 1).and_hms(12, 0, 2);
        let confirmation = OrderConfirmation::for_order(&order, sent_at);

        assert_eq!(confirmation.to, "CUST-002@example.com");
        assert_eq!(confirmation.subject, "Order Confirmation - ORD-007");
        assert!(confirmation.body.contains("ORD-007"));
        assert!(confirmation.body.contains("450.00"));
        assert_eq!(confirmation.sent_at, sent_at);
    }
}
