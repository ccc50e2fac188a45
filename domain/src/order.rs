use chrono::{DateTime, Utc};
use library::communication::event::{AttributeMap, AttributeValue};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Order type attribute attached to every published order
pub const ORDER_TYPE: &str = "standard";

/// Lifecycle state of an [`Order`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order has been placed but not picked up by a processor yet
    Pending,
    /// Order has been picked up and is being worked on
    Processing,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
        }
    }
}

/// Priority derived from the value of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    /// Everyday order
    Normal,
    /// High-value order
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Validation failures of an [`Order`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// Orders without items can not be processed
    #[error("order contains no items")]
    EmptyItems,
}

/// Customer order travelling through the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier of the order
    pub order_id: String,
    /// Identifier of the customer who placed the order
    pub customer_id: String,
    /// Names of the ordered items, never empty for a valid order
    pub items: Vec<String>,
    /// Total monetary value of the order
    pub total_amount: Decimal,
    /// Current lifecycle state
    pub status: OrderStatus,
    /// Instant at which the order was placed
    pub timestamp: DateTime<Utc>,
    /// Instant at which processing began, if it has
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Ensures the order is well-formed enough to be processed
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.items.is_empty() {
            return Err(OrderError::EmptyItems);
        }

        Ok(())
    }

    /// Marks the order as being processed
    ///
    /// Idempotent so that redeliveries of an already processed order leave
    /// the original processing timestamp untouched.
    pub fn begin_processing(&mut self, now: DateTime<Utc>) {
        if self.status == OrderStatus::Processing {
            return;
        }

        self.status = OrderStatus::Processing;
        self.processed_at = Some(now);
    }

    /// Priority derived from the order value
    pub fn priority(&self) -> Priority {
        if self.total_amount >= Decimal::new(500, 0) {
            Priority::High
        } else {
            Priority::Normal
        }
    }

    /// Attributes attached to the order when it is published
    pub fn publish_attributes(&self) -> AttributeMap {
        let mut attributes = AttributeMap::new();
        attributes.insert("order_type".into(), AttributeValue::from(ORDER_TYPE));
        attributes.insert(
            "priority".into(),
            AttributeValue::from(self.priority().to_string()),
        );
        attributes
    }
}

/// Blueprint for generated orders
struct OrderTemplate {
    customer_id: &'static str,
    items: &'static [&'static str],
    total_cents: i64,
}

const TEMPLATES: [OrderTemplate; 5] = [
    OrderTemplate {
        customer_id: "CUST-001",
        items: &["Laptop", "Mouse"],
        total_cents: 120_000,
    },
    OrderTemplate {
        customer_id: "CUST-002",
        items: &["Keyboard", "Monitor"],
        total_cents: 45_000,
    },
    OrderTemplate {
        customer_id: "CUST-001",
        items: &["Headphones"],
        total_cents: 15_000,
    },
    OrderTemplate {
        customer_id: "CUST-003",
        items: &["Webcam", "Microphone"],
        total_cents: 20_000,
    },
    OrderTemplate {
        customer_id: "CUST-002",
        items: &["USB-C Hub"],
        total_cents: 7_500,
    },
];

/// Rotating generator yielding orders from a fixed template catalogue
#[derive(Default)]
pub struct OrderSequence {
    generated: usize,
}

impl OrderSequence {
    /// Creates a new sequence starting at `ORD-001`
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of orders generated so far
    pub fn generated(&self) -> usize {
        self.generated
    }

    /// Generates the next order, cycling through the template catalogue
    pub fn next_order(&mut self, now: DateTime<Utc>) -> Order {
        let template = &TEMPLATES[self.generated % TEMPLATES.len()];
        self.generated += 1;

        Order {
            order_id: format!("ORD-{:03}", self.generated),
            customer_id: template.customer_id.to_owned(),
            items: template.items.iter().map(|item| (*item).to_owned()).collect(),
            total_amount: Decimal::new(template.total_cents, 2),
            status: OrderStatus::Pending,
            timestamp: now,
            processed_at: None,
        }
    }
}

#[cfg(test)]
mod does {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn base_order(total_cents: i64) -> Order {
        Order {
            order_id: "ORD-001".into(),
            customer_id: "CUST-001".into(),
            items: vec!["Laptop".into()],
            total_amount: Decimal::new(total_cents, 2),
            status: OrderStatus::Pending,
            timestamp: Utc.ymd(2024, 3, 1).and_hms(12, 0, 0),
            processed_at: None,
        }
    }

    #[test]
    fn reject_orders_without_items() {
        let mut order = base_order(10_000);
        order.items.clear();

        assert_eq!(order.validate(), Err(OrderError::EmptyItems));
    }

    #[test]
    fn transition_idempotently_into_processing() {
        let mut order = base_order(10_000);

        let first = Utc.ymd(2024, 3, 1).and_hms(12, 0, 1);
        let second = Utc.ymd(2024, 3, 1).and_hms(12, 0, 5);

        order.begin_processing(first);
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.processed_at, Some(first));

        // A redelivered order keeps its original processing timestamp
        order.begin_processing(second);
        assert_eq!(order.processed_at, Some(first));
    }

    #[test]
    fn derive_priority_from_the_order_value() {
        assert_eq!(base_order(49_999).priority(), Priority::Normal);
        assert_eq!(base_order(50_000).priority(), Priority::High);
        assert_eq!(base_order(120_000).priority(), Priority::High);
    }

    #[test]
    fn attach_publish_attributes() {
        let attributes = base_order(120_000).publish_attributes();

        assert_eq!(
            attributes.get("order_type"),
            Some(&AttributeValue::from(ORDER_TYPE))
        );
        assert_eq!(attributes.get("priority"), Some(&AttributeValue::from("high")));
    }

    #[test]
    fn cycle_through_the_template_catalogue() {
        let mut sequence = OrderSequence::new();
        let now = Utc.ymd(2024, 3, 1).and_hms(12, 0, 0);

        let first = sequence.next_order(now);
        assert_eq!(first.order_id, "ORD-001");
        assert_eq!(first.customer_id, "CUST-001");
        assert_eq!(first.items, vec!["Laptop".to_owned(), "Mouse".to_owned()]);
        assert_eq!(first.total_amount, Decimal::new(120_000, 2));
        assert_eq!(first.status, OrderStatus::Pending);

        // Skip ahead to the sixth order which wraps around to the first template
        for _ in 0..4 {
            sequence.next_order(now);
        }

        let sixth = sequence.next_order(now);
        assert_eq!(sixth.order_id, "ORD-006");
        assert_eq!(sixth.customer_id, "CUST-001");
        assert_eq!(sixth.total_amount, Decimal::new(120_000, 2));
    }
}
