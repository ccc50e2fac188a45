//! In-memory implementations for use in tests
//!
//! The [`MockBroker`] emulates the semantics of the redis backed transport:
//! queues retain their entries until acknowledged, topics fan out to
//! subscribed queues and unacknowledged entries can be requeued to exercise
//! redelivery behaviour.

mod broker;
mod factory;
mod publisher;
mod queue_provider;

pub use broker::*;
pub use factory::*;
pub use publisher::*;
pub use queue_provider::*;
