//! Primitives for communication between services
//!
//! The system follows a publish and subscribe model. Whenever something
//! noteworthy happens, a notification describing the event is published to a
//! topic. The notification data structure implements the
//! [`Notification`](event::Notification) trait and thus describes where to
//! expect it in a type-safe manner. Topics fan notifications out to every
//! queue subscribed to them and interested services consume those queues
//! through [consumer groups](event::ConsumerGroupDescriptor), acknowledging
//! each entry once it has been fully processed.

mod communication_factory;
mod envelope;

pub mod event;
pub mod implementation;

pub use communication_factory::CommunicationFactory;
pub use envelope::{decode, DecodeError, Delivery, DeliveryEnvelope, DeliveryMetadata};
