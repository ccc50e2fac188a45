//! Structures to realise an event-driven service architecture
//!
//! In an event driven world, services have no knowledge of each other.
//! Each service operates independently and during the operation, certain
//! events occur. For each of these (that are of relevance to other services)
//! an event [`Notification`] is published to a [`Topic`](TopicDescriptor).
//! The topic fans the notification out to every [`Queue`](QueueDescriptor)
//! subscribed to it and every interested party may consume one of those
//! queues and process the entries.
//!
//! Notifications are consumed in a reliable and resilient way using a concept
//! called [`ConsumerGroups`](ConsumerGroupDescriptor). Instead of delivering
//! messages fire-and-forget to all connected services, they are stored in a
//! log-like data structure (usually of limited length where old elements are
//! evicted). Every entry has to be acknowledged once processing concludes and
//! entries that remain unacknowledged past their visibility timeout are handed
//! to another consumer. This yields at-least-once delivery: a notification may
//! be processed more than once but never silently lost, so consumers are
//! expected to be idempotent.
//!
//! Multiple [`Consumers`](ConsumerIdentifier) may share a
//! [`ConsumerGroup`](ConsumerGroupDescriptor). All participants in a group
//! then collectively process the incoming notification stream where each
//! notification is assigned to only one consumer within the group (effectively
//! implementing load balancing and simple, dynamic scalability).

mod attributes;
mod consumer;
mod consumer_group;
mod notification;
mod publisher;
mod queue;
mod queue_provider;
mod subscription;
mod topic;

pub use attributes::*;
pub use consumer::*;
pub use consumer_group::*;
pub use notification::*;
pub use publisher::*;
pub use queue::*;
pub use queue_provider::*;
pub use subscription::*;
pub use topic::*;
