/// Describes a fan-out topic to which queues may be subscribed
///
/// Publishing to a topic delivers a copy of the message to every subscribed
/// [`Queue`](super::QueueDescriptor). The set of subscriptions is persisted by
/// the backing implementation under the [`subscription_key`](TopicDescriptor::subscription_key).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicDescriptor {
    key: String,
}

impl TopicDescriptor {
    /// Creates a new instance from a raw key
    pub fn new<K: Into<String>>(key: K) -> Self {
        Self { key: key.into() }
    }

    /// Value which may be used by implementations to identify the topic
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Key under which the subscribed queues are stored
    pub fn subscription_key(&self) -> String {
        format!("{}.subscriptions", self.key)
    }
}
