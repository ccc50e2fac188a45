use super::event::{NotificationPublisher, QueueProvider, SubscriptionManager, TopicPublisher};

/// Factory to provide implementations for the traits from this module
pub trait CommunicationFactory {
    /// [`QueueProvider`] implementation type
    type QueueProvider: QueueProvider + Send + Sync;
    /// [`NotificationPublisher`] implementation type
    type NotificationPublisher: NotificationPublisher + Send + Sync;
    /// [`TopicPublisher`] implementation type
    type TopicPublisher: TopicPublisher + Send + Sync;
    /// [`SubscriptionManager`] implementation type
    type SubscriptionManager: SubscriptionManager + Send + Sync;

    /// Instantiates a new [`QueueProvider`]
    fn queue_provider(&self) -> Self::QueueProvider;
    /// Instantiates a new [`NotificationPublisher`]
    fn notification_publisher(&self) -> Self::NotificationPublisher;
    /// Instantiates a new [`TopicPublisher`]
    fn topic_publisher(&self) -> Self::TopicPublisher;
    /// Instantiates a new [`SubscriptionManager`]
    fn subscription_manager(&self) -> Self::SubscriptionManager;
}
