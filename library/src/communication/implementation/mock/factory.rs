use super::{MockBroker, MockPublisher, MockQueueProvider, MockSubscriptionManager};
use crate::communication::CommunicationFactory;

/// Factory handing out mock implementations that share one [`MockBroker`]
#[derive(Clone, Default)]
pub struct MockCommunicationFactory {
    broker: MockBroker,
}

impl MockCommunicationFactory {
    /// Creates a new instance operating on the given broker
    pub fn new(broker: MockBroker) -> Self {
        Self { broker }
    }

    /// Broker shared by all implementations created by this factory
    pub fn broker(&self) -> &MockBroker {
        &self.broker
    }
}

impl CommunicationFactory for MockCommunicationFactory {
    type QueueProvider = MockQueueProvider;
    type NotificationPublisher = MockPublisher;
    type TopicPublisher = MockPublisher;
    type SubscriptionManager = MockSubscriptionManager;

    fn queue_provider(&self) -> Self::QueueProvider {
        MockQueueProvider::new(self.broker.clone())
    }

    fn notification_publisher(&self) -> Self::NotificationPublisher {
        MockPublisher::new(self.broker.clone())
    }

    fn topic_publisher(&self) -> Self::TopicPublisher {
        MockPublisher::new(self.broker.clone())
    }

    fn subscription_manager(&self) -> Self::SubscriptionManager {
        MockSubscriptionManager::new(self.broker.clone())
    }
}
