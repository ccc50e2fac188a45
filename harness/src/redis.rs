use async_trait::async_trait;
use futures::lock::Mutex;
use library::communication::implementation::redis::{
    RedisConnectionVariant, RedisFactory, RedisPublisher, RedisQueueProvider,
    RedisSubscriptionManager,
};
use library::communication::CommunicationFactory;
use library::BoxedError;
use redis::aio::MultiplexedConnection;
use redis::Client;
use std::sync::Arc;
use std::time::Duration;

/// Communication factory backed by a redis server
///
/// Owned connections are established fresh for every request while the
/// multiplexed variant is opened once and cloned for subsequent callers.
#[derive(Clone)]
pub struct RedisCommunicationFactory {
    url: String,
    visibility_timeout: Duration,
    shared: Arc<Mutex<Option<MultiplexedConnection>>>,
}

/// Visibility timeout applied when none has been configured explicitly
const DEFAULT_VISIBILITY_TIMEOUT: Duration = Duration::from_secs(30);

impl RedisCommunicationFactory {
    /// Creates a new instance which connects to the given URL
    pub fn new(url: String) -> Self {
        Self {
            url,
            visibility_timeout: DEFAULT_VISIBILITY_TIMEOUT,
            shared: Arc::new(Mutex::new(None)),
        }
    }

    /// Overrides the visibility timeout used by queue providers created from this factory
    pub fn with_visibility_timeout(self, visibility_timeout: Duration) -> Self {
        Self {
            visibility_timeout,
            ..self
        }
    }

    async fn connect(&self) -> Result<MultiplexedConnection, BoxedError> {
        let client = Client::open(self.url.as_str())?;
        Ok(client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl RedisFactory for RedisCommunicationFactory {
    async fn connection(
        &self,
        variant: RedisConnectionVariant,
    ) -> Result<MultiplexedConnection, BoxedError> {
        match variant {
            RedisConnectionVariant::Owned => self.connect().await,
            RedisConnectionVariant::Multiplexed => {
                let mut shared = self.shared.lock().await;

                if let Some(con) = &*shared {
                    return Ok(con.clone());
                }

                let con = self.connect().await?;
                *shared = Some(con.clone());

                Ok(con)
            }
        }
    }
}

impl CommunicationFactory for RedisCommunicationFactory {
    type QueueProvider = RedisQueueProvider<RedisCommunicationFactory>;
    type NotificationPublisher = RedisPublisher<RedisCommunicationFactory>;
    type TopicPublisher = RedisPublisher<RedisCommunicationFactory>;
    type SubscriptionManager = RedisSubscriptionManager<RedisCommunicationFactory>;

    fn queue_provider(&self) -> Self::QueueProvider {
        Self::QueueProvider::new(self.clone(), self.visibility_timeout)
    }

    fn notification_publisher(&self) -> Self::NotificationPublisher {
        Self::NotificationPublisher::new(self.clone())
    }

    fn topic_publisher(&self) -> Self::TopicPublisher {
        Self::TopicPublisher::new(self.clone())
    }

    fn subscription_manager(&self) -> Self::SubscriptionManager {
        Self::SubscriptionManager::new(self.clone())
    }
}
