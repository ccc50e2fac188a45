use super::RedisCommunicationFactory;
use async_trait::async_trait;
use jatsl::{Job, JobManager};
use library::communication::event::{
    Consumer, ConsumerExt, ConsumerGroupDescriptor, Notification, SubscriptionManager,
};
use library::communication::CommunicationFactory;
use library::metrics::MetricsRegistry;
use library::EmptyResult;
use std::sync::Arc;
use std::time::Duration;

/// Structure which can be instantiated with a [`CommunicationFactory`]
pub trait Service<F: CommunicationFactory + Send + Sync> {
    /// Name of the service displayed in log messages
    const NAME: &'static str;
    /// Instance type which will be instantiated
    type Instance: Send + Sync;
    /// Configuration type passed to the service
    type Config: Send + Sync;

    /// Creates a new instance which could be of a different type,
    /// e.g. a wrapper attaching additional behaviour around `Self`
    fn instantiate(factory: F, config: &Self::Config) -> Self::Instance;
}

/// Runner for [`Service`] implementations where [`Service::Instance`] is a [`Consumer`]
///
/// Subscribes the consumer's queue to the notification topic, instantiates
/// the service and drives the consume/acknowledge loop until the job manager
/// requests termination. Errors bubble up to the scheduler which restarts
/// the job, covering transient transport failures.
pub struct ServiceRunner<S: Service<RedisCommunicationFactory>> {
    redis_url: String,
    group: ConsumerGroupDescriptor,
    consumer: String,
    visibility_timeout: Duration,
    registry: Arc<MetricsRegistry>,
    config: <S as Service<RedisCommunicationFactory>>::Config,
}

impl<S> ServiceRunner<S>
where
    S: Service<RedisCommunicationFactory>,
    S::Instance: Consumer + Send + Sync,
{
    /// Creates a new runner job which will connect to the given redis server and use the provided consumer group and name.
    pub fn new(
        redis_url: String,
        group: ConsumerGroupDescriptor,
        consumer: String,
        visibility_timeout: Duration,
        registry: Arc<MetricsRegistry>,
        config: <S as Service<RedisCommunicationFactory>>::Config,
    ) -> Self {
        Self {
            redis_url,
            group,
            consumer,
            visibility_timeout,
            registry,
            config,
        }
    }
}

#[async_trait]
impl<S> Job for ServiceRunner<S>
where
    S: Service<RedisCommunicationFactory> + Send + Sync,
    S::Instance: Consumer + Send + Sync,
    <S::Instance as Consumer>::Notification: Send + Sync,
{
    const NAME: &'static str = "ServiceRunner";
    const SUPPORTS_GRACEFUL_TERMINATION: bool = true;

    fn name(&self) -> String {
        format!("{}({})", Self::NAME, S::NAME)
    }

    async fn execute(&self, manager: JobManager) -> EmptyResult {
        let factory = RedisCommunicationFactory::new(self.redis_url.clone())
            .with_visibility_timeout(self.visibility_timeout);
        let provider = factory.queue_provider();

        // Make sure the fan-out reaches our queue before the first publish we observe
        factory
            .subscription_manager()
            .subscribe(
                &<S::Instance as Consumer>::Notification::topic(),
                &<S::Instance as Consumer>::queue(),
            )
            .await?;

        let service = S::instantiate(factory, &self.config);

        manager.ready().await;

        service
            .consume_queue(
                provider,
                &self.group,
                &self.consumer,
                &self.registry,
                manager.termination_signal(),
            )
            .await?;

        Ok(())
    }
}
