//! Order generator publishing to the orders topic at a fixed interval

mod jobs;
mod options;

use crate::metrics::MetricsServerJob;
use async_trait::async_trait;
use harness::{Heart, Module, ModuleTerminationReason};
use jatsl::{schedule, JobScheduler};
use jobs::OrderGeneratorJob;
use library::communication::event::Notification;
use library::metrics::MetricsRegistry;
use library::BoxedError;
use std::sync::Arc;
use tracing::{info, instrument};

pub use options::Options;

/// Module implementation
pub struct Producer {
    options: Options,
    registry: Arc<MetricsRegistry>,
}

impl Producer {
    /// Creates a new instance from raw parts
    pub fn new(options: Options) -> Self {
        Self {
            options,
            registry: Arc::new(MetricsRegistry::new()),
        }
    }
}

#[async_trait]
impl Module for Producer {
    #[instrument(skip(self, scheduler))]
    async fn run(&mut self, scheduler: &JobScheduler) -> Result<Option<Heart>, BoxedError> {
        info!(
            topic = %domain::event::OrderPlacedNotification::topic().key(),
            endpoint = %self.options.redis.url,
            interval = ?self.options.interval,
            "Starting order producer"
        );

        let generator = OrderGeneratorJob::new(
            self.options.redis.url.clone(),
            self.options.interval,
            self.registry.clone(),
        );
        let metrics = MetricsServerJob::new(self.options.metrics.port, self.registry.clone());

        schedule!(scheduler, { generator, metrics });

        Ok(Some(Heart::without_heart_stone()))
    }

    async fn post_shutdown(&mut self, _termination_reason: ModuleTerminationReason) {
        info!(
            published = self.registry.published_total(),
            failed = self.registry.publish_failures_total(),
            "Order production finished"
        );
    }
}
