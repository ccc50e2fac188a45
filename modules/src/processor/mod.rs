//! Order processing consumer transitioning orders out of the pending state

mod options;
mod services;

use crate::metrics::MetricsServerJob;
use async_trait::async_trait;
use harness::{Heart, Module, ModuleTerminationReason, ServiceRunner};
use jatsl::{schedule, JobScheduler};
use library::communication::event::{
    ConsumerGroupDescriptor, ConsumerGroupIdentifier, QueueLocation,
};
use library::metrics::MetricsRegistry;
use library::BoxedError;
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub use options::Options;
use services::*;

/// Module implementation
pub struct Processor {
    options: Options,
    registry: Arc<MetricsRegistry>,
}

impl Processor {
    /// Creates a new instance from raw parts
    pub fn new(options: Options) -> Self {
        Self {
            options,
            registry: Arc::new(MetricsRegistry::new()),
        }
    }
}

#[async_trait]
impl Module for Processor {
    #[instrument(skip(self, scheduler))]
    async fn run(&mut self, scheduler: &JobScheduler) -> Result<Option<Heart>, BoxedError> {
        let group = ConsumerGroupDescriptor::new(
            ConsumerGroupIdentifier::Processor,
            QueueLocation::Head,
        );

        info!(
            queue = PROCESSING_QUEUE,
            consumer = %self.options.queueing.id,
            "Starting order processor"
        );

        let runner = ServiceRunner::<OrderProcessingService>::new(
            self.options.redis.url.clone(),
            group,
            self.options.queueing.id.clone(),
            self.options.queueing.visibility_timeout,
            self.registry.clone(),
            (),
        );

        let metrics = MetricsServerJob::new(self.options.metrics.port, self.registry.clone());

        debug!("Scheduling jobs");
        schedule!(scheduler, { runner, metrics });

        Ok(Some(Heart::without_heart_stone()))
    }

    async fn post_shutdown(&mut self, _termination_reason: ModuleTerminationReason) {
        info!(
            received = self.registry.received_total(),
            processed = self.registry.processed_total(),
            failed = self.registry.failed_total(),
            "Order processing finished"
        );
    }
}
