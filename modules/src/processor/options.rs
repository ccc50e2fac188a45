use crate::options::{MetricsOptions, QueueingOptions, RedisOptions};
use structopt::StructOpt;

/// Options for the processor module
#[derive(Debug, StructOpt)]
pub struct Options {
    #[allow(missing_docs)]
    #[structopt(flatten)]
    pub queueing: QueueingOptions,

    #[allow(missing_docs)]
    #[structopt(flatten)]
    pub redis: RedisOptions,

    #[allow(missing_docs)]
    #[structopt(flatten)]
    pub metrics: MetricsOptions,
}
