use crate::options::{MetricsOptions, RedisOptions};
use library::helpers::parse_seconds;
use std::time::Duration;
use structopt::StructOpt;

/// Options for the producer module
#[derive(Debug, StructOpt)]
pub struct Options {
    #[allow(missing_docs)]
    #[structopt(flatten)]
    pub redis: RedisOptions,

    #[allow(missing_docs)]
    #[structopt(flatten)]
    pub metrics: MetricsOptions,

    /// Number of seconds between generated orders
    #[structopt(long, env, default_value = "2", parse(try_from_str = parse_seconds))]
    pub interval: Duration,
}
