//! Various options usable by modules
//!
//! The structs in this module allow other modules to flatten them into
//! their own options struct. This allows for a unified yet non-cluttered
//! option set.

use library::helpers::parse_seconds;
use std::time::Duration;
use structopt::StructOpt;

/// Options for connecting to the Redis server
#[derive(Debug, StructOpt)]
pub struct RedisOptions {
    /// Redis database server URL
    #[structopt(
        short = "r",
        long = "redis",
        env = "REDIS",
        global = true,
        default_value = "redis://orderflow-redis/",
        value_name = "url"
    )]
    pub url: String,
}

/// Options relevant for message queueing
#[derive(Debug, StructOpt)]
pub struct QueueingOptions {
    /// Unique and stable identifier for this instance.
    /// It is used to identify and resume work after a crash
    /// or deliberate restart, thus it may not change across
    /// executions!
    #[structopt(env)]
    pub id: String,

    /// Number of seconds a received queue entry stays invisible to other
    /// consumers before it is considered abandoned and redelivered
    #[structopt(long, env, default_value = "30", parse(try_from_str = parse_seconds))]
    pub visibility_timeout: Duration,
}

/// Options for the metrics scrape endpoint
#[derive(Debug, StructOpt)]
pub struct MetricsOptions {
    /// Port on which the Prometheus scrape endpoint is served
    #[structopt(long = "metrics-port", env = "METRICS_PORT", default_value = "8000")]
    pub port: u16,
}
