use std::str::FromStr;
use structopt::StructOpt;

/// Format used for log output
#[derive(Debug)]
pub enum LogFormat {
    /// Human readable, one line per event
    Text,
    /// Condensed variant of the text format
    Compact,
    /// Newline-delimited JSON for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Top-level command line options
#[derive(Debug, StructOpt)]
#[structopt(name = "orderflow", about = "Publish/subscribe order pipeline")]
pub struct MainOptions {
    /// Log level filter directives (tracing env-filter syntax)
    #[structopt(long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log: String,

    /// Format used for log output
    #[structopt(long, env = "LOG_FORMAT", default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Port on which a job status server is exposed for health probes
    #[structopt(long, env = "STATUS_SERVER", global = true)]
    pub status_server: Option<u16>,

    /// Module to run
    #[structopt(subcommand)]
    pub command: Command,
}

/// Runnable modules
#[derive(Debug, StructOpt)]
pub enum Command {
    /// Generates orders and publishes them to the orders topic
    Producer(modules::producer::Options),
    /// Consumes the processing queue and transitions orders
    Processor(modules::processor::Options),
    /// Consumes the notification queue and dispatches confirmations
    Notifier(modules::notifier::Options),
}
