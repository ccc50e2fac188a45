use anyhow::Result;
use harness::ModuleRunner;
use modules::notifier::Notifier;
use modules::processor::Processor;
use modules::producer::Producer;
use options::{Command, LogFormat};
use structopt::StructOpt;
use tracing::info;

mod options;

#[tokio::main]
async fn main() -> Result<()> {
    let (command, runner) = init().await?;

    match command {
        Command::Producer(options) => runner.run(Producer::new(options)).await,
        Command::Processor(options) => runner.run(Processor::new(options)).await,
        Command::Notifier(options) => runner.run(Notifier::new(options)).await,
    };

    deinit();

    Ok(())
}

async fn init() -> Result<(options::Command, ModuleRunner)> {
    let options = options::MainOptions::from_args();

    let formatter = tracing_subscriber::fmt().with_env_filter(options.log);

    match options.log_format {
        LogFormat::Text => formatter.init(),
        LogFormat::Compact => formatter.compact().init(),
        LogFormat::Json => formatter.json().init(),
    };

    let runner = match options.status_server {
        Some(port) => ModuleRunner::new_with_status_server(port),
        None => ModuleRunner::default(),
    };

    info!("Orderflow {}", env!("CARGO_PKG_VERSION"));

    Ok((options.command, runner))
}

fn deinit() {}
