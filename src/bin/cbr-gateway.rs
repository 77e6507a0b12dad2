use anyhow::Result;
use clap::Parser;
use tracing::info;

use cbr_gateway::config::loader::load_config;
use cbr_gateway::server::server;
use cbr_gateway::utils::logging::{self, LogLevel};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "cbr-gateway.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Read args, load YAML config
    // -------------------------------

    let args = Args::parse();
    let service_config = load_config(&args.config)?;
    logging::run(&service_config, args.log_level);

    // -------------------------------
    // 2. Start the gateway
    // -------------------------------

    info!("Service starting...");
    server::start(&service_config).await
}
