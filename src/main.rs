//! Passthrough gateway binary

use anyhow::Context;
use clap::Parser;
use passthrough_gateway::config::Config;
use passthrough_gateway::server;
use passthrough_gateway::utils::logging::{LogFormat, init_tracing};
use std::path::PathBuf;
use std::process::ExitCode;

/// OpenAI-compatible passthrough gateway
#[derive(Debug, Parser)]
#[command(name = "gateway", version, about)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "GATEWAY_CONFIG", default_value = "config/gateway.yaml")]
    config: PathBuf,

    /// Override the bind host
    #[arg(long, env = "GATEWAY_HOST")]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long, env = "GATEWAY_PORT")]
    port: Option<u16>,

    /// Log output format
    #[arg(long, env = "GATEWAY_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load_or_default(&cli.config)
        .await
        .with_context(|| format!("loading {}", cli.config.display()))?;

    if let Some(host) = cli.host {
        config.gateway.server.host = host;
    }
    if let Some(port) = cli.port {
        config.gateway.server.port = port;
    }
    config.validate()?;

    server::builder::run_server(config).await?;
    Ok(())
}

#[actix_web::main]
async fn main() -> ExitCode {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.log_format, "info");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Display keeps multi-line bind errors readable
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
