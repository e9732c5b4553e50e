//! Server binary for docrelay.
//!
//! A thin shim over the library crate: map CLI flags and environment onto
//! [`AppConfig`], initialise logging, and serve.

use anyhow::Result;
use clap::Parser;
use docrelay::{serve, AppConfig};
use std::net::IpAddr;
use tracing_subscriber::EnvFilter;

/// Document-to-summary HTTP relay.
#[derive(Debug, Parser)]
#[command(name = "docrelay", version, about)]
struct Cli {
    /// Port to listen on.
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Log filter, e.g. "docrelay=debug,tower_http=info".
    #[arg(long, env = "RUST_LOG", default_value = "docrelay=info,tower_http=warn")]
    log: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log))
        .with_target(false)
        .init();

    let mut config = AppConfig::from_env();
    config.bind_addr = cli.bind;
    if let Some(port) = cli.port {
        config.port = port;
    }

    if !config.credential_configured() {
        tracing::warn!("OPENAI_API_KEY is not set; summarisation requests will fail");
    }

    serve(config).await?;
    Ok(())
}
