use std::time::Duration;

use clap::Parser;
use tankforge::prelude::*;
use tracing_subscriber::EnvFilter;

/// Tankforge card battle server.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Packs available for the lifetime of the server
    #[arg(long, default_value_t = 10)]
    packs: u32,

    /// Seconds a player has to submit a requested card
    #[arg(long, default_value_t = 10)]
    card_timeout_secs: u64,

    /// Pause between resolved rounds, in milliseconds
    #[arg(long, default_value_t = 1000)]
    round_delay_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), TankforgeError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let server = TankforgeServer::builder()
        .bind(&format!("{}:{}", args.host, args.port))
        .packs(PackConfig {
            inventory: args.packs,
            ..PackConfig::default()
        })
        .card_timeout(Duration::from_secs(args.card_timeout_secs))
        .round_delay(Duration::from_millis(args.round_delay_ms))
        .build()
        .await?;

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutdown signal received");
        })
        .await
}
