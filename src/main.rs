use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use order_service::config::resolve_config;
use order_service::lifecycle::{self, signals, Shutdown};
use order_service::observability;

#[derive(Parser)]
#[command(name = "order-service")]
#[command(about = "Order API with structured file logging", long_about = None)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let port = std::env::var("PORT").ok();
    let config = resolve_config(args.config.as_deref(), port.as_deref())?;

    observability::tracing::init(&config.logging.console_filter);
    tracing::info!("order-service v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.server.bind_address,
        log_directory = %config.logging.directory.display(),
        max_file_size = config.logging.max_file_size,
        max_files = config.logging.max_files,
        "Configuration loaded"
    );

    let app = lifecycle::build(&config);

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    let local_addr = listener.local_addr()?;
    app.logger
        .info(format!("Server running on {}", local_addr), "BOOTSTRAP");

    let shutdown = Shutdown::new();
    let server = tokio::spawn(app.server.run(listener, shutdown.subscribe()));

    signals::wait_for_shutdown().await;
    app.logger.info("Shutting down", "BOOTSTRAP");
    shutdown.trigger();

    server.await??;
    tracing::info!("Shutdown complete");
    Ok(())
}
