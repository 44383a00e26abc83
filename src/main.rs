use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use helio::{create_api_router, create_router, tui, version, AppState, Config, DataFile, StorePool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Personal bookmark manager backed by a single JSON file.
#[derive(Parser)]
#[command(name = "helio", version = version::LONG_VERSION)]
struct Cli {
    /// Port for the HTTP server (overrides BM_PORT).
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Path of the bookmark data file (overrides BM_DATA_PATH).
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the JSON API only.
    Api,
    /// Serve the JSON API and the web UI.
    Gui {
        /// Serve files from this directory for unmatched paths.
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// Run the terminal UI against the data file.
    Tui,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(port) = cli.port {
        config.server_port = port;
    }
    if let Some(data) = cli.data {
        config.data_path = data;
    }

    let (store, _actor) = StorePool::new(DataFile::new(&config.data_path));

    match cli.command {
        Command::Tui => {
            tui::run(store, &config).await?;
        }
        Command::Api => {
            let state = AppState {
                store,
                config: Arc::new(config.clone()),
            };
            serve(create_api_router(state), config.server_port).await?;
        }
        Command::Gui { static_dir } => {
            config.static_dir = static_dir;
            let state = AppState {
                store,
                config: Arc::new(config.clone()),
            };
            serve(create_router(state), config.server_port).await?;
        }
    }

    Ok(())
}

async fn serve(app: axum::Router, port: u16) -> std::io::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutting down");
}
