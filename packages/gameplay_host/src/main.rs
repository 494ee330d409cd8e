use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;

mod config;
mod handlers;
mod store;
mod views;

use crate::config::FileConfig;
use crate::handlers::AppState;
use crate::store::GameStore;

#[derive(Parser)]
#[command(name = "gameplay-host")]
#[command(about = "Development host page for games embedded through the game bridge")]
struct Cli {
    /// Directory containing gameplay.toml (defaults to the current directory)
    #[arg(long, default_value = ".")]
    config_dir: PathBuf,

    /// Port for the web server (overrides gameplay.toml)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides gameplay.toml)
    #[arg(short = 'b', long)]
    host: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let default_directive = if cli.debug {
        "gameplay_host=debug,game_bridge=debug,tower_http=debug,info"
    } else {
        "gameplay_host=info,tower_http=info,warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .init();

    let mut file_config: FileConfig = config::load_config(&cli.config_dir)
        .extract()
        .context("Failed to load configuration")?;
    if let Some(port) = cli.port {
        file_config.server.port = port;
    }
    if let Some(host) = cli.host {
        file_config.server.host = host;
    }

    if file_config.games.is_empty() {
        warn!(
            "No games configured; add [[games]] entries to {}",
            cli.config_dir.join(config::CONFIG_FILE_NAME).display()
        );
    }
    if !file_config.server.assets_dir.exists() {
        warn!(
            "Bridge assets not found at {}; build game_bridge_web with wasm-pack first",
            file_config.server.assets_dir.display()
        );
    }

    let state = AppState {
        games: Arc::new(file_config.games.clone()),
        store: Arc::new(GameStore::new(file_config.limits.max_state_len)),
        bridge: Arc::new(file_config.bridge.clone()),
    };

    let app = handlers::create_router(state, &file_config.server.assets_dir)
        .layer(TraceLayer::new_for_http());

    let addr = file_config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let actual_addr = listener.local_addr()?;

    info!("Gameplay host listening on http://{}", actual_addr);
    info!(
        readiness = ?file_config.bridge.readiness,
        load_delay_ms = file_config.bridge.load_delay_ms,
        announce_absent = file_config.bridge.announce_absent,
        "Bridge configuration"
    );
    for game in file_config.games.iter() {
        info!("  http://{}/game/{}  {}", actual_addr, game.id, game.name);
    }

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}
