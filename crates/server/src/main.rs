use std::future::IntoFuture;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use hookcast_server::api::AppState;
use hookcast_server::config::HookcastConfig;

/// Hookcast webhook fan-out server.
#[derive(Parser, Debug)]
#[command(name = "hookcast", about = "Fan out chain events to subscribed webhooks")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "hookcast.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration from TOML file, or use defaults if the file does not exist.
    let config_found = Path::new(&cli.config).exists();
    let config: HookcastConfig = if config_found {
        let contents = std::fs::read_to_string(&cli.config)?;
        toml::from_str(&contents)?
    } else {
        toml::from_str("")?
    };

    hookcast_server::telemetry::init(&config.logging);

    if !config_found {
        info!(path = %cli.config, "config file not found, using defaults");
    }

    let dispatcher = hookcast_server::factory::create_dispatcher(&config).await?;
    let app = hookcast_server::api::router(AppState { dispatcher });

    // Resolve the bind address (CLI overrides take precedence).
    let host = cli.host.unwrap_or(config.server.host);
    let port = cli.port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "hookcast listening");

    // Serve with graceful shutdown on SIGINT / SIGTERM. In-flight dispatches
    // get `shutdown_timeout_seconds` to finish once the signal arrives.
    let (signalled_tx, mut signalled_rx) = tokio::sync::watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = signalled_tx.send(true);
    });

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);
    let drain_deadline = async move {
        if signalled_rx.changed().await.is_ok() {
            tokio::time::sleep(shutdown_timeout).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server.into_future() => result?,
        () = drain_deadline => {
            warn!(
                timeout_secs = config.server.shutdown_timeout_seconds,
                "shutdown timeout exceeded, abandoning in-flight deliveries"
            );
        }
    }

    info!("hookcast shut down");
    Ok(())
}

/// Wait for SIGINT (Ctrl+C) or SIGTERM, then return to trigger graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
