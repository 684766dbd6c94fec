//! ws-edge-redirect
//!
//! Viewer-request interceptor for a CDN edge: `/api/v1/ws` is answered with a
//! `301` to the WebSocket backend, everything else passes through.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────┐
//!                        │               EDGE EMULATOR              │
//!     Client Request     │  ┌─────────┐    ┌─────────────┐          │
//!     ───────────────────┼─▶│  http   │───▶│ interceptor │          │
//!                        │  │ server  │    │  (routing)  │          │
//!                        │  └─────────┘    └──────┬──────┘          │
//!                        │                        │                 │
//!                        │         ┌──────────────┴─────────┐       │
//!                        │         ▼                        ▼       │
//!     301 Location ◀─────┼── redirect              pass-through ────┼──▶ Origin
//!                        └──────────────────────────────────────────┘
//!          │
//!          ▼
//!     ┌──────────────┐
//!     │ echo backend │  ws://<endpoint>/api/v1/ws
//!     └──────────────┘
//! ```

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use ws_edge_redirect::config::{
    load_with_overrides, ConfigError, ConfigWatcher, EdgeConfig, Overrides,
};
use ws_edge_redirect::http::{EchoServer, HttpServer};
use ws_edge_redirect::interceptor::Interceptor;
use ws_edge_redirect::lifecycle::{signals, Shutdown};
use ws_edge_redirect::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "ws-edge-redirect")]
#[command(
    about = "Edge interceptor redirecting WebSocket requests to a backend",
    long_about = None
)]
struct Cli {
    /// TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `redirect.endpoint` (backend host[:port]). Survives reloads.
    #[arg(short, long)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the edge emulator in front of the configured origin
    Serve {
        /// Reload the config file when it changes
        #[arg(long)]
        watch: bool,
    },
    /// Run the WebSocket echo backend
    Echo,
    /// Evaluate one edge event (JSON) from FILE or stdin and print the result
    Eval { file: Option<PathBuf> },
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            endpoint: self.endpoint.clone(),
        }
    }

    fn load(&self) -> Result<EdgeConfig, ConfigError> {
        load_with_overrides(self.config.as_deref(), &self.overrides())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.load()?;

    logging::init_logging(&config.observability.log_level);

    match &cli.command {
        Commands::Serve { watch } => serve(&cli, config, *watch).await,
        Commands::Echo => echo(config).await,
        Commands::Eval { file } => eval(&config, file.as_deref()),
    }
}

async fn serve(
    cli: &Cli,
    config: EdgeConfig,
    watch: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("ws-edge-redirect v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        endpoint = %config.redirect.endpoint,
        origin = ?config.origin.address,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // The watcher handle must outlive the server.
    let (_watcher, config_updates) = match (&cli.config, watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path, cli.overrides())
                .with_current(config.clone())
                .spawn()?;
            (Some(watcher), updates)
        }
        _ => {
            let (_, updates) = tokio::sync::mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn echo(config: EdgeConfig) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(&config.backend.bind_address).await?;
    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    EchoServer::new(&config.backend)
        .run(listener, shutdown.subscribe())
        .await?;
    Ok(())
}

fn eval(
    config: &EdgeConfig,
    file: Option<&std::path::Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let interceptor = Interceptor::from_config(&config.redirect)?;
    let output = interceptor.handle_event(serde_json::from_str(&input)?)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
