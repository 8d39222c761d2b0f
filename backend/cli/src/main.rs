mod config;
mod init_config_cmd;
mod repl_cmd;
mod status_cmd;
mod terminal_output;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use asmodeus_config::AsmodeusConfig;
use asmodeus_gateway::{build_router, start_server, GatewayState, SessionRegistry, TerminalHost};
use clap::{Parser, Subcommand};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Parser)]
#[command(name = "asmodeus")]
#[command(about = "Asmodeus - cryptic airline reservation terminal")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.asmodeus/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the terminal HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Interactive terminal on stdin
    Repl {
        /// Session id to use
        #[arg(short, long)]
        session: Option<String>,
    },
    /// Check whether a server is running
    Status,
    /// Write a config file with all defaults
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::InitConfig { force } = cli.command {
        let path = config::config_path(cli.config.as_deref());
        return init_config_cmd::run(&path, force).await;
    }

    let config = config::load(cli.config.as_deref()).await?;
    let log_dir = config.log_dir().map(PathBuf::as_path);
    asmodeus_logging::init_logger(log_dir, config.log_level(), config.log_json())?;

    match cli.command {
        Commands::Serve { port } => run_server(config, port).await?,
        Commands::Repl { session } => {
            let gateway = config::open_gateway(&config)?;
            let host = repl_cmd::local_host(config::build_processor(&config, gateway));
            let session = session.unwrap_or_else(|| format!("repl-{}", uuid::Uuid::new_v4()));
            repl_cmd::run(host, session).await?;
        }
        Commands::Status => status_cmd::run(config.bind_address(), config.port()).await?,
        Commands::InitConfig { .. } => {}
    }

    Ok(())
}

async fn run_server(config: AsmodeusConfig, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(config.port());
    let addr: SocketAddr = format!("{}:{}", config.bind_address(), port)
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_address()))?;
    info!(
        addr = %addr,
        storage = ?config.storage_backend(),
        db = ?config.db_path(),
        "Starting Asmodeus terminal server"
    );

    let gateway = config::open_gateway(&config)?;
    let processor = Arc::new(config::build_processor(&config, gateway));
    let registry = SessionRegistry::new();

    let ttl = config.idle_ttl_secs();
    let reaper = (ttl > 0).then(|| {
        registry.spawn_reaper(
            Duration::from_secs(ttl),
            Duration::from_secs(config.reap_interval_secs().max(1)),
        )
    });

    let host = Arc::new(TerminalHost::new(processor, registry));
    let app = build_router(GatewayState::new(host))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let result = start_server(addr, app).await;
    if let Some(reaper) = reaper {
        reaper.abort();
    }
    result
}
