//! localchecker
//!
//! A static file server for local development that resolves
//! `<!--#include -->` directives and id placeholders in HTML.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server ──▶ content::loader ──▶ html? ──▶ content::resolver
//!                         │                                 │          (rewrite, includes,
//!                         │                                 │           id placeholders)
//!                         │                              asset? ──▶ content::rewrite
//!                         │                              other? ──▶ bytes as-is
//!     Client Response     ▼
//!     ◀────────────── 200 + Content-Type, or 404 "file not found"
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use localchecker::config::{load_config, validation::validate_config, ConfigError};
use localchecker::observability::init_logging;
use localchecker::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "localchecker")]
#[command(about = "Set up an http server", long_about = None)]
struct Cli {
    /// Config file
    #[arg(short, long, default_value = "localchecker.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start up the http server
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<String>,
    },
    /// Validate the config file and print it
    Check,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;

    match cli.command {
        Commands::Check => {
            println!("configFile: {}", cli.config.display());
            print!("{}", toml::to_string_pretty(&config)?);
        }
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
                validate_config(&config).map_err(ConfigError::Validation)?;
            }

            init_logging(&config.log_level);
            tracing::info!(
                config = %cli.config.display(),
                path_rules = config.path.len(),
                include_ids = config.include_id.len(),
                alternates = config.alternate.len(),
                "Configuration loaded"
            );

            let listener = TcpListener::bind(config.bind_address()).await?;
            tracing::info!("Server listening on http://localhost:{}/", config.port);

            let shutdown = Shutdown::new();
            shutdown.trigger_on_signal();

            let server = HttpServer::new(config)?;
            server.run(listener, shutdown.subscribe()).await?;

            tracing::info!("Shutdown complete");
        }
    }

    Ok(())
}
