//! onedoc CLI
//!
//! Command-line entry point for the onedoc sync server.
//!
//! # Commands
//!
//! - `serve` - Run the HTTP server
//! - `version` - Show version information

mod settings;

use clap::{Parser, Subcommand};
use onedoc_server::{DocServer, ServerConfig};
use settings::{Settings, DEFAULT_SETTINGS_PATH};
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Single-document sync server.
#[derive(Parser)]
#[command(name = "onedoc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind
        #[arg(short, long)]
        bind: Option<IpAddr>,

        /// Store directory
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Settings file location
        #[arg(short, long, default_value = DEFAULT_SETTINGS_PATH)]
        settings: PathBuf,

        /// Backup interval in seconds
        #[arg(long)]
        backup_interval_secs: Option<u64>,

        /// Backup retention cap
        #[arg(long)]
        max_backups: Option<usize>,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Serve {
            port,
            bind,
            data_dir,
            settings,
            backup_interval_secs,
            max_backups,
        } => {
            info!(path = %settings.display(), "loading settings");
            let mut config = Settings::load(&settings)?.apply(ServerConfig::default());
            if let Some(port) = port {
                config.bind_addr.set_port(port);
            }
            if let Some(bind) = bind {
                config.bind_addr.set_ip(bind);
            }
            if let Some(data_dir) = data_dir {
                config.data_dir = data_dir;
            }
            if let Some(secs) = backup_interval_secs {
                config.backup_interval = Duration::from_secs(secs);
            }
            if let Some(max_backups) = max_backups {
                config.max_backups = max_backups;
            }

            DocServer::new(config)?.serve().await;
        }
        Commands::Version => {
            println!("onedoc CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
