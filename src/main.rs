use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, warn};

use tag_catalog::catalog::{CatalogIndexer, CatalogLoader};
use tag_catalog::config::Config;
use tag_catalog::server::{self, AppState};
use tag_catalog::{logging, metrics};

#[derive(Parser)]
#[command(name = "tag_catalog")]
#[command(about = "Serve a read-only catalog of prompt tags stored as YAML files")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Root directory of the tag catalog
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the catalog and serve it over HTTP
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,

        /// URL prefix for the API and static assets
        #[arg(long)]
        prefix: Option<String>,

        /// Directory of static assets served under <prefix>/web
        #[arg(long)]
        web_dir: Option<PathBuf>,

        /// Expose Prometheus metrics on this address
        #[arg(long)]
        metrics_addr: Option<SocketAddr>,
    },
    /// Print the scanned catalog tree as JSON
    Tree,
    /// Print the normalized tags of one catalog file as JSON
    Tags {
        /// Path of the catalog file relative to the data directory
        file: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.catalog.data_dir = dir;
    }

    match cli.command {
        Commands::Serve {
            host,
            port,
            prefix,
            web_dir,
            metrics_addr,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(prefix) = prefix {
                config.server.prefix = prefix;
            }
            if let Some(dir) = web_dir {
                config.web.dir = dir;
            }
            config.validate()?;

            let _guard = logging::init_logging(&config.logging.dir);

            if let Some(addr) = metrics_addr {
                metrics::init_metrics(addr);
            }

            if !config.web.dir.is_dir() {
                warn!(
                    web_dir = %config.web.dir.display(),
                    "Static asset directory not found; <prefix>/web will answer 404"
                );
            }

            info!(data_dir = %config.catalog.data_dir.display(), "Scanning tag catalog");
            let state = AppState::from_config(&config.catalog);
            if state.tree.is_empty() {
                warn!("No catalog files found; /api/files will be empty");
            }

            server::start_server(
                state,
                config.socket_addr()?,
                &config.server.prefix,
                &config.web.dir,
            )
            .await?;
        }
        Commands::Tree => {
            config.validate()?;
            logging::init_console_logging();

            let tree = CatalogIndexer::new(&config.catalog.data_dir)
                .with_extension(config.catalog.extension.clone())
                .with_max_depth(config.catalog.max_depth)
                .build();
            println!("{}", serde_json::to_string_pretty(&tree)?);
        }
        Commands::Tags { file } => {
            config.validate()?;
            logging::init_console_logging();

            let records = CatalogLoader::new(&config.catalog.data_dir).load(&file)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }

    Ok(())
}
