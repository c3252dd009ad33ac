//! feedgen - streaming feed generator
//!
//! `feedgen generate` builds one brand's feed and writes it to a file or
//! blob storage; `feedgen serve` exposes the same run as
//! `GET /generate-feed?brandId=<id>`.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::info;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use feedgen::services::{
    checked_brand_id, feed_filename, remote_destination, BlobStore, BunnyStorage, Destination,
    FeedPipeline,
};
use feedgen::AppState;
use feedgen_common::config::{resolve_config_path, TomlConfig};

/// Log filter in effect while the configuration itself is loading
const BOOTSTRAP_FILTER: &str = "feedgen=info,feedgen_common=info";

/// Command-line arguments for feedgen
#[derive(Parser, Debug)]
#[command(name = "feedgen")]
#[command(about = "Generate streaming platform feeds from a content catalog")]
#[command(version)]
struct Args {
    /// Configuration file (default: $FEEDGEN_CONFIG, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build one brand's feed
    Generate {
        /// Brand whose catalog is listed
        #[arg(short, long, env = "BRAND_ID")]
        brand_id: String,

        /// Write to this file (default: ./{brand_id}_roku_feed.json)
        #[arg(short, long, conflicts_with = "upload")]
        output: Option<PathBuf>,

        /// Upload to blob storage instead of writing a file
        #[arg(long)]
        upload: bool,
    },

    /// Run the HTTP service
    Serve {
        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the effective configuration with secrets redacted
    Config,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    let config = load_config(args.config.as_deref(), std::io::stdout)?;

    tracing_subscriber::registry()
        .with(env_filter(&config.logging.filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match resolve_config_path(args.config.as_deref()) {
        Some(path) => info!("Configuration: {}", path.display()),
        None => info!("Configuration: compiled defaults"),
    }

    match args.command {
        Command::Generate {
            brand_id,
            output,
            upload,
        } => generate(&config, &brand_id, output, upload).await,
        Command::Serve { port } => serve(&config, port).await,
        Command::Config => {
            print!("{}", config.to_redacted_toml()?);
            Ok(())
        }
    }
}

/// `RUST_LOG` when set, otherwise `fallback`
fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into())
}

/// Load configuration with a scoped subscriber so load warnings are not lost
///
/// The global subscriber can only be installed once the configured filter is known.
fn load_config<W>(path: Option<&Path>, make_writer: W) -> Result<TomlConfig>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let bootstrap = tracing_subscriber::registry()
        .with(env_filter(BOOTSTRAP_FILTER))
        .with(tracing_subscriber::fmt::layer().with_writer(make_writer));

    tracing::subscriber::with_default(bootstrap, || TomlConfig::load(path))
        .context("Failed to load configuration")
}

/// Blob store, when upload settings are complete
fn blob_store(config: &TomlConfig) -> Result<Option<Arc<dyn BlobStore>>> {
    if !config.storage.is_upload_configured() {
        return Ok(None);
    }
    let store = BunnyStorage::new(&config.storage).context("Failed to set up blob storage")?;
    Ok(Some(Arc::new(store)))
}

async fn generate(
    config: &TomlConfig,
    brand_id: &str,
    output: Option<PathBuf>,
    upload: bool,
) -> Result<()> {
    let brand_id = checked_brand_id(brand_id)?;

    let store = blob_store(config)?;
    if upload && store.is_none() {
        anyhow::bail!(
            "--upload needs storage.zone, storage.api_key and storage.cdn_base (or FEEDGEN_STORAGE_* variables)"
        );
    }

    let destination = if upload {
        remote_destination(&config.storage.path, brand_id, config.storage.timestamped_filenames)
    } else {
        Destination::File(output.unwrap_or_else(|| PathBuf::from(feed_filename(brand_id, false))))
    };

    let pipeline = FeedPipeline::from_config(config, store).context("Failed to set up pipeline")?;

    info!(brand_id = %brand_id, source = pipeline.source_name(), destination = %destination, "Generating feed");

    let published = pipeline
        .run(brand_id, &destination)
        .await
        .with_context(|| format!("Feed generation failed for brand {}", brand_id))?;

    let report = &published.report;
    println!("Feed written to {}", published.location);
    println!(
        "Assets: {}  Dropped: {}  Images rejected: {}",
        report.assets_emitted,
        report.dropped_total(),
        report.images_rejected
    );

    Ok(())
}

async fn serve(config: &TomlConfig, port: Option<u16>) -> Result<()> {
    let store = blob_store(config)?.context(
        "serve uploads every feed; configure storage.zone, storage.api_key and storage.cdn_base",
    )?;

    let pipeline = FeedPipeline::from_config(config, Some(store)).context("Failed to set up pipeline")?;
    let state = AppState::new(Arc::new(pipeline), config);
    let app = feedgen::build_router(state);

    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid server.host {}", config.server.host))?;
    let addr = SocketAddr::new(host, port.unwrap_or(config.server.port));

    info!("Starting feedgen {} on {}", env!("CARGO_PKG_VERSION"), addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
