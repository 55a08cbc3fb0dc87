//! busmap client entry point.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Live bus-map feed client.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via BUSMAP_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize TLS crypto provider (must be before any WS connections)
    busmap_ws::init_crypto();

    let args = Args::parse();

    busmap_telemetry::init_logging()?;

    info!("Starting busmap v{}", env!("CARGO_PKG_VERSION"));

    // An explicit --config must exist; otherwise fall back through
    // BUSMAP_CONFIG and the default location to built-in defaults.
    let config = match args.config {
        Some(path) => {
            info!(config_path = %path, "Loading configuration");
            busmap_app::AppConfig::from_file(&path)?
        }
        None => busmap_app::AppConfig::load()?,
    };

    let app = busmap_app::Application::new(config);
    app.run().await?;

    Ok(())
}
