use clap::Parser;
use henshin::config::Config;
use std::path::PathBuf;

/// Henshin - HTTP image transformation service
#[derive(Parser, Debug)]
#[command(name = "henshin")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration, falling back to defaults when the file is absent
    let config = Config::load(&args.config).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });

    // Initialize logging subsystem
    henshin::logging::init_subscriber(config.logging.json)
        .expect("Failed to initialize logging subsystem");

    tracing::info!(
        config_file = %args.config.display(),
        server_address = %config.server.address,
        server_port = config.server.port,
        max_body_size = config.server.max_body_size,
        max_source_pixels = config.transform.max_source_pixels,
        "Configuration loaded successfully"
    );

    henshin::server::run(config).await
}
