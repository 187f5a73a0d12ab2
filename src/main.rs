use clap::Parser;
use paste_ocr::config::{Args, Config};
use paste_ocr::server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from(args);

    tracing::info!("Starting paste-ocr-server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Gridline runs: at least {}px or {:.0}% of the side",
        config.grid_lines.min_run_px,
        config.grid_lines.run_ratio * 100.0
    );

    server::run(config).await
}
