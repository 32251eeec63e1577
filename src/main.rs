//! Wheelglide daemon entry point

use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wheelglide::{hook, Config, ScrollHandler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wheelglide=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting wheelglide v{}", env!("CARGO_PKG_VERSION"));

    // Optional config file path as the only argument; defaults otherwise.
    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    let handler = ScrollHandler::new(config, hook::platform_backend(), hook::platform_sink());
    handler.start()?;
    tracing::info!("Smoothing active; press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    handler.stop();
    Ok(())
}
