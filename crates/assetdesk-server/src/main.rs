mod app;
mod pages;

use anyhow::Context;
use assetdesk::Config;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config();

    info!("{} v{} starting...", config.project.name, config.project.version);

    info!(
        "Sections: {:?}, tablet band: {}-{}px",
        config.routing.sections, config.detection.tablet_min_width, config.detection.tablet_max_width
    );

    let app = app::build_app(&config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// Config file from ASSETDESK_CONFIG (default ./assetdesk.toml), then HOST/PORT overrides
fn load_config() -> Config {
    let loaded = match std::env::var("ASSETDESK_CONFIG") {
        Ok(path) => Config::load(&path),
        Err(_) => Config::load_default(),
    };

    let mut config = loaded.unwrap_or_else(|e| {
        warn!("Failed to load config: {:#}, using defaults", e);
        Config::default()
    });

    if let Ok(host) = std::env::var("HOST") {
        config.server.host = host;
    }

    if let Ok(port) = std::env::var("PORT") {
        match port.parse() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!("Ignoring invalid PORT value: {}", port),
        }
    }

    config
}
