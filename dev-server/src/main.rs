//! Development server for the healthcare UI
//!
//! Runs the in-memory stub backend seeded with a small clinic: staff,
//! patients, an exercise plan, appointments and a conversation.
//!
//! Usage: cargo run -p dev-server
//!
//! `IP_ADDRESS`, `PORT` and `ALLOWED_ORIGINS` are read from the environment
//! (or a `.env` file); the port defaults to the one the UI expects.

use anyhow::Result;
use test_helpers::mock::DevDataset;
use test_helpers::stub::Config;
use test_helpers::telemetry;
use tracing::info;

/// Port the UI's default `API_BASE_URL` points at.
const DEFAULT_PORT: u16 = 12000;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_subscriber(telemetry::get_subscriber("info".into()))?;

    info!("🚀 Starting healthcare development server");

    let config = Config {
        port: DEFAULT_PORT,
        ..Config::default()
    }
    .with_env();
    let app = test_helpers::spawn_app_with_config(config);

    info!("✅ API server running on {}", app.api_address());

    info!("📊 Setting up development data...");
    let dataset = DevDataset::create(&app).await?;

    info!("🎯 Development server ready!");
    info!("   API: {}", app.api_address());
    info!(
        "   UI:  cd ui && API_BASE_URL={} trunk serve",
        app.api_address()
    );
    info!("");
    dataset.print_summary();
    info!("");
    info!("👋 Press Ctrl+C to shutdown");

    tokio::signal::ctrl_c().await?;
    info!("🛑 Shutting down development server");
    Ok(())
}
