use anyhow::Context;
use seller::{app::SellerApp, config::AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env().context("invalid seller configuration")?;

    common::init_logger("seller", cfg.json_logs);
    tracing::info!("Starting seller agent...");

    let app = SellerApp::start(&cfg)
        .await
        .with_context(|| format!("seller failed to start on {}", cfg.listen_addr()))?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    app.stop().await;

    Ok(())
}
