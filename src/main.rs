//! VMS motion agent entry point.

use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vms_motion_agent::config::AgentConfig;
use vms_motion_agent::cursor::CursorState;
use vms_motion_agent::enum_resolver;
use vms_motion_agent::pipeline::VideoPipeline;
use vms_motion_agent::polling_orchestrator::PollingOrchestrator;
use vms_motion_agent::vms_client::VmsClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // LOGGING carries a plain severity name in existing deployments; full
    // EnvFilter directives pass through unchanged.
    let filter = std::env::var("LOGGING")
        .map(|level| level.to_lowercase())
        .unwrap_or_else(|_| "vms_motion_agent=info".into());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AgentConfig::parse();
    tracing::info!(
        vms_url = %config.vms_url,
        camera = %config.camera,
        "Starting VMS motion agent v{}",
        env!("CARGO_PKG_VERSION")
    );

    let client = Arc::new(VmsClient::new(
        config.vms_url.clone(),
        config.username.clone(),
        config.password.clone(),
    ));

    // Startup inventory: confirms connectivity and logs the GUIDs an
    // operator needs for --camera.
    let cameras = client.get_cameras().await?;
    tracing::info!(count = cameras.len(), cameras = ?cameras, "VMS cameras");

    let snapshot = client.camera_snapshot(&config.camera).await?;
    let snapshot_path = format!("camera-{}-snapshot.jpg", config.camera);
    tokio::fs::write(&snapshot_path, &snapshot).await?;
    tracing::info!(path = %snapshot_path, bytes = snapshot.len(), "Camera snapshot saved");

    // A schema without the motion codes is fatal; the loop must not start.
    let entities = client.get_enums().await?;
    let codes = enum_resolver::resolve(&entities)?;
    tracing::info!(
        motion_start = codes.motion_start,
        motion_end = codes.motion_end,
        "Motion event codes resolved"
    );

    let pipeline = VideoPipeline::new(client.clone(), config.download_dir.clone());
    let orchestrator = PollingOrchestrator::new(
        client,
        pipeline,
        codes,
        config.camera.clone(),
        chrono::Duration::minutes(config.lookback_minutes),
        std::time::Duration::from_secs(config.poll_interval_secs),
    );

    let mut cursor = CursorState::new();
    tokio::select! {
        _ = orchestrator.run(&mut cursor) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
