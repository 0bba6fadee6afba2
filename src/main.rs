use std::sync::Arc;

use anyhow::Result;
use log::info;

use vigil::display::{ConsoleLog, NullScreen};
use vigil::{HttpGateway, SessionController};

/// Headless runner: connects to the backend, monitors until interrupted.
/// With no human at the prompt, significant events escalate automatically
/// when the countdown expires.
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let backend_url =
        std::env::var("VIGIL_BACKEND_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());
    info!("vigil starting up (backend: {backend_url})");

    let gateway = Arc::new(HttpGateway::new(backend_url));
    let session = SessionController::new(gateway, Arc::new(ConsoleLog), Arc::new(NullScreen));

    let status = session.start_live().await?;
    println!("Status: {status}");

    tokio::signal::ctrl_c().await?;
    info!("interrupt received, stopping live session");

    let status = session.stop_live().await?;
    println!("Status: {status}");
    Ok(())
}
