use std::net::SocketAddr;

use chairspin::config::{self, Settings};
use chairspin::http::{self, AppState};
use chairspin::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let settings = Settings::from_env();
    tracing::info!(tracks = settings.tracks.len(), tick_ms = settings.tick.as_millis() as u64, "settings loaded");
    let state = AppState::new(config::store(), settings);
    let app = http::router(state);

    let addr: SocketAddr = config::server_addr();
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
