//! Focusboard connect service entry point.

use std::sync::Arc;

use focusboard_api::{router, AppContext};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => warn!("no .env file found, relying on process environment"),
    }

    let config = focusboard_infra::config::load()?;
    let listen_addr = config.server.listen_addr.clone();

    let ctx = Arc::new(AppContext::new(config)?);
    let app = router(ctx);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    info!(%listen_addr, "focusboard connect service listening");
    axum::serve(listener, app).await?;

    Ok(())
}
