//! Serve command - run the webhook listener until Ctrl-C

use crate::cli::context::ServerContext;
use tracing::{error, info};
use unir::error::Result;
use unir::webhook::router;

/// Bind the listener and serve webhooks until shutdown
pub async fn run_serve(ctx: ServerContext) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(ctx.addr).await?;
    info!(addr = %ctx.addr, "starting unir");

    axum::serve(listener, router(ctx.gateway))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("unir stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
}
