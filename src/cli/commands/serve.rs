//! `serve` command: run the HTTP server.

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cli::args::ServeArgs;
use crate::config::load_config_or_default;
use crate::error::PomodError;
use crate::observability::init_metrics;
use crate::server::{ServeOptions, serve};

/// Load configuration and run the server until cancellation.
///
/// # Errors
///
/// Returns a configuration error for an unreadable or invalid config
/// file, and a server error if the bind address is invalid or taken.
pub async fn run(args: &ServeArgs, cancel: CancellationToken) -> Result<(), PomodError> {
    if let Some(port) = args.metrics_port {
        init_metrics(Some(port))?;
        info!(port, "Prometheus metrics endpoint started");
    }

    if let Some(path) = &args.config {
        info!(config = %path.display(), "loading configuration");
    }
    let config = load_config_or_default(args.config.as_deref())?;

    serve(ServeOptions {
        config,
        bind_override: args.bind.clone(),
        cancel,
    })
    .await
}
