//! Gateway Info - enrichment filter for gateway pipeline events
//!
//! Reads newline-delimited JSON pipeline events from stdin, runs them
//! through the public gateway information hooks and writes enriched
//! uplink and status messages to stdout.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gateway_info::directory::{AccountServerDirectory, GatewayDirectory, InMemoryDirectory};
use gateway_info::models::PipelineEvent;
use gateway_info::{Config, GatewayInfoCache, PublicGatewayInfo};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging (stderr)
/// 2. Load configuration from environment variables
/// 3. Create the directory client and the rate-limited cache
/// 4. Process stdin until EOF or a shutdown signal
/// 5. Log cache statistics
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gateway_info=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting gateway info enrichment");

    let config = Config::from_env().context("invalid configuration")?;
    info!(
        "Configuration loaded: request_interval={}ms, request_burst={}, expire={}s",
        config.request_interval_ms, config.request_burst, config.expire_secs
    );

    let directory: Arc<dyn GatewayDirectory> = match &config.directory_file {
        Some(path) => {
            info!("Serving gateway records from {}", path);
            Arc::new(
                InMemoryDirectory::from_json_file(path)
                    .with_context(|| format!("failed to load gateway records from {path}"))?,
            )
        }
        None => {
            info!("Querying account server at {}", config.account_server);
            Arc::new(AccountServerDirectory::new(
                config.account_server.as_str(),
                config.directory_timeout(),
            )?)
        }
    };

    let hooks = PublicGatewayInfo::new(GatewayInfoCache::from_config(directory, &config));

    tokio::select! {
        result = process_events(&hooks) => result?,
        _ = shutdown_signal() => {}
    }

    let stats = hooks.cache().stats();
    info!(
        "Shutdown complete: entries={}, hits={}, misses={}, refreshes={}, fetched={}, failed={}",
        stats.total_entries,
        stats.hits,
        stats.misses,
        stats.refreshes,
        stats.fetch_successes,
        stats.fetch_failures
    );

    Ok(())
}

/// Dispatches every stdin line to the hooks, echoing enriched messages.
///
/// Malformed lines are logged and skipped.
async fn process_events(hooks: &PublicGatewayInfo) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event: PipelineEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(err) => {
                warn!(error = %err, "Skipping malformed event");
                continue;
            }
        };

        if let Some(enriched) = hooks.handle_event(event) {
            let mut output = serde_json::to_vec(&enriched)?;
            output.push(b'\n');
            stdout.write_all(&output).await?;
            stdout.flush().await?;
        }
    }

    info!("Input closed");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
