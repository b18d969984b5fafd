//! relayq - Main Entry Point
//! HTTP submission API + queue dispatcher in one process

mod config;
mod telemetry;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

// Import workspace crates
use relayq_api_http::ApiServer;
use relayq_core::application::{
    failure_channel, shutdown_channel, Dispatcher, SubmissionService, Worker,
};
use relayq_core::port::id_provider::UuidProvider;
use relayq_core::port::time_provider::SystemTimeProvider;
use relayq_core::port::{FailureSink, QueueStore};
use relayq_infra_redis::RedisQueueStore;
use relayq_infra_system::{FileFailureSink, HttpUrlCaller};

use crate::config::DaemonConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upper bound on waiting for the HTTP server and failure log after the dispatcher stopped
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let config = DaemonConfig::from_env().context("Invalid configuration")?;

    // 2. Initialize logging
    let _log_guard = telemetry::init_tracing(&config)?;

    info!("relayq v{} starting...", VERSION);
    info!(
        redis_url = %config.redis_url,
        queue_key = %config.queue_key,
        failure_log = %config.failure_log.display(),
        max_attempts = config.max_attempts,
        retry_interval_ms = config.retry_interval.as_millis() as u64,
        max_in_flight = ?config.max_in_flight,
        "Configuration loaded"
    );

    // 3. Queue store (one shared handle for the whole process). It connects
    // on first use, so an unreachable Redis shows up as pop errors.
    let client =
        relayq_infra_redis::open_client(&config.redis_url).context("Invalid Redis URL")?;
    let queue: Arc<dyn QueueStore> =
        Arc::new(RedisQueueStore::new(client, config.queue_key.clone()));

    // 4. Failure log, owned by a single recorder task
    let sink: Arc<dyn FailureSink> = Arc::new(FileFailureSink::new(config.failure_log.clone()));
    let (failure_reporter, failure_recorder) = failure_channel(sink);
    let recorder_handle = failure_recorder.spawn();

    // 5. Setup dependencies (DI wiring)
    let retry_policy = Arc::new(config.retry_policy()?);
    let worker = Worker::new(
        Arc::new(HttpUrlCaller::new()),
        retry_policy,
        failure_reporter,
        Arc::new(SystemTimeProvider),
    );
    let dispatcher = Dispatcher::new(
        queue.clone(),
        worker,
        Arc::new(UuidProvider),
        config.dispatcher_config(),
    );

    let (shutdown_tx, shutdown_rx) = shutdown_channel();

    // 6. Start HTTP API
    info!("Starting HTTP server...");
    let submissions =
        Arc::new(SubmissionService::new(queue.clone()).with_list_limit(config.list_limit));
    let (addr, http_handle) = ApiServer::new(config.http.clone(), submissions)
        .start(shutdown_rx.clone())
        .await
        .context("HTTP server start failed")?;

    // 7. Start dispatcher (queue draining loop)
    info!("Starting dispatcher...");
    let dispatcher_handle = tokio::spawn(async move { dispatcher.run(shutdown_rx).await });

    info!(addr = %addr, "System ready. Waiting for URLs...");
    info!("Press Ctrl+C to shutdown");

    // 8. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 9. Graceful shutdown: dispatcher drains its workers, then the
    // recorder flushes once the last failure reporter is gone
    shutdown_tx.shutdown();

    match dispatcher_handle.await {
        Ok(stats) => info!(
            popped = stats.popped,
            idle_polls = stats.idle_polls,
            pop_errors = stats.pop_errors,
            panicked_workers = stats.panicked_workers,
            "Dispatcher finished"
        ),
        Err(e) => error!(error = ?e, "Dispatcher task failed"),
    }

    if tokio::time::timeout(SHUTDOWN_GRACE, http_handle).await.is_err() {
        warn!("HTTP server did not stop in time");
    }

    match tokio::time::timeout(SHUTDOWN_GRACE, recorder_handle).await {
        Ok(Ok(written)) => info!(written, "Failure log flushed"),
        Ok(Err(e)) => error!(error = ?e, "Failure recorder task failed"),
        Err(_) => warn!("Failure recorder did not finish in time"),
    }

    info!("Shutdown complete.");

    Ok(())
}
