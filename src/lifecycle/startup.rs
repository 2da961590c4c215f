//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize subsystems in dependency order (metrics, DNS, resolver)
//! - Bind the plaintext listener and, when configured, the TLS listener
//! - Supervise listeners until shutdown or the first listener failure
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Everything that can fail is loaded before the first listener is spawned
//! - A listener that exits on its own takes the process down with it

use std::future::Future;
use std::sync::Arc;

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};

use crate::config::RedirectorConfig;
use crate::dns::HickoryTxtSource;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::shutdown_signal;
use crate::net::{bind, load_tls_config, parse_addr, ListenerError};
use crate::observability::metrics::init_metrics;
use crate::resolution::{Resolver, ResolverOptions};

/// Fatal errors raised while starting or supervising the service.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("failed to install metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    /// A listener failed while serving.
    #[error("{name} listener failed: {source}")]
    ListenerFailed {
        name: &'static str,
        #[source]
        source: ListenerError,
    },

    /// A listener returned before shutdown was requested.
    #[error("{0} listener stopped unexpectedly")]
    ListenerStopped(&'static str),

    /// A listener task panicked or was cancelled.
    #[error("listener task aborted: {0}")]
    ListenerTask(#[from] JoinError),
}

/// How a listener task ended.
#[derive(Debug)]
pub struct ListenerExit {
    pub name: &'static str,
    pub result: Result<(), ListenerError>,
}

/// The set of running listener tasks.
#[derive(Default)]
pub struct ListenerSet {
    tasks: JoinSet<ListenerExit>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a listener task under `name`.
    pub fn spawn<F>(&mut self, name: &'static str, listener: F)
    where
        F: Future<Output = Result<(), ListenerError>> + Send + 'static,
    {
        self.tasks.spawn(async move {
            let result = listener.await;
            ListenerExit { name, result }
        });
    }

    /// Number of listeners still running.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for the next listener to exit. `None` once all have exited.
    pub async fn next_exit(&mut self) -> Option<Result<ListenerExit, JoinError>> {
        self.tasks.join_next().await
    }
}

/// Start the service from configuration and run until SIGINT or SIGTERM.
pub async fn run(config: RedirectorConfig) -> Result<(), StartupError> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        tls = config.listener.tls.is_some(),
        record_prefix = %config.dns.record_prefix,
        "Starting txt-redirector"
    );

    if config.observability.metrics_enabled {
        let addr = parse_addr(&config.observability.metrics_address)?;
        init_metrics(addr)?;
    }

    let source = HickoryTxtSource::from_config(&config.dns);
    let resolver = Arc::new(Resolver::new(
        Arc::new(source),
        ResolverOptions::from(&config.dns),
    ));

    serve(&config, resolver, shutdown_signal()).await
}

/// Bind the configured listeners and serve `resolver` until `stop` resolves.
///
/// Returns `Ok` after a requested stop once every listener has drained.
/// Returns an error if binding fails or a listener exits first.
pub async fn serve<F>(
    config: &RedirectorConfig,
    resolver: Arc<Resolver>,
    stop: F,
) -> Result<(), StartupError>
where
    F: Future<Output = ()>,
{
    let server = HttpServer::new(&config.http, resolver);

    let plain = bind(&config.listener.bind_address).await?;
    let tls = match &config.listener.tls {
        Some(tls_config) => {
            let addr = parse_addr(&tls_config.bind_address)?;
            Some((addr, load_tls_config(tls_config).await?))
        }
        None => None,
    };

    let shutdown = Shutdown::new();
    let mut listeners = ListenerSet::new();
    listeners.spawn("http", server.clone().run(plain, shutdown.subscribe()));
    if let Some((addr, rustls)) = tls {
        listeners.spawn("https", server.run_tls(addr, rustls, shutdown.subscribe()));
    }

    let outcome = tokio::select! {
        exit = listeners.next_exit() => Err(unexpected_exit(exit)),
        _ = stop => Ok(()),
    };

    shutdown.trigger();
    tracing::info!(remaining = listeners.len(), "Draining listeners");
    while let Some(exit) = listeners.next_exit().await {
        match exit {
            Ok(ListenerExit { name, result: Ok(()) }) => {
                tracing::debug!(listener = name, "Listener drained");
            }
            Ok(ListenerExit { name, result: Err(e) }) => {
                tracing::error!(listener = name, error = %e, "Listener failed during shutdown");
            }
            Err(e) => {
                tracing::error!(error = %e, "Listener task aborted during shutdown");
            }
        }
    }

    if outcome.is_ok() {
        tracing::info!("Shutdown complete");
    }
    outcome
}

fn unexpected_exit(exit: Option<Result<ListenerExit, JoinError>>) -> StartupError {
    match exit {
        Some(Ok(ListenerExit { name, result: Err(source) })) => {
            StartupError::ListenerFailed { name, source }
        }
        Some(Ok(ListenerExit { name, result: Ok(()) })) => StartupError::ListenerStopped(name),
        Some(Err(e)) => StartupError::ListenerTask(e),
        None => StartupError::ListenerStopped("every"),
    }
}
