//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all redirect handler
//! - Wire up middleware (tracing, request ID, Server header)
//! - Serve plaintext and TLS listeners from one shared resolver
//! - Record per-request logs and metrics

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    response::Response,
    routing::any,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::HttpConfig;
use crate::http::request::{request_context, request_id, MakeUuidRequestId};
use crate::http::response::resolution_response;
use crate::lifecycle::ShutdownSignal;
use crate::net::ListenerError;
use crate::observability::metrics;
use crate::resolution::{Resolution, ResolveError, Resolver, Scheme};

/// How long in-flight TLS connections may drain after shutdown.
const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
    pub scheme: Scheme,
}

/// HTTP front end for the redirect resolver.
///
/// Cheap to clone; every listener gets its own router over the same resolver.
#[derive(Clone)]
pub struct HttpServer {
    resolver: Arc<Resolver>,
    server_header: HeaderValue,
}

impl HttpServer {
    /// Create a new HTTP server over a shared resolver.
    pub fn new(config: &HttpConfig, resolver: Arc<Resolver>) -> Self {
        let server_header = HeaderValue::from_str(&config.server_header).unwrap_or_else(|_| {
            tracing::warn!(server_header = %config.server_header, "Invalid Server header, using default");
            HeaderValue::from_static("TxtRedirector/1.0")
        });
        Self {
            resolver,
            server_header,
        }
    }

    /// Build the Axum router for a listener of the given scheme.
    pub fn router(&self, scheme: Scheme) -> Router {
        let state = AppState {
            resolver: self.resolver.clone(),
            scheme,
        };

        Router::new()
            .route("/{*path}", any(redirect_handler))
            .route("/", any(redirect_handler))
            .with_state(state)
            .layer(SetResponseHeaderLayer::overriding(
                header::SERVER,
                self.server_header.clone(),
            ))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeUuidRequestId))
            .layer(TraceLayer::new_for_http())
    }

    /// Serve plain HTTP on `listener` until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), ListenerError> {
        let addr = listener.local_addr().map_err(ListenerError::Serve)?;
        tracing::info!(address = %addr, scheme = "http", "HTTP server starting");

        let app = self.router(Scheme::Http);
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(shutdown.wait())
            .await
            .map_err(ListenerError::Serve)?;

        tracing::info!(address = %addr, "HTTP server stopped");
        Ok(())
    }

    /// Serve HTTPS on `addr` until `shutdown` fires.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        shutdown: ShutdownSignal,
    ) -> Result<(), ListenerError> {
        tracing::info!(address = %addr, scheme = "https", "HTTPS server starting");

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            shutdown.wait().await;
            drain.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
        });

        let app = self.router(Scheme::Https);
        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .map_err(ListenerError::Serve)?;

        tracing::info!(address = %addr, "HTTPS server stopped");
        Ok(())
    }
}

/// Catch-all handler: resolve the request and answer with a redirect or page.
async fn redirect_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let started = Instant::now();
    let request_id = request_id(&request).to_string();
    let method = request.method().clone();
    let context = request_context(state.scheme, &request);

    let resolution = state.resolver.resolve(&context).await;

    match &resolution {
        Resolution::Ignored => {}
        Resolution::Redirect(redirect) => {
            tracing::info!(
                request_id = %request_id,
                host = %context.host(),
                location = %redirect.location,
                source = redirect.source.label(),
                "Redirecting"
            );
        }
        Resolution::Page(err @ ResolveError::Render { .. }) => {
            tracing::error!(request_id = %request_id, host = %context.host(), error = %err, "Target rendering failed");
        }
        Resolution::Page(err @ ResolveError::DnsLookup { .. }) => {
            tracing::warn!(request_id = %request_id, host = %context.host(), error = %err, "TXT lookup failed");
        }
        Resolution::Page(err) => {
            tracing::info!(
                request_id = %request_id,
                host = %context.host(),
                outcome = err.label(),
                error = %err,
                "No redirect"
            );
        }
    }

    metrics::record_resolution(resolution.label(), started);
    resolution_response(&resolution, &method)
}
