//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use txt_redirector::config::HttpConfig;
use txt_redirector::dns::StaticTxtSource;
use txt_redirector::lifecycle::Shutdown;
use txt_redirector::resolution::{Resolver, ResolverOptions};
use txt_redirector::HttpServer;

/// A plaintext redirector serving a fixed TXT zone on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestServer {
    pub async fn start(source: StaticTxtSource) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let resolver = Arc::new(Resolver::new(Arc::new(source), ResolverOptions::default()));
        let server = HttpServer::new(&HttpConfig::default(), resolver);
        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, signal).await;
        });

        Self { addr, shutdown }
    }

    /// URL on the test server for `path_and_query`.
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
