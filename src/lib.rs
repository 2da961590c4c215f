//! HTTP redirector driven by DNS TXT records.
//!
//! Each request's host is looked up at `_tgt._redir.<host>`; the published
//! rules decide where the client is sent.

// Core subsystems
pub mod config;
pub mod dns;
pub mod http;
pub mod net;
pub mod resolution;
pub mod rules;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::schema::RedirectorConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use resolution::{RequestContext, Resolution, Resolver};
