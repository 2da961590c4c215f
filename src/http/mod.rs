//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, catch-all handler, Server header)
//!     → request.rs (request ID, RequestContext extraction)
//!     → resolution engine (redirect decision)
//!     → response.rs (302 or informational 200 page)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_context, MakeUuidRequestId, X_REQUEST_ID};
pub use response::resolution_response;
pub use server::HttpServer;
