//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Configured bind addresses
//!     → listener.rs (parse, bind plaintext TCP listener)
//!     → tls.rs (load certificate + key for the TLS listener)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Bind failures are fatal at startup
//! - TLS is optional and shares the resolver with the plaintext listener

pub mod listener;
pub mod tls;

pub use listener::{bind, parse_addr, ListenerError};
pub use tls::load_tls_config;
