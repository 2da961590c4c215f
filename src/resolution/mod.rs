//! Resolution subsystem.
//!
//! # Data Flow
//! ```text
//! RequestContext (scheme, host, path, query)
//!     → hostname.rs (grammar check, no DNS on failure)
//!     → engine.rs (lookup → parse → order → match → render)
//!     → outcome.rs (Redirect, or a ResolveError page)
//! ```
//!
//! # Design Decisions
//! - Every resolution is independent: no cache, no shared mutable state
//! - Failures are terminal for the request and never retried
//! - The DNS collaborator is injected, so the engine runs without a network

pub mod context;
pub mod engine;
pub mod hostname;
pub mod outcome;

pub use context::{RequestContext, Scheme};
pub use engine::{Resolver, ResolverOptions, DEFAULT_RECORD_PREFIX, FAVICON_PATH};
pub use hostname::is_valid_hostname;
pub use outcome::{Redirect, RedirectSource, Resolution, ResolveError};
