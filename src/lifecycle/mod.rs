//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → metrics → resolver → HTTP server → bind listeners
//!
//! Supervision (startup.rs):
//!     Each listener task → shared completion channel
//!     First exit before shutdown → fatal, process exits non-zero
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT → broadcast → listeners drain → exit 0
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners are independent; one failing stops the process
//! - Listeners start last (traffic only when ready)

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownSignal};
pub use startup::{run, serve, ListenerExit, ListenerSet, StartupError};
