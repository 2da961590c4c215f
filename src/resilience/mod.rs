//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Resolver LOOKUP state:
//!     → timeouts.rs (deadline around the TXT lookup)
//!     → LookupError::Timeout on expiry
//! ```
//!
//! # Design Decisions
//! - The TXT lookup is the only unbounded wait in a resolution; it always has a deadline
//! - No retries: a failed lookup is terminal for that request

pub mod timeouts;
