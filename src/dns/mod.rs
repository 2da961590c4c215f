//! DNS collaborator subsystem.
//!
//! # Data Flow
//! ```text
//! Resolver (query name `_tgt._redir.<host>`)
//!     → source.rs (TxtSource trait, LookupError)
//!     → hickory.rs (live lookups over the configured nameservers)
//!     → static_source.rs (in-memory zones for tooling and tests)
//!     → Vec<String> of TXT strings, order not guaranteed
//! ```
//!
//! # Design Decisions
//! - "No records" answers (NXDOMAIN, NODATA) are an empty set, not an error
//! - Multi-string TXT records are concatenated in wire order
//! - No caching and no retries: every request sends exactly one query

pub mod hickory;
pub mod source;
pub mod static_source;

pub use hickory::HickoryTxtSource;
pub use source::{LookupError, TxtSource};
pub use static_source::StaticTxtSource;
