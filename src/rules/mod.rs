//! Rule engine subsystem.
//!
//! # Data Flow
//! ```text
//! Raw TXT strings for one hostname
//!     → parser.rs (string → Rule, or discard)
//!     → ordering.rs (stable sort by order)
//!     → matcher.rs (compile pattern, capture groups against request URL)
//!     → template.rs (named + positional substitution into target)
//!     → Redirect location
//! ```
//!
//! # Design Decisions
//! - Rules are immutable once parsed
//! - Patterns compile lazily in evaluation order; a bad pattern halts the set
//! - Templates are trusted input, but rendered output must be a valid header value

pub mod matcher;
pub mod ordering;
pub mod parser;
pub mod template;

pub use matcher::{Captures, PatternMatcher};
pub use ordering::RuleSet;
pub use parser::{parse_rule, Rule, DEFAULT_ORDER};
pub use template::{render_target, RenderError};
