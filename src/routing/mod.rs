//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Viewer request path
//!     → router.rs (rule lookup, in order)
//!     → matcher.rs (evaluate path condition)
//!     → Return: matched RedirectRule or None (pass-through)
//!
//! Rule compilation (at startup / reload):
//!     RedirectConfig
//!     → target.rs (build and validate ws:// URI)
//!     → Freeze as immutable RuleSet
//! ```
//!
//! # Design Decisions
//! - Rules compiled once, immutable at runtime
//! - Exact string comparison only
//! - Deterministic: same path always selects the same rule
//! - First match wins

pub mod matcher;
pub mod router;
pub mod target;

pub use matcher::{ExactPathMatcher, Matcher};
pub use router::{RedirectRule, RuleSet};
pub use target::{RedirectTarget, TargetError};
