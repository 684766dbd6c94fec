//! Path matching logic.
//!
//! # Responsibilities
//! - Decide whether a viewer request path selects a redirect rule
//!
//! # Design Decisions
//! - Paths are compared as whole strings (no prefix, no pattern)
//! - Matching is case-sensitive and never normalizes trailing slashes
//! - No regex in the hot path

/// Trait for matching request paths against a condition.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, uri: &str) -> bool;
}

/// Matches one path exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactPathMatcher {
    path: String,
}

impl ExactPathMatcher {
    /// Create a new exact path matcher.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// The path this matcher accepts.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Matcher for ExactPathMatcher {
    fn matches(&self, uri: &str) -> bool {
        uri == self.path
    }
}
