//! Redirect rule lookup.
//!
//! # Responsibilities
//! - Store redirect rules in evaluation order
//! - Return the first rule whose matcher accepts the path
//! - Report an explicit no-match so the caller passes the request through
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan; the shipped interceptor carries a single rule

use crate::routing::matcher::{ExactPathMatcher, Matcher};
use crate::routing::target::RedirectTarget;

/// A (predicate, action) pair: requests matching `matcher` redirect to `target`.
#[derive(Debug)]
pub struct RedirectRule {
    /// Rule identifier for logging/metrics.
    pub name: String,
    matcher: Box<dyn Matcher>,
    target: RedirectTarget,
}

impl RedirectRule {
    pub fn new(name: impl Into<String>, matcher: Box<dyn Matcher>, target: RedirectTarget) -> Self {
        Self {
            name: name.into(),
            matcher,
            target,
        }
    }

    /// Rule redirecting exactly `path` to `target`.
    pub fn exact(name: impl Into<String>, path: impl Into<String>, target: RedirectTarget) -> Self {
        Self::new(name, Box::new(ExactPathMatcher::new(path)), target)
    }

    pub fn matches(&self, uri: &str) -> bool {
        self.matcher.matches(uri)
    }

    pub fn target(&self) -> &RedirectTarget {
        &self.target
    }
}

/// Ordered redirect rules. First match wins; no match means pass-through.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<RedirectRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule after all existing ones.
    pub fn with_rule(mut self, rule: RedirectRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Find the first rule matching `uri`.
    pub fn evaluate(&self, uri: &str) -> Option<&RedirectRule> {
        self.rules.iter().find(|rule| rule.matches(uri))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
