//! Path matching logic.
//!
//! # Responsibilities
//! - Match exact paths
//! - Match any-of path prefixes
//! - Exclude none-of path prefixes
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Path matching is case-sensitive plain string comparison
//! - Prefixes are not segment-aware: `/mcp/` matches `/mcp/x`, not `/mcp`
//! - Empty condition = always matches (wildcard)
//! - No regex to guarantee O(n) matching

use std::fmt;

/// Trait for matching request paths against conditions.
pub trait Matcher: Send + Sync + fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// Matches one exact path.
#[derive(Debug, Clone)]
pub struct ExactPathMatcher {
    path: String,
}

impl ExactPathMatcher {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Matcher for ExactPathMatcher {
    fn matches(&self, path: &str) -> bool {
        path == self.path
    }
}

/// Matches when the path starts with any of the prefixes.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefixes: Vec<String>,
}

impl PathPrefixMatcher {
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }
}

/// Matches when the path starts with none of the prefixes.
#[derive(Debug, Clone)]
pub struct ExcludePrefixMatcher {
    prefixes: Vec<String>,
}

impl ExcludePrefixMatcher {
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }
}

impl Matcher for ExcludePrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        !self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }
}

/// Combines multiple matchers with AND semantics.
#[derive(Debug)]
pub struct AndMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AndMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for AndMatcher {
    fn matches(&self, path: &str) -> bool {
        self.matchers.iter().all(|m| m.matches(path))
    }
}
