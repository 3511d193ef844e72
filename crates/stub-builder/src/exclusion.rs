//! Exclusion set: member names that must never be auto-stubbed.
//!
//! Reading an excluded member that was never overridden or written behaves
//! like reading a member that does not exist. This keeps an instance from
//! looking like a promise (`then`) or from answering object-protocol probes
//! (`toString`, `__proto__`, `fmt`, ...) with a freshly minted double.

use crate::result::{StubError, StubResult};
use regex::Regex;
use std::fmt;

/// Thenable and future detection keys
pub const THENABLE_MEMBERS: &[&str] = &["then", "catch", "finally"];

/// JavaScript-style object protocol members
pub const OBJECT_PROTOCOL_MEMBERS: &[&str] = &[
    "constructor",
    "toString",
    "toLocaleString",
    "valueOf",
    "toJSON",
    "inspect",
    "asymmetricMatch",
    "nodeType",
    "$$typeof",
    "hasOwnProperty",
    "isPrototypeOf",
    "propertyIsEnumerable",
];

/// Rust-style protocol hooks (std trait methods and future polling)
pub const RUST_PROTOCOL_MEMBERS: &[&str] = &[
    "clone",
    "fmt",
    "eq",
    "ne",
    "hash",
    "drop",
    "to_string",
    "type_id",
    "poll",
];

/// Prefixes of well-known symbol keys
pub const SYMBOL_PREFIXES: &[&str] = &["@@", "Symbol("];

/// Prototype introspection dunders (`__proto__`, `__defineGetter__`, ...)
pub const DUNDER_PATTERN: &str = r"^__.*__$";

/// A single exclusion rule
#[derive(Clone)]
pub enum ExclusionRule {
    /// Exact member name
    Exact(String),
    /// Member name prefix
    Prefix(String),
    /// Regex over the member name
    Pattern(Regex),
}

impl ExclusionRule {
    /// Exact-name rule
    #[must_use]
    pub fn exact(name: impl Into<String>) -> Self {
        Self::Exact(name.into())
    }

    /// Prefix rule
    #[must_use]
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    /// Compile a regex rule
    pub fn pattern(pattern: &str) -> StubResult<Self> {
        Regex::new(pattern)
            .map(Self::Pattern)
            .map_err(|err| StubError::InvalidPattern {
                pattern: pattern.to_string(),
                message: err.to_string(),
            })
    }

    /// Check if a member name matches this rule
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(exact) => name == exact,
            Self::Prefix(prefix) => name.starts_with(prefix.as_str()),
            Self::Pattern(re) => re.is_match(name),
        }
    }
}

impl PartialEq for ExclusionRule {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) | (Self::Prefix(a), Self::Prefix(b)) => a == b,
            (Self::Pattern(a), Self::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl Eq for ExclusionRule {}

impl fmt::Debug for ExclusionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(name) => f.debug_tuple("Exact").field(name).finish(),
            Self::Prefix(prefix) => f.debug_tuple("Prefix").field(prefix).finish(),
            Self::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
        }
    }
}

impl fmt::Display for ExclusionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(name) => write!(f, "{name}"),
            Self::Prefix(prefix) => write!(f, "{prefix}*"),
            Self::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

/// Ordered collection of exclusion rules; first match wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    rules: Vec<ExclusionRule>,
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::defaults()
    }
}

impl ExclusionSet {
    /// Built-in defaults: thenable keys, object protocol members, Rust
    /// protocol hooks, symbol keys and prototype dunders
    #[must_use]
    pub fn defaults() -> Self {
        let exact = THENABLE_MEMBERS
            .iter()
            .chain(OBJECT_PROTOCOL_MEMBERS)
            .chain(RUST_PROTOCOL_MEMBERS)
            .map(|name| ExclusionRule::exact(*name));
        let prefixes = SYMBOL_PREFIXES.iter().map(|p| ExclusionRule::prefix(*p));

        let mut rules: Vec<ExclusionRule> = exact.chain(prefixes).collect();
        if let Ok(dunder) = ExclusionRule::pattern(DUNDER_PATTERN) {
            rules.push(dunder);
        }
        Self { rules }
    }

    /// No exclusions at all: every missing member is stubbed
    #[must_use]
    pub const fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Build from explicit rules
    #[must_use]
    pub fn from_rules(rules: impl IntoIterator<Item = ExclusionRule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Append a rule
    #[must_use]
    pub fn with_rule(mut self, rule: ExclusionRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append an exact-name rule
    #[must_use]
    pub fn with_exact(self, name: impl Into<String>) -> Self {
        self.with_rule(ExclusionRule::exact(name))
    }

    /// Append a prefix rule
    #[must_use]
    pub fn with_prefix(self, prefix: impl Into<String>) -> Self {
        self.with_rule(ExclusionRule::prefix(prefix))
    }

    /// Append a regex rule
    pub fn with_pattern(self, pattern: &str) -> StubResult<Self> {
        Ok(self.with_rule(ExclusionRule::pattern(pattern)?))
    }

    /// Drop exact-name rules for `name`; prefix and pattern rules stay
    #[must_use]
    pub fn without(mut self, name: &str) -> Self {
        self.rules
            .retain(|rule| !matches!(rule, ExclusionRule::Exact(exact) if exact == name));
        self
    }

    /// Check if a member name is excluded
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.rule_for(name).is_some()
    }

    /// First rule matching `name`
    #[must_use]
    pub fn rule_for(&self, name: &str) -> Option<&ExclusionRule> {
        self.rules.iter().find(|rule| rule.matches(name))
    }

    /// Iterate over rules in order
    pub fn iter(&self) -> impl Iterator<Item = &ExclusionRule> {
        self.rules.iter()
    }

    /// Number of rules
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no rules
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<ExclusionRule> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = ExclusionRule>>(iter: I) -> Self {
        Self::from_rules(iter)
    }
}

impl Extend<ExclusionRule> for ExclusionSet {
    fn extend<I: IntoIterator<Item = ExclusionRule>>(&mut self, iter: I) {
        self.rules.extend(iter);
    }
}
