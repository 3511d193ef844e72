//! Factory configuration
//!
//! Exclusion sets can be described in YAML and loaded per factory:
//!
//! ```yaml
//! mode: extend        # or `replace`
//! exact: [render]
//! prefixes: [mock]
//! patterns: ["^on[A-Z]"]
//! remove: [then]
//! ```

use crate::exclusion::{ExclusionRule, ExclusionSet};
use crate::result::StubResult;
use serde::{Deserialize, Serialize};

/// How listed rules combine with the built-in defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExclusionMode {
    /// Start from the defaults, append listed rules, drop `remove` names
    #[default]
    Extend,
    /// Use only the listed rules; the defaults are discarded
    Replace,
}

/// Exclusion configuration for a factory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// Combination mode
    pub mode: ExclusionMode,
    /// Exact member names
    pub exact: Vec<String>,
    /// Member name prefixes
    pub prefixes: Vec<String>,
    /// Regex patterns over member names
    pub patterns: Vec<String>,
    /// Exact names removed from the defaults (extend mode)
    pub remove: Vec<String>,
}

impl FactoryConfig {
    /// Create an empty config (extend mode, nothing added)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from YAML
    pub fn from_yaml(yaml: &str) -> StubResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> StubResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Set combination mode
    #[must_use]
    pub const fn with_mode(mut self, mode: ExclusionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Add an exact name
    #[must_use]
    pub fn with_exact(mut self, name: impl Into<String>) -> Self {
        self.exact.push(name.into());
        self
    }

    /// Add a prefix
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Add a regex pattern
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    /// Remove a default exact name
    #[must_use]
    pub fn with_removed(mut self, name: impl Into<String>) -> Self {
        self.remove.push(name.into());
        self
    }

    /// Build the exclusion set this config describes
    pub fn exclusions(&self) -> StubResult<ExclusionSet> {
        let base = match self.mode {
            ExclusionMode::Extend => ExclusionSet::defaults(),
            ExclusionMode::Replace => ExclusionSet::empty(),
        };

        let mut set = self
            .remove
            .iter()
            .fold(base, |set, name| set.without(name));

        set.extend(self.exact.iter().map(ExclusionRule::exact));
        set.extend(self.prefixes.iter().map(ExclusionRule::prefix));
        for pattern in &self.patterns {
            set = set.with_pattern(pattern)?;
        }
        Ok(set)
    }
}
