//! Construction-time overrides

use crate::value::Member;
use indexmap::IndexMap;
use std::any::Any;

/// Members installed when an instance is created.
///
/// Overridden members are never replaced by auto-generated stubs and stay
/// writable afterwards. Cloning is shallow: plain values are shared handles.
#[derive(Debug, Clone)]
pub struct Overrides<S> {
    members: IndexMap<String, Member<S>>,
}

impl<S> Default for Overrides<S> {
    fn default() -> Self {
        Self {
            members: IndexMap::new(),
        }
    }
}

impl<S> Overrides<S> {
    /// No overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override a member with a plain value
    #[must_use]
    pub fn value<T: Any>(self, name: impl Into<String>, value: T) -> Self {
        self.member(name, Member::value(value))
    }

    /// Override a member with a caller-built test double
    #[must_use]
    pub fn stub(self, name: impl Into<String>, stub: S) -> Self {
        self.member(name, Member::Stub(stub))
    }

    /// Override a member
    #[must_use]
    pub fn member(mut self, name: impl Into<String>, member: Member<S>) -> Self {
        self.members.insert(name.into(), member);
        self
    }

    /// Check if a member is overridden
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Number of overridden members
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if nothing is overridden
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn into_members(self) -> IndexMap<String, Member<S>> {
        self.members
    }
}

impl<S, K: Into<String>> FromIterator<(K, Member<S>)> for Overrides<S> {
    fn from_iter<I: IntoIterator<Item = (K, Member<S>)>>(iter: I) -> Self {
        Self {
            members: iter
                .into_iter()
                .map(|(name, member)| (name.into(), member))
                .collect(),
        }
    }
}

impl<S> IntoIterator for Overrides<S> {
    type Item = (String, Member<S>);
    type IntoIter = indexmap::map::IntoIter<String, Member<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}
