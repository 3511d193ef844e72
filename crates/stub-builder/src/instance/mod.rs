//! Intercepted instances
//!
//! A [`StubbedInstance`] wraps a backing store and routes every member read
//! through the interception layer:
//!
//! 1. a member already in the store is returned unchanged (same identity);
//! 2. an excluded member reads as absent and is never materialized;
//! 3. anything else is materialized by the stub factory, cached and returned.
//!
//! Writes go straight into the store and always succeed.
//!
//! Instances are single-threaded (`Rc`/`RefCell` inside) and every instance
//! owns its own store.

mod overrides;

pub use overrides::Overrides;

use crate::exclusion::ExclusionSet;
use crate::result::{StubError, StubResult};
use crate::value::{Member, Value};
use indexmap::IndexMap;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// Shared stub factory callback
pub(crate) type CreateStub<S> = Rc<dyn Fn(&str) -> S>;

/// An object of some target shape whose members are stubbed on first access
pub struct StubbedInstance<S> {
    store: RefCell<IndexMap<String, Member<S>>>,
    /// Members whose stub the factory is currently creating
    pending: RefCell<HashSet<String>>,
    create_stub: CreateStub<S>,
    exclusions: Rc<ExclusionSet>,
}

impl<S: Clone> StubbedInstance<S> {
    pub(crate) fn new(
        create_stub: CreateStub<S>,
        exclusions: Rc<ExclusionSet>,
        overrides: Overrides<S>,
    ) -> Self {
        Self {
            store: RefCell::new(overrides.into_members()),
            pending: RefCell::new(HashSet::new()),
            create_stub,
            exclusions,
        }
    }

    /// Read a member through the interception layer.
    ///
    /// Returns `None` only for excluded members that were never overridden
    /// or written, and for a member the stub factory reads back while it is
    /// still creating that member's stub. The factory runs at most once per
    /// member.
    pub fn get(&self, name: &str) -> Option<Member<S>> {
        let existing = self.store.borrow().get(name).cloned();
        if existing.is_some() {
            return existing;
        }

        if let Some(rule) = self.exclusions.rule_for(name) {
            tracing::debug!(member = name, rule = %rule, "excluded member read as absent");
            return None;
        }

        if !self.pending.borrow_mut().insert(name.to_string()) {
            tracing::debug!(member = name, "member read while its stub is being created");
            return None;
        }

        // No borrow is held while the factory runs
        let stub = (self.create_stub)(name);
        self.pending.borrow_mut().remove(name);
        tracing::trace!(member = name, "materialized stub");

        let mut store = self.store.borrow_mut();
        let member = store
            .entry(name.to_string())
            .or_insert(Member::Stub(stub));
        Some(member.clone())
    }

    /// Read a member's test double.
    ///
    /// `None` when the member is excluded or holds a plain value.
    pub fn stub(&self, name: &str) -> Option<S> {
        self.get(name).and_then(Member::into_stub)
    }

    /// Read a member's plain value as `T`.
    ///
    /// Goes through the read path, so an unset, non-excluded member gets a
    /// stub materialized (and this returns `None`).
    pub fn value<T: Any + Clone>(&self, name: &str) -> Option<T> {
        self.get(name)?.as_value()?.get::<T>()
    }

    /// Like [`value`](Self::value), reporting why no `T` was available
    pub fn try_value<T: Any + Clone>(&self, name: &str) -> StubResult<T> {
        match self.get(name) {
            None => Err(StubError::Excluded {
                member: name.to_string(),
            }),
            Some(Member::Stub(_)) => Err(StubError::NotAValue {
                member: name.to_string(),
            }),
            Some(Member::Value(value)) => value.get::<T>().ok_or_else(|| StubError::TypeMismatch {
                member: name.to_string(),
                expected: std::any::type_name::<T>(),
            }),
        }
    }

    /// Write a member, replacing whatever was stored.
    ///
    /// Bypasses materialization and the exclusion check; never fails.
    pub fn set(&self, name: impl Into<String>, member: Member<S>) {
        let name = name.into();
        tracing::trace!(member = %name, kind = member.kind(), "member written");
        self.store.borrow_mut().insert(name, member);
    }

    /// Write a plain value
    pub fn set_value<T: Any>(&self, name: impl Into<String>, value: T) {
        self.set(name, Member::Value(Value::new(value)));
    }

    /// Write a test double
    pub fn set_stub(&self, name: impl Into<String>, stub: S) {
        self.set(name, Member::Stub(stub));
    }

    /// Stored member, without materializing anything
    pub fn peek(&self, name: &str) -> Option<Member<S>> {
        self.store.borrow().get(name).cloned()
    }
}

impl<S> StubbedInstance<S> {
    /// Whether the member has a value in the store (own member)
    pub fn has_own(&self, name: &str) -> bool {
        self.store.borrow().contains_key(name)
    }

    /// Own, enumerable member names in insertion order
    pub fn keys(&self) -> Vec<String> {
        self.store.borrow().keys().cloned().collect()
    }

    /// Number of members in the store
    pub fn len(&self) -> usize {
        self.store.borrow().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.store.borrow().is_empty()
    }

    /// Whether `name` is covered by this instance's exclusion set
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclusions.matches(name)
    }

    /// Exclusion set in effect
    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }
}

impl<S> fmt::Debug for StubbedInstance<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store.borrow();
        let members: Vec<(&str, &'static str)> = store
            .iter()
            .map(|(name, member)| (name.as_str(), member.kind()))
            .collect();
        f.debug_struct("StubbedInstance")
            .field("members", &members)
            .field("exclusions", &self.exclusions.len())
            .finish()
    }
}
