//! Stub sandbox: a registry of every stub created through it.
//!
//! Stubs only register when a member is first read, so a sandbox sees exactly
//! the members a test touched.

use super::stub::Stub;
use crate::result::{StubError, StubResult};
use std::cell::RefCell;
use std::rc::Rc;

/// Registry of created stubs
#[derive(Debug, Clone, Default)]
pub struct Sandbox {
    stubs: Rc<RefCell<Vec<Stub>>>,
}

impl Sandbox {
    /// Create an empty sandbox
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stub factory that registers every stub it creates
    pub fn creator(&self) -> impl Fn(&str) -> Stub + 'static {
        let stubs = Rc::clone(&self.stubs);
        move |name: &str| {
            let stub = Stub::named(name);
            stubs.borrow_mut().push(stub.clone());
            stub
        }
    }

    /// Create and register a stub by hand (e.g. for overrides)
    pub fn stub(&self, name: &str) -> Stub {
        let stub = Stub::named(name);
        self.stubs.borrow_mut().push(stub.clone());
        stub
    }

    /// Every registered stub, in creation order
    #[must_use]
    pub fn created(&self) -> Vec<Stub> {
        self.stubs.borrow().clone()
    }

    /// Names of registered stubs, in creation order
    #[must_use]
    pub fn stub_names(&self) -> Vec<String> {
        self.stubs
            .borrow()
            .iter()
            .map(|stub| stub.name().to_string())
            .collect()
    }

    /// Registered stubs that were called
    #[must_use]
    pub fn called(&self) -> Vec<Stub> {
        self.stubs
            .borrow()
            .iter()
            .filter(|stub| stub.called())
            .cloned()
            .collect()
    }

    /// Number of registered stubs
    #[must_use]
    pub fn len(&self) -> usize {
        self.stubs.borrow().len()
    }

    /// Check if no stub was registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stubs.borrow().is_empty()
    }

    /// Assert no stub outside `expected` was called
    pub fn assert_only_called(&self, expected: &[&str]) -> StubResult<()> {
        let unexpected: Vec<String> = self
            .called()
            .iter()
            .map(|stub| stub.name().to_string())
            .filter(|name| !expected.contains(&name.as_str()))
            .collect();
        if unexpected.is_empty() {
            return Ok(());
        }
        Err(StubError::assertion(format!(
            "Unexpected calls to {:?} (expected only {:?})",
            unexpected, expected
        )))
    }

    /// Clear the call history of every registered stub
    pub fn reset_all(&self) {
        for stub in self.stubs.borrow().iter() {
            stub.reset_history();
        }
    }
}
