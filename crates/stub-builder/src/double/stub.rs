//! Recording test double
//!
//! `Stub` is a cloneable handle: every clone points at the same call log and
//! behaviour, so a stub read from an instance and asserted later is the one
//! the code under test called.

use crate::invoke::Invoke;
use crate::result::{StubError, StubResult};
use crate::value::StubIdentity;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::future::{ready, Ready};
use std::rc::Rc;

type Fake = Rc<dyn Fn(&[JsonValue]) -> JsonValue>;

/// A recorded invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// Zero-based call index
    pub index: usize,
    /// Arguments, serialized
    pub args: Vec<JsonValue>,
    /// Value the call returned
    pub returned: JsonValue,
}

#[derive(Default)]
struct StubState {
    calls: Vec<Call>,
    returns: JsonValue,
    on_call: HashMap<usize, JsonValue>,
    fake: Option<Fake>,
    resolves: Option<JsonValue>,
}

/// A configurable, recording test double
#[derive(Clone)]
pub struct Stub {
    name: Rc<str>,
    state: Rc<RefCell<StubState>>,
}

impl Default for Stub {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Stub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Stub")
            .field("name", &self.name)
            .field("call_count", &state.calls.len())
            .field("returns", &state.returns)
            .field("has_fake", &state.fake.is_some())
            .finish()
    }
}

impl Stub {
    /// Create an anonymous stub
    #[must_use]
    pub fn new() -> Self {
        Self::named("stub")
    }

    /// Create a stub named after the member it stands in for
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: Rc::from(name),
            state: Rc::new(RefCell::new(StubState::default())),
        }
    }

    /// Stub factory for [`StubbedInstanceCreator`](crate::StubbedInstanceCreator)
    #[must_use]
    pub fn creator() -> fn(&str) -> Self {
        Self::named
    }

    /// Member name this stub was created for
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    // =========================================================================
    // Behaviour
    // =========================================================================

    /// Return `value` from every call
    pub fn returns<T: Serialize>(&self, value: T) -> &Self {
        self.state.borrow_mut().returns = crate::invoke::to_arg(&value);
        self
    }

    /// Return `value` from the `index`-th call only (zero-based)
    pub fn returns_on_call<T: Serialize>(&self, index: usize, value: T) -> &Self {
        self.state
            .borrow_mut()
            .on_call
            .insert(index, crate::invoke::to_arg(&value));
        self
    }

    /// Compute return values with `fake`
    pub fn calls_fake<F>(&self, fake: F) -> &Self
    where
        F: Fn(&[JsonValue]) -> JsonValue + 'static,
    {
        self.state.borrow_mut().fake = Some(Rc::new(fake));
        self
    }

    /// Value delivered by [`call_async`](Self::call_async)
    pub fn resolves<T: Serialize>(&self, value: T) -> &Self {
        self.state.borrow_mut().resolves = Some(crate::invoke::to_arg(&value));
        self
    }

    /// Clear recorded calls, keep behaviour
    pub fn reset_history(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Clear recorded calls and behaviour
    pub fn reset(&self) {
        *self.state.borrow_mut() = StubState::default();
    }

    // =========================================================================
    // Invocation
    // =========================================================================

    /// Invoke the stub.
    ///
    /// Per-call values win over a fake, which wins over `returns`. An
    /// unconfigured stub returns `null`.
    pub fn call(&self, args: Vec<JsonValue>) -> JsonValue {
        // The call is recorded before a fake runs so re-entrant calls get the
        // next index
        let (index, planned, fake) = {
            let mut state = self.state.borrow_mut();
            let index = state.calls.len();
            state.calls.push(Call {
                index,
                args: args.clone(),
                returned: JsonValue::Null,
            });
            (index, state.on_call.get(&index).cloned(), state.fake.clone())
        };

        // Fakes may re-enter the stub, so no borrow is held here
        let returned = match (planned, fake) {
            (Some(value), _) => value,
            (None, Some(fake)) => fake(&args),
            (None, None) => self.state.borrow().returns.clone(),
        };

        tracing::trace!(stub = %self.name, index, "stub called");
        if let Some(call) = self.state.borrow_mut().calls.get_mut(index) {
            call.returned = returned.clone();
        }
        returned
    }

    /// Invoke the stub as an async function.
    ///
    /// Resolves to the [`resolves`](Self::resolves) value when one is set,
    /// otherwise to the synchronous return value.
    pub fn call_async(&self, args: Vec<JsonValue>) -> Ready<JsonValue> {
        ready(self.settle(args))
    }

    fn settle(&self, args: Vec<JsonValue>) -> JsonValue {
        let returned = self.call(args);
        let resolved = self.state.borrow().resolves.clone();
        resolved.unwrap_or(returned)
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Number of calls
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state.borrow().calls.len()
    }

    /// Whether the stub was called at least once
    #[must_use]
    pub fn called(&self) -> bool {
        self.call_count() > 0
    }

    /// All recorded calls
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    /// Most recent call
    #[must_use]
    pub fn last_call(&self) -> Option<Call> {
        self.state.borrow().calls.last().cloned()
    }

    /// Whether any call had exactly these arguments
    #[must_use]
    pub fn called_with(&self, args: &[JsonValue]) -> bool {
        self.state
            .borrow()
            .calls
            .iter()
            .any(|call| call.args.as_slice() == args)
    }

    // =========================================================================
    // Assertions
    // =========================================================================

    /// Assert the stub was called
    pub fn assert_called(&self) -> StubResult<()> {
        if self.called() {
            return Ok(());
        }
        Err(StubError::assertion(format!(
            "Expected '{}' to have been called, but it was not",
            self.name
        )))
    }

    /// Assert the stub was never called
    pub fn assert_not_called(&self) -> StubResult<()> {
        let count = self.call_count();
        if count == 0 {
            return Ok(());
        }
        Err(StubError::assertion(format!(
            "Expected '{}' not to have been called, but it was called {} time(s)",
            self.name, count
        )))
    }

    /// Assert the stub was called exactly `times` times
    pub fn assert_called_times(&self, times: usize) -> StubResult<()> {
        let count = self.call_count();
        if count == times {
            return Ok(());
        }
        Err(StubError::assertion(format!(
            "Expected '{}' to have been called {} time(s), but it was called {} time(s)",
            self.name, times, count
        )))
    }

    /// Assert some call had exactly these arguments
    pub fn assert_called_with(&self, args: impl AsRef<[JsonValue]>) -> StubResult<()> {
        let args = args.as_ref();
        if self.called_with(args) {
            return Ok(());
        }
        let seen: Vec<Vec<JsonValue>> = self.calls().into_iter().map(|c| c.args).collect();
        Err(StubError::assertion(format!(
            "Expected '{}' to have been called with {:?}, but calls were {:?}",
            self.name, args, seen
        )))
    }
}

impl Invoke for Stub {
    fn invoke(&self, args: Vec<JsonValue>) -> JsonValue {
        self.call(args)
    }

    fn invoke_async(&self, args: Vec<JsonValue>) -> JsonValue {
        self.settle(args)
    }
}

impl StubIdentity for Stub {
    fn same_stub(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

/// Build a `Vec<serde_json::Value>` of call arguments
///
/// ```rust,ignore
/// stub.call(args![5, "whatever"]);
/// stub.assert_called_with(args![5, "whatever"])?;
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::__private::JsonValue>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::__private::to_arg(&$arg)),+]
    };
}
