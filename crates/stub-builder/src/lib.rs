//! stub-builder: lazily stubbed instances of any shape
//!
//! Given a stub factory (any mocking library's "make me a double" function),
//! a [`StubbedInstanceCreator`] produces [`StubbedInstance`]s whose members
//! are materialized on first access:
//!
//! - members present in the backing store (overrides, writes, earlier reads)
//!   are returned unchanged;
//! - excluded members (`then`, `toString`, `fmt`, ...) read as absent;
//! - everything else gets a fresh double from the factory, cached for the
//!   lifetime of the instance.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  create_stubbed_instance  ┌──────────────────┐
//! │ Creator      │──────────────────────────►│ Instance         │
//! │ factory +    │                           │ backing store +  │
//! │ exclusions   │◄──── create_stub(name) ───│ interception     │
//! └──────────────┘                           └──────────────────┘
//!                                                 ▲  get / set
//!                                                 │
//!                                          test code or #[stubbed] façade
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use stub_builder::prelude::*;
//!
//! #[stubbed]
//! trait Greeter {
//!     fn greet(&self, name: &str) -> String;
//! }
//!
//! let creator = StubbedInstanceCreator::new(Stub::creator());
//! let greeter: StubbedGreeter<Stub> = creator.create_stubbed_instance().into();
//!
//! greeter.stub("greet").unwrap().returns("hi");
//! assert_eq!(greeter.greet("ann"), "hi");
//! greeter.stub("greet").unwrap().assert_called_with(args!["ann"])?;
//! ```

#![warn(missing_docs)]

extern crate self as stub_builder;

pub mod config;
mod creator;
#[cfg(feature = "double")]
pub mod double;
pub mod exclusion;
mod instance;
mod invoke;
mod result;
mod value;

pub use config::{ExclusionMode, FactoryConfig};
pub use creator::{make_factory, make_factory_with_exclusions, StubbedInstanceCreator};
#[cfg(feature = "double")]
pub use double::{Call, Sandbox, Stub};
pub use exclusion::{ExclusionRule, ExclusionSet};
pub use instance::{Overrides, StubbedInstance};
pub use invoke::Invoke;
pub use result::{StubError, StubResult};
pub use value::{Member, StubIdentity, Value};

/// Attribute macro generating a typed stubbed façade for a trait
#[cfg(feature = "derive")]
pub use stub_builder_derive::stubbed;

/// Support for generated code and the `args!` macro. Not public API.
#[doc(hidden)]
pub mod __private {
    pub use crate::invoke::{dispatch, dispatch_async, read, to_arg, write};
    pub use serde_json::Value as JsonValue;
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        make_factory, make_factory_with_exclusions, ExclusionMode, ExclusionRule, ExclusionSet,
        FactoryConfig, Invoke, Member, Overrides, StubError, StubIdentity, StubResult,
        StubbedInstance, StubbedInstanceCreator, Value,
    };

    #[cfg(feature = "double")]
    pub use crate::{args, Call, Sandbox, Stub};

    #[cfg(feature = "derive")]
    pub use crate::stubbed;

    pub use serde_json::json;
}
