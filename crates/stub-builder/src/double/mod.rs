//! Built-in test double
//!
//! Any type can serve as the stub of a [`StubbedInstanceCreator`]; this
//! module ships a ready-made one, the recording [`Stub`], plus a [`Sandbox`]
//! that tracks every stub a factory produced.
//!
//! Enabled by the default `double` feature. Disable it when the doubles come
//! from another mocking library.
//!
//! ## Example
//!
//! ```rust,ignore
//! use stub_builder::prelude::*;
//!
//! let sandbox = Sandbox::new();
//! let creator = StubbedInstanceCreator::new(sandbox.creator());
//! let mock = creator.create_stubbed_instance();
//!
//! mock.stub("func").unwrap().returns(7);
//! assert_eq!(mock.stub("func").unwrap().call(args![5]), json!(7));
//! sandbox.assert_only_called(&["func"])?;
//! ```
//!
//! [`StubbedInstanceCreator`]: crate::StubbedInstanceCreator

pub mod sandbox;
pub mod stub;

pub use sandbox::Sandbox;
pub use stub::{Call, Stub};
