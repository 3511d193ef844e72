//! Stub instance factory
//!
//! ```rust,ignore
//! use stub_builder::prelude::*;
//!
//! let creator = StubbedInstanceCreator::new(Stub::creator());
//! let mock = creator.create_stubbed_instance();
//!
//! mock.stub("func").unwrap().call(args![5, "whatever"]);
//! mock.stub("func").unwrap().assert_called_with(args![5, "whatever"])?;
//! ```

use crate::config::FactoryConfig;
use crate::exclusion::ExclusionSet;
use crate::instance::{CreateStub, Overrides, StubbedInstance};
use crate::result::StubResult;
use std::fmt;
use std::rc::Rc;

/// Builds stubbed instances that share one stub factory and exclusion set
pub struct StubbedInstanceCreator<S> {
    create_stub: CreateStub<S>,
    exclusions: Rc<ExclusionSet>,
}

impl<S> Clone for StubbedInstanceCreator<S> {
    fn clone(&self) -> Self {
        Self {
            create_stub: Rc::clone(&self.create_stub),
            exclusions: Rc::clone(&self.exclusions),
        }
    }
}

impl<S> fmt::Debug for StubbedInstanceCreator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubbedInstanceCreator")
            .field("exclusions", &self.exclusions)
            .finish_non_exhaustive()
    }
}

impl<S: Clone> StubbedInstanceCreator<S> {
    /// Create a factory with the default exclusion set
    pub fn new<F>(create_stub: F) -> Self
    where
        F: Fn(&str) -> S + 'static,
    {
        Self::with_exclusions(create_stub, ExclusionSet::defaults())
    }

    /// Create a factory with an explicit exclusion set.
    ///
    /// The set replaces the defaults entirely; start from
    /// [`ExclusionSet::defaults`] to keep them.
    pub fn with_exclusions<F>(create_stub: F, exclusions: ExclusionSet) -> Self
    where
        F: Fn(&str) -> S + 'static,
    {
        tracing::debug!(rules = exclusions.len(), "stub factory created");
        Self {
            create_stub: Rc::new(create_stub),
            exclusions: Rc::new(exclusions),
        }
    }

    /// Create a factory whose exclusions come from configuration
    pub fn from_config<F>(create_stub: F, config: &FactoryConfig) -> StubResult<Self>
    where
        F: Fn(&str) -> S + 'static,
    {
        Ok(Self::with_exclusions(create_stub, config.exclusions()?))
    }

    /// Exclusion set shared by every instance of this factory
    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    /// Create an instance with no overrides
    pub fn create_stubbed_instance(&self) -> StubbedInstance<S> {
        self.create_stubbed_instance_with(Overrides::new())
    }

    /// Create an instance seeded with `overrides`.
    ///
    /// Overrides are installed as-is, without any validation.
    pub fn create_stubbed_instance_with(&self, overrides: Overrides<S>) -> StubbedInstance<S> {
        tracing::trace!(overrides = overrides.len(), "stubbed instance created");
        StubbedInstance::new(
            Rc::clone(&self.create_stub),
            Rc::clone(&self.exclusions),
            overrides,
        )
    }
}

/// Create a factory with the default exclusion set
pub fn make_factory<S, F>(create_stub: F) -> StubbedInstanceCreator<S>
where
    S: Clone,
    F: Fn(&str) -> S + 'static,
{
    StubbedInstanceCreator::new(create_stub)
}

/// Create a factory whose exclusion set replaces the defaults
pub fn make_factory_with_exclusions<S, F>(
    create_stub: F,
    exclusions: ExclusionSet,
) -> StubbedInstanceCreator<S>
where
    S: Clone,
    F: Fn(&str) -> S + 'static,
{
    StubbedInstanceCreator::with_exclusions(create_stub, exclusions)
}
