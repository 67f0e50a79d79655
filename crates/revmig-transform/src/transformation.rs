//! Transformation trait
//!
//! Provides [`Transformation`], the capability every migration step
//! implements, and the shared handle type [`DynTransformation`].

use crate::dyn_eq::DynEq;
use crate::error::{NonReversibleError, TransformError};
use crate::work::TransformWork;
use std::fmt::Debug;
use std::sync::Arc;

/// Shared, immutable handle to a transformation
pub type DynTransformation = Arc<dyn Transformation>;

/// One content-mutating, potentially invertible migration step
///
/// Values are pure descriptions built at configuration time. Side effects
/// happen only inside [`apply`](Self::apply); [`reverse`](Self::reverse)
/// and [`describe`](Self::describe) never touch working state, so a value
/// can be run forward in one run and reversed in another.
///
/// Equality is structural: two handles are equal when their concrete
/// types match and the values compare equal.
pub trait Transformation: DynEq + Send + Sync + Debug {
    /// Apply this step to the working context in place
    ///
    /// # Errors
    /// Returns error if the underlying effect can't be performed
    fn apply(&self, work: &mut TransformWork<'_>) -> Result<(), TransformError>;

    /// Build the step that undoes this one
    ///
    /// Structural inversion: callable without a prior `apply`.
    ///
    /// # Errors
    /// Returns [`NonReversibleError`] if no inverse exists
    fn reverse(&self) -> Result<DynTransformation, NonReversibleError>;

    /// Stable, human-readable description used in errors and logs
    fn describe(&self) -> String;
}

impl PartialEq for dyn Transformation {
    fn eq(&self, other: &Self) -> bool {
        DynEq::dyn_eq(self, DynEq::as_any(other))
    }
}

impl dyn Transformation {
    /// Concrete step behind this handle, if it is a `T`
    #[must_use]
    pub fn downcast_ref<T: Transformation>(&self) -> Option<&T> {
        DynEq::as_any(self).downcast_ref::<T>()
    }
}
