//! Ordered composition of transformations
//!
//! Provides [`Sequence`], the composite whose inverse is the mirrored list
//! of each element's inverse.

use crate::error::{NonReversibleError, TransformError};
use crate::transformation::{DynTransformation, Transformation};
use crate::work::TransformWork;
use std::sync::Arc;

/// Ordered list of transformations applied as a unit
///
/// # Composition law
/// `reverse([A, B, .., Z]) == [reverse(Z), .., reverse(B), reverse(A)]`
///
/// Elements may themselves be sequences; inversion recurses through
/// `reverse` so nesting depth doesn't matter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequence {
    steps: Vec<DynTransformation>,
}

impl Sequence {
    /// Create sequence; list order is execution order
    #[inline]
    #[must_use]
    pub fn new(steps: Vec<DynTransformation>) -> Self {
        Self { steps }
    }

    /// Sequence with no steps
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Steps in execution order
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[DynTransformation] {
        &self.steps
    }

    /// Number of steps
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if sequence has no steps
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Compute the inverse sequence
    ///
    /// Elements are inverted in original order and the first failure is
    /// returned as-is; later elements are not inspected. On success the
    /// inverted elements are laid out in mirrored order.
    ///
    /// # Errors
    /// Returns the first element's [`NonReversibleError`]
    pub fn reversed(&self) -> Result<Self, NonReversibleError> {
        let mut steps = self
            .steps
            .iter()
            .map(|step| step.reverse())
            .collect::<Result<Vec<_>, _>>()?;
        steps.reverse();
        Ok(Self::new(steps))
    }
}

impl Transformation for Sequence {
    fn apply(&self, work: &mut TransformWork<'_>) -> Result<(), TransformError> {
        for (i, step) in self.steps.iter().enumerate() {
            tracing::debug!(index = i, step = %step.describe(), "applying step");
            step.apply(work)?;
        }
        Ok(())
    }

    fn reverse(&self) -> Result<DynTransformation, NonReversibleError> {
        Ok(Arc::new(self.reversed()?))
    }

    fn describe(&self) -> String {
        "sequence".to_string()
    }
}

impl FromIterator<DynTransformation> for Sequence {
    fn from_iter<I: IntoIterator<Item = DynTransformation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
