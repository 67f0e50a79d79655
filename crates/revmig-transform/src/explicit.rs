//! Transformations with an explicitly supplied inverse

use crate::error::{NonReversibleError, TransformError};
use crate::transformation::{DynTransformation, Transformation};
use crate::work::TransformWork;
use std::sync::Arc;

/// Pairs a forward step with a separately authored backward step
///
/// Used when an inverse can't be derived structurally. Reversing swaps
/// the pair and never fails.
#[derive(Debug, Clone)]
pub struct ExplicitReversal {
    forward: DynTransformation,
    backward: DynTransformation,
}

impl ExplicitReversal {
    /// Create pairing
    #[inline]
    #[must_use]
    pub fn new(forward: DynTransformation, backward: DynTransformation) -> Self {
        Self { forward, backward }
    }

    /// Step run by `apply`
    #[inline]
    #[must_use]
    pub fn forward(&self) -> &DynTransformation {
        &self.forward
    }

    /// Step run when reversed
    #[inline]
    #[must_use]
    pub fn backward(&self) -> &DynTransformation {
        &self.backward
    }

    /// Same pairing with the sides swapped
    #[inline]
    #[must_use]
    pub fn swapped(&self) -> Self {
        Self::new(Arc::clone(&self.backward), Arc::clone(&self.forward))
    }
}

impl PartialEq for ExplicitReversal {
    fn eq(&self, other: &Self) -> bool {
        *self.forward == *other.forward && *self.backward == *other.backward
    }
}

impl Transformation for ExplicitReversal {
    fn apply(&self, work: &mut TransformWork<'_>) -> Result<(), TransformError> {
        self.forward.apply(work)
    }

    fn reverse(&self) -> Result<DynTransformation, NonReversibleError> {
        Ok(Arc::new(self.swapped()))
    }

    fn describe(&self) -> String {
        self.forward.describe()
    }
}
