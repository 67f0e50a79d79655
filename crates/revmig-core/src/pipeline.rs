//! Named pipeline with a cached inverse

use crate::executor::Direction;
use once_cell::sync::OnceCell;
use revmig_transform::{NonReversibleError, Sequence};

/// Forward sequence plus its lazily computed inverse
///
/// The inverse is derived at most once. Reversal is pure, so the cached
/// result (success or failure) holds for every later reverse run.
#[derive(Debug)]
pub struct Pipeline {
    name: String,
    forward: Sequence,
    inverse: OnceCell<Result<Sequence, NonReversibleError>>,
}

impl Pipeline {
    /// Create pipeline
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, forward: Sequence) -> Self {
        Self {
            name: name.into(),
            forward,
            inverse: OnceCell::new(),
        }
    }

    /// Pipeline name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Forward sequence
    #[inline]
    #[must_use]
    pub fn forward(&self) -> &Sequence {
        &self.forward
    }

    /// Inverse sequence, computed on first call
    ///
    /// # Errors
    /// Returns the first non-reversible step's error
    pub fn inverse(&self) -> Result<&Sequence, NonReversibleError> {
        self.inverse
            .get_or_init(|| {
                tracing::debug!(pipeline = %self.name, "computing inverse");
                self.forward.reversed()
            })
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Sequence to run in `direction`
    ///
    /// # Errors
    /// Returns error for `Reverse` when the pipeline isn't reversible
    pub fn sequence(&self, direction: Direction) -> Result<&Sequence, NonReversibleError> {
        match direction {
            Direction::Forward => Ok(&self.forward),
            Direction::Reverse => self.inverse(),
        }
    }

    /// Check the pipeline can run in reverse
    ///
    /// # Errors
    /// Returns the first non-reversible step's error
    #[inline]
    pub fn check_reversible(&self) -> Result<(), NonReversibleError> {
        self.inverse().map(drop)
    }
}
