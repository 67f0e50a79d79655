use crate::error::{ArgumentError, NonReversibleError, TransformError};
use crate::transformation::{DynTransformation, Transformation};
use crate::work::TransformWork;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Moves one file within the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    from: PathBuf,
    to: PathBuf,
}

impl Move {
    /// Create move
    ///
    /// # Errors
    /// Returns error if either path is empty or both are the same
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Result<Self, ArgumentError> {
        let from = from.into();
        let to = to.into();
        if from.as_os_str().is_empty() {
            return Err(ArgumentError::new("from", "cannot be empty"));
        }
        if to.as_os_str().is_empty() {
            return Err(ArgumentError::new("to", "cannot be empty"));
        }
        if from == to {
            return Err(ArgumentError::new("to", "must differ from 'from'"));
        }
        Ok(Self { from, to })
    }

    /// Source path
    #[inline]
    #[must_use]
    pub fn from(&self) -> &Path {
        &self.from
    }

    /// Destination path
    #[inline]
    #[must_use]
    pub fn to(&self) -> &Path {
        &self.to
    }
}

impl Transformation for Move {
    fn apply(&self, work: &mut TransformWork<'_>) -> Result<(), TransformError> {
        work.tree_mut().rename(&self.from, &self.to)
    }

    fn reverse(&self) -> Result<DynTransformation, NonReversibleError> {
        Ok(Arc::new(Self {
            from: self.to.clone(),
            to: self.from.clone(),
        }))
    }

    fn describe(&self) -> String {
        format!("move '{}' to '{}'", self.from.display(), self.to.display())
    }
}
