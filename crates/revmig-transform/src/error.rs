//! Error types for transformations
//!
//! Non-reversibility is an ordinary outcome of [`reverse`](crate::Transformation::reverse),
//! so it gets its own type instead of folding into execution failures.

use std::path::PathBuf;

/// A step has no inverse
///
/// Display is always `"<description> is not reversible"`, where the
/// description is the failing step's `describe()` output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{description} is not reversible")]
pub struct NonReversibleError {
    description: String,
    detail: Option<String>,
}

impl NonReversibleError {
    /// Create error for the step with this description
    #[inline]
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            detail: None,
        }
    }

    /// Attach a reason, kept out of the display string
    #[inline]
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Description of the failing step
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Extra reason, if any
    #[inline]
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

/// Errors raised while applying a step to the working context
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// Generic failure
    #[error("{0}")]
    Failed(String),

    /// Path missing from the working tree
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Path already present in the working tree
    #[error("file already exists: {}", .0.display())]
    FileExists(PathBuf),

    /// I/O failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid argument given when building a step
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid argument '{argument}': {reason}")]
pub struct ArgumentError {
    /// Argument name
    pub argument: &'static str,
    /// Why it was rejected
    pub reason: String,
}

impl ArgumentError {
    /// Create new argument error
    #[inline]
    #[must_use]
    pub fn new(argument: &'static str, reason: impl Into<String>) -> Self {
        Self {
            argument,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_reversible_display() {
        let err = NonReversibleError::new("foo");
        assert_eq!(err.to_string(), "foo is not reversible");
    }

    #[test]
    fn non_reversible_detail_not_displayed() {
        let err = NonReversibleError::new("foo").with_detail("deletes text");
        assert_eq!(err.to_string(), "foo is not reversible");
        assert_eq!(err.detail(), Some("deletes text"));
        assert_eq!(err.description(), "foo");
    }

    #[test]
    fn transform_error_display() {
        let err = TransformError::FileNotFound(PathBuf::from("a/b.txt"));
        assert_eq!(err.to_string(), "file not found: a/b.txt");

        let err = TransformError::FileExists(PathBuf::from("b.txt"));
        assert_eq!(err.to_string(), "file already exists: b.txt");
    }

    #[test]
    fn argument_error_display() {
        let err = ArgumentError::new("before", "cannot be empty");
        assert_eq!(err.to_string(), "invalid argument 'before': cannot be empty");
    }
}
