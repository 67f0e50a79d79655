//! Error types for revmig Core
//!
//! Provides error handling for:
//! - Configuration values that aren't transformations
//! - Pipelines that can't be reversed
//! - Pipeline file parsing
//! - Step failures during a run

use crate::executor::Direction;
use revmig_transform::{NonReversibleError, TransformError};
use std::path::PathBuf;

/// Pipeline construction errors, raised before anything runs
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Element is neither a transformation nor a function
    #[error(
        "element {index}: Expected type 'transformation' or function, but found: {found} ({kind})"
    )]
    InvalidType {
        /// Position in the list
        index: usize,
        /// Rendered offending value
        found: String,
        /// Kind of the offending value
        kind: &'static str,
    },

    /// Some element has no inverse
    #[error(transparent)]
    NonReversible(#[from] NonReversibleError),

    /// Table names a transformation type that doesn't exist
    #[error("element {index}: unknown transformation type '{name}'")]
    UnknownStep {
        /// Position in the list
        index: usize,
        /// Requested type
        name: String,
    },

    /// Transformation table is malformed
    #[error("element {index}: {message}")]
    InvalidStep {
        /// Position in the list
        index: usize,
        /// What is wrong
        message: String,
    },

    /// Error inside a nested step list
    #[error("element {index}: {source}")]
    Nested {
        /// Position of the enclosing element
        index: usize,
        /// Underlying error
        #[source]
        source: Box<ConfigError>,
    },

    /// Pipeline file isn't valid TOML or has the wrong shape
    #[error("invalid pipeline file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Pipeline file can't be read
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Wrap as an error of the element at `index`
    #[inline]
    #[must_use]
    pub fn nested(self, index: usize) -> Self {
        Self::Nested {
            index,
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping `Nested` wrappers
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Nested { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Errors running a pipeline
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// Pipeline has no inverse; nothing was applied
    #[error(transparent)]
    NonReversible(#[from] NonReversibleError),

    /// A step failed; later steps were not applied
    #[error("{direction} step '{step}' failed: {source}")]
    Step {
        /// Run direction
        direction: Direction,
        /// Description of the failing top-level step
        step: String,
        /// Underlying error
        #[source]
        source: TransformError,
    },

    /// A step reported errors on the console
    #[error("{direction} step '{step}' reported {count} error(s)")]
    ConsoleErrors {
        /// Run direction
        direction: Direction,
        /// Description of the reporting top-level step
        step: String,
        /// Errors recorded so far
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_type_message() {
        let err = ConfigError::InvalidType {
            index: 0,
            found: "42".to_string(),
            kind: "int",
        };
        assert_eq!(
            err.to_string(),
            "element 0: Expected type 'transformation' or function, but found: 42 (int)"
        );
    }

    #[test]
    fn non_reversible_is_transparent() {
        let err: ConfigError = NonReversibleError::new("foo").into();
        assert_eq!(err.to_string(), "foo is not reversible");
    }

    #[test]
    fn nested_locates_and_unwraps() {
        let err = ConfigError::UnknownStep {
            index: 1,
            name: "bogus".to_string(),
        }
        .nested(3);
        assert_eq!(
            err.to_string(),
            "element 3: element 1: unknown transformation type 'bogus'"
        );
        assert!(matches!(err.root_cause(), ConfigError::UnknownStep { .. }));
    }

    #[test]
    fn execution_error_display() {
        let err = ExecutionError::Step {
            direction: Direction::Reverse,
            step: "move 'a' to 'b'".to_string(),
            source: TransformError::FileNotFound(PathBuf::from("a")),
        };
        assert_eq!(
            err.to_string(),
            "reverse step 'move 'a' to 'b'' failed: file not found: a"
        );
    }
}
