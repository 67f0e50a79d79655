//! revmig Core
//!
//! Turns configuration values into validated, reversible pipelines and runs
//! them:
//! - Validates heterogeneous configuration lists into a [`Sequence`]
//! - Derives the inverse of a pipeline, failing on the first non-reversible step
//! - Loads pipelines from TOML files
//! - Executes pipelines forward or in reverse over a working tree
//!
//! # Example
//!
//! ```rust,ignore
//! use revmig_core::{Direction, Executor, PipelineFile};
//! use revmig_changes::Changes;
//! use revmig_transform::{TracingConsole, WorkTree};
//!
//! let file = PipelineFile::load("migrate.toml")?;
//! let pipeline = file.to_pipeline()?;
//! pipeline.check_reversible()?;
//!
//! let mut tree = WorkTree::load_dir("checkout")?;
//! let outcome = Executor::new(&TracingConsole).run(
//!     &pipeline,
//!     Direction::Reverse,
//!     &mut tree,
//!     Changes::empty(),
//!     "Import changes",
//! )?;
//! println!("applied {} steps", outcome.steps_applied);
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod executor;
pub mod function;
pub mod pipeline;
pub mod validator;
pub mod value;

pub use config::{parse_value, PipelineFile};
pub use error::{ConfigError, ExecutionError};
pub use executor::{Direction, Executor, RunOutcome};
pub use function::{ConfigFunction, FunctionTransformation};
pub use pipeline::Pipeline;
pub use validator::{compose, reverse, transform};
pub use value::ConfigValue;

pub use revmig_transform::Sequence;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building and running pipelines
    pub use crate::{
        compose, reverse, transform, ConfigError, ConfigValue, Direction, ExecutionError,
        Executor, Pipeline, PipelineFile,
    };
    pub use revmig_transform::{Console, DynTransformation, Sequence, Transformation};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
