//! revmig Transform
//!
//! Reversible transformation composition for migration pipelines.
//!
//! # Core Concepts
//!
//! - [`Transformation`]: One step; apply, reverse, describe
//! - [`Sequence`]: Ordered composite; inverse is the mirrored list of inverses
//! - [`ExplicitReversal`]: Step paired with a hand-written inverse
//! - [`ReversibleFunction`]: Pure value mapping that knows its inverse
//! - [`TransformWork`]: Working context a run mutates
//! - [`Console`]: Diagnostic sink exposed to steps
//!
//! # Example
//!
//! ```rust,ignore
//! use revmig_transform::{Move, Replace, Sequence, Transformation};
//! use std::sync::Arc;
//!
//! let seq = Sequence::new(vec![
//!     Arc::new(Replace::new("com.internal", "org.oss")?),
//!     Arc::new(Move::new("internal/lib.rs", "lib.rs")?),
//! ]);
//!
//! // Inverse is computed up front, before touching any state
//! let inverse = seq.reversed()?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod builtin;
mod console;
mod dyn_eq;
mod error;
mod explicit;
mod function;
mod sequence;
mod transformation;
mod work;

pub use builtin::{IntentionalNoop, MapLabel, Move, Replace};
pub use console::{Console, CountingConsole, TracingConsole};
pub use dyn_eq::DynEq;
pub use error::{ArgumentError, NonReversibleError, TransformError};
pub use explicit::ExplicitReversal;
pub use function::{ChainMapper, DynFunction, FnMapper, MapMapper, ReversibleFunction};
pub use sequence::Sequence;
pub use transformation::{DynTransformation, Transformation};
pub use work::{TransformWork, WorkTree};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
