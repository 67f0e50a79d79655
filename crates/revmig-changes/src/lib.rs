//! revmig Changes
//!
//! Immutable history values consumed read-only by migration transformations.
//!
//! # Core Concepts
//!
//! - [`Change`]: One origin revision (id, author, message, date, labels)
//! - [`Changes`]: `current` and `migrated` change lists for one run
//! - [`Author`]: `Name <email>` author value
//!
//! # Example
//!
//! ```rust,ignore
//! use revmig_changes::{Author, Change, Changes};
//!
//! let change = Change::new("a1b2c3", Author::new("Jane", "jane@example.com"), "Fix", now);
//! let changes = Changes::new(vec![change], vec![]);
//! assert_eq!(changes.current().len(), 1);
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod author;
mod change;
mod changes;

pub use author::{Author, AuthorError};
pub use change::{Change, ChangeId};
pub use changes::Changes;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
