//! Migration change context
//!
//! Provides [`Changes`], the read-only pair of change lists handed to every
//! transformation in a run.

use crate::change::Change;
use serde::{Deserialize, Serialize};

static EMPTY: Changes = Changes {
    current: Vec::new(),
    migrated: Vec::new(),
};

/// Changes being migrated in this run, plus those migrated before
///
/// Built once per run by the origin layer and never mutated afterward.
/// `current` keeps origin order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changes {
    current: Vec<Change>,
    migrated: Vec<Change>,
}

impl Changes {
    /// Create new context
    #[inline]
    #[must_use]
    pub fn new(
        current: impl IntoIterator<Item = Change>,
        migrated: impl IntoIterator<Item = Change>,
    ) -> Self {
        Self {
            current: current.into_iter().collect(),
            migrated: migrated.into_iter().collect(),
        }
    }

    /// Shared context carrying no change metadata
    #[inline]
    #[must_use]
    pub fn empty() -> &'static Self {
        &EMPTY
    }

    /// Changes that will be migrated
    #[inline]
    #[must_use]
    pub fn current(&self) -> &[Change] {
        &self.current
    }

    /// Changes migrated by previous runs or previous iterations
    #[inline]
    #[must_use]
    pub fn migrated(&self) -> &[Change] {
        &self.migrated
    }

    /// Check if both lists are empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.is_empty() && self.migrated.is_empty()
    }
}
