use crate::console::Console;
use crate::error::{ArgumentError, NonReversibleError, TransformError};
use crate::transformation::{DynTransformation, Transformation};
use crate::work::TransformWork;
use std::sync::Arc;

/// Literal text replacement in every file of the tree
///
/// Reversed by swapping `before` and `after`. A replacement that deletes
/// text can't be reversed.
///
/// The inverse is exact only when `after` doesn't already occur in the
/// tree before the forward run: with `a -> b`, `"ab"` becomes `"bb"` and
/// reverses to `"aa"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replace {
    before: String,
    after: String,
}

impl Replace {
    /// Create replacement
    ///
    /// # Errors
    /// Returns error if `before` is empty or equal to `after`
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Result<Self, ArgumentError> {
        let before = before.into();
        let after = after.into();
        if before.is_empty() {
            return Err(ArgumentError::new("before", "cannot be empty"));
        }
        if before == after {
            return Err(ArgumentError::new("after", "must differ from 'before'"));
        }
        Ok(Self { before, after })
    }

    /// Text searched for
    #[inline]
    #[must_use]
    pub fn before(&self) -> &str {
        &self.before
    }

    /// Replacement text
    #[inline]
    #[must_use]
    pub fn after(&self) -> &str {
        &self.after
    }
}

impl Transformation for Replace {
    fn apply(&self, work: &mut TransformWork<'_>) -> Result<(), TransformError> {
        let mut touched = 0usize;
        for (_, content) in work.tree_mut().contents_mut() {
            if content.contains(&self.before) {
                *content = content.replace(&self.before, &self.after);
                touched += 1;
            }
        }

        if touched == 0 {
            let message = format!("{}: no file contained '{}'", self.describe(), self.before);
            work.console().verbose(&message);
        }
        Ok(())
    }

    fn reverse(&self) -> Result<DynTransformation, NonReversibleError> {
        if self.after.is_empty() {
            return Err(NonReversibleError::new(self.describe())
                .with_detail("deleted text can't be restored"));
        }
        Ok(Arc::new(Self {
            before: self.after.clone(),
            after: self.before.clone(),
        }))
    }

    fn describe(&self) -> String {
        format!("replace '{}' with '{}'", self.before, self.after)
    }
}
