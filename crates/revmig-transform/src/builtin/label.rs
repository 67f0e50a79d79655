use crate::console::Console;
use crate::error::{NonReversibleError, TransformError};
use crate::function::DynFunction;
use crate::transformation::{DynTransformation, Transformation};
use crate::work::TransformWork;
use std::sync::Arc;

/// Rewrites a message label's value through a reversible function
///
/// Reverses by swapping to the function's inverse mapping.
#[derive(Debug, Clone)]
pub struct MapLabel {
    label: String,
    mapper: DynFunction<String, String>,
}

impl MapLabel {
    /// Create label rewrite
    #[inline]
    #[must_use]
    pub fn new(label: impl Into<String>, mapper: DynFunction<String, String>) -> Self {
        Self {
            label: label.into(),
            mapper,
        }
    }

    /// Label name
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl PartialEq for MapLabel {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && self.mapper.describe() == other.mapper.describe()
    }
}

impl Transformation for MapLabel {
    fn apply(&self, work: &mut TransformWork<'_>) -> Result<(), TransformError> {
        let mapped = work.map_label(&self.label, |value| self.mapper.apply(value));
        if mapped == 0 {
            let message = format!("{}: nothing to map", self.describe());
            work.console().verbose(&message);
        }
        Ok(())
    }

    fn reverse(&self) -> Result<DynTransformation, NonReversibleError> {
        let mapper = self
            .mapper
            .reverse_mapping()
            .map_err(|e| {
                let err = NonReversibleError::new(self.describe());
                match e.detail() {
                    Some(detail) => err.with_detail(detail.to_string()),
                    None => err,
                }
            })?;
        Ok(Arc::new(Self {
            label: self.label.clone(),
            mapper,
        }))
    }

    fn describe(&self) -> String {
        format!("map label {} with {}", self.label, self.mapper.describe())
    }
}
