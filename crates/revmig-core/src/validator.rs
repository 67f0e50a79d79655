//! Pipeline validation and reversal
//!
//! Turns configuration lists into [`Sequence`]s. Every check runs here,
//! before any step is applied:
//! - each element must be a transformation or a function
//! - for [`reverse`], every element must have an inverse

use crate::error::ConfigError;
use crate::function::FunctionTransformation;
use crate::value::ConfigValue;
use revmig_transform::{DynTransformation, ExplicitReversal, Sequence};
use std::sync::Arc;

/// Validate a list and wrap it into a forward sequence
///
/// # Errors
/// Returns `InvalidType` for the first element that isn't a transformation
/// or function
pub fn compose(values: impl IntoIterator<Item = ConfigValue>) -> Result<Sequence, ConfigError> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| to_transformation(index, value))
        .collect()
}

/// Validate a list and return its inverse sequence
///
/// Same as `compose(values)?.reversed()`; a non-reversible element is
/// reported here, never at execution time.
///
/// # Errors
/// - `InvalidType` as for [`compose`]
/// - `NonReversible` naming the first non-reversible element in list order
pub fn reverse(values: impl IntoIterator<Item = ConfigValue>) -> Result<Sequence, ConfigError> {
    let forward = compose(values)?;
    forward.reversed().map_err(|e| {
        tracing::error!(detail = e.detail().unwrap_or(""), "{e}");
        ConfigError::from(e)
    })
}

/// Pair a step list with its reversal
///
/// Without an explicit `reversal`, the backward side is the inverse of
/// `steps`, computed now so a non-reversible step fails construction.
///
/// # Errors
/// Any error of [`compose`] on either list, or of [`reverse`] when no
/// reversal is given
pub fn transform(
    steps: impl IntoIterator<Item = ConfigValue>,
    reversal: Option<Vec<ConfigValue>>,
) -> Result<ExplicitReversal, ConfigError> {
    let forward = compose(steps)?;
    let backward = match reversal {
        Some(values) => compose(values)?,
        None => forward.reversed()?,
    };
    Ok(ExplicitReversal::new(Arc::new(forward), Arc::new(backward)))
}

fn to_transformation(index: usize, value: ConfigValue) -> Result<DynTransformation, ConfigError> {
    match value {
        ConfigValue::Transformation(t) => Ok(t),
        ConfigValue::Function(f) => Ok(Arc::new(FunctionTransformation::new(f))),
        other => {
            let err = ConfigError::InvalidType {
                index,
                found: other.to_string(),
                kind: other.kind(),
            };
            tracing::error!("{err}");
            Err(err)
        }
    }
}
