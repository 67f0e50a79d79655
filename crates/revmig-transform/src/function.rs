//! Reversible value mappings
//!
//! Provides [`ReversibleFunction`], a pure mapping that knows its inverse,
//! plus the built-in mappers [`MapMapper`], [`ChainMapper`] and [`FnMapper`].

use crate::error::NonReversibleError;
use indexmap::IndexMap;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Shared handle to a reversible function
pub type DynFunction<T, R> = Arc<dyn ReversibleFunction<T, R>>;

/// Pure, deterministic mapping from `T` to `R`
///
/// Maps values, not working contexts. Used to build leaf transformations
/// that reverse by swapping to [`reverse_mapping`](Self::reverse_mapping).
pub trait ReversibleFunction<T, R>: Send + Sync + Debug {
    /// Map a value
    fn apply(&self, value: T) -> R;

    /// Build the inverse mapping
    ///
    /// # Errors
    /// Returns [`NonReversibleError`] if the mapping isn't invertible
    fn reverse_mapping(&self) -> Result<DynFunction<R, T>, NonReversibleError>;

    /// Stable description used in errors
    fn describe(&self) -> String;
}

/// Table lookup; values without an entry pass through unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapMapper {
    mapping: IndexMap<String, String>,
}

impl MapMapper {
    /// Create mapper from `(from, to)` pairs
    #[must_use]
    pub fn new<K, V>(mapping: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            mapping: mapping
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Underlying table
    #[inline]
    #[must_use]
    pub fn mapping(&self) -> &IndexMap<String, String> {
        &self.mapping
    }
}

impl ReversibleFunction<String, String> for MapMapper {
    fn apply(&self, value: String) -> String {
        match self.mapping.get(&value) {
            Some(mapped) => mapped.clone(),
            None => value,
        }
    }

    fn reverse_mapping(&self) -> Result<DynFunction<String, String>, NonReversibleError> {
        let mut inverted: IndexMap<String, String> = IndexMap::with_capacity(self.mapping.len());
        for (from, to) in &self.mapping {
            if let Some(previous) = inverted.insert(to.clone(), from.clone()) {
                return Err(NonReversibleError::new(self.describe()).with_detail(format!(
                    "'{to}' is mapped from both '{previous}' and '{from}'"
                )));
            }
        }
        Ok(Arc::new(Self { mapping: inverted }))
    }

    fn describe(&self) -> String {
        let entries: Vec<_> = self
            .mapping
            .iter()
            .map(|(k, v)| format!("{k} -> {v}"))
            .collect();
        format!("mapping {{{}}}", entries.join(", "))
    }
}

/// Applies mappers one after another
///
/// Inverse follows the same law as [`Sequence`](crate::Sequence): reversed
/// order, each mapper inverted, first failure reported.
#[derive(Clone)]
pub struct ChainMapper<T> {
    functions: Vec<DynFunction<T, T>>,
}

impl<T> Debug for ChainMapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainMapper")
            .field("functions", &self.functions)
            .finish()
    }
}

impl<T> ChainMapper<T> {
    /// Create chain; list order is application order
    #[inline]
    #[must_use]
    pub fn new(functions: Vec<DynFunction<T, T>>) -> Self {
        Self { functions }
    }

    /// Number of chained mappers
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if chain is empty (identity)
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl<T: 'static> ReversibleFunction<T, T> for ChainMapper<T> {
    fn apply(&self, value: T) -> T {
        self.functions.iter().fold(value, |acc, f| f.apply(acc))
    }

    fn reverse_mapping(&self) -> Result<DynFunction<T, T>, NonReversibleError> {
        let mut functions = self
            .functions
            .iter()
            .map(|f| f.reverse_mapping())
            .collect::<Result<Vec<_>, _>>()?;
        functions.reverse();
        Ok(Arc::new(Self { functions }))
    }

    fn describe(&self) -> String {
        let parts: Vec<_> = self.functions.iter().map(|f| f.describe()).collect();
        format!("chain({})", parts.join(", "))
    }
}

type MapFn<T, R> = Arc<dyn Fn(T) -> R + Send + Sync>;

/// Closure-backed mapper with an optional inverse closure
pub struct FnMapper<T, R> {
    name: String,
    forward: MapFn<T, R>,
    backward: Option<MapFn<R, T>>,
}

impl<T, R> FnMapper<T, R> {
    /// One-way mapper
    #[must_use]
    pub fn new(name: impl Into<String>, forward: impl Fn(T) -> R + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            forward: Arc::new(forward),
            backward: None,
        }
    }

    /// Mapper with its inverse
    #[must_use]
    pub fn with_inverse(
        name: impl Into<String>,
        forward: impl Fn(T) -> R + Send + Sync + 'static,
        backward: impl Fn(R) -> T + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            forward: Arc::new(forward),
            backward: Some(Arc::new(backward)),
        }
    }
}

impl<T, R> Debug for FnMapper<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMapper")
            .field("name", &self.name)
            .field("reversible", &self.backward.is_some())
            .finish_non_exhaustive()
    }
}

impl<T: 'static, R: 'static> ReversibleFunction<T, R> for FnMapper<T, R> {
    fn apply(&self, value: T) -> R {
        (self.forward)(value)
    }

    fn reverse_mapping(&self) -> Result<DynFunction<R, T>, NonReversibleError> {
        let backward = self
            .backward
            .clone()
            .ok_or_else(|| NonReversibleError::new(self.describe()))?;
        Ok(Arc::new(FnMapper {
            name: self.name.clone(),
            forward: backward,
            backward: Some(Arc::clone(&self.forward)),
        }))
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}
