//! Configuration-supplied callables as transformations
//!
//! A bare function in a pipeline list is wrapped as a
//! [`FunctionTransformation`]. It can't be inverted structurally, so its
//! reverse is an [`ExplicitReversal`] that does nothing going back.

use revmig_transform::{
    DynTransformation, ExplicitReversal, IntentionalNoop, NonReversibleError, TransformError,
    TransformWork, Transformation,
};
use std::fmt;
use std::sync::Arc;

type StepFn = dyn Fn(&mut TransformWork<'_>) -> Result<(), TransformError> + Send + Sync;

/// Named callable handed over by the configuration layer
#[derive(Clone)]
pub struct ConfigFunction {
    name: String,
    body: Arc<StepFn>,
}

impl ConfigFunction {
    /// Create named function
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        body: impl Fn(&mut TransformWork<'_>) -> Result<(), TransformError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            body: Arc::new(body),
        }
    }

    /// Function name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for ConfigFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ConfigFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.body, &other.body)
    }
}

/// Ad hoc transformation running a [`ConfigFunction`]
///
/// Errors the function reports on the console are counted by the run's
/// console; the [`Executor`](crate::Executor) decides whether they abort.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionTransformation {
    function: ConfigFunction,
}

impl FunctionTransformation {
    /// Wrap a function
    #[inline]
    #[must_use]
    pub fn new(function: ConfigFunction) -> Self {
        Self { function }
    }

    /// Wrapped function
    #[inline]
    #[must_use]
    pub fn function(&self) -> &ConfigFunction {
        &self.function
    }
}

impl Transformation for FunctionTransformation {
    fn apply(&self, work: &mut TransformWork<'_>) -> Result<(), TransformError> {
        (self.function.body)(work)
    }

    fn reverse(&self) -> Result<DynTransformation, NonReversibleError> {
        Ok(Arc::new(ExplicitReversal::new(
            Arc::new(IntentionalNoop),
            Arc::new(self.clone()),
        )))
    }

    fn describe(&self) -> String {
        self.function.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revmig_changes::Changes;
    use revmig_test_utils::{MessageType, TestingConsole};
    use revmig_transform::{Console, WorkTree};

    fn logging(name: &str, text: &'static str) -> ConfigFunction {
        ConfigFunction::new(name, move |work| {
            work.console().info(text);
            Ok(())
        })
    }

    #[test]
    fn function_runs_against_context() {
        let step = FunctionTransformation::new(logging("test", "Foo"));
        let console = TestingConsole::new();
        let mut tree = WorkTree::new();
        let mut work = TransformWork::new(&mut tree, "", Changes::empty(), &console);

        step.apply(&mut work).unwrap();
        console.assert_once_in_log(MessageType::Info, "Foo");
    }

    #[test]
    fn console_errors_are_counted_not_raised() {
        let step = FunctionTransformation::new(ConfigFunction::new("check", |work| {
            work.console().error("bad header");
            Ok(())
        }));
        let console = TestingConsole::new();
        let mut tree = WorkTree::new();
        let mut work = TransformWork::new(&mut tree, "", Changes::empty(), &console);

        step.apply(&mut work).unwrap();
        assert_eq!(work.console().error_count(), 1);
        console.assert_once_in_log(MessageType::Error, "bad header");
    }

    #[test]
    fn reverse_is_explicit_noop() {
        let step = FunctionTransformation::new(logging("test", "Foo"));
        let reversed = step.reverse().unwrap();

        let expected: DynTransformation = Arc::new(ExplicitReversal::new(
            Arc::new(IntentionalNoop),
            Arc::new(step.clone()),
        ));
        assert_eq!(&*reversed, &*expected);
        assert_eq!(reversed.describe(), "noop");

        // Reversing back runs the function again
        let console = TestingConsole::new();
        let mut tree = WorkTree::new();
        let mut work = TransformWork::new(&mut tree, "", Changes::empty(), &console);
        reversed.reverse().unwrap().apply(&mut work).unwrap();
        console.assert_once_in_log(MessageType::Info, "Foo");
    }

    #[test]
    fn equality_is_by_identity_of_body() {
        let a = logging("f", "x");
        let b = logging("f", "x");
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
