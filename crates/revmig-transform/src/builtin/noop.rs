use crate::error::{NonReversibleError, TransformError};
use crate::transformation::{DynTransformation, Transformation};
use crate::work::TransformWork;
use std::sync::Arc;

/// Step that deliberately does nothing; its own inverse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntentionalNoop;

impl Transformation for IntentionalNoop {
    fn apply(&self, _work: &mut TransformWork<'_>) -> Result<(), TransformError> {
        Ok(())
    }

    fn reverse(&self) -> Result<DynTransformation, NonReversibleError> {
        Ok(Arc::new(Self))
    }

    fn describe(&self) -> String {
        "noop".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::testing::apply_to;
    use crate::work::WorkTree;

    #[test]
    fn noop_leaves_everything() {
        let mut tree = WorkTree::from_files([("a", "x")]);
        let message = apply_to(&IntentionalNoop, &mut tree, "msg").unwrap();
        assert_eq!(message, "msg");
        assert_eq!(tree, WorkTree::from_files([("a", "x")]));
    }

    #[test]
    fn noop_reverses_to_itself() {
        let expected: DynTransformation = Arc::new(IntentionalNoop);
        let reversed = IntentionalNoop.reverse().unwrap();
        assert_eq!(&*reversed, &*expected);
    }
}
