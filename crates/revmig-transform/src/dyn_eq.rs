//! Value equality across trait objects

use std::any::Any;

/// Object-safe equality, implemented for every `PartialEq + 'static` type
///
/// Two values compare equal only when they have the same concrete type
/// and that type's `PartialEq` says so.
pub trait DynEq: Any {
    /// Upcast for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Compare with a value of unknown concrete type
    fn dyn_eq(&self, other: &dyn Any) -> bool;
}

impl<T: Any + PartialEq> DynEq for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct A(u8);

    #[derive(Debug, PartialEq)]
    struct B(u8);

    #[test]
    fn same_type_compares_values() {
        assert!(A(1).dyn_eq(A(1).as_any()));
        assert!(!A(1).dyn_eq(A(2).as_any()));
    }

    #[test]
    fn different_types_never_equal() {
        assert!(!A(1).dyn_eq(B(1).as_any()));
    }
}
