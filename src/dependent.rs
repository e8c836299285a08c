use std::rc::Rc;
use std::sync::Arc;

/// A single value a derivation depends on.
///
/// Dependents are compared under one fixed rule: primitives by value, shared
/// handles by identity. Two `Arc`s holding structurally equal data are
/// _different_ dependents unless they point to the same allocation. This
/// matches state containers with immutable updates, where replacing a subtree
/// produces a new handle for it and keeps the old handles of untouched
/// subtrees.
///
/// Wrap a plain value type in [`Value`] to compare it by `PartialEq`.
pub trait Dependent {
    /// Whether `self` and `other` are the same dependent.
    fn same(&self, other: &Self) -> bool;
}

impl<T: ?Sized> Dependent for Arc<T> {
    #[inline]
    fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> Dependent for Rc<T> {
    #[inline]
    fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: Dependent> Dependent for Option<T> {
    #[inline]
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same(b),
            (None, None) => true,
            _ => false,
        }
    }
}

macro_rules! by_value {
    ($($ty:ty),*) => {
        $(impl Dependent for $ty {
            #[inline]
            fn same(&self, other: &Self) -> bool {
                self == other
            }
        })*
    };
}

by_value! {
    (), bool, char, &str, String,
    i8, i16, i32, i64, i128, isize,
    u8, u16, u32, u64, u128, usize,
    f32, f64
}

/// Compares a plain value by `PartialEq` when used as a dependent.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Value<T>(pub T);

impl<T: PartialEq> Dependent for Value<T> {
    #[inline]
    fn same(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

/// The ordered sequence of dependents returned by an extractor.
///
/// Implemented for tuples of up to twelve [`Dependent`]s and for vectors,
/// arrays and boxed slices of a single dependent type.
pub trait Dependents {
    /// Whether both sequences have the same length and are pairwise the same.
    fn same(&self, other: &Self) -> bool;
}

/// Positional equality over slices.
fn positional<T: Dependent>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same(y))
}

impl<T: Dependent> Dependents for Vec<T> {
    fn same(&self, other: &Self) -> bool {
        positional(self, other)
    }
}

impl<T: Dependent> Dependents for Box<[T]> {
    fn same(&self, other: &Self) -> bool {
        positional(self, other)
    }
}

impl<T: Dependent, const N: usize> Dependents for [T; N] {
    fn same(&self, other: &Self) -> bool {
        positional(self, other)
    }
}

macro_rules! dependents_tuple {
    ($($param:tt $idx:tt),*) => {
        impl<$($param: Dependent),*> Dependents for ($($param,)*) {
            #[allow(unused_variables)]
            #[inline]
            fn same(&self, other: &Self) -> bool {
                true $(&& self.$idx.same(&other.$idx))*
            }
        }
    };
}

dependents_tuple! {}
dependents_tuple! { A 0 }
dependents_tuple! { A 0, B 1 }
dependents_tuple! { A 0, B 1, C 2 }
dependents_tuple! { A 0, B 1, C 2, D 3 }
dependents_tuple! { A 0, B 1, C 2, D 3, E 4 }
dependents_tuple! { A 0, B 1, C 2, D 3, E 4, F 5 }
dependents_tuple! { A 0, B 1, C 2, D 3, E 4, F 5, G 6 }
dependents_tuple! { A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7 }
dependents_tuple! { A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8 }
dependents_tuple! { A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9 }
dependents_tuple! { A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10 }
dependents_tuple! { A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_not_structure() {
        let a = Arc::new(vec![1, 2, 3]);
        let b = Arc::new(vec![1, 2, 3]);
        assert!(a.same(&a.clone()));
        assert!(!a.same(&b));
    }

    #[test]
    fn test_primitives_by_value() {
        assert!(Dependent::same(&"a", &"a"));
        assert!(Dependent::same(&String::from("x"), &String::from("x")));
        assert!(!Dependent::same(&1u32, &2u32));
        assert!(!Dependent::same(&f64::NAN, &f64::NAN));
        assert!(Value(vec![1]).same(&Value(vec![1])));
    }

    #[test]
    fn test_positional() {
        let a = Arc::new(1);
        let b = Arc::new(2);
        assert!(Dependents::same(&(a.clone(), 3), &(a.clone(), 3)));
        assert!(!Dependents::same(&(a.clone(), 3), &(b.clone(), 3)));
        assert!(!Dependents::same(&vec![a.clone()], &vec![a.clone(), b.clone()]));
        assert!(!Dependents::same(&vec![a.clone(), b.clone()], &vec![b, a]));
        assert!(Dependents::same(&(), &()));
    }

    #[test]
    fn test_optional_dependents() {
        let a = Arc::new("post");
        assert!(Some(a.clone()).same(&Some(a.clone())));
        assert!(None::<Arc<&str>>.same(&None));
        assert!(!Some(a).same(&None));
    }
}
