use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt::{self, Debug, Display, Formatter, Write};
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::Arc;

use siphasher::sip128::{Hasher128, SipHasher13};

use crate::error::UsageError;

/// The text a composite argument contributes to a default key.
///
/// All composite values share it, so they can never be told apart.
const COMPOSITE: &str = "[composite]";

/// Identifies an independent cache slot of a selector.
///
/// Keys compare by their text. The 128-bit hash of the text is computed once
/// on construction and is all that is fed into a hasher, so a key can be
/// looked up repeatedly without rehashing its text.
#[derive(Clone)]
pub struct CacheKey {
    /// The precomputed hash of `text`.
    hash: u128,
    /// The textual form of the key.
    text: Box<str>,
}

impl CacheKey {
    /// Create a key from its text.
    pub fn new(text: impl Into<Box<str>>) -> Self {
        let text = text.into();
        let mut state = SipHasher13::new();
        state.write(text.as_bytes());
        Self { hash: state.finish128().as_u128(), text }
    }

    /// Create a key by joining the display forms of `parts` with commas.
    ///
    /// # Panics
    /// Panics if a part's `Display` implementation returns an error, as
    /// `ToString` does. A partially written part could make distinct keys
    /// collide.
    ///
    /// ```
    /// # use tree_select::CacheKey;
    /// let key = CacheKey::join([&2916284 as &dyn std::fmt::Display, &"statsStreak"]);
    /// assert_eq!(key.as_str(), "2916284,statsStreak");
    /// ```
    pub fn join<I>(parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let mut text = String::new();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                text.push(',');
            }
            if write!(text, "{part}").is_err() {
                panic!("tree-select: a key part's Display implementation returned an error");
            }
        }
        Self::new(text)
    }

    /// The textual form of the key.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Hash for CacheKey {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u128(self.hash);
    }
}

impl PartialEq for CacheKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.text == other.text
    }
}

impl Eq for CacheKey {}

impl Debug for CacheKey {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        Debug::fmt(&self.text, f)
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.pad(&self.text)
    }
}

impl From<String> for CacheKey {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for CacheKey {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<Box<str>> for CacheKey {
    fn from(text: Box<str>) -> Self {
        Self::new(text)
    }
}

/// A primitive argument value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Primitive<'a> {
    /// An absent value. Written as the empty string.
    Undefined,
    /// An explicit null. Written as the empty string.
    Null,
    /// Written as `true` or `false`.
    Bool(bool),
    /// A signed integer, written in decimal.
    Int(i128),
    /// An unsigned integer too large for `Int`, written in decimal.
    UInt(u128),
    /// A float. Zero is written as `0` and the infinities as `Infinity` and
    /// `-Infinity`.
    Float(f64),
    /// A character, written verbatim.
    Char(char),
    /// A string, written verbatim.
    Str(&'a str),
}

impl Primitive<'_> {
    /// Append the key text of this primitive.
    fn write_key(&self, text: &mut String) {
        match *self {
            Self::Undefined | Self::Null => {}
            Self::Bool(v) => text.push_str(if v { "true" } else { "false" }),
            Self::Int(v) => {
                let _ = write!(text, "{v}");
            }
            Self::UInt(v) => {
                let _ = write!(text, "{v}");
            }
            Self::Float(v) if v == 0.0 => text.push('0'),
            Self::Float(v) if v.is_infinite() => {
                text.push_str(if v > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Self::Float(v) => {
                let _ = write!(text, "{v}");
            }
            Self::Char(v) => text.push(v),
            Self::Str(v) => text.push_str(v),
        }
    }
}

/// How an argument participates in a default cache key.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ArgKind<'a> {
    /// The argument has a stable textual form.
    Primitive(Primitive<'a>),
    /// The argument is structured. It has no faithful key text.
    Composite,
}

/// A value that can be passed as a selector argument.
///
/// Implemented for the primitive types, strings, options and the standard
/// collections (which classify as composite). User types can derive it with
/// [`#[derive(KeyArg)]`](macro@crate::KeyArg).
pub trait KeyArg {
    /// Classify this value.
    fn classify(&self) -> ArgKind<'_>;
}

macro_rules! primitive_arg {
    ($variant:ident as $as:ty: $($ty:ty),*) => {
        $(impl KeyArg for $ty {
            #[inline]
            fn classify(&self) -> ArgKind<'_> {
                ArgKind::Primitive(Primitive::$variant(*self as $as))
            }
        })*
    };
}

primitive_arg! { Int as i128: i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize }
primitive_arg! { Float as f64: f32, f64 }
primitive_arg! { Bool as bool: bool }
primitive_arg! { Char as char: char }

impl KeyArg for u128 {
    fn classify(&self) -> ArgKind<'_> {
        match i128::try_from(*self) {
            Ok(v) => ArgKind::Primitive(Primitive::Int(v)),
            Err(_) => ArgKind::Primitive(Primitive::UInt(*self)),
        }
    }
}

impl KeyArg for () {
    fn classify(&self) -> ArgKind<'_> {
        ArgKind::Primitive(Primitive::Undefined)
    }
}

impl KeyArg for str {
    fn classify(&self) -> ArgKind<'_> {
        ArgKind::Primitive(Primitive::Str(self))
    }
}

macro_rules! string_arg {
    ($($ty:ty),*) => {
        $(impl KeyArg for $ty {
            #[inline]
            fn classify(&self) -> ArgKind<'_> {
                ArgKind::Primitive(Primitive::Str(self))
            }
        })*
    };
}

string_arg! { String, Box<str>, Arc<str>, Rc<str>, Cow<'_, str> }

impl<T: KeyArg + ?Sized> KeyArg for &T {
    #[inline]
    fn classify(&self) -> ArgKind<'_> {
        (**self).classify()
    }
}

impl<T: KeyArg> KeyArg for Option<T> {
    fn classify(&self) -> ArgKind<'_> {
        match self {
            Some(v) => v.classify(),
            None => ArgKind::Primitive(Primitive::Null),
        }
    }
}

macro_rules! composite_arg {
    ($(<$($param:ident),*> $ty:ty),* $(,)?) => {
        $(impl<$($param),*> KeyArg for $ty {
            #[inline]
            fn classify(&self) -> ArgKind<'_> {
                ArgKind::Composite
            }
        })*
    };
}

composite_arg! {
    <T> [T],
    <T> Vec<T>,
    <T> VecDeque<T>,
    <T> BTreeSet<T>,
    <T, S> HashSet<T, S>,
    <K, V> BTreeMap<K, V>,
    <K, V, S> HashMap<K, V, S>,
}

impl<T, const N: usize> KeyArg for [T; N] {
    fn classify(&self) -> ArgKind<'_> {
        ArgKind::Composite
    }
}

/// The non-state arguments of a selector call.
///
/// Implemented for tuples of up to twelve [`KeyArg`]s.
pub trait Args {
    /// Visit each argument in order with its classification and type name.
    fn visit<'a>(&'a self, f: &mut dyn FnMut(ArgKind<'a>, &'static str));
}

macro_rules! args_tuple {
    ($($param:tt $idx:tt),*) => {
        impl<$($param: KeyArg),*> Args for ($($param,)*) {
            #[allow(unused_variables)]
            fn visit<'a>(&'a self, f: &mut dyn FnMut(ArgKind<'a>, &'static str)) {
                $(f(self.$idx.classify(), std::any::type_name::<$param>());)*
            }
        }
    };
}

args_tuple! {}
args_tuple! { A 0 }
args_tuple! { A 0, B 1 }
args_tuple! { A 0, B 1, C 2 }
args_tuple! { A 0, B 1, C 2, D 3 }
args_tuple! { A 0, B 1, C 2, D 3, E 4 }
args_tuple! { A 0, B 1, C 2, D 3, E 4, F 5 }
args_tuple! { A 0, B 1, C 2, D 3, E 4, F 5, G 6 }
args_tuple! { A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7 }
args_tuple! { A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8 }
args_tuple! { A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9 }
args_tuple! { A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10 }
args_tuple! { A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11 }

/// Derive the default key for a set of arguments.
///
/// When `validate` is set, the first composite argument produces an error
/// instead of a key.
pub(crate) fn default_key<A: Args>(args: &A, validate: bool) -> Result<CacheKey, UsageError> {
    let mut text = String::new();
    let mut position = 0;
    let mut misuse = None;

    args.visit(&mut |kind, type_name| {
        if position > 0 {
            text.push(',');
        }
        match kind {
            ArgKind::Primitive(primitive) => primitive.write_key(&mut text),
            ArgKind::Composite => {
                if validate && misuse.is_none() {
                    misuse = Some(UsageError { position, type_name });
                }
                text.push_str(COMPOSITE);
            }
        }
        position += 1;
    });

    match misuse {
        Some(err) => Err(err),
        None => Ok(CacheKey::new(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key<A: Args>(args: A) -> String {
        default_key(&args, true).unwrap().as_str().to_string()
    }

    #[test]
    fn test_default_key_text() {
        assert_eq!(key(()), "");
        assert_eq!(key((1, 2, 3)), "1,2,3");
        assert_eq!(key(("site1",)), "site1");
        assert_eq!(key((true, 'x', 1.5)), "true,x,1.5");
        assert_eq!(key((None::<u32>, (), Some("a"))), ",,a");
        assert_eq!(key((-0.0, f64::INFINITY, 2.0f32)), "0,Infinity,2");
        assert_eq!(key((String::from("a"), Arc::<str>::from("b"))), "a,b");
    }

    #[test]
    fn test_default_key_wide_integers() {
        assert_eq!(key((u128::MAX,)), u128::MAX.to_string());
        assert_eq!(key((7u128, i128::MIN)), format!("7,{}", i128::MIN));
        assert_ne!(
            default_key(&(u128::MAX,), true).unwrap(),
            default_key(&(u128::MAX - 1,), true).unwrap()
        );
    }

    #[test]
    #[should_panic(expected = "Display implementation returned an error")]
    fn test_join_rejects_failing_display() {
        struct Broken;

        impl Display for Broken {
            fn fmt(&self, f: &mut Formatter) -> fmt::Result {
                f.write_str("half")?;
                Err(fmt::Error)
            }
        }

        CacheKey::join([Broken]);
    }

    #[test]
    fn test_default_key_rejects_composites() {
        let err = default_key(&(1, vec![1, 2]), true).unwrap_err();
        assert_eq!(err.position, 1);
        assert!(err.type_name.contains("Vec"));

        let err = default_key(&(HashMap::<u32, u32>::new(),), true).unwrap_err();
        assert_eq!(err.position, 0);
    }

    #[test]
    fn test_default_key_collapses_composites_unvalidated() {
        let a = default_key(&(1, vec![1]), false).unwrap();
        let b = default_key(&(1, vec![2, 3]), false).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "1,[composite]");
    }

    #[quickcheck_macros::quickcheck]
    fn prop_default_key_is_deterministic(a: u32, b: String, c: Option<bool>) -> bool {
        default_key(&(a, b.clone(), c), true).unwrap() == default_key(&(a, b, c), true).unwrap()
    }

    #[quickcheck_macros::quickcheck]
    fn prop_integers_get_distinct_keys(a: i64, b: i64) -> bool {
        let same = default_key(&(a,), true).unwrap() == default_key(&(b,), true).unwrap();
        same == (a == b)
    }

    #[test]
    fn test_key_equality_is_by_text() {
        assert_eq!(CacheKey::new("a,b"), CacheKey::from(String::from("a,b")));
        assert_ne!(CacheKey::new("a,b"), CacheKey::new("a,c"));
        assert_eq!(CacheKey::join([1, 2]), CacheKey::new("1,2"));
    }
}
