use thiserror::Error;

/// A selector was built without one of its required functions.
///
/// Only reported in [`Mode::Development`](crate::Mode::Development).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("tree-select: a dependents extractor is required")]
    MissingDependents,
    #[error("tree-select: a compute function is required")]
    MissingCompute,
}

/// A composite argument reached the default key derivation.
///
/// Composite values have no faithful key text: distinct values would share a
/// cache slot. Pass an explicit key function or a primitive argument instead.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
#[error(
    "tree-select: argument {position} of type `{type_name}` is not a primitive; \
     supply a cache key function to use composite arguments"
)]
pub struct UsageError {
    /// The zero-based position of the offending argument.
    pub position: usize,
    /// The Rust type of the offending argument.
    pub type_name: &'static str,
}

/// Why a selector call did not produce a value.
#[derive(Debug, Error)]
pub enum SelectError<E> {
    #[error(transparent)]
    Usage(#[from] UsageError),
    /// The selector is missing a required function. Only possible when it
    /// was built in production mode.
    #[error("tree-select: selector is incomplete")]
    Incomplete,
    /// The dependents extractor failed. Nothing was cached.
    #[error(transparent)]
    Dependents(E),
    /// The compute function failed. Nothing was cached.
    #[error(transparent)]
    Compute(E),
}

impl<E> SelectError<E> {
    /// The compute function's error, if that is what failed.
    pub fn into_compute(self) -> Option<E> {
        match self {
            Self::Compute(err) => Some(err),
            _ => None,
        }
    }

    /// The error of either derivation function, if that is what failed.
    pub fn into_derivation(self) -> Option<E> {
        match self {
            Self::Dependents(err) | Self::Compute(err) => Some(err),
            _ => None,
        }
    }
}

/// The text did not name a mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("tree-select: unknown mode `{0}`, expected `development` or `production`")]
pub struct ParseModeError(pub String);
