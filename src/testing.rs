//! Hooks for observing cache behaviour in tests.

use std::cell::Cell;

/// The outcome of a selector call that produced a value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
    Hit,
    Miss,
}

thread_local! {
    /// The outcome of the last successful call on this thread.
    static LAST: Cell<Option<Outcome>> = const { Cell::new(None) };
}

/// The outcome of the last successful selector call on this thread.
///
/// Failed calls do not update it.
pub fn last_outcome() -> Option<Outcome> {
    LAST.with(|cell| cell.get())
}

/// Whether the last successful call on this thread was a hit.
pub fn last_was_hit() -> bool {
    last_outcome() == Some(Outcome::Hit)
}

/// Marks the last call as a cache hit.
pub(crate) fn register_hit() {
    LAST.with(|cell| cell.set(Some(Outcome::Hit)))
}

/// Marks the last call as a cache miss.
pub(crate) fn register_miss() {
    LAST.with(|cell| cell.set(Some(Outcome::Miss)))
}
