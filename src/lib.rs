//! Selector memoization with dependency tracking.
//!
//! A [`Selector`] wraps a pure derivation over a large, frequently changing
//! state tree. On every call it asks a _dependents extractor_ for the slices
//! of state the derivation reads and only recomputes when one of those slices
//! was replaced since the last call with the same arguments.
//!
//! ```
//! use std::sync::Arc;
//! use tree_select::Selector;
//!
//! struct State {
//!     posts: Arc<Vec<(u32, &'static str)>>,
//! }
//!
//! let titles_for_site = Selector::new(
//!     |state: &State, _: &(u32,)| (state.posts.clone(),),
//!     |(posts,): &(Arc<Vec<(u32, &'static str)>>,), &(site,): &(u32,)| {
//!         posts
//!             .iter()
//!             .filter(|(s, _)| *s == site)
//!             .map(|(_, title)| *title)
//!             .collect::<Vec<_>>()
//!     },
//! );
//!
//! let state = State { posts: Arc::new(vec![(1, "Hello"), (2, "World")]) };
//! assert_eq!(titles_for_site.select(&state, (1,)).unwrap(), ["Hello"]);
//! ```
//!
//! Dependents are compared _positionally_: same length and every element
//! equal, where shared handles like [`Arc`](std::sync::Arc) compare by
//! identity and primitives by value. See [`Dependent`] for the details.
//!
//! Each distinct argument tuple gets its own cache slot. Without an explicit
//! key function the slot is addressed by joining the arguments' primitive
//! forms, which is why [`Mode::Development`] rejects composite arguments.

mod cache;
mod dependent;
mod error;
mod key;
mod mode;
mod passthroughhasher;
mod selector;

#[cfg(feature = "serde")]
mod serialized;
#[cfg(feature = "testing")]
pub mod testing;

pub use crate::dependent::{Dependent, Dependents, Value};
pub use crate::error::{ConfigError, ParseModeError, SelectError, UsageError};
pub use crate::key::{ArgKind, Args, CacheKey, KeyArg, Primitive};
pub use crate::mode::Mode;
pub use crate::selector::{Builder, Selector};

#[cfg(feature = "serde")]
pub use crate::serialized::Serialized;
#[cfg(feature = "macros")]
pub use tree_select_macros::KeyArg;
