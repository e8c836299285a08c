use std::convert::Infallible;
use std::fmt::{self, Debug, Formatter};

use parking_lot::RwLock;

use crate::cache::CacheData;
use crate::dependent::Dependents;
use crate::error::{ConfigError, SelectError};
use crate::key::{self, Args, CacheKey};
use crate::mode::Mode;

type KeyFn<S, A> = Box<dyn Fn(&S, &A) -> CacheKey + Send + Sync>;

/// The extractor run on every call.
enum Extract<S, A, D, E> {
    Infallible(Box<dyn Fn(&S, &A) -> D + Send + Sync>),
    Fallible(Box<dyn Fn(&S, &A) -> Result<D, E> + Send + Sync>),
}

impl<S, A, D, E> Extract<S, A, D, E> {
    fn call(&self, state: &S, args: &A) -> Result<D, E> {
        match self {
            Self::Infallible(f) => Ok(f(state, args)),
            Self::Fallible(f) => f(state, args),
        }
    }
}

/// The derivation run on a cache miss.
enum Compute<A, D, O, E> {
    Infallible(Box<dyn Fn(&D, &A) -> O + Send + Sync>),
    Fallible(Box<dyn Fn(&D, &A) -> Result<O, E> + Send + Sync>),
}

impl<A, D, O, E> Compute<A, D, O, E> {
    fn call(&self, dependents: &D, args: &A) -> Result<O, E> {
        match self {
            Self::Infallible(f) => Ok(f(dependents, args)),
            Self::Fallible(f) => f(dependents, args),
        }
    }
}

/// A memoized derivation over a state tree.
///
/// - `S` is the state the selector reads from.
/// - `A` is the tuple of call arguments, see [`Args`].
/// - `D` is the sequence of dependents, see [`Dependents`].
/// - `O` is the derived output. Hits return a clone of it, so wrap large
///   outputs in an `Arc` to share them.
/// - `E` is the error of a fallible extractor or compute function.
///
/// Every call runs the dependents extractor. The compute function only runs
/// when no output is stored for the call's key or when the stored output was
/// computed from different dependents. Outputs are never dropped on their own:
/// the store grows with the number of distinct keys ever seen. Call
/// [`evict`](Self::evict) to bound it.
pub struct Selector<S, A, D, O, E = Infallible> {
    dependents: Option<Extract<S, A, D, E>>,
    compute: Option<Compute<A, D, O, E>>,
    key: Option<KeyFn<S, A>>,
    mode: Mode,
    cache: RwLock<CacheData<D, O>>,
}

impl<S, A, D, O> Selector<S, A, D, O> {
    /// Create a selector from a dependents extractor and a compute function,
    /// keyed by the default key and using the default [`Mode`].
    pub fn new<F, G>(dependents: F, compute: G) -> Self
    where
        F: Fn(&S, &A) -> D + Send + Sync + 'static,
        G: Fn(&D, &A) -> O + Send + Sync + 'static,
    {
        Self {
            dependents: Some(Extract::Infallible(Box::new(dependents))),
            compute: Some(Compute::Infallible(Box::new(compute))),
            key: None,
            mode: Mode::default(),
            cache: RwLock::new(CacheData::default()),
        }
    }
}

impl<S, A, D, O, E> Selector<S, A, D, O, E> {
    /// Start configuring a selector.
    pub fn builder() -> Builder<S, A, D, O, E> {
        Builder {
            dependents: None,
            compute: None,
            key: None,
            mode: Mode::default(),
        }
    }

    /// Compute the output for the given state and arguments or reuse the one
    /// stored for the same key and dependents.
    ///
    /// Errors of the extractor are returned as [`SelectError::Dependents`],
    /// errors of the compute function as [`SelectError::Compute`]. Neither
    /// touches the store.
    pub fn select(&self, state: &S, args: A) -> Result<O, SelectError<E>>
    where
        A: Args,
        D: Dependents,
        O: Clone,
    {
        let (Some(extract), Some(compute)) = (&self.dependents, &self.compute) else {
            return Err(SelectError::Incomplete);
        };

        let key = match &self.key {
            Some(f) => f(state, &args),
            None => key::default_key(&args, self.mode.validates())?,
        };

        let dependents = extract.call(state, &args).map_err(SelectError::Dependents)?;

        let hit = self.cache.read().lookup(&key, &dependents);
        if let Some(output) = hit {
            tracing::trace!(%key, "selector hit");

            #[cfg(feature = "testing")]
            crate::testing::register_hit();

            return Ok(output);
        }

        // The lock is released while computing so that the compute function
        // can call other selectors or this one.
        let output = compute.call(&dependents, &args).map_err(SelectError::Compute)?;
        tracing::trace!(%key, "selector miss");

        self.cache.write().insert(key, dependents, output.clone());

        #[cfg(feature = "testing")]
        crate::testing::register_miss();

        Ok(output)
    }

    /// The mode the selector was built with.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The number of stored outputs.
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Whether no output is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evict stored outputs.
    ///
    /// This removes all outputs whose age is larger than `max_age`. The age
    /// of an output grows by one during each eviction and is reset to zero
    /// when it produces a cache hit. Set `max_age` to zero to completely
    /// clear the store.
    pub fn evict(&self, max_age: usize) {
        self.cache.write().evict(max_age);
    }

    /// Remove all stored outputs.
    pub fn clear(&self) {
        self.cache.write().clear();
    }
}

impl<S, A, D, O, E> Debug for Selector<S, A, D, O, E> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Selector")
            .field("mode", &self.mode)
            .field("custom_key", &self.key.is_some())
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// Configures a [`Selector`].
///
/// ```
/// use std::sync::Arc;
/// use tree_select::{CacheKey, Mode, Selector};
///
/// struct State {
///     counts: Arc<Vec<u32>>,
/// }
///
/// let total = Selector::builder()
///     .dependents(|state: &State, _: &(Vec<u32>,)| (state.counts.clone(),))
///     .compute(|(counts,): &(Arc<Vec<u32>>,), (picks,): &(Vec<u32>,)| {
///         picks.iter().map(|&i| counts[i as usize]).sum::<u32>()
///     })
///     .cache_key(|_: &State, (picks,): &(Vec<u32>,)| CacheKey::join(picks))
///     .mode(Mode::Development)
///     .build()
///     .unwrap();
///
/// let state = State { counts: Arc::new(vec![3, 4, 5]) };
/// assert_eq!(total.select(&state, (vec![0, 2],)).unwrap(), 8);
/// ```
pub struct Builder<S, A, D, O, E = Infallible> {
    dependents: Option<Extract<S, A, D, E>>,
    compute: Option<Compute<A, D, O, E>>,
    key: Option<KeyFn<S, A>>,
    mode: Mode,
}

impl<S, A, D, O, E> Builder<S, A, D, O, E> {
    /// Set the function that extracts the dependents from the state.
    ///
    /// It runs on every call and must be pure.
    pub fn dependents<F>(mut self, f: F) -> Self
    where
        F: Fn(&S, &A) -> D + Send + Sync + 'static,
    {
        self.dependents = Some(Extract::Infallible(Box::new(f)));
        self
    }

    /// Set a fallible dependents extractor.
    ///
    /// Its errors are passed through to the caller before the store is
    /// consulted. Pair it with [`try_compute`](Self::try_compute), which
    /// shares the error type.
    pub fn try_dependents<F>(mut self, f: F) -> Self
    where
        F: Fn(&S, &A) -> Result<D, E> + Send + Sync + 'static,
    {
        self.dependents = Some(Extract::Fallible(Box::new(f)));
        self
    }

    /// Set a fallible compute function.
    ///
    /// Its errors are passed through to the caller and never cached.
    pub fn try_compute<G>(mut self, f: G) -> Self
    where
        G: Fn(&D, &A) -> Result<O, E> + Send + Sync + 'static,
    {
        self.compute = Some(Compute::Fallible(Box::new(f)));
        self
    }

    /// Address cache slots with a custom key instead of the joined
    /// arguments.
    ///
    /// This is required for composite arguments. The key must be a pure
    /// function of its inputs.
    pub fn cache_key<K>(mut self, f: K) -> Self
    where
        K: Fn(&S, &A) -> CacheKey + Send + Sync + 'static,
    {
        self.key = Some(Box::new(f));
        self
    }

    /// Set the validation mode.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Finish the selector.
    ///
    /// In development mode this fails if the dependents extractor or the
    /// compute function is missing. In production mode the selector is built
    /// regardless and fails with [`SelectError::Incomplete`] when called.
    pub fn build(self) -> Result<Selector<S, A, D, O, E>, ConfigError> {
        if self.mode.validates() {
            if self.dependents.is_none() {
                return Err(ConfigError::MissingDependents);
            }
            if self.compute.is_none() {
                return Err(ConfigError::MissingCompute);
            }
        }

        tracing::debug!(mode = %self.mode, custom_key = self.key.is_some(), "selector built");

        Ok(Selector {
            dependents: self.dependents,
            compute: self.compute,
            key: self.key,
            mode: self.mode,
            cache: RwLock::new(CacheData::default()),
        })
    }
}

impl<S, A, D, O> Builder<S, A, D, O, Infallible> {
    /// Set the compute function.
    ///
    /// It runs only on a cache miss and must be pure.
    pub fn compute<G>(mut self, f: G) -> Self
    where
        G: Fn(&D, &A) -> O + Send + Sync + 'static,
    {
        self.compute = Some(Compute::Infallible(Box::new(f)));
        self
    }
}
