use std::sync::atomic::{AtomicUsize, Ordering};

use crate::dependent::Dependents;
use crate::key::CacheKey;
use crate::passthroughhasher::KeyMap;

/// The store of a single selector.
pub(crate) struct CacheData<D, O> {
    /// Maps from keys to the latest result for that key.
    map: KeyMap<CacheEntry<D, O>>,
}

/// A memoized result.
struct CacheEntry<D, O> {
    /// The dependents the output was computed from.
    dependents: D,
    /// The compute function's output.
    output: O,
    /// How many evictions have passed since the entry has last been used.
    age: AtomicUsize,
}

impl<D, O> CacheData<D, O> {
    /// The number of stored entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Return the stored output for `key` if it was computed from the same
    /// dependents.
    pub fn lookup(&self, key: &CacheKey, dependents: &D) -> Option<O>
    where
        D: Dependents,
        O: Clone,
    {
        let entry = self.map.get(key)?;
        if !entry.dependents.same(dependents) {
            return None;
        }
        entry.age.store(0, Ordering::SeqCst);
        Some(entry.output.clone())
    }

    /// Store an output together with the dependents it was computed from,
    /// replacing whatever was stored under `key`.
    pub fn insert(&mut self, key: CacheKey, dependents: D, output: O) {
        self.map
            .insert(key, CacheEntry { dependents, output, age: AtomicUsize::new(0) });
    }

    /// Evict all entries whose age is larger than `max_age`.
    pub fn evict(&mut self, max_age: usize) {
        self.map.retain(|_, entry| {
            let age = entry.age.get_mut();
            *age += 1;
            *age <= max_age
        });
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<D, O> Default for CacheData<D, O> {
    fn default() -> Self {
        Self { map: KeyMap::default() }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_lookup_requires_same_dependents() {
        let posts = Arc::new(vec!["a"]);
        let mut cache = CacheData::default();
        cache.insert(CacheKey::new("site1"), (posts.clone(),), 1);

        assert_eq!(cache.lookup(&CacheKey::new("site1"), &(posts.clone(),)), Some(1));
        assert_eq!(cache.lookup(&CacheKey::new("site2"), &(posts.clone(),)), None);
        assert_eq!(cache.lookup(&CacheKey::new("site1"), &(Arc::new(vec!["a"]),)), None);
    }

    #[test]
    fn test_insert_replaces_entry() {
        let mut cache = CacheData::default();
        cache.insert(CacheKey::new("k"), (1,), "one");
        cache.insert(CacheKey::new("k"), (2,), "two");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup(&CacheKey::new("k"), &(1,)), None);
        assert_eq!(cache.lookup(&CacheKey::new("k"), &(2,)), Some("two"));
    }

    #[test]
    fn test_evict_ages() {
        let mut cache = CacheData::default();
        cache.insert(CacheKey::new("k"), (), 0);
        cache.evict(1);
        assert_eq!(cache.len(), 1);
        cache.evict(1);
        assert_eq!(cache.len(), 0);

        cache.insert(CacheKey::new("k"), (), 0);
        cache.evict(1);
        assert_eq!(cache.lookup(&CacheKey::new("k"), &()), Some(0));
        cache.evict(1);
        assert_eq!(cache.len(), 1);
        cache.evict(0);
        assert_eq!(cache.len(), 0);
    }
}
