//! Process-wide cache tags.
//!
//! A tag names a group of fetched data. Fetches mark their tag fresh,
//! successful mutations mark it stale, and the next fetch under a stale tag
//! goes back to the backend. Tags are only reachable through
//! [`crate::EntityKind::tag`], never as loose string literals.

use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheTag(&'static str);

impl CacheTag {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct TagState {
    stale: bool,
    /// Bumped on every invalidation, including ones that find the tag stale.
    generation: u64,
}

/// Shared handle to the tag table. Clones see the same state.
#[derive(Debug, Default, Clone)]
pub struct TagRegistry {
    tags: Arc<Mutex<HashMap<CacheTag, TagState>>>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by the whole process.
    pub fn global() -> TagRegistry {
        static GLOBAL: OnceLock<TagRegistry> = OnceLock::new();
        GLOBAL.get_or_init(TagRegistry::new).clone()
    }

    /// Record that data under `tag` was just fetched.
    pub fn mark_fresh(&self, tag: CacheTag) {
        self.lock().entry(tag).or_default().stale = false;
    }

    /// Mark `tag` fresh only if no invalidation happened since `generation`
    /// was read. Returns whether the tag is now fresh.
    pub fn mark_fresh_since(&self, tag: CacheTag, generation: u64) -> bool {
        let mut tags = self.lock();
        let state = tags.entry(tag).or_default();
        if state.generation != generation {
            debug!("{tag} invalidated during fetch, keeping it stale");
            return false;
        }
        state.stale = false;
        true
    }

    /// Mark everything fetched under `tag` as stale. Returns `false` when the
    /// tag was already stale (or never fetched). The generation moves either
    /// way, so a fetch running concurrently will not mark the tag fresh.
    pub fn invalidate(&self, tag: CacheTag) -> bool {
        let mut tags = self.lock();
        let state = tags.entry(tag).or_insert(TagState { stale: true, generation: 0 });
        let was_fresh = !state.stale;
        state.stale = true;
        state.generation += 1;
        debug!("invalidated {tag} (generation {})", state.generation);
        was_fresh
    }

    /// A tag that was never fetched counts as stale.
    pub fn is_stale(&self, tag: CacheTag) -> bool {
        self.lock().get(&tag).is_none_or(|s| s.stale)
    }

    /// Number of invalidations `tag` has seen.
    pub fn generation(&self, tag: CacheTag) -> u64 {
        self.lock().get(&tag).map(|s| s.generation).unwrap_or(0)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheTag, TagState>> {
        self.tags.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Fetch results stored per tag, re-fetched only once their tag is stale.
#[derive(Debug, Clone)]
pub struct TaggedCache<V> {
    registry: TagRegistry,
    entries: Arc<Mutex<HashMap<CacheTag, V>>>,
}

impl<V: Clone> TaggedCache<V> {
    pub fn new(registry: TagRegistry) -> Self {
        Self { registry, entries: Arc::new(Mutex::new(HashMap::new())) }
    }

    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    /// Return the cached value for `tag`, or run `fetch` and cache its result
    /// when the tag is stale. Errors are returned as-is and cache nothing. A
    /// value fetched while the tag was invalidated is returned but leaves the
    /// tag stale.
    pub async fn get_or_fetch<E, F, Fut>(&self, tag: CacheTag, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cached = if self.registry.is_stale(tag) { None } else { self.cached(tag) };
        if let Some(value) = cached {
            debug!("cache hit for {tag}");
            return Ok(value);
        }

        debug!("cache miss for {tag}, fetching");
        let generation = self.registry.generation(tag);
        let value = fetch().await?;
        self.lock().insert(tag, value.clone());
        self.registry.mark_fresh_since(tag, generation);
        Ok(value)
    }

    fn cached(&self, tag: CacheTag) -> Option<V> {
        self.lock().get(&tag).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheTag, V>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
