//! Bounded in-memory cache used by the normalizer and the profanity filters.
//!
//! Each owner holds its own instance, so keys never mix between them.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Which entry is dropped when the cache is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Oldest inserted key goes first; reads do not reorder.
    Fifo,
    /// Least recently read or written key goes first.
    Lru,
}

struct Entry<V> {
    value: V,
    inserted_at: Instant,
    /// Position in `Inner::order`.
    tick: u64,
}

struct Inner<K, V> {
    map: HashMap<K, Entry<V>>,
    // Lowest tick is the next eviction candidate.
    order: BTreeMap<u64, K>,
    next_tick: u64,
}

impl<K, V> Inner<K, V> {
    fn bump(&mut self) -> u64 {
        let tick = self.next_tick;
        self.next_tick += 1;
        tick
    }
}

/// A size-bounded map with an optional time-to-live.
///
/// `len()` never exceeds `capacity`. A capacity of 0 disables caching.
pub struct BoundedCache<K, V> {
    capacity: usize,
    policy: EvictionPolicy,
    ttl: Option<Duration>,
    inner: Mutex<Inner<K, V>>,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(capacity: usize, policy: EvictionPolicy, ttl: Option<Duration>) -> Self {
        Self {
            capacity,
            policy,
            ttl,
            inner: Mutex::new(Inner {
                map: HashMap::with_capacity(capacity.min(1024)),
                order: BTreeMap::new(),
                next_tick: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<K, V>> {
        // Entries are plain values; a panic elsewhere cannot leave them half-written.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns a clone of the cached value, dropping it first if expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.lock();

        let (expired, old_tick) = match inner.map.get(key) {
            None => return None,
            Some(entry) => (
                self.ttl
                    .is_some_and(|ttl| entry.inserted_at.elapsed() >= ttl),
                entry.tick,
            ),
        };

        if expired {
            inner.map.remove(key);
            inner.order.remove(&old_tick);
            return None;
        }

        if self.policy == EvictionPolicy::Lru {
            inner.order.remove(&old_tick);
            let tick = inner.bump();
            inner.order.insert(tick, key.clone());
            if let Some(entry) = inner.map.get_mut(key) {
                entry.tick = tick;
            }
        }

        inner.map.get(key).map(|entry| entry.value.clone())
    }

    /// Inserts or replaces a value, evicting as needed to stay within capacity.
    pub fn insert(&self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }

        let mut inner = self.lock();
        let tick = inner.bump();
        let entry = Entry {
            value,
            inserted_at: Instant::now(),
            tick,
        };

        if let Some(replaced) = inner.map.insert(key.clone(), entry) {
            inner.order.remove(&replaced.tick);
        }
        inner.order.insert(tick, key);

        while inner.map.len() > self.capacity {
            match inner.order.pop_first() {
                Some((_, oldest)) => {
                    inner.map.remove(&oldest);
                }
                None => break,
            }
        }
    }

    /// Drops every entry.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.map.clear();
        inner.order.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
