//! # Wrapper Registry
//!
//! Maps a host entity's identity to exactly one surrogate. Construction is
//! lazy ([`WrapperRegistry::get_or_create`]), eviction is explicit
//! ([`WrapperRegistry::remove`]) and runs the surrogate's teardown so pooled
//! resources are returned at a known point.
//!
//! The constructor passed to `get_or_create` runs without any registry lock
//! held, so it may itself call back into the registry. If a nested call
//! registered a surrogate for the same key first, that one wins and the
//! freshly built candidate is torn down and discarded.

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, trace};

use crate::host::HostKey;

/// A managed object standing in for one host entity.
pub trait Surrogate: Send + Sync + 'static {
    /// Releases resources borrowed at construction. Called once when the
    /// surrogate is evicted or replaced.
    fn teardown(&self) {}
}

/// Errors from the strict registry API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("{registry}: a surrogate is already registered for {key}")]
    Duplicate { registry: &'static str, key: String },

    #[error("{registry}: no surrogate registered for {key}")]
    Absent { registry: &'static str, key: String },
}

/// Identity-preserving map from host identity to surrogate.
pub struct WrapperRegistry<K, S> {
    name: &'static str,
    entries: DashMap<K, Arc<S>>,
}

impl<K, S> WrapperRegistry<K, S>
where
    K: Eq + Hash + Copy + Debug,
    S: Surrogate,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: DashMap::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the registered surrogate for `key`, building one with `build`
    /// if there is none. `build` returning `None` registers nothing.
    pub fn get_or_create(&self, key: K, build: impl FnOnce() -> Option<S>) -> Option<Arc<S>> {
        if let Some(existing) = self.lookup(&key) {
            return Some(existing);
        }

        let fresh = Arc::new(build()?);

        let (winner, loser) = match self.entries.entry(key) {
            Entry::Occupied(entry) => (entry.get().clone(), Some(fresh)),
            Entry::Vacant(entry) => {
                entry.insert(fresh.clone());
                (fresh, None)
            }
        };

        match loser {
            Some(discarded) => {
                trace!("♻️ {}: {:?} registered during construction, discarding duplicate", self.name, key);
                discarded.teardown();
            }
            None => trace!("✨ {}: created surrogate for {:?}", self.name, key),
        }

        Some(winner)
    }

    /// Read-only lookup. Never constructs.
    pub fn lookup(&self, key: &K) -> Option<Arc<S>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Registers `surrogate` under a key that must not be taken yet.
    pub fn insert(&self, key: K, surrogate: Arc<S>) -> Result<(), RegistryError> {
        match self.entries.entry(key) {
            Entry::Occupied(_) => Err(RegistryError::Duplicate {
                registry: self.name,
                key: format!("{key:?}"),
            }),
            Entry::Vacant(entry) => {
                entry.insert(surrogate);
                Ok(())
            }
        }
    }

    /// Registers `surrogate`, evicting and tearing down any previous entry.
    pub fn replace(&self, key: K, surrogate: Arc<S>) -> Option<Arc<S>> {
        let previous = self.entries.insert(key, surrogate);
        if let Some(old) = &previous {
            debug!("🔁 {}: replaced surrogate for {:?}", self.name, key);
            old.teardown();
        }
        previous
    }

    /// Evicts the mapping for `key` and tears the surrogate down.
    /// Removing an absent key is a no-op.
    pub fn remove(&self, key: &K) -> Option<Arc<S>> {
        let (_, removed) = self.entries.remove(key)?;
        trace!("🗑️ {}: evicted surrogate for {:?}", self.name, key);
        removed.teardown();
        Some(removed)
    }

    /// Strict removal for callers that treat a missing entry as a bug.
    pub fn take(&self, key: &K) -> Result<Arc<S>, RegistryError> {
        self.remove(key).ok_or_else(|| RegistryError::Absent {
            registry: self.name,
            key: format!("{key:?}"),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of every registered pair.
    pub fn entries(&self) -> Vec<(K, Arc<S>)> {
        self.entries
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect()
    }

    /// Evicts every entry, tearing each surrogate down.
    pub fn clear(&self) {
        let keys: Vec<K> = self.entries.iter().map(|entry| *entry.key()).collect();
        let count = keys.len();
        for key in keys {
            self.remove(&key);
        }
        if count > 0 {
            debug!("🧹 {}: cleared {} surrogates", self.name, count);
        }
    }
}

impl<S: Surrogate> WrapperRegistry<HostKey, S> {
    /// Wraps a host object. An absent host yields `None`; nothing is fabricated.
    pub fn get_or_wrap<T: ?Sized>(
        &self,
        host: Option<&Arc<T>>,
        build: impl FnOnce(&Arc<T>) -> S,
    ) -> Option<Arc<S>> {
        let host = host?;
        self.get_or_create(HostKey::of(host), || Some(build(host)))
    }

    pub fn lookup_host<T: ?Sized>(&self, host: &Arc<T>) -> Option<Arc<S>> {
        self.lookup(&HostKey::of(host))
    }

    pub fn remove_host<T: ?Sized>(&self, host: &Arc<T>) -> Option<Arc<S>> {
        self.remove(&HostKey::of(host))
    }
}

impl<K: Eq + Hash, S> std::fmt::Debug for WrapperRegistry<K, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrapperRegistry")
            .field("name", &self.name)
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Probe {
        id: u32,
        teardowns: Arc<AtomicUsize>,
    }

    impl Surrogate for Probe {
        fn teardown(&self) {
            self.teardowns.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn probe(id: u32, teardowns: &Arc<AtomicUsize>) -> Probe {
        Probe { id, teardowns: teardowns.clone() }
    }

    #[test]
    fn test_get_or_create_preserves_identity() {
        let teardowns = Arc::new(AtomicUsize::new(0));
        let registry = WrapperRegistry::new("probes");

        let first = registry.get_or_create(1u32, || Some(probe(1, &teardowns))).unwrap();
        let second = registry.get_or_create(1u32, || Some(probe(99, &teardowns))).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.id, 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_absent_build_registers_nothing() {
        let registry: WrapperRegistry<u32, Probe> = WrapperRegistry::new("probes");
        assert!(registry.get_or_create(1, || None).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_evicts_and_tears_down_once() {
        let teardowns = Arc::new(AtomicUsize::new(0));
        let registry = WrapperRegistry::new("probes");
        let original = registry.get_or_create(5u32, || Some(probe(5, &teardowns))).unwrap();

        assert!(registry.remove(&5).is_some());
        assert!(registry.lookup(&5).is_none());
        assert!(registry.remove(&5).is_none());
        assert_eq!(teardowns.load(Ordering::SeqCst), 1);

        let fresh = registry.get_or_create(5u32, || Some(probe(6, &teardowns))).unwrap();
        assert!(!Arc::ptr_eq(&original, &fresh));
        assert_eq!(fresh.id, 6);
    }

    #[test]
    fn test_reentrant_construction_keeps_first_registration() {
        let teardowns = Arc::new(AtomicUsize::new(0));
        let registry = WrapperRegistry::new("probes");

        let outer = registry
            .get_or_create(3u32, || {
                let inner = registry.get_or_create(3u32, || Some(probe(1, &teardowns)));
                assert!(inner.is_some());
                Some(probe(2, &teardowns))
            })
            .unwrap();

        assert_eq!(outer.id, 1);
        assert!(Arc::ptr_eq(&outer, &registry.lookup(&3).unwrap()));
        assert_eq!(teardowns.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_replace_tears_down_previous() {
        let teardowns = Arc::new(AtomicUsize::new(0));
        let registry = WrapperRegistry::new("probes");
        registry.replace(1u32, Arc::new(probe(1, &teardowns)));
        let previous = registry.replace(1u32, Arc::new(probe(2, &teardowns))).unwrap();

        assert_eq!(previous.id, 1);
        assert_eq!(registry.lookup(&1).unwrap().id, 2);
        assert_eq!(teardowns.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_strict_api_reports_conflicts() {
        let teardowns = Arc::new(AtomicUsize::new(0));
        let registry = WrapperRegistry::new("probes");

        assert!(registry.insert(1u32, Arc::new(probe(1, &teardowns))).is_ok());
        assert!(matches!(
            registry.insert(1u32, Arc::new(probe(2, &teardowns))),
            Err(RegistryError::Duplicate { .. })
        ));
        assert!(registry.take(&1).is_ok());
        assert!(matches!(registry.take(&1), Err(RegistryError::Absent { .. })));
    }

    #[test]
    fn test_clear_tears_down_everything() {
        let teardowns = Arc::new(AtomicUsize::new(0));
        let registry = WrapperRegistry::new("probes");
        for id in 0..4u32 {
            registry.get_or_create(id, || Some(probe(id, &teardowns)));
        }
        assert_eq!(registry.entries().len(), 4);

        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(teardowns.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_debug_reports_name_and_len() {
        let teardowns = Arc::new(AtomicUsize::new(0));
        let registry = WrapperRegistry::new("probes");
        registry.get_or_create(1u32, || Some(probe(1, &teardowns)));
        registry.get_or_create(2u32, || Some(probe(2, &teardowns)));

        let rendered = format!("{registry:?}");
        assert!(rendered.contains("probes"));
        assert!(rendered.contains("len: 2"));
    }

    #[test]
    fn test_host_keyed_wrapping() {
        let teardowns = Arc::new(AtomicUsize::new(0));
        let registry: WrapperRegistry<HostKey, Probe> = WrapperRegistry::new("probes");
        let host = Arc::new(42u32);

        assert!(registry.get_or_wrap::<u32>(None, |_| probe(0, &teardowns)).is_none());

        let wrapped = registry.get_or_wrap(Some(&host), |h| probe(**h, &teardowns)).unwrap();
        assert_eq!(wrapped.id, 42);
        assert!(Arc::ptr_eq(&wrapped, &registry.lookup_host(&host).unwrap()));
        assert!(registry.remove_host(&host).is_some());
        assert!(registry.lookup_host(&host).is_none());
    }
}
