//! Metadata cache for function and structure signatures.
//!
//! Discovery is a remote round-trip, and signatures do not change while a
//! process runs, so each name is discovered at most once per cache and
//! kept for the cache's lifetime. There is no eviction.
//!
//! Lookup sequence for a name:
//!
//! 1. Read the map under a shared lock. Hit: done.
//! 2. Miss: take the name's in-flight mutex. Concurrent misses for the same
//!    name queue up here; misses for other names use other mutexes and load
//!    in parallel.
//! 3. Re-check the map. Another thread may have finished while we waited.
//! 4. Still absent: call the loader, insert the finished metadata, release.
//!
//! A failed load inserts nothing, so the next lookup retries.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace, warn};

use crate::error::{MetadataKind, Result};
use crate::protocol::transport::Transport;
use crate::protocol::types::{FunctionMetadata, StructureMetadata};

/// Source of metadata for cache misses.
pub trait MetadataLoader {
    /// Discover and build the metadata of a function.
    fn load_function_metadata(&self, name: &str) -> Result<FunctionMetadata>;

    /// Discover and build the metadata of a structure.
    fn load_structure_metadata(&self, name: &str) -> Result<StructureMetadata>;
}

/// `MetadataLoader` backed by a transport's discovery calls.
pub struct TransportLoader<'a, T: ?Sized>(pub &'a T);

impl<T: Transport + ?Sized> MetadataLoader for TransportLoader<'_, T> {
    fn load_function_metadata(&self, name: &str) -> Result<FunctionMetadata> {
        let raw = self.0.discover_function(name)?;
        FunctionMetadata::from_raw(&raw)
    }

    fn load_structure_metadata(&self, name: &str) -> Result<StructureMetadata> {
        let raw = self.0.discover_structure(name)?;
        StructureMetadata::from_raw(&raw)
    }
}

type InFlight = Arc<Mutex<()>>;

/// Per-destination cache of function and structure metadata.
///
/// Keys are the names as passed by the caller (case-sensitive); callers
/// are expected to use canonical upper-case names.
pub struct MetadataCache {
    destination: String,
    functions: RwLock<HashMap<String, Arc<FunctionMetadata>>>,
    structures: RwLock<HashMap<String, Arc<StructureMetadata>>>,
    in_flight: Mutex<HashMap<(MetadataKind, String), InFlight>>,
}

impl MetadataCache {
    /// Create an empty cache for a destination.
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            functions: RwLock::new(HashMap::new()),
            structures: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Destination this cache belongs to.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Get function metadata, discovering it through `loader` on first use.
    pub fn get_function_metadata(
        &self,
        name: &str,
        loader: &dyn MetadataLoader,
    ) -> Result<Arc<FunctionMetadata>> {
        self.get_or_load(MetadataKind::Function, &self.functions, name, || {
            loader.load_function_metadata(name)
        })
    }

    /// Get structure metadata, discovering it through `loader` on first use.
    pub fn get_structure_metadata(
        &self,
        name: &str,
        loader: &dyn MetadataLoader,
    ) -> Result<Arc<StructureMetadata>> {
        self.get_or_load(MetadataKind::Structure, &self.structures, name, || {
            loader.load_structure_metadata(name)
        })
    }

    /// Cached function metadata, without discovery.
    pub fn cached_function(&self, name: &str) -> Option<Arc<FunctionMetadata>> {
        self.functions.read().get(name).cloned()
    }

    /// Cached structure metadata, without discovery.
    pub fn cached_structure(&self, name: &str) -> Option<Arc<StructureMetadata>> {
        self.structures.read().get(name).cloned()
    }

    pub fn function_count(&self) -> usize {
        self.functions.read().len()
    }

    pub fn structure_count(&self) -> usize {
        self.structures.read().len()
    }

    /// Names with a discovery currently in progress.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().len()
    }

    fn get_or_load<M>(
        &self,
        kind: MetadataKind,
        map: &RwLock<HashMap<String, Arc<M>>>,
        name: &str,
        load: impl FnOnce() -> Result<M>,
    ) -> Result<Arc<M>> {
        if let Some(found) = map.read().get(name) {
            return Ok(Arc::clone(found));
        }

        let key = (kind, name.to_string());
        let slot = Arc::clone(self.in_flight.lock().entry(key.clone()).or_default());
        let _loading = slot.lock();

        if let Some(found) = map.read().get(name) {
            trace!(destination = %self.destination, %kind, name, "metadata loaded by another caller");
            return Ok(Arc::clone(found));
        }

        debug!(destination = %self.destination, %kind, name, "discovering metadata");
        match load() {
            Ok(metadata) => {
                let metadata = Arc::new(metadata);
                map.write().insert(name.to_string(), Arc::clone(&metadata));
                // Only after insertion: late arrivals holding the old slot
                // re-check the map and find the entry.
                self.in_flight.lock().remove(&key);
                Ok(metadata)
            }
            Err(e) => {
                warn!(destination = %self.destination, %kind, name, error = %e, "metadata discovery failed");
                // Waiters on the old slot re-check the map and load again.
                self.in_flight.lock().remove(&key);
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for MetadataCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataCache")
            .field("destination", &self.destination)
            .field("functions", &self.function_count())
            .field("structures", &self.structure_count())
            .finish()
    }
}

/// A cache paired with the loader to use on misses.
#[derive(Clone, Copy)]
pub struct MetadataResolver<'a> {
    cache: &'a MetadataCache,
    loader: &'a dyn MetadataLoader,
}

impl<'a> MetadataResolver<'a> {
    pub fn new(cache: &'a MetadataCache, loader: &'a dyn MetadataLoader) -> Self {
        Self { cache, loader }
    }

    pub fn function(&self, name: &str) -> Result<Arc<FunctionMetadata>> {
        self.cache.get_function_metadata(name, self.loader)
    }

    pub fn structure(&self, name: &str) -> Result<Arc<StructureMetadata>> {
        self.cache.get_structure_metadata(name, self.loader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::protocol::types::{AbapType, Direction, ParameterDescriptor};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::time::Duration;
    use tracing_test::traced_test;

    #[derive(Default)]
    struct CountingLoader {
        function_calls: AtomicUsize,
        structure_calls: AtomicUsize,
        fail_next: AtomicUsize,
    }

    impl MetadataLoader for CountingLoader {
        fn load_function_metadata(&self, name: &str) -> Result<FunctionMetadata> {
            self.function_calls.fetch_add(1, Ordering::SeqCst);
            // Widen the race window for concurrent misses.
            std::thread::sleep(Duration::from_millis(20));
            if self.fail_next.load(Ordering::SeqCst) > 0 {
                self.fail_next.fetch_sub(1, Ordering::SeqCst);
                return Err(Error::metadata_not_found(MetadataKind::Function, name));
            }
            FunctionMetadata::new(
                name,
                vec![ParameterDescriptor::new("I_NUM1", AbapType::Integer, Direction::Input)],
                vec![ParameterDescriptor::new("E_RESULT", AbapType::Integer, Direction::Output)],
            )
        }

        fn load_structure_metadata(&self, name: &str) -> Result<StructureMetadata> {
            self.structure_calls.fetch_add(1, Ordering::SeqCst);
            StructureMetadata::new(name, vec![ParameterDescriptor::field("ID", AbapType::Integer)])
        }
    }

    #[test]
    fn test_second_lookup_hits_cache() {
        let cache = MetadataCache::new("TST");
        let loader = CountingLoader::default();

        let first = cache.get_function_metadata("Z_SSRT_SUM", &loader).unwrap();
        let second = cache.get_function_metadata("Z_SSRT_SUM", &loader).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.function_calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.function_count(), 1);
    }

    #[test]
    fn test_concurrent_misses_discover_once() {
        let cache = MetadataCache::new("TST");
        let loader = CountingLoader::default();
        let threads = 16;
        let barrier = Barrier::new(threads);

        let results: Vec<Arc<FunctionMetadata>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..threads)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        cache.get_function_metadata("F", &loader).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(loader.function_calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|m| Arc::ptr_eq(m, &results[0])));
    }

    #[test]
    fn test_different_names_load_separately() {
        let cache = MetadataCache::new("TST");
        let loader = CountingLoader::default();

        std::thread::scope(|s| {
            for name in ["A", "B", "C"] {
                let cache = &cache;
                let loader = &loader;
                s.spawn(move || cache.get_function_metadata(name, loader).unwrap());
            }
        });

        assert_eq!(loader.function_calls.load(Ordering::SeqCst), 3);
        assert_eq!(cache.function_count(), 3);
    }

    #[test]
    #[traced_test]
    fn test_failed_discovery_is_not_cached() {
        let cache = MetadataCache::new("TST");
        let loader = CountingLoader::default();
        loader.fail_next.store(1, Ordering::SeqCst);

        let err = cache.get_function_metadata("Z_MISSING", &loader).unwrap_err();
        assert!(matches!(err, Error::MetadataNotFound { .. }));
        assert!(cache.cached_function("Z_MISSING").is_none());
        assert!(logs_contain("metadata discovery failed"));
        assert_eq!(cache.in_flight_count(), 0);

        cache.get_function_metadata("Z_MISSING", &loader).unwrap();
        assert_eq!(loader.function_calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_structure_cache_is_separate() {
        let cache = MetadataCache::new("TST");
        let loader = CountingLoader::default();

        cache.get_structure_metadata("ZMARA", &loader).unwrap();
        cache.get_structure_metadata("ZMARA", &loader).unwrap();

        assert_eq!(loader.structure_calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.structure_count(), 1);
        assert_eq!(cache.function_count(), 0);
        assert!(cache.cached_function("ZMARA").is_none());
    }

    #[test]
    fn test_caches_do_not_share_entries() {
        let loader = CountingLoader::default();
        let tst = MetadataCache::new("TST");
        let prd = MetadataCache::new("PRD");

        tst.get_function_metadata("Z_SSRT_SUM", &loader).unwrap();
        assert!(prd.cached_function("Z_SSRT_SUM").is_none());
        prd.get_function_metadata("Z_SSRT_SUM", &loader).unwrap();
        assert_eq!(loader.function_calls.load(Ordering::SeqCst), 2);
    }
}
