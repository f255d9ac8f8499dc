// Per-template cache of compiled renderers, keyed by argument type

use dashmap::DashMap;
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::error::Result;

use super::compiler::CompiledRenderer;

/// Insert-only map from argument type to its compiled renderer.
///
/// Lookups and inserts may happen from any number of threads. Two threads
/// missing on the same type at once may both compile; the first result to be
/// published wins and is what every later lookup returns. Entries are never
/// removed.
#[derive(Default)]
pub struct RendererCache {
    entries: DashMap<TypeId, Arc<CompiledRenderer>>,
}

impl RendererCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: TypeId) -> Option<Arc<CompiledRenderer>> {
        self.entries.get(&key).map(|entry| Arc::clone(entry.value()))
    }

    /// Return the renderer cached under `key`, compiling it on a miss.
    ///
    /// `compile` runs without any lock held. Failures are returned to the
    /// caller and not cached.
    pub fn get_or_compile<F>(&self, key: TypeId, compile: F) -> Result<Arc<CompiledRenderer>>
    where
        F: FnOnce() -> Result<CompiledRenderer>,
    {
        if let Some(hit) = self.get(key) {
            trace!(shape = hit.shape_name(), "renderer cache hit");
            return Ok(hit);
        }

        let compiled = Arc::new(compile()?);
        let published = self.entries.entry(key).or_insert(compiled);
        Ok(Arc::clone(published.value()))
    }

    /// Number of shapes compiled so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for RendererCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererCache")
            .field("shapes", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TemplateError;
    use crate::shape::Bindable;
    use crate::template::compiler::compile_template;
    use crate::template::{EscapePolicy, TemplateParser};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn compile_for<T: Bindable>(template: &str) -> Result<CompiledRenderer> {
        let parsed = TemplateParser::parse(template)?;
        compile_template(&parsed, &T::shape(), EscapePolicy::Unreserved)
    }

    #[test]
    fn test_miss_then_hit() {
        let cache = RendererCache::new();
        let calls = AtomicUsize::new(0);
        let key = TypeId::of::<u32>();

        for _ in 0..3 {
            let renderer = cache
                .get_or_compile(key, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    compile_for::<u32>("/static")
                })
                .unwrap();
            assert_eq!(renderer.render(&1u32).unwrap(), "/static");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_first_published_result_wins() {
        let cache = RendererCache::new();
        let key = TypeId::of::<u32>();
        let first = cache.get_or_compile(key, || compile_for::<u32>("/first")).unwrap();

        // A late racer that compiled something else still gets the published entry
        let compiled = Arc::new(compile_for::<u32>("/second").unwrap());
        let published = Arc::clone(cache.entries.entry(key).or_insert(compiled).value());

        assert!(Arc::ptr_eq(&first, &published));
        assert_eq!(published.render(&0u32).unwrap(), "/first");
    }

    #[test]
    fn test_failures_are_not_cached() {
        let cache = RendererCache::new();
        let key = TypeId::of::<u32>();
        for _ in 0..2 {
            let err = cache
                .get_or_compile(key, || compile_for::<u32>("/{missing}"))
                .unwrap_err();
            assert!(matches!(err, TemplateError::MemberNotFound { .. }));
        }
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_misses_publish_one_entry() {
        let cache = RendererCache::new();
        let key = TypeId::of::<u64>();

        let renderers: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| cache.get_or_compile(key, || compile_for::<u64>("/n")).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(cache.len(), 1);
        let published = cache.get(key).unwrap();
        for renderer in &renderers {
            assert_eq!(renderer.render(&7u64).unwrap(), published.render(&7u64).unwrap());
        }
    }
}
