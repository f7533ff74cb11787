use crate::error::ResolutionError;
use dashmap::DashMap;
use netreach_domain::model::PolicyChain;
use std::sync::{Arc, OnceLock};

type Resolved = Result<Arc<PolicyChain>, ResolutionError>;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ChainKey {
    project_id: String,
    network: String,
}

/// Resolved policy chains for the lifetime of one analysis run.
///
/// Each (project, network) is resolved at most once, even under concurrent
/// lookups: late callers block on the first resolution and share its result.
/// Failures are memoized the same way as successes.
#[derive(Debug, Default)]
pub struct ChainCache {
    slots: DashMap<ChainKey, Arc<OnceLock<Resolved>>>,
}

impl ChainCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_resolve<F>(&self, project_id: &str, network: &str, resolve: F) -> Resolved
    where
        F: FnOnce() -> Result<PolicyChain, ResolutionError>,
    {
        let key = ChainKey {
            project_id: project_id.to_string(),
            network: network.to_string(),
        };
        // Clone the slot out so the shard lock is released before resolving.
        let slot = Arc::clone(self.slots.entry(key).or_default().value());

        if let Some(hit) = slot.get() {
            tracing::debug!(project = project_id, network, "policy chain cache hit");
            return hit.clone();
        }
        slot.get_or_init(|| resolve().map(Arc::new)).clone()
    }

    /// Number of (project, network) pairs seen so far.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn second_lookup_reuses_first_resolution() {
        let cache = ChainCache::new();
        let calls = AtomicUsize::new(0);
        let resolve = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(PolicyChain::default())
        };

        let a = cache.get_or_resolve("p1", "default", resolve);
        let b = cache.get_or_resolve("p1", "default", resolve);
        assert!(Arc::ptr_eq(&a.expect("chain"), &b.expect("chain")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cache.get_or_resolve("p1", "prod", resolve).expect("chain");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failures_are_memoized() {
        let cache = ChainCache::new();
        let calls = AtomicUsize::new(0);
        let failing = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ResolutionError::NetworkNotFound {
                project: "p1".to_string(),
                network: "gone".to_string(),
            })
        };

        assert!(cache.get_or_resolve("p1", "gone", failing).is_err());
        assert!(cache.get_or_resolve("p1", "gone", failing).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_lookups_resolve_once() {
        let cache = ChainCache::new();
        let calls = AtomicUsize::new(0);

        let chains: Vec<Arc<PolicyChain>> = (0..64)
            .into_par_iter()
            .map(|_| {
                cache
                    .get_or_resolve("p1", "default", || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        std::thread::sleep(std::time::Duration::from_millis(5));
                        Ok(PolicyChain::default())
                    })
                    .expect("chain")
            })
            .collect();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(chains.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
