use arc_swap::ArcSwap;
use std::sync::Arc;

/// Process-wide holder of the live configuration snapshot
///
/// Readers take a cheap `Arc` clone and never block. Reload builds a whole new
/// snapshot and swaps the pointer; a live snapshot is never mutated.
#[derive(Debug)]
pub struct ConfigHandle<T> {
    current: ArcSwap<T>,
}

impl<T> ConfigHandle<T> {
    pub fn new(initial: T) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
        }
    }

    /// Snapshot in effect right now
    pub fn current(&self) -> Arc<T> {
        self.current.load_full()
    }

    /// Install `next`, returning the snapshot it replaced
    pub fn replace(&self, next: T) -> Arc<T> {
        self.current.swap(Arc::new(next))
    }

    /// Build a new snapshot with `build` and install it only on success
    ///
    /// On error the previous snapshot stays in place and the error is returned.
    pub fn reload_with<E, F>(&self, build: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let next = Arc::new(build()?);
        self.current.store(Arc::clone(&next));
        tracing::info!("configuration snapshot replaced");
        Ok(next)
    }
}
