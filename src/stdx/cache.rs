use parking_lot::RwLock;
use std::sync::Arc;

/// A shared, clonable cell. Clones observe each other's writes.
#[derive(Debug, Clone, Default)]
pub struct Cache<T>(Arc<RwLock<T>>);

impl<T> Cache<T> {
    #[inline]
    pub fn new(item: T) -> Self {
        Self(Arc::new(RwLock::new(item)))
    }

    #[inline]
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.read().clone()
    }

    #[inline]
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.0.write());
    }
}
