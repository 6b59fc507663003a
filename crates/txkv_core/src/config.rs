//! Store configuration.

/// Configuration for constructing a store.
///
/// Both values are capacity hints; they never limit how many keys a store
/// or a transaction may hold.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Initial capacity of the committed map.
    pub base_capacity: usize,

    /// Initial capacity of each transaction's pending-write map.
    pub overlay_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_capacity: 0,
            overlay_capacity: 16,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial capacity of the committed map.
    #[must_use]
    pub const fn base_capacity(mut self, capacity: usize) -> Self {
        self.base_capacity = capacity;
        self
    }

    /// Sets the initial capacity of each transaction overlay.
    #[must_use]
    pub const fn overlay_capacity(mut self, capacity: usize) -> Self {
        self.overlay_capacity = capacity;
        self
    }
}
