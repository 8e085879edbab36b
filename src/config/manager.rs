use super::root::RootConfiguration;
use std::sync::{Arc, PoisonError, RwLock};

/// Process-wide holder for the active configuration.
///
/// Readers get an `Arc` snapshot that never changes underneath them.
/// Reconfiguring means building a new `RootConfiguration` and swapping it in.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: Arc<RwLock<Arc<RootConfiguration>>>,
}

impl ConfigManager {
    pub fn new(config: RootConfiguration) -> Self {
        Self {
            config: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    pub fn current(&self) -> Arc<RootConfiguration> {
        let guard = self.config.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Swaps in a new configuration and returns the one it replaced.
    pub fn replace(&self, config: RootConfiguration) -> Arc<RootConfiguration> {
        let mut guard = self.config.write().unwrap_or_else(PoisonError::into_inner);
        log::info!(
            "Replacing {} configuration with {}",
            guard.environment(),
            config.environment()
        );
        std::mem::replace(&mut *guard, Arc::new(config))
    }
}
