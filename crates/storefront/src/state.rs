//! Application state shared across handlers.

use std::sync::Arc;

use dulsan_data::{Local, LocalData, Remote};

use crate::config::StorefrontConfig;

/// The synchronization session every handler reads and mutates.
pub type MenuData = LocalData<Remote, Local>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// synchronization session and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    data: MenuData,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, data: MenuData) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, data }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the synchronization session.
    #[must_use]
    pub fn data(&self) -> &MenuData {
        &self.inner.data
    }
}
