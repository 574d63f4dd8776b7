//! Moderation context - dependency container for services
//!
//! Holds the store, platform client, identity resolver, and announcement
//! sink the coordinator and scheduler work against.

use std::sync::Arc;

use warden_core::traits::{ActionStore, IdentityResolver, NotificationSink, PlatformClient};

/// Dependency container for the coordinator and scheduler
#[derive(Clone)]
pub struct ModContext {
    store: Arc<dyn ActionStore>,
    platform: Arc<dyn PlatformClient>,
    resolver: Arc<dyn IdentityResolver>,
    notifier: Arc<dyn NotificationSink>,
}

impl ModContext {
    /// Create a new moderation context with all dependencies
    pub fn new(
        store: Arc<dyn ActionStore>,
        platform: Arc<dyn PlatformClient>,
        resolver: Arc<dyn IdentityResolver>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            store,
            platform,
            resolver,
            notifier,
        }
    }

    /// Get the action store
    pub fn store(&self) -> &dyn ActionStore {
        self.store.as_ref()
    }

    /// Get the platform client
    pub fn platform(&self) -> &dyn PlatformClient {
        self.platform.as_ref()
    }

    /// Get the identity resolver
    pub fn resolver(&self) -> &dyn IdentityResolver {
        self.resolver.as_ref()
    }

    /// Get the announcement sink
    pub fn notifier(&self) -> &dyn NotificationSink {
        self.notifier.as_ref()
    }
}

impl std::fmt::Debug for ModContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModContext")
            .field("store", &"ActionStore")
            .field("platform", &"PlatformClient")
            .field("resolver", &"IdentityResolver")
            .field("notifier", &"NotificationSink")
            .finish()
    }
}
