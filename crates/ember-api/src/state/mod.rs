//! Application state
//!
//! Shared state for the Axum application: service context, configuration,
//! the realtime connection manager, and the object-storage collaborator.

use std::sync::Arc;

use ember_common::{AppConfig, JwtService};
use ember_core::traits::ObjectStorage;
use ember_realtime::{ConnectionManager, RealtimeNotifier};
use ember_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    config: Arc<AppConfig>,
    connection_manager: Arc<ConnectionManager>,
    notifier: RealtimeNotifier,
    storage: Arc<dyn ObjectStorage>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(
        service_context: ServiceContext,
        config: AppConfig,
        connection_manager: Arc<ConnectionManager>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        let notifier = RealtimeNotifier::new(connection_manager.clone());
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            connection_manager,
            notifier,
            storage,
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the realtime connection manager
    pub fn connection_manager(&self) -> &Arc<ConnectionManager> {
        &self.connection_manager
    }

    /// Get the realtime notifier
    pub fn notifier(&self) -> &RealtimeNotifier {
        &self.notifier
    }

    /// Get the object-storage collaborator
    pub fn storage(&self) -> &dyn ObjectStorage {
        self.storage.as_ref()
    }

    /// Get the JWT service from the service context
    pub fn jwt_service(&self) -> &JwtService {
        self.service_context.jwt_service()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("connection_manager", &self.connection_manager)
            .finish()
    }
}
