pub mod access;
pub mod config;
pub mod editor;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use access::PermissionCatalog;
use metrics_exporter_prometheus::PrometheusHandle;
use services::{RoleStore, SessionSource};
use std::sync::Arc;

/// Shared application state containing the backend collaborators
#[derive(Clone)]
pub struct AppState {
    pub session_source: Arc<dyn SessionSource>,
    pub role_store: Arc<dyn RoleStore>,
    pub catalog: &'static PermissionCatalog,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        session_source: Arc<dyn SessionSource>,
        role_store: Arc<dyn RoleStore>,
        catalog: &'static PermissionCatalog,
    ) -> Self {
        Self {
            session_source,
            role_store,
            catalog,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
