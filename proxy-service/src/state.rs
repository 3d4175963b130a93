//! Application state for the proxy service.

use std::sync::Arc;

use common::config::AppConfig;

use crate::connector::{Connector, PgConnector};
use crate::service::ProxyService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub service: ProxyService,
}

impl AppState {
    /// Creates the state with the PostgreSQL connector configured from `config`.
    pub fn new(config: AppConfig) -> Self {
        let connector = PgConnector::new(config.tls_mode, config.connect_timeout());
        Self::with_connector(config, Arc::new(connector))
    }

    /// Creates the state around an arbitrary connector.
    pub fn with_connector(config: AppConfig, connector: Arc<dyn Connector>) -> Self {
        Self {
            service: ProxyService::new(connector),
            config,
        }
    }
}
