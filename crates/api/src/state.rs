use std::sync::Arc;

use crate::config::ServerConfig;
use crate::service::IssueService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Issue service, wrapping the injected store.
    pub issues: IssueService,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
