use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference-counted internally and the
/// config sits behind an `Arc`. Nothing here is mutable.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, the only shared resource.
    pub pool: pm_db::DbPool,
    pub config: Arc<ServerConfig>,
}
