use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
/// Worker accounts and the bonus ledger live in the same database, so
/// workflows write them on their own transaction.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vatic_db::DbPool,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(pool: vatic_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }
}
