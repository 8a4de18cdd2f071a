//! PostgreSQL persistence for the annotation pipeline.
//!
//! - [`models`]: `FromRow` row structs and create DTOs
//! - [`repositories`]: zero-sized repos with async CRUD over `&PgPool`
//! - [`workflow`]: multi-entity operations run in one transaction
//! - [`collaborators`]: database-backed worker accounts and bonus ledger

use sqlx::postgres::PgPoolOptions;

pub mod collaborators;
pub mod models;
pub mod repositories;
pub mod workflow;

pub use workflow::WorkflowError;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
