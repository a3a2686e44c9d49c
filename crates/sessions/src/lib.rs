//! Persistence for routing: per-session routing state and user profiles.
//!
//! Both stores are SQLite-backed behind traits, so the turn pipeline can be
//! pointed at anything that honors the same contracts.

pub mod error;
pub mod profile_store;
pub mod state_store;

pub use {
    error::{Error, Result},
    profile_store::{ProfileStore, SqliteProfileStore},
    state_store::{RoutingStateStore, SqliteRoutingStateStore},
};

/// Run database migrations for the sessions crate.
///
/// Creates the `routing_state` and `user_profiles` tables. Call once at
/// start-up before constructing the stores.
pub async fn run_migrations(pool: &sqlx::SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
pub(crate) async fn test_pool() -> sqlx::SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}
