//! Per-session routing state store.
//!
//! One row per session key holding the persisted half of [`SessionState`]:
//! intent, pending expectation, tonality, and missing profile field. Replies are
//! per-turn output and are never stored.

use {
    async_trait::async_trait,
    drape_common::{Intent, MissingProfileField, PendingExpectation, SessionState, Tonality},
    tracing::warn,
};

use crate::{Result, now_ms};

/// Read-before / write-after storage of routing state, keyed by session.
#[async_trait]
pub trait RoutingStateStore: Send + Sync {
    /// State for `session_key`, or the default state for a new session.
    async fn load(&self, session_key: &str) -> anyhow::Result<SessionState>;

    /// Replace the stored state for `session_key` in one write.
    async fn save(&self, session_key: &str, state: &SessionState) -> anyhow::Result<()>;
}

#[derive(sqlx::FromRow)]
struct StateRow {
    intent: String,
    pending: Option<String>,
    tonality: Option<String>,
    missing_profile_field: Option<String>,
}

/// Parse a stored vocabulary value; anything unrecognized reads as absent.
fn lenient<T>(
    session_key: &str,
    column: &'static str,
    raw: Option<String>,
    parse: fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = raw?;
    let parsed = parse(&raw);
    if parsed.is_none() {
        warn!(session_key, column, value = %raw, "ignoring unrecognized stored value");
    }
    parsed
}

impl StateRow {
    fn into_state(self, session_key: &str) -> SessionState {
        SessionState {
            intent: lenient(session_key, "intent", Some(self.intent), Intent::parse)
                .unwrap_or_default(),
            pending: lenient(session_key, "pending", self.pending, PendingExpectation::parse),
            tonality: lenient(session_key, "tonality", self.tonality, Tonality::parse),
            missing_profile_field: lenient(
                session_key,
                "missing_profile_field",
                self.missing_profile_field,
                MissingProfileField::parse,
            ),
            replies: Vec::new(),
        }
    }
}

/// SQLite-backed routing state store.
pub struct SqliteRoutingStateStore {
    pool: sqlx::SqlitePool,
}

impl SqliteRoutingStateStore {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, session_key: &str) -> Result<Option<SessionState>> {
        let row = sqlx::query_as::<_, StateRow>(
            "SELECT intent, pending, tonality, missing_profile_field \
             FROM routing_state WHERE session_key = ?",
        )
        .bind(session_key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.into_state(session_key)))
    }

    pub async fn put(&self, session_key: &str, state: &SessionState) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO routing_state
                 (session_key, intent, pending, tonality, missing_profile_field, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)
               ON CONFLICT(session_key) DO UPDATE SET
                 intent = excluded.intent,
                 pending = excluded.pending,
                 tonality = excluded.tonality,
                 missing_profile_field = excluded.missing_profile_field,
                 updated_at = excluded.updated_at"#,
        )
        .bind(session_key)
        .bind(state.intent.as_str())
        .bind(state.pending.map(PendingExpectation::as_str))
        .bind(state.tonality.map(Tonality::as_str))
        .bind(state.missing_profile_field.map(MissingProfileField::as_str))
        .bind(now_ms())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl RoutingStateStore for SqliteRoutingStateStore {
    async fn load(&self, session_key: &str) -> anyhow::Result<SessionState> {
        Ok(self.get(session_key).await?.unwrap_or_default())
    }

    async fn save(&self, session_key: &str, state: &SessionState) -> anyhow::Result<()> {
        Ok(self.put(session_key, state).await?)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::test_pool, drape_common::ReplyPayload};

    #[tokio::test]
    async fn missing_session_loads_default() {
        let store = SqliteRoutingStateStore::new(test_pool().await);
        assert!(store.get("wa:123").await.unwrap().is_none());
        assert_eq!(store.load("wa:123").await.unwrap(), SessionState::default());
    }

    #[tokio::test]
    async fn save_and_load() {
        let store = SqliteRoutingStateStore::new(test_pool().await);
        let state = SessionState {
            intent: Intent::VibeCheck,
            pending: Some(PendingExpectation::AwaitingVibeCheckImage),
            tonality: Some(Tonality::HypeBff),
            missing_profile_field: Some(MissingProfileField::AgeGroup),
            replies: Vec::new(),
        };
        store.save("wa:1", &state).await.unwrap();
        assert_eq!(store.load("wa:1").await.unwrap(), state);
    }

    #[tokio::test]
    async fn save_overwrites_every_field() {
        let store = SqliteRoutingStateStore::new(test_pool().await);
        let first = SessionState {
            intent: Intent::VibeCheck,
            pending: Some(PendingExpectation::AwaitingTonality),
            tonality: Some(Tonality::Savage),
            ..SessionState::default()
        };
        store.save("s", &first).await.unwrap();
        store.save("s", &SessionState::default()).await.unwrap();
        assert_eq!(store.load("s").await.unwrap(), SessionState::default());
    }

    #[tokio::test]
    async fn replies_are_not_persisted() {
        let store = SqliteRoutingStateStore::new(test_pool().await);
        let state = SessionState {
            replies: vec![ReplyPayload::text("pick one")],
            ..SessionState::default()
        };
        store.save("s", &state).await.unwrap();
        assert!(store.load("s").await.unwrap().replies.is_empty());
    }

    #[tokio::test]
    async fn unknown_stored_values_read_as_absent() {
        let pool = test_pool().await;
        sqlx::query(
            "INSERT INTO routing_state \
             (session_key, intent, pending, tonality, missing_profile_field, updated_at) \
             VALUES ('s', 'shopping', 'awaiting_payment', 'grumpy', 'height', 0)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let store = SqliteRoutingStateStore::new(pool);
        assert_eq!(store.load("s").await.unwrap(), SessionState::default());
    }

    #[tokio::test]
    async fn session_isolation() {
        let store = SqliteRoutingStateStore::new(test_pool().await);
        let a = SessionState::default().with_pending(PendingExpectation::AwaitingTonality);
        store.save("a", &a).await.unwrap();
        store.save("b", &SessionState::default()).await.unwrap();
        assert_eq!(store.load("a").await.unwrap(), a);
        assert_eq!(store.load("b").await.unwrap().pending, None);
    }
}
