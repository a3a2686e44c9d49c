use std::sync::Arc;

use {
    chrono::{DateTime, Utc},
    dashmap::DashMap,
    drape_common::{
        Intent, MissingProfileField, PendingExpectation, ReplyPayload, Tonality, TurnInput,
    },
    drape_routing::IntentRouter,
    drape_sessions::{ProfileStore, RoutingStateStore},
    serde::Serialize,
    tokio::sync::Mutex,
    tracing::{info, warn},
};

#[cfg(feature = "metrics")]
use drape_metrics::{counter, histogram, turns};

use crate::{Result, error::Context};

/// Text for the end user when a turn fails.
pub const FALLBACK_REPLY_TEXT: &str = "Something went wrong. Please try again.";

/// Generic reply for a failed turn.
pub fn fallback_reply() -> ReplyPayload {
    ReplyPayload::text(FALLBACK_REPLY_TEXT)
}

/// What the caller needs after a routed turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnOutcome {
    pub intent: Intent,
    pub missing_profile_field: Option<MissingProfileField>,
    pub pending: Option<PendingExpectation>,
    pub tonality: Option<Tonality>,
    pub replies: Vec<ReplyPayload>,
    /// Rule of the cascade that decided the turn.
    pub rule: &'static str,
}

/// Routes turns with fresh state and commits the result, one turn per session
/// at a time.
pub struct TurnPipeline {
    router: IntentRouter,
    profiles: Arc<dyn ProfileStore>,
    states: Arc<dyn RoutingStateStore>,
    session_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl TurnPipeline {
    pub fn new(
        router: IntentRouter,
        profiles: Arc<dyn ProfileStore>,
        states: Arc<dyn RoutingStateStore>,
    ) -> Self {
        Self {
            router,
            profiles,
            states,
            session_locks: DashMap::new(),
        }
    }

    /// Route one turn for `session_key` and persist the new routing state.
    ///
    /// On error nothing is written.
    pub async fn handle(
        &self,
        session_key: &str,
        user_id: &str,
        turn: &TurnInput,
    ) -> Result<TurnOutcome> {
        self.handle_at(session_key, user_id, turn, Utc::now()).await
    }

    pub async fn handle_at(
        &self,
        session_key: &str,
        user_id: &str,
        turn: &TurnInput,
        now: DateTime<Utc>,
    ) -> Result<TurnOutcome> {
        #[cfg(feature = "metrics")]
        let start = std::time::Instant::now();
        #[cfg(feature = "metrics")]
        counter!(turns::RECEIVED_TOTAL).increment(1);

        let result = {
            let slot = SessionSlot::acquire(&self.session_locks, session_key);
            let _guard = slot.lock.lock().await;
            self.handle_locked(session_key, user_id, turn, now).await
        };

        #[cfg(feature = "metrics")]
        {
            histogram!(turns::DURATION_SECONDS).record(start.elapsed().as_secs_f64());
            if result.is_err() {
                counter!(turns::FAILED_TOTAL).increment(1);
            }
        }

        result
    }

    async fn handle_locked(
        &self,
        session_key: &str,
        user_id: &str,
        turn: &TurnInput,
        now: DateTime<Utc>,
    ) -> Result<TurnOutcome> {
        let profile = self
            .profiles
            .load(user_id)
            .await
            .context("failed to load user profile")?;
        let session = self
            .states
            .load(session_key)
            .await
            .context("failed to load routing state")?;

        let decision = match self.router.decide(turn, &profile, &session, now).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(session_key, user_id, error = %e, "routing failed, nothing committed");
                return Err(e.into());
            },
        };

        self.states
            .save(session_key, &decision.state)
            .await
            .context("failed to save routing state")?;

        info!(
            session_key,
            user_id,
            rule = decision.rule.as_str(),
            intent = %decision.state.intent,
            replies = decision.state.replies.len(),
            "turn routed"
        );

        let state = decision.state;
        Ok(TurnOutcome {
            intent: state.intent,
            missing_profile_field: state.missing_profile_field,
            pending: state.pending,
            tonality: state.tonality,
            replies: state.replies,
            rule: decision.rule.as_str(),
        })
    }

    /// Sessions with a turn in flight or waiting for the lock.
    pub fn active_sessions(&self) -> usize {
        self.session_locks.len()
    }
}

/// A session's lock, held for one turn.
///
/// Dropping it removes the map entry once no other turn holds or awaits the
/// lock, including when the turn future is cancelled.
struct SessionSlot<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    key: &'a str,
    lock: Arc<Mutex<()>>,
}

impl<'a> SessionSlot<'a> {
    fn acquire(locks: &'a DashMap<String, Arc<Mutex<()>>>, key: &'a str) -> Self {
        let lock = locks.entry(key.to_string()).or_default().clone();
        Self { locks, key, lock }
    }
}

impl Drop for SessionSlot<'_> {
    fn drop(&mut self) {
        // The map holds one reference and this slot the other.
        self.locks
            .remove_if(self.key, |_, lock| Arc::strong_count(lock) == 2);
    }
}
