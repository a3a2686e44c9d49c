use {
    crate::{
        types::ReplyPayload,
        vocab::{Intent, MissingProfileField, PendingExpectation, Tonality},
    },
    serde::{Deserialize, Serialize},
};

/// Per-session routing state.
///
/// Read before a turn and replaced wholesale after it. `replies` only lives for
/// the turn that produced it; the stores never persist it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub intent: Intent,
    pub missing_profile_field: Option<MissingProfileField>,
    pub pending: Option<PendingExpectation>,
    pub tonality: Option<Tonality>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<ReplyPayload>,
}

impl SessionState {
    /// Starting point for a new decision: persisted fields carried over,
    /// per-turn replies dropped.
    #[must_use]
    pub fn carried_forward(&self) -> Self {
        Self {
            replies: Vec::new(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_pending(mut self, pending: PendingExpectation) -> Self {
        self.pending = Some(pending);
        self
    }
}
