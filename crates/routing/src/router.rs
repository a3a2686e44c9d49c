use std::{sync::Arc, time::Duration};

use {
    chrono::{DateTime, Utc},
    drape_common::{SessionState, TurnInput, UserProfileSnapshot},
    tracing::{debug, warn},
};

#[cfg(feature = "metrics")]
use drape_metrics::{classifier as classifier_metrics, counter, histogram, labels, routing};

use crate::{
    Error, Result,
    classifier::{ClassificationRequest, ClassifierDecision, IntentClassifier},
    cooldown::CooldownStatus,
    prompt::{DEFAULT_ROUTER_PROMPT, render_router_prompt},
    rules::{self, RouteDecision, RuleKind, TurnContext},
};

/// Default upper bound for one classification call.
pub const DEFAULT_CLASSIFIER_TIMEOUT: Duration = Duration::from_secs(30);

/// Picks the intent for each turn and the session state to carry forward.
///
/// Holds no per-session state; callers serialize turns of one session and
/// persist the returned state.
#[derive(Clone)]
pub struct IntentRouter {
    classifier: Arc<dyn IntentClassifier>,
    prompt_template: String,
    classifier_timeout: Duration,
}

impl IntentRouter {
    pub fn new(classifier: Arc<dyn IntentClassifier>) -> Self {
        Self {
            classifier,
            prompt_template: DEFAULT_ROUTER_PROMPT.to_string(),
            classifier_timeout: DEFAULT_CLASSIFIER_TIMEOUT,
        }
    }

    /// Use a custom system prompt template (`{{canDoVibeCheck}}` and
    /// `{{canDoColorAnalysis}}` are substituted).
    #[must_use]
    pub fn with_prompt_template(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = template.into();
        self
    }

    #[must_use]
    pub fn with_classifier_timeout(mut self, timeout: Duration) -> Self {
        self.classifier_timeout = timeout;
        self
    }

    /// Route a turn at the current time and return the next session state.
    pub async fn route(
        &self,
        turn: &TurnInput,
        profile: &UserProfileSnapshot,
        session: &SessionState,
    ) -> Result<SessionState> {
        Ok(self.decide(turn, profile, session, Utc::now()).await?.state)
    }

    /// Route a turn as of `now`, reporting which rule decided it.
    ///
    /// On error nothing is decided; the caller must not persist anything for
    /// this turn.
    pub async fn decide(
        &self,
        turn: &TurnInput,
        profile: &UserProfileSnapshot,
        session: &SessionState,
        now: DateTime<Utc>,
    ) -> Result<RouteDecision> {
        let ctx = TurnContext {
            turn,
            profile,
            session,
        };

        let mut decision = match rules::first_match(&ctx) {
            Some(decision) => decision,
            None => RouteDecision {
                state: self.classify(&ctx, now).await?,
                rule: RuleKind::Classification,
            },
        };

        // Whatever rule decided, never ask for a field the profile already has.
        if let Some(field) = rules::drop_known_field(&mut decision.state, profile) {
            debug!(field = %field, "profile already has field, not asking for it");
            #[cfg(feature = "metrics")]
            counter!(routing::MISSING_FIELD_SUPPRESSED_TOTAL, labels::FIELD => field.as_str())
                .increment(1);
        }

        debug!(
            rule = decision.rule.as_str(),
            intent = %decision.state.intent,
            pending = ?decision.state.pending,
            missing_profile_field = ?decision.state.missing_profile_field,
            "turn routed"
        );

        #[cfg(feature = "metrics")]
        {
            counter!(
                routing::DECISIONS_TOTAL,
                labels::INTENT => decision.state.intent.as_str(),
                labels::RULE => decision.rule.as_str()
            )
            .increment(1);
            if !decision.state.replies.is_empty() {
                counter!(routing::INVALID_TONALITY_TOTAL).increment(1);
            }
        }

        Ok(decision)
    }

    async fn classify(&self, ctx: &TurnContext<'_>, now: DateTime<Utc>) -> Result<SessionState> {
        let cooldown = CooldownStatus::evaluate(ctx.profile, now);
        let request = ClassificationRequest {
            system_prompt: render_router_prompt(&self.prompt_template, cooldown),
            history: ctx.turn.text_history(),
        };

        let decision = self.call_classifier(request).await?;

        let mut next = ctx.session.carried_forward();
        next.intent = decision.intent;
        next.missing_profile_field = decision.missing_profile_field;
        Ok(next)
    }

    async fn call_classifier(&self, request: ClassificationRequest) -> Result<ClassifierDecision> {
        #[cfg(feature = "metrics")]
        let start = std::time::Instant::now();
        #[cfg(feature = "metrics")]
        counter!(classifier_metrics::CALLS_TOTAL).increment(1);

        let outcome = tokio::time::timeout(
            self.classifier_timeout,
            self.classifier.classify(request),
        )
        .await;

        #[cfg(feature = "metrics")]
        histogram!(classifier_metrics::DURATION_SECONDS).record(start.elapsed().as_secs_f64());

        match outcome {
            Ok(Ok(decision)) => Ok(decision),
            Ok(Err(e)) => {
                warn!(error = %e, "intent classifier failed");
                #[cfg(feature = "metrics")]
                counter!(classifier_metrics::ERRORS_TOTAL, labels::ERROR_TYPE => "classifier")
                    .increment(1);
                Err(Error::classification(e))
            },
            Err(elapsed) => {
                warn!(
                    timeout_ms = self.classifier_timeout.as_millis() as u64,
                    "intent classifier timed out"
                );
                #[cfg(feature = "metrics")]
                counter!(classifier_metrics::ERRORS_TOTAL, labels::ERROR_TYPE => "timeout")
                    .increment(1);
                Err(Error::classification(elapsed))
            },
        }
    }
}
