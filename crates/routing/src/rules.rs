//! Deterministic routing rules, evaluated in order before classification.

use {
    crate::button::ButtonSelection,
    drape_common::{
        Intent, MissingProfileField, PendingExpectation, ReplyPayload, SessionState, Tonality,
        TurnInput, UserProfileSnapshot,
    },
};

/// Corrective reply for free text that names no tonality.
pub const INVALID_TONALITY_REPLY: &str =
    "Please choose one of the valid options: friendly, savage, or hype_bff.";

/// Which step of the cascade produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    ExplicitSelection,
    PendingTonality,
    PendingImage,
    Classification,
}

impl RuleKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExplicitSelection => "explicit_selection",
            Self::PendingTonality => "pending_tonality",
            Self::PendingImage => "pending_image",
            Self::Classification => "classification",
        }
    }
}

/// Output of one routing decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecision {
    pub state: SessionState,
    pub rule: RuleKind,
}

/// Inputs shared by every rule.
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    pub turn: &'a TurnInput,
    pub profile: &'a UserProfileSnapshot,
    pub session: &'a SessionState,
}

/// A rule returns `Some(next_state)` when it decides the turn.
type RuleFn = fn(&TurnContext<'_>) -> Option<SessionState>;

/// The deterministic rules in priority order.
pub const RULES: &[(RuleKind, RuleFn)] = &[
    (RuleKind::ExplicitSelection, explicit_selection),
    (RuleKind::PendingTonality, pending_tonality),
    (RuleKind::PendingImage, pending_image),
];

/// Run the deterministic rules; `None` means the turn needs classification.
pub fn first_match(ctx: &TurnContext<'_>) -> Option<RouteDecision> {
    RULES.iter().find_map(|(rule, apply)| {
        apply(ctx).map(|state| RouteDecision { state, rule: *rule })
    })
}

/// Button payloads: styling family, direct intents, or a tonality choice.
///
/// Unrecognized tokens do not match.
pub fn explicit_selection(ctx: &TurnContext<'_>) -> Option<SessionState> {
    let selection = ButtonSelection::parse(ctx.turn.button.as_deref()?)?;
    let mut next = ctx.session.carried_forward();
    next.missing_profile_field = None;
    match selection {
        ButtonSelection::Intent(intent) => {
            next.intent = intent;
        },
        ButtonSelection::Tonality(tonality) => {
            next.intent = Intent::VibeCheck;
            next.tonality = Some(tonality);
            next.pending = None;
        },
    }
    Some(next)
}

/// Free-text reply while the session awaits a tonality choice.
pub fn pending_tonality(ctx: &TurnContext<'_>) -> Option<SessionState> {
    if ctx.session.pending != Some(PendingExpectation::AwaitingTonality) {
        return None;
    }
    let mut next = ctx.session.carried_forward();
    match parse_tonality_text(&ctx.turn.body) {
        Some(tonality) => {
            next.tonality = Some(tonality);
            next.pending = Some(PendingExpectation::AwaitingVibeCheckImage);
            next.intent = Intent::VibeCheck;
            next.missing_profile_field = None;
        },
        None => {
            next.replies = vec![ReplyPayload::text(INVALID_TONALITY_REPLY)];
        },
    }
    Some(next)
}

/// An image arriving while the session awaits one.
///
/// Pending is left as is; the handler that consumes the image clears it.
pub fn pending_image(ctx: &TurnContext<'_>) -> Option<SessionState> {
    if !ctx.turn.has_images() {
        return None;
    }
    let intent = match ctx.session.pending? {
        PendingExpectation::AwaitingVibeCheckImage => Intent::VibeCheck,
        PendingExpectation::AwaitingColorAnalysisImage => Intent::ColorAnalysis,
        PendingExpectation::AwaitingTonality => return None,
    };
    let mut next = ctx.session.carried_forward();
    next.intent = intent;
    next.missing_profile_field = None;
    Some(next)
}

/// Clear a missing-field request the profile already answers, returning the
/// field that was dropped.
pub fn drop_known_field(
    state: &mut SessionState,
    profile: &UserProfileSnapshot,
) -> Option<MissingProfileField> {
    let field = state.missing_profile_field?;
    if !profile.satisfies(field) {
        return None;
    }
    state.missing_profile_field = None;
    Some(field)
}

fn parse_tonality_text(text: &str) -> Option<Tonality> {
    Tonality::parse(&text.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use {super::*, drape_common::ImageAttachment};

    fn image() -> ImageAttachment {
        ImageAttachment {
            media_type: "image/jpeg".into(),
            data: "aGVsbG8=".into(),
        }
    }

    fn run(turn: &TurnInput, session: &SessionState) -> Option<RouteDecision> {
        let profile = UserProfileSnapshot::default();
        first_match(&TurnContext {
            turn,
            profile: &profile,
            session,
        })
    }

    fn session_with(pending: PendingExpectation) -> SessionState {
        SessionState {
            intent: Intent::General,
            missing_profile_field: Some(MissingProfileField::Gender),
            ..SessionState::default()
        }
        .with_pending(pending)
    }

    #[test]
    fn styling_family_button_wins_over_pending_state() {
        for token in ["styling", "occasion", "vacation", "pairing"] {
            let turn = TurnInput::button(token).with_images(vec![image()]);
            let decision =
                run(&turn, &session_with(PendingExpectation::AwaitingTonality)).unwrap();
            assert_eq!(decision.rule, RuleKind::ExplicitSelection);
            assert_eq!(decision.state.intent, Intent::Styling);
            assert_eq!(decision.state.missing_profile_field, None);
            // Intent buttons leave the pending expectation alone.
            assert_eq!(
                decision.state.pending,
                Some(PendingExpectation::AwaitingTonality)
            );
        }
    }

    #[test]
    fn direct_intent_button() {
        let decision = run(&TurnInput::button("color_analysis"), &SessionState::default()).unwrap();
        assert_eq!(decision.state.intent, Intent::ColorAnalysis);
    }

    #[test]
    fn tonality_button_resets_pending_and_records_choice() {
        let decision = run(
            &TurnInput::button("savage"),
            &session_with(PendingExpectation::AwaitingColorAnalysisImage),
        )
        .unwrap();
        assert_eq!(decision.rule, RuleKind::ExplicitSelection);
        assert_eq!(decision.state.intent, Intent::VibeCheck);
        assert_eq!(decision.state.tonality, Some(Tonality::Savage));
        assert_eq!(decision.state.pending, None);
        assert_eq!(decision.state.missing_profile_field, None);
        assert!(decision.state.replies.is_empty());
    }

    #[test]
    fn unknown_button_falls_through() {
        let turn = TurnInput::button("checkout");
        assert!(run(&turn, &SessionState::default()).is_none());
    }

    #[test]
    fn tonality_text_is_normalized() {
        let decision = run(
            &TurnInput::text(" Savage "),
            &session_with(PendingExpectation::AwaitingTonality),
        )
        .unwrap();
        assert_eq!(decision.rule, RuleKind::PendingTonality);
        assert_eq!(decision.state.tonality, Some(Tonality::Savage));
        assert_eq!(
            decision.state.pending,
            Some(PendingExpectation::AwaitingVibeCheckImage)
        );
        assert_eq!(decision.state.intent, Intent::VibeCheck);
        assert_eq!(decision.state.missing_profile_field, None);
    }

    #[test]
    fn invalid_tonality_text_replies_and_keeps_state() {
        let mut session = session_with(PendingExpectation::AwaitingTonality);
        session.intent = Intent::Styling;
        let decision = run(&TurnInput::text("maybe"), &session).unwrap();

        assert_eq!(decision.rule, RuleKind::PendingTonality);
        assert_eq!(
            decision.state.pending,
            Some(PendingExpectation::AwaitingTonality)
        );
        assert_eq!(decision.state.intent, Intent::Styling);
        assert_eq!(decision.state.tonality, None);
        assert_eq!(decision.state.replies.len(), 1);
        let text = decision.state.replies[0].as_text().to_lowercase();
        for option in ["friendly", "savage", "hype_bff"] {
            assert!(text.contains(option), "reply lists {option}");
        }
    }

    #[test]
    fn known_field_is_dropped_from_carried_state() {
        let mut state = SessionState {
            missing_profile_field: Some(MissingProfileField::Gender),
            ..SessionState::default()
        };
        let profile = UserProfileSnapshot {
            confirmed_gender: Some("female".into()),
            ..Default::default()
        };

        assert_eq!(
            drop_known_field(&mut state, &profile),
            Some(MissingProfileField::Gender)
        );
        assert_eq!(state.missing_profile_field, None);

        let mut unknown = SessionState {
            missing_profile_field: Some(MissingProfileField::AgeGroup),
            ..SessionState::default()
        };
        assert_eq!(drop_known_field(&mut unknown, &profile), None);
        assert_eq!(
            unknown.missing_profile_field,
            Some(MissingProfileField::AgeGroup)
        );
    }

    #[test]
    fn image_with_pending_vibe_check() {
        let turn = TurnInput::default().with_images(vec![image()]);
        let decision = run(
            &turn,
            &session_with(PendingExpectation::AwaitingVibeCheckImage),
        )
        .unwrap();
        assert_eq!(decision.rule, RuleKind::PendingImage);
        assert_eq!(decision.state.intent, Intent::VibeCheck);
        assert_eq!(decision.state.missing_profile_field, None);
        assert_eq!(
            decision.state.pending,
            Some(PendingExpectation::AwaitingVibeCheckImage)
        );
    }

    #[test]
    fn image_with_pending_color_analysis() {
        let turn = TurnInput::default().with_images(vec![image(), image()]);
        let decision = run(
            &turn,
            &session_with(PendingExpectation::AwaitingColorAnalysisImage),
        )
        .unwrap();
        assert_eq!(decision.state.intent, Intent::ColorAnalysis);
    }

    #[test]
    fn image_without_pending_falls_through() {
        let turn = TurnInput::text("thoughts?").with_images(vec![image()]);
        assert!(run(&turn, &SessionState::default()).is_none());
    }

    #[test]
    fn pending_image_without_image_falls_through() {
        let turn = TurnInput::text("hold on, finding a photo");
        assert!(run(&turn, &session_with(PendingExpectation::AwaitingVibeCheckImage)).is_none());
    }

    #[test]
    fn stale_replies_are_not_carried_over() {
        let mut session = session_with(PendingExpectation::AwaitingVibeCheckImage);
        session.replies = vec![ReplyPayload::text("old")];
        let turn = TurnInput::default().with_images(vec![image()]);
        let decision = run(&turn, &session).unwrap();
        assert!(decision.state.replies.is_empty());
    }
}
