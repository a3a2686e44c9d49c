//! Decide which capability handles an inbound turn.
//!
//! Rule cascade (first match wins):
//! 1. Explicit selection (button / quick-reply payload)
//! 2. Pending tonality selection (free-text reply while awaiting a tonality)
//! 3. Pending image (image attached while awaiting a vibe-check or color-analysis image)
//! 4. Classification (cooldown flags rendered into the prompt, external classifier call)
//!
//! Rules 1-3 are pure; only the classification step suspends or fails.

pub mod button;
pub mod classifier;
pub mod cooldown;
pub mod error;
pub mod prompt;
pub mod router;
pub mod rules;

pub use {
    classifier::{ClassificationRequest, ClassifierDecision, IntentClassifier},
    cooldown::{COOLDOWN_MINUTES, CooldownStatus},
    error::{Error, Result},
    router::IntentRouter,
    rules::{INVALID_TONALITY_REPLY, RouteDecision, RuleKind},
};
