//! Shared types, error definitions, and vocabularies used across all drape crates.

pub mod error;
pub mod profile;
pub mod state;
pub mod types;
pub mod vocab;

pub use {
    error::{Error, FromMessage, Result},
    profile::UserProfileSnapshot,
    state::SessionState,
    types::{HistoryMessage, HistoryRole, ImageAttachment, ReplyPayload, TurnInput},
    vocab::{Intent, MissingProfileField, PendingExpectation, PremiumFeature, Tonality},
};
