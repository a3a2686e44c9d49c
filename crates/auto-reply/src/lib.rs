//! Inbound turn processing: the glue between channels and intent handlers.
//!
//! Flow: inbound turn → per-session lock → load profile + routing state →
//! route → persist new state → hand intent and direct replies to the caller.

pub mod error;
pub mod pipeline;

pub use {
    error::{Error, Result},
    pipeline::{FALLBACK_REPLY_TEXT, TurnOutcome, TurnPipeline, fallback_reply},
};
