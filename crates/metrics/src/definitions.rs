//! Metric name and label definitions.
//!
//! Centralizing these keeps names consistent between the router, the turn
//! pipeline, and the classifier provider.

/// Intent routing metrics
pub mod routing {
    /// Routing decisions, labelled by selected intent and the rule that decided
    pub const DECISIONS_TOTAL: &str = "drape_routing_decisions_total";
    /// Corrective replies sent for unrecognized tonality text
    pub const INVALID_TONALITY_TOTAL: &str = "drape_routing_invalid_tonality_total";
    /// Missing-profile-field requests suppressed because the profile already had the value
    pub const MISSING_FIELD_SUPPRESSED_TOTAL: &str = "drape_routing_missing_field_suppressed_total";
}

/// External classifier metrics
pub mod classifier {
    /// Total classification calls
    pub const CALLS_TOTAL: &str = "drape_classifier_calls_total";
    /// Classification failures (errors, malformed output, timeouts)
    pub const ERRORS_TOTAL: &str = "drape_classifier_errors_total";
    /// Classification call duration in seconds
    pub const DURATION_SECONDS: &str = "drape_classifier_duration_seconds";
}

/// Turn pipeline metrics
pub mod turns {
    /// Turns received by the pipeline
    pub const RECEIVED_TOTAL: &str = "drape_turns_received_total";
    /// Turns that failed and committed no state
    pub const FAILED_TOTAL: &str = "drape_turns_failed_total";
    /// End-to-end turn duration in seconds (lock wait included)
    pub const DURATION_SECONDS: &str = "drape_turn_duration_seconds";
}

/// Common label keys
pub mod labels {
    pub const INTENT: &str = "intent";
    pub const RULE: &str = "rule";
    pub const FIELD: &str = "field";
    pub const ERROR_TYPE: &str = "error_type";
}
