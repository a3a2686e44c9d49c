//! Cooldown windows for rate-limited premium features.

use {
    chrono::{DateTime, Utc},
    drape_common::{PremiumFeature, UserProfileSnapshot},
};

/// Minimum gap, in whole minutes, between two uses of the same premium feature.
pub const COOLDOWN_MINUTES: i64 = 30;

const MS_PER_MINUTE: i64 = 60_000;

/// Whether a feature last used at `last_used` may run again at `now`.
///
/// Elapsed time is floored to whole minutes before comparing, so 29m59s is
/// still inside the window. A timestamp in the future counts as inside it.
pub fn is_eligible(last_used: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    let Some(last_used) = last_used else {
        return true;
    };
    let elapsed_minutes = (now - last_used)
        .num_milliseconds()
        .div_euclid(MS_PER_MINUTE);
    elapsed_minutes >= COOLDOWN_MINUTES
}

/// Eligibility of each premium feature for one turn. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownStatus {
    pub can_do_vibe_check: bool,
    pub can_do_color_analysis: bool,
}

impl CooldownStatus {
    pub fn evaluate(profile: &UserProfileSnapshot, now: DateTime<Utc>) -> Self {
        Self {
            can_do_vibe_check: is_eligible(profile.last_used(PremiumFeature::VibeCheck), now),
            can_do_color_analysis: is_eligible(
                profile.last_used(PremiumFeature::ColorAnalysis),
                now,
            ),
        }
    }
}
