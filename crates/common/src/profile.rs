use {
    crate::vocab::{MissingProfileField, PremiumFeature},
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

/// Read-only view of the durable user attributes routing depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfileSnapshot {
    pub confirmed_gender: Option<String>,
    pub inferred_gender: Option<String>,
    pub confirmed_age_group: Option<String>,
    pub inferred_age_group: Option<String>,
    pub last_vibe_check_at: Option<DateTime<Utc>>,
    pub last_color_analysis_at: Option<DateTime<Utc>>,
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl UserProfileSnapshot {
    pub fn has_gender(&self) -> bool {
        present(&self.confirmed_gender) || present(&self.inferred_gender)
    }

    pub fn has_age_group(&self) -> bool {
        present(&self.confirmed_age_group) || present(&self.inferred_age_group)
    }

    /// Whether the stored profile already provides `field`, confirmed or inferred.
    pub fn satisfies(&self, field: MissingProfileField) -> bool {
        match field {
            MissingProfileField::Gender => self.has_gender(),
            MissingProfileField::AgeGroup => self.has_age_group(),
        }
    }

    pub fn last_used(&self, feature: PremiumFeature) -> Option<DateTime<Utc>> {
        match feature {
            PremiumFeature::VibeCheck => self.last_vibe_check_at,
            PremiumFeature::ColorAnalysis => self.last_color_analysis_at,
        }
    }
}
