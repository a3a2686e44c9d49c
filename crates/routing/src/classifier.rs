//! Interface to the external structured-output classifier.

use {
    async_trait::async_trait,
    drape_common::{HistoryMessage, Intent, MissingProfileField},
    serde::{Deserialize, Deserializer, Serialize},
};

/// Everything the classifier sees: the rendered system prompt and the
/// text-only conversation, oldest first, ending with the current message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRequest {
    pub system_prompt: String,
    pub history: Vec<HistoryMessage>,
}

/// Typed classifier output.
///
/// `missing_profile_field` accepts `"gender"`, `"age_group"`, `"none"`, `null`
/// or an absent key. Any other value fails deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierDecision {
    pub intent: Intent,
    #[serde(default, deserialize_with = "deserialize_missing_field")]
    pub missing_profile_field: Option<MissingProfileField>,
}

impl ClassifierDecision {
    pub fn new(intent: Intent) -> Self {
        Self {
            intent,
            missing_profile_field: None,
        }
    }

    #[must_use]
    pub fn missing(mut self, field: MissingProfileField) -> Self {
        self.missing_profile_field = Some(field);
        self
    }
}

fn deserialize_missing_field<'de, D>(
    deserializer: D,
) -> Result<Option<MissingProfileField>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("none") => Ok(None),
        Some(other) => other.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Structured-output classification capability (an LLM behind a JSON schema).
///
/// Implementations own transport, auth, and any retry policy. The router
/// wraps every error into [`crate::Error::Classification`].
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, request: ClassificationRequest) -> anyhow::Result<ClassifierDecision>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_none_and_null_as_absent() {
        let a: ClassifierDecision =
            serde_json::from_str(r#"{"intent":"styling","missing_profile_field":"none"}"#).unwrap();
        let b: ClassifierDecision =
            serde_json::from_str(r#"{"intent":"styling","missing_profile_field":null}"#).unwrap();
        let c: ClassifierDecision = serde_json::from_str(r#"{"intent":"styling"}"#).unwrap();
        for decision in [a, b, c] {
            assert_eq!(decision, ClassifierDecision::new(Intent::Styling));
        }
    }

    #[test]
    fn parses_named_field() {
        let decision: ClassifierDecision =
            serde_json::from_str(r#"{"intent":"general","missing_profile_field":"age_group"}"#)
                .unwrap();
        assert_eq!(
            decision.missing_profile_field,
            Some(MissingProfileField::AgeGroup)
        );
    }

    #[test]
    fn rejects_values_outside_the_vocabulary() {
        assert!(serde_json::from_str::<ClassifierDecision>(r#"{"intent":"shopping"}"#).is_err());
        assert!(
            serde_json::from_str::<ClassifierDecision>(
                r#"{"intent":"general","missing_profile_field":"height"}"#
            )
            .is_err()
        );
    }
}
