/// Config schema types (classifier endpoint, routing, database).
use std::path::PathBuf;

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DrapeConfig {
    pub classifier: ClassifierConfig,
    pub routing: RoutingConfig,
    pub database: DatabaseConfig,
}

/// OpenAI-compatible endpoint used for intent classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// API base URL, without the `/chat/completions` suffix.
    pub base_url: String,
    pub model: String,
    /// Bearer token. Optional for local endpoints.
    #[serde(
        default,
        serialize_with = "serialize_option_secret",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_key: Option<Secret<String>>,
    pub temperature: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            model: "gpt-4o-mini".into(),
            api_key: None,
            temperature: 0.0,
        }
    }
}

/// Intent router settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Upper bound on a single classification call, in seconds.
    pub classifier_timeout_secs: u64,
    /// Custom system prompt for the classifier. The built-in prompt is used
    /// when unset.
    pub prompt_path: Option<PathBuf>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            classifier_timeout_secs: 30,
            prompt_path: None,
        }
    }
}

impl RoutingConfig {
    pub fn classifier_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.classifier_timeout_secs)
    }
}

/// Session and profile storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://drape.db?mode=rwc".into(),
        }
    }
}

impl DrapeConfig {
    /// Copy with secrets masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut cfg = self.clone();
        if cfg.classifier.api_key.is_some() {
            cfg.classifier.api_key = Some(Secret::new("[REDACTED]".into()));
        }
        cfg
    }
}

// ── Serde helpers for Secret<String> ────────────────────────────────────────

fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}
