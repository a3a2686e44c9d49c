//! Semantic validation of a loaded configuration.

use crate::schema::DrapeConfig;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "classifier.base_url"
    pub path: &'static str,
    pub message: String,
}

impl Diagnostic {
    fn error(path: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            path,
            message: message.into(),
        }
    }

    fn warning(path: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            path,
            message: message.into(),
        }
    }
}

/// Returns `true` if any diagnostic is an error.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity == Severity::Error)
}

/// Check a config for values that would make routing fail at runtime.
pub fn validate(config: &DrapeConfig) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let base_url = config.classifier.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        diagnostics.push(Diagnostic::error(
            "classifier.base_url",
            format!("expected an http(s) URL, got {base_url:?}"),
        ));
    }
    if config.classifier.model.trim().is_empty() {
        diagnostics.push(Diagnostic::error("classifier.model", "model must not be empty"));
    }
    if config.classifier.api_key.is_none() && base_url.starts_with("https://") {
        diagnostics.push(Diagnostic::warning(
            "classifier.api_key",
            "no API key set for a remote endpoint",
        ));
    }
    if !(0.0..=2.0).contains(&config.classifier.temperature) {
        diagnostics.push(Diagnostic::warning(
            "classifier.temperature",
            "temperature outside 0.0..=2.0",
        ));
    }

    if config.routing.classifier_timeout_secs == 0 {
        diagnostics.push(Diagnostic::error(
            "routing.classifier_timeout_secs",
            "timeout of 0 fails every classification",
        ));
    }
    if let Some(path) = &config.routing.prompt_path
        && !path.exists()
    {
        diagnostics.push(Diagnostic::error(
            "routing.prompt_path",
            format!("prompt file not found: {}", path.display()),
        ));
    }

    if config.database.url.trim().is_empty() {
        diagnostics.push(Diagnostic::error("database.url", "database URL must not be empty"));
    }

    diagnostics
}

#[cfg(test)]
mod tests {
    use {super::*, secrecy::Secret};

    fn valid() -> DrapeConfig {
        let mut cfg = DrapeConfig::default();
        cfg.classifier.api_key = Some(Secret::new("sk-test".into()));
        cfg
    }

    #[test]
    fn defaults_with_key_are_clean() {
        assert!(validate(&valid()).is_empty());
    }

    #[test]
    fn missing_key_for_remote_endpoint_is_warning() {
        let diagnostics = validate(&DrapeConfig::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[0].path, "classifier.api_key");
        assert!(!has_errors(&diagnostics));
    }

    #[test]
    fn local_endpoint_without_key_is_fine() {
        let mut cfg = DrapeConfig::default();
        cfg.classifier.base_url = "http://localhost:11434/v1".into();
        assert!(validate(&cfg).is_empty());
    }

    #[test]
    fn zero_timeout_is_error() {
        let mut cfg = valid();
        cfg.routing.classifier_timeout_secs = 0;
        let diagnostics = validate(&cfg);
        assert!(has_errors(&diagnostics));
        assert_eq!(diagnostics[0].path, "routing.classifier_timeout_secs");
    }

    #[test]
    fn missing_prompt_file_is_error() {
        let mut cfg = valid();
        cfg.routing.prompt_path = Some("/definitely/not/here.md".into());
        assert!(has_errors(&validate(&cfg)));
    }

    #[test]
    fn bad_base_url_and_empty_model_both_reported() {
        let mut cfg = valid();
        cfg.classifier.base_url = "api.openai.com".into();
        cfg.classifier.model = " ".into();
        let paths: Vec<_> = validate(&cfg).iter().map(|d| d.path).collect();
        assert!(paths.contains(&"classifier.base_url"));
        assert!(paths.contains(&"classifier.model"));
    }
}
