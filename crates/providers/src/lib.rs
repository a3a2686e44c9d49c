//! Classifier provider implementations.

pub mod classifier;
pub mod openai_compat;

pub use classifier::OpenAiCompatClassifier;

/// Shared HTTP client for classifier providers.
///
/// Reused so every classifier shares one connection pool and TLS session cache.
pub fn shared_http_client() -> &'static reqwest::Client {
    static CLIENT: std::sync::LazyLock<reqwest::Client> =
        std::sync::LazyLock::new(reqwest::Client::new);
    &CLIENT
}
