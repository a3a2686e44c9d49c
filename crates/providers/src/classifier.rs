//! Intent classifier backed by an OpenAI-compatible Chat Completions endpoint.

use {
    anyhow::Context,
    async_trait::async_trait,
    drape_config::ClassifierConfig,
    drape_routing::{ClassificationRequest, ClassifierDecision, IntentClassifier},
    secrecy::{ExposeSecret, Secret},
    tracing::{debug, trace},
};

use crate::{
    openai_compat::{
        ChatCompletionsRequest, ChatCompletionsResponse, decision_response_format,
        to_openai_messages,
    },
    shared_http_client,
};

pub struct OpenAiCompatClassifier {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<Secret<String>>,
    temperature: f32,
}

impl OpenAiCompatClassifier {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: shared_http_client().clone(),
            base_url: base_url.into(),
            model: model.into(),
            api_key: None,
            temperature: 0.0,
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        let mut classifier = Self::new(&config.base_url, &config.model);
        classifier.api_key = config.api_key.clone();
        classifier.temperature = config.temperature;
        classifier
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: Secret<String>) -> Self {
        self.api_key = Some(api_key);
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl IntentClassifier for OpenAiCompatClassifier {
    async fn classify(&self, request: ClassificationRequest) -> anyhow::Result<ClassifierDecision> {
        let body = ChatCompletionsRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: to_openai_messages(&request.system_prompt, &request.history),
            response_format: decision_response_format(),
        };
        trace!(model = %self.model, messages = body.messages.len(), "classification request");

        let mut http = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            http = http.bearer_auth(key.expose_secret());
        }
        let response = http.send().await.context("classifier request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("classifier returned HTTP {status}: {detail}");
        }

        let payload: ChatCompletionsResponse = response
            .json()
            .await
            .context("classifier response is not a chat completion")?;
        let message = payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .context("classifier response has no choices")?;
        if let Some(refusal) = message.refusal {
            anyhow::bail!("classifier refused: {refusal}");
        }
        let content = message
            .content
            .context("classifier response has no content")?;

        let decision: ClassifierDecision = serde_json::from_str(&content)
            .with_context(|| format!("classifier output does not match schema: {content}"))?;
        debug!(
            intent = %decision.intent,
            missing_profile_field = ?decision.missing_profile_field,
            "classifier decision"
        );
        Ok(decision)
    }
}
