//! Request/response shapes for OpenAI-compatible structured-output calls.

use {
    drape_common::{HistoryMessage, HistoryRole, Intent, MissingProfileField},
    serde::{Deserialize, Serialize},
    serde_json::{Value, json},
};

/// Name of the JSON schema sent in `response_format`.
pub const DECISION_SCHEMA_NAME: &str = "route_decision";

/// Chat Completions request body (the subset we send).
#[derive(Debug, Serialize)]
pub struct ChatCompletionsRequest<'a> {
    pub model: &'a str,
    pub temperature: f32,
    pub messages: Vec<Value>,
    pub response_format: Value,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionsResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
    /// Set by some providers when the model declines to answer.
    pub refusal: Option<String>,
}

/// Recursively patch schema for OpenAI strict mode compliance.
///
/// Strict mode requires `additionalProperties: false` on every object and
/// every property listed in `required`.
pub fn patch_schema_for_strict_mode(schema: &mut Value) {
    let Some(obj) = schema.as_object_mut() else {
        return;
    };

    if obj.get("type").and_then(Value::as_str) == Some("object") {
        obj.insert("additionalProperties".into(), json!(false));
        let required: Vec<Value> = obj
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| props.keys().map(|k| json!(k)).collect())
            .unwrap_or_default();
        obj.entry("properties").or_insert_with(|| json!({}));
        obj.insert("required".into(), Value::Array(required));
    }

    if let Some(props) = obj.get_mut("properties").and_then(Value::as_object_mut) {
        props.values_mut().for_each(patch_schema_for_strict_mode);
    }
    if let Some(items) = obj.get_mut("items") {
        patch_schema_for_strict_mode(items);
    }
    for key in ["anyOf", "oneOf", "allOf"] {
        if let Some(variants) = obj.get_mut(key).and_then(Value::as_array_mut) {
            variants.iter_mut().for_each(patch_schema_for_strict_mode);
        }
    }
}

/// JSON schema for the routing decision, built from the fixed vocabularies.
pub fn decision_schema() -> Value {
    let intents: Vec<&str> = Intent::ALL.iter().map(|i| i.as_str()).collect();
    let mut fields: Vec<&str> = MissingProfileField::ALL.iter().map(|f| f.as_str()).collect();
    fields.push("none");

    let mut schema = json!({
        "type": "object",
        "properties": {
            "intent": { "type": "string", "enum": intents },
            "missing_profile_field": { "type": "string", "enum": fields },
        },
    });
    patch_schema_for_strict_mode(&mut schema);
    schema
}

/// `response_format` value requesting [`decision_schema`] in strict mode.
pub fn decision_response_format() -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": DECISION_SCHEMA_NAME,
            "strict": true,
            "schema": decision_schema(),
        }
    })
}

/// System prompt first, then the text-only history in order.
pub fn to_openai_messages(system_prompt: &str, history: &[HistoryMessage]) -> Vec<Value> {
    std::iter::once(json!({ "role": "system", "content": system_prompt }))
        .chain(history.iter().map(|m| {
            let role = match m.role {
                HistoryRole::User => "user",
                HistoryRole::Assistant => "assistant",
            };
            json!({ "role": role, "content": m.content })
        }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_mode_requires_every_property() {
        let mut schema = json!({
            "type": "object",
            "properties": {
                "a": { "type": "string" },
                "nested": { "type": "object", "properties": { "b": { "type": "integer" } } },
            }
        });
        patch_schema_for_strict_mode(&mut schema);

        assert_eq!(schema["additionalProperties"], json!(false));
        let mut required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        required.sort_unstable();
        assert_eq!(required, vec!["a", "nested"]);
        assert_eq!(schema["properties"]["nested"]["required"], json!(["b"]));
    }

    #[test]
    fn empty_object_gets_empty_properties() {
        let mut schema = json!({ "type": "object" });
        patch_schema_for_strict_mode(&mut schema);
        assert_eq!(schema["properties"], json!({}));
        assert_eq!(schema["required"], json!([]));
    }

    #[test]
    fn decision_schema_lists_vocabularies() {
        let schema = decision_schema();
        assert_eq!(
            schema["properties"]["intent"]["enum"],
            json!(["general", "vibe_check", "color_analysis", "styling"])
        );
        assert_eq!(
            schema["properties"]["missing_profile_field"]["enum"],
            json!(["gender", "age_group", "none"])
        );
    }

    #[test]
    fn messages_start_with_system_prompt() {
        let messages = to_openai_messages("route it", &[
            HistoryMessage::user("hi"),
            HistoryMessage::assistant("hello!"),
        ]);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], json!({ "role": "system", "content": "route it" }));
        assert_eq!(messages[2]["role"], "assistant");
    }
}
