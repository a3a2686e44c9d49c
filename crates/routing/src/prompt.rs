//! System prompt for the fallback classification call.

use std::path::Path;

use crate::cooldown::CooldownStatus;

/// Placeholder names the router fills in.
pub const VAR_CAN_DO_VIBE_CHECK: &str = "canDoVibeCheck";
pub const VAR_CAN_DO_COLOR_ANALYSIS: &str = "canDoColorAnalysis";

/// Built-in router prompt, used when no custom template is configured.
pub const DEFAULT_ROUTER_PROMPT: &str =
    r#"You are the routing layer of a personal styling assistant on a messaging app.
Read the conversation and pick exactly one intent for the latest user message.

Intents:
- "styling": outfit ideas, what to wear for an occasion or trip, what pairs with an item.
- "vibe_check": the user wants feedback on how an outfit they are wearing looks.
- "color_analysis": the user wants to know which colors suit their skin tone, hair, or eyes.
- "general": greetings, thanks, questions about the assistant, anything else.

Premium feature availability for this user right now:
- vibe_check available: {{canDoVibeCheck}}
- color_analysis available: {{canDoColorAnalysis}}
If a feature is not available, still return its intent when the user asks for it;
the handler explains the wait.

Missing profile information:
Styling advice depends on gender and age group. When the chosen intent is
"styling" and the conversation does not reveal the user's gender, set
missing_profile_field to "gender"; otherwise, if it does not reveal the age
group, set it to "age_group". In every other case use "none".

Answer only with the JSON object required by the response schema."#;

/// Replace `{{name}}` placeholders with values from `vars`.
///
/// Whitespace inside the braces is ignored. Placeholders without a value are
/// kept verbatim.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = after[..end].trim();
        match vars.iter().find(|(key, _)| *key == name) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

/// Render the router prompt with the cooldown flags as literal `true`/`false`.
pub fn render_router_prompt(template: &str, cooldown: CooldownStatus) -> String {
    render_template(template, &[
        (VAR_CAN_DO_VIBE_CHECK, bool_literal(cooldown.can_do_vibe_check)),
        (
            VAR_CAN_DO_COLOR_ANALYSIS,
            bool_literal(cooldown.can_do_color_analysis),
        ),
    ])
}

/// Read a custom router prompt from disk.
pub async fn load_prompt_template(path: &Path) -> drape_common::Result<String> {
    let template = tokio::fs::read_to_string(path).await?;
    if template.trim().is_empty() {
        return Err(drape_common::Error::message(format!(
            "router prompt {} is empty",
            path.display()
        )));
    }
    for var in [VAR_CAN_DO_VIBE_CHECK, VAR_CAN_DO_COLOR_ANALYSIS] {
        if !template.contains(var) {
            tracing::warn!(
                path = %path.display(),
                placeholder = var,
                "router prompt lacks placeholder"
            );
        }
    }
    Ok(template)
}

fn bool_literal(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
