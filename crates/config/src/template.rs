//! Default configuration template with all options documented.

/// Generate the default config template.
pub fn default_config_template() -> String {
    r##"# Drape Configuration
# ===================
# Environment variable substitution is supported: ${ENV_VAR}
# Example: api_key = "${OPENAI_API_KEY}"

# ══════════════════════════════════════════════════════════════════════════════
# CLASSIFIER
# ══════════════════════════════════════════════════════════════════════════════
# OpenAI-compatible endpoint that picks an intent when no deterministic rule
# applies. Must support `response_format = json_schema`.

[classifier]
base_url = "https://api.openai.com/v1"   # Any OpenAI-compatible API root
model = "gpt-4o-mini"                    # Model used for classification
# api_key = "${OPENAI_API_KEY}"          # Bearer token (omit for local endpoints)
temperature = 0.0                        # Keep at 0 for stable routing

# ══════════════════════════════════════════════════════════════════════════════
# ROUTING
# ══════════════════════════════════════════════════════════════════════════════

[routing]
classifier_timeout_secs = 30             # A slower classification fails the turn
# Custom system prompt. It must keep the {{canDoVibeCheck}} and
# {{canDoColorAnalysis}} placeholders.
# prompt_path = "prompts/intent_router.md"

# ══════════════════════════════════════════════════════════════════════════════
# DATABASE
# ══════════════════════════════════════════════════════════════════════════════

[database]
url = "sqlite://drape.db?mode=rwc"       # Session routing state and user profiles
"##
    .to_string()
}
