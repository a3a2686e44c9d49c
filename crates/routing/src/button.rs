//! Button / quick-reply payload vocabulary.

use drape_common::{Intent, Tonality};

/// Tokens that all open the styling flow.
pub const STYLING_FAMILY: &[&str] = &["styling", "occasion", "vacation", "pairing"];

/// Tokens that select a non-styling intent directly.
pub const DIRECT_INTENTS: &[&str] = &["general", "vibe_check", "color_analysis", "suggest"];

/// What a recognized button token selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonSelection {
    Intent(Intent),
    Tonality(Tonality),
}

impl ButtonSelection {
    /// Map a button token to a selection. Tokens are machine-generated, so the
    /// match is exact; anything else returns `None`.
    pub fn parse(token: &str) -> Option<Self> {
        if STYLING_FAMILY.contains(&token) {
            return Some(Self::Intent(Intent::Styling));
        }
        if DIRECT_INTENTS.contains(&token) {
            return Some(Self::Intent(direct_intent(token)));
        }
        Tonality::parse(token).map(Self::Tonality)
    }
}

fn direct_intent(token: &str) -> Intent {
    match token {
        // Pairing suggestions are served by the styling handler.
        "suggest" => Intent::Styling,
        other => Intent::parse(other).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_styling_token_selects_styling() {
        for token in STYLING_FAMILY {
            assert_eq!(
                ButtonSelection::parse(token),
                Some(ButtonSelection::Intent(Intent::Styling)),
                "token {token}"
            );
        }
    }

    #[test]
    fn direct_tokens_select_their_intent() {
        assert_eq!(
            ButtonSelection::parse("general"),
            Some(ButtonSelection::Intent(Intent::General))
        );
        assert_eq!(
            ButtonSelection::parse("vibe_check"),
            Some(ButtonSelection::Intent(Intent::VibeCheck))
        );
        assert_eq!(
            ButtonSelection::parse("color_analysis"),
            Some(ButtonSelection::Intent(Intent::ColorAnalysis))
        );
        assert_eq!(
            ButtonSelection::parse("suggest"),
            Some(ButtonSelection::Intent(Intent::Styling))
        );
    }

    #[test]
    fn tonality_tokens() {
        assert_eq!(
            ButtonSelection::parse("hype_bff"),
            Some(ButtonSelection::Tonality(Tonality::HypeBff))
        );
    }

    #[test]
    fn unknown_and_unnormalized_tokens_are_ignored() {
        assert_eq!(ButtonSelection::parse("checkout"), None);
        assert_eq!(ButtonSelection::parse("Styling"), None);
        assert_eq!(ButtonSelection::parse(""), None);
    }
}
