//! Fixed vocabularies shared by the router, the stores, and the classifier.
//!
//! Every value has one canonical snake_case wire name. Parsing is exact; callers
//! that accept free text (tonality replies) normalize before parsing.

use {
    crate::Error,
    serde::{Deserialize, Serialize},
    std::{fmt, str::FromStr},
};

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Canonical wire name.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// Exact match against the wire names; `None` for anything else.
            #[must_use]
            pub fn parse(value: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.as_str() == value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s).ok_or_else(|| Error::unknown_variant($kind, s))
            }
        }
    };
}

vocabulary! {
    /// Downstream capability selected to handle a turn.
    Intent, "intent" {
        General => "general",
        VibeCheck => "vibe_check",
        ColorAnalysis => "color_analysis",
        Styling => "styling",
    }
}

impl Default for Intent {
    fn default() -> Self {
        Self::General
    }
}

vocabulary! {
    /// Profile attribute that must be collected before some intents can run.
    MissingProfileField, "missing profile field" {
        Gender => "gender",
        AgeGroup => "age_group",
    }
}

vocabulary! {
    /// Response style chosen by the user for vibe-check output.
    Tonality, "tonality" {
        Friendly => "friendly",
        Savage => "savage",
        HypeBff => "hype_bff",
    }
}

vocabulary! {
    /// What follow-up the session is waiting for from the user.
    PendingExpectation, "pending expectation" {
        AwaitingTonality => "awaiting_tonality",
        AwaitingVibeCheckImage => "awaiting_vibe_check_image",
        AwaitingColorAnalysisImage => "awaiting_color_analysis_image",
    }
}

vocabulary! {
    /// Rate-limited features gated by a cooldown window.
    PremiumFeature, "premium feature" {
        VibeCheck => "vibe_check",
        ColorAnalysis => "color_analysis",
    }
}
