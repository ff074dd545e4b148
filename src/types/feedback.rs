//! Feedback tiers shown after each attempt
//! Cosmetic: they never influence the win predicate.

use serde::{Deserialize, Serialize};

/// Feedback tier for an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTier {
    /// Session won
    Won,
    /// Top result is the target but below the confident threshold
    CorrectLowConfidence,
    /// Similarity >= 0.8
    Close,
    /// Similarity >= 0.6
    Good,
    /// Similarity >= 0.4
    Fair,
    Poor,
}

/// Message variants shown on a win
pub const WON_MESSAGE_KEYS: [&str; 3] = [
    "game.feedback.no_planet_discovered",
    "game.feedback.real_planet_found",
    "game.feedback.new_planet_discovered",
];

impl FeedbackTier {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Won => "WON",
            Self::CorrectLowConfidence => "CORRECT_LOW_CONFIDENCE",
            Self::Close => "CLOSE",
            Self::Good => "GOOD",
            Self::Fair => "FAIR",
            Self::Poor => "POOR",
        }
    }

    /// Message key for non-winning tiers; winning keys are drawn at random
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::Won => WON_MESSAGE_KEYS[0],
            Self::CorrectLowConfidence => "game.feedback.correct_but_low_confidence",
            Self::Close => "game.feedback.close",
            Self::Good => "game.feedback.good",
            Self::Fair => "game.feedback.fair",
            Self::Poor => "game.feedback.poor",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Won => "Target archetype matched",
            Self::CorrectLowConfidence => "Right archetype, low confidence",
            Self::Close => "Very close to the target",
            Self::Good => "Getting warmer",
            Self::Fair => "Some resemblance",
            Self::Poor => "Far from the target",
        }
    }
}

impl std::fmt::Display for FeedbackTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
