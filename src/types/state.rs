//! Game state definitions

use colored::Color;
use serde::{Deserialize, Serialize};

/// The three states of a guessing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    /// No attempt yet
    Idle,
    /// At least one attempt, target not matched
    Evaluated,
    /// Target matched; terminal until restart
    Won,
}

impl GameState {
    /// Terminal color for display
    pub fn color(&self) -> Color {
        match self {
            GameState::Idle => Color::BrightBlack,
            GameState::Evaluated => Color::Yellow,
            GameState::Won => Color::Green,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            GameState::Idle => "🔭",
            GameState::Evaluated => "🪐",
            GameState::Won => "🎉",
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self == GameState::Won
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GameState::Idle => "IDLE",
            GameState::Evaluated => "EVALUATED",
            GameState::Won => "WON",
        };
        write!(f, "{}", name)
    }
}
