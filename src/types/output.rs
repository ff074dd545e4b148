//! Output structures for each classification attempt

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::types::{ClassificationResult, ClassificationSource, FeedbackTier, GameState};

/// Output of one completed attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptOutput {
    pub timestamp: DateTime<Utc>,
    /// Attempt number within the session (1-based)
    pub attempt: u64,
    /// Session generation the attempt belongs to
    pub generation: u64,
    pub state: GameState,
    pub won: bool,
    /// True when this attempt caused the Won transition
    pub newly_won: bool,
    pub source: ClassificationSource,
    pub results: Vec<ClassificationResult>,
    /// Cosmetic similarity in [0, 1]
    pub similarity: f64,
    pub feedback: FeedbackTier,
    pub message_key: String,
}

impl AttemptOutput {
    pub fn top(&self) -> Option<&ClassificationResult> {
        self.results.first()
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let top = self
            .top()
            .map(|r| format!("{} ({:.0}%)", r.archetype_id, r.probability * 100.0))
            .unwrap_or_else(|| "none".to_string());
        format!(
            "{} #{} top={} | similarity={:.2} | state={} | source={} | {}",
            self.state.emoji(),
            self.attempt,
            top,
            self.similarity,
            self.state,
            self.source,
            self.feedback.code()
        )
        .color(self.state.color())
        .to_string()
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        let top = self.top().map(|r| r.archetype_id.as_str()).unwrap_or("none");
        format!(
            "attempt={} | top={} | similarity={:.3} | state={} | source={} | feedback={}",
            self.attempt,
            top,
            self.similarity,
            self.state,
            self.source,
            self.feedback.code()
        )
    }
}
