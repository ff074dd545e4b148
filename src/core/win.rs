//! Win condition evaluator: state machine over ranked classifications
//!
//! State transitions:
//! - IDLE → EVALUATED: any non-winning attempt
//! - IDLE/EVALUATED → WON: target present and
//!   (rank < 2 with p ≥ 0.6) or (rank 0 with p ≥ 0.7)
//! - WON is sticky until `reset`

use serde::{Deserialize, Serialize};

use crate::config::WinThresholds;
use crate::types::{ClassificationResult, GameState};

/// Outcome of the win predicate for one ranked list
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinVerdict {
    /// Rank of the first entry matching the target; None = not found
    pub target_rank: Option<usize>,
    pub target_probability: Option<f64>,
    pub is_top: bool,
    pub is_top_two: bool,
    pub win: bool,
}

/// Win state machine
#[derive(Debug, Clone)]
pub struct WinConditionEvaluator {
    state: GameState,
    thresholds: WinThresholds,
    evaluations: u64,
}

impl Default for WinConditionEvaluator {
    fn default() -> Self {
        Self::new(WinThresholds::default())
    }
}

impl WinConditionEvaluator {
    pub fn new(thresholds: WinThresholds) -> Self {
        Self {
            state: GameState::Idle,
            thresholds,
            evaluations: 0,
        }
    }

    /// Pure win predicate. Rank is the position in the list, so duplicate
    /// ids count from their first appearance.
    pub fn verdict(
        thresholds: &WinThresholds,
        results: &[ClassificationResult],
        target_id: &str,
    ) -> WinVerdict {
        let found = results
            .iter()
            .position(|r| r.archetype_id == target_id)
            .map(|rank| (rank, results[rank].probability));

        match found {
            None => WinVerdict {
                target_rank: None,
                target_probability: None,
                is_top: false,
                is_top_two: false,
                win: false,
            },
            Some((rank, p)) => {
                let is_top = rank == 0;
                let is_top_two = rank < thresholds.top_rank_limit;
                let win = (is_top_two && p >= thresholds.top_two_min_probability)
                    || (is_top && p >= thresholds.top_one_min_probability);
                WinVerdict {
                    target_rank: Some(rank),
                    target_probability: Some(p),
                    is_top,
                    is_top_two,
                    win,
                }
            }
        }
    }

    /// Apply a new ranked list. Once WON, the predicate is not re-run.
    pub fn update(&mut self, results: &[ClassificationResult], target_id: &str) -> Option<WinVerdict> {
        if self.state == GameState::Won {
            return None;
        }
        self.evaluations += 1;
        let verdict = Self::verdict(&self.thresholds, results, target_id);
        self.state = if verdict.win {
            GameState::Won
        } else {
            GameState::Evaluated
        };
        Some(verdict)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_won(&self) -> bool {
        self.state == GameState::Won
    }

    pub fn thresholds(&self) -> &WinThresholds {
        &self.thresholds
    }

    /// Number of times the predicate actually ran
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Back to IDLE, keeping thresholds
    pub fn reset(&mut self) {
        *self = Self::new(self.thresholds);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Five archetypes with the target at `rank` carrying `p`
    fn ranked(target_rank: Option<usize>, p: f64) -> Vec<ClassificationResult> {
        let others = ["Sub Earth", "Super Earth", "Gas Giant", "Ice Giant", "Ocean World"];
        let mut ids: Vec<&str> = others.to_vec();
        if let Some(rank) = target_rank {
            ids.pop();
            ids.insert(rank, "Earth-like");
        }
        ids.into_iter()
            .enumerate()
            .map(|(rank, id)| ClassificationResult {
                archetype_id: id.to_string(),
                probability: if Some(rank) == target_rank { p } else { 0.05 },
                rank,
            })
            .collect()
    }

    fn win(target_rank: Option<usize>, p: f64) -> bool {
        WinConditionEvaluator::verdict(&WinThresholds::default(), &ranked(target_rank, p), "Earth-like").win
    }

    #[test]
    fn test_win_predicate_table() {
        assert!(win(Some(1), 0.65));
        assert!(win(Some(0), 0.65));
        assert!(!win(Some(0), 0.50));
        assert!(!win(Some(2), 0.75));
        assert!(!win(None, 0.0));
    }

    #[test]
    fn test_threshold_boundaries_inclusive() {
        assert!(win(Some(1), 0.6));
        assert!(win(Some(0), 0.7));
        assert!(!win(Some(1), 0.59));
    }

    #[test]
    fn test_absent_target_is_not_found() {
        let v = WinConditionEvaluator::verdict(&WinThresholds::default(), &ranked(None, 0.0), "Earth-like");
        assert_eq!(v.target_rank, None);
        assert_eq!(v.target_probability, None);
    }

    #[test]
    fn test_initial_state_is_idle() {
        assert_eq!(WinConditionEvaluator::default().state(), GameState::Idle);
    }

    #[test]
    fn test_idle_to_evaluated_to_won() {
        let mut e = WinConditionEvaluator::default();
        e.update(&ranked(Some(3), 0.9), "Earth-like");
        assert_eq!(e.state(), GameState::Evaluated);
        e.update(&ranked(Some(0), 0.8), "Earth-like");
        assert_eq!(e.state(), GameState::Won);
    }

    #[test]
    fn test_won_is_sticky() {
        let mut e = WinConditionEvaluator::default();
        e.update(&ranked(Some(0), 0.9), "Earth-like");
        assert!(e.is_won());
        assert!(e.update(&ranked(None, 0.0), "Earth-like").is_none());
        assert!(e.is_won());
        assert_eq!(e.evaluations(), 1);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut e = WinConditionEvaluator::default();
        e.update(&ranked(Some(0), 0.9), "Earth-like");
        e.reset();
        assert_eq!(e.state(), GameState::Idle);
        assert_eq!(e.evaluations(), 0);
    }

    #[test]
    fn test_overridden_thresholds() {
        let strict = WinThresholds {
            top_two_min_probability: 0.95,
            top_one_min_probability: 0.95,
            ..WinThresholds::default()
        };
        let v = WinConditionEvaluator::verdict(&strict, &ranked(Some(0), 0.9), "Earth-like");
        assert!(!v.win);
    }
}
