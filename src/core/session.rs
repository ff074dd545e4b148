//! Game session: one play-through's state
//!
//! Single-flight: `begin_attempt` issues a ticket and increments the attempt
//! counter; `complete_attempt` applies the classification only if the ticket
//! still matches the session's generation and pending sequence. A restart
//! bumps the generation, so results for superseded attempts are discarded.
//! An attempt whose future is dropped releases its pending slot.

use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{FeedbackThresholds, WinThresholds};
use crate::core::{
    ArchetypeCatalog, FallbackOrchestrator, LocalClassifier, RandomSource, SimilarityScorer,
    WinConditionEvaluator,
};
use crate::error::SessionError;
use crate::types::{
    Archetype, AttemptOutput, Classification, Dimension, GameState, ParameterVector,
};

/// Clears the pending slot if an in-progress `attempt` future is dropped
struct AbandonOnDrop<'a> {
    session: &'a mut GameSession,
    generation: u64,
    sequence: u64,
    armed: bool,
}

impl Drop for AbandonOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.session.abandon(self.generation, self.sequence);
        }
    }
}

/// Proof that an attempt was started; required to complete it
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptTicket {
    generation: u64,
    sequence: u64,
    guess: ParameterVector,
}

impl AttemptTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Guess as it was when the attempt started
    pub fn guess(&self) -> &ParameterVector {
        &self.guess
    }
}

/// Draw a target archetype and a parameter vector inside its ranges
pub fn draw_target(catalog: &ArchetypeCatalog, random: &mut dyn RandomSource) -> (String, ParameterVector) {
    let archetype = &catalog.enumerate()[random.pick_index(catalog.len())];
    let vector = ParameterVector::from_fn(|dim| {
        let bounds = dim.bounds();
        let range = archetype
            .range(dim)
            .and_then(|r| r.intersect(&bounds))
            .unwrap_or(bounds);
        random.uniform(range.min, range.max)
    });
    (archetype.id.clone(), vector)
}

pub struct GameSession {
    catalog: Arc<ArchetypeCatalog>,
    random: Box<dyn RandomSource>,
    feedback: FeedbackThresholds,
    scorer: SimilarityScorer,
    evaluator: WinConditionEvaluator,
    target_id: String,
    target: ParameterVector,
    current_guess: ParameterVector,
    attempts: u64,
    last_classification: Option<Classification>,
    similarity: f64,
    generation: u64,
    pending: Option<u64>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("target_id", &self.target_id)
            .field("attempts", &self.attempts)
            .field("state", &self.state())
            .field("generation", &self.generation)
            .field("pending", &self.pending)
            .finish()
    }
}

impl GameSession {
    pub fn new(
        catalog: Arc<ArchetypeCatalog>,
        win: WinThresholds,
        feedback: FeedbackThresholds,
        mut random: Box<dyn RandomSource>,
    ) -> Self {
        let (target_id, target) = draw_target(&catalog, random.as_mut());
        info!(target = %target_id, "session started");
        Self {
            catalog,
            random,
            feedback,
            scorer: SimilarityScorer::new(),
            evaluator: WinConditionEvaluator::new(win),
            target_id,
            target,
            current_guess: ParameterVector::default(),
            attempts: 0,
            last_classification: None,
            similarity: 0.0,
            generation: 1,
            pending: None,
        }
    }

    /// Session with stock thresholds
    pub fn with_defaults(catalog: Arc<ArchetypeCatalog>, random: Box<dyn RandomSource>) -> Self {
        Self::new(catalog, WinThresholds::default(), FeedbackThresholds::default(), random)
    }

    // =========================================================================
    // Guess updates (no attempt side effect)
    // =========================================================================

    pub fn set_guess(&mut self, dim: Dimension, value: f64) -> Result<f64, SessionError> {
        self.current_guess.set(dim, value)
    }

    pub fn replace_guess(&mut self, guess: ParameterVector) {
        self.current_guess = guess.clamped();
    }

    // =========================================================================
    // Attempts
    // =========================================================================

    /// Start an attempt. Fails while another is unresolved.
    pub fn begin_attempt(&mut self) -> Result<AttemptTicket, SessionError> {
        if let Some(sequence) = self.pending {
            return Err(SessionError::AttemptInFlight(sequence));
        }
        self.attempts += 1;
        self.pending = Some(self.attempts);
        debug!(generation = self.generation, sequence = self.attempts, "attempt started");
        Ok(AttemptTicket {
            generation: self.generation,
            sequence: self.attempts,
            guess: self.current_guess,
        })
    }

    /// Apply a classification to the attempt named by `ticket`
    pub fn complete_attempt(
        &mut self,
        ticket: AttemptTicket,
        classification: Classification,
    ) -> Result<AttemptOutput, SessionError> {
        if ticket.generation != self.generation || self.pending != Some(ticket.sequence) {
            debug!(
                generation = ticket.generation,
                sequence = ticket.sequence,
                current_generation = self.generation,
                "discarding superseded attempt"
            );
            return Err(SessionError::StaleAttempt {
                generation: ticket.generation,
                sequence: ticket.sequence,
            });
        }
        self.pending = None;

        let newly_won = self
            .evaluator
            .update(&classification.results, &self.target_id)
            .map(|v| v.win)
            .unwrap_or(false);
        let won = self.evaluator.is_won();

        self.similarity = self.scorer.score(&classification, &ticket.guess, &self.target);
        let tier = SimilarityScorer::tier(&self.feedback, won, &classification, &self.target_id, self.similarity);
        let message_key = SimilarityScorer::message_key(tier, self.random.as_mut());

        let output = AttemptOutput {
            timestamp: chrono::Utc::now(),
            attempt: ticket.sequence,
            generation: ticket.generation,
            state: self.evaluator.state(),
            won,
            newly_won,
            source: classification.source,
            results: classification.results.clone(),
            similarity: self.similarity,
            feedback: tier,
            message_key: message_key.to_string(),
        };
        self.last_classification = Some(classification);

        info!(
            attempt = output.attempt,
            target = %self.target_id,
            top = output.top().map(|r| r.archetype_id.as_str()).unwrap_or("none"),
            source = %output.source,
            state = %output.state,
            "attempt evaluated"
        );
        Ok(output)
    }

    /// Begin, classify and complete in one call
    pub async fn attempt<L: LocalClassifier>(
        &mut self,
        orchestrator: &FallbackOrchestrator<L>,
    ) -> Result<AttemptOutput, SessionError> {
        let ticket = self.begin_attempt()?;
        let mut guard = AbandonOnDrop {
            session: self,
            generation: ticket.generation,
            sequence: ticket.sequence,
            armed: true,
        };
        let classification = orchestrator.classify(ticket.guess()).await;
        guard.armed = false;
        guard.session.complete_attempt(ticket, classification)
    }

    /// Release the pending slot for an attempt that will never complete
    ///
    /// The attempt still counts. Returns false if `ticket` is not the pending one.
    pub fn abandon_attempt(&mut self, ticket: &AttemptTicket) -> bool {
        self.abandon(ticket.generation, ticket.sequence)
    }

    fn abandon(&mut self, generation: u64, sequence: u64) -> bool {
        if generation != self.generation || self.pending != Some(sequence) {
            return false;
        }
        self.pending = None;
        debug!(generation, sequence, "attempt abandoned");
        true
    }

    /// New target, everything reset; outstanding attempts become stale
    pub fn restart(&mut self) {
        let (target_id, target) = draw_target(&self.catalog, self.random.as_mut());
        self.target_id = target_id;
        self.target = target;
        self.current_guess = ParameterVector::default();
        self.attempts = 0;
        self.last_classification = None;
        self.similarity = 0.0;
        self.evaluator.reset();
        self.generation += 1;
        self.pending = None;
        info!(target = %self.target_id, generation = self.generation, "session restarted");
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn target(&self) -> &ParameterVector {
        &self.target
    }

    pub fn target_archetype(&self) -> &Archetype {
        self.catalog.resolve(&self.target_id)
    }

    pub fn current_guess(&self) -> &ParameterVector {
        &self.current_guess
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn state(&self) -> GameState {
        self.evaluator.state()
    }

    pub fn won(&self) -> bool {
        self.evaluator.is_won()
    }

    pub fn last_classification(&self) -> Option<&Classification> {
        self.last_classification.as_ref()
    }

    pub fn similarity(&self) -> f64 {
        self.similarity
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn in_flight(&self) -> bool {
        self.pending.is_some()
    }

    pub fn catalog(&self) -> &Arc<ArchetypeCatalog> {
        &self.catalog
    }
}

// =============================================================================
// TESTS
// =============================================================================
