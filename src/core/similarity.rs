//! Similarity scorer and feedback tiers (cosmetic only)

use crate::config::FeedbackThresholds;
use crate::core::RandomSource;
use crate::types::{Classification, ClassificationSource, Dimension, FeedbackTier, ParameterVector, WON_MESSAGE_KEYS};
use crate::{
    SIMILARITY_WEIGHT_ATMOSPHERE, SIMILARITY_WEIGHT_BRIGHTNESS, SIMILARITY_WEIGHT_COMPOSITION,
    SIMILARITY_WEIGHT_MASS, SIMILARITY_WEIGHT_ORBITAL_DISTANCE, SIMILARITY_WEIGHT_RADIUS,
    SIMILARITY_WEIGHT_TEMPERATURE,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct SimilarityScorer;

impl SimilarityScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn weight(dim: Dimension) -> f64 {
        match dim {
            Dimension::Mass => SIMILARITY_WEIGHT_MASS,
            Dimension::Radius => SIMILARITY_WEIGHT_RADIUS,
            Dimension::Temperature => SIMILARITY_WEIGHT_TEMPERATURE,
            Dimension::OrbitalDistance => SIMILARITY_WEIGHT_ORBITAL_DISTANCE,
            Dimension::Atmosphere => SIMILARITY_WEIGHT_ATMOSPHERE,
            Dimension::Composition => SIMILARITY_WEIGHT_COMPOSITION,
            Dimension::Brightness => SIMILARITY_WEIGHT_BRIGHTNESS,
        }
    }

    /// Weighted distance normalized by each dimension's control span, in [0, 1]
    pub fn normalized_distance(guess: &ParameterVector, target: &ParameterVector) -> f64 {
        let mut weighted = 0.0;
        let mut total = 0.0;
        for dim in Dimension::ALL {
            let span = dim.bounds().width();
            let w = Self::weight(dim);
            let d = ((guess.get(dim) - target.get(dim)).abs() / span).min(1.0);
            weighted += w * if d.is_finite() { d } else { 1.0 };
            total += w;
        }
        weighted / total
    }

    /// 1 − normalized distance, clamped to [0, 1]
    pub fn parameter_similarity(guess: &ParameterVector, target: &ParameterVector) -> f64 {
        (1.0 - Self::normalized_distance(guess, target)).clamp(0.0, 1.0)
    }

    /// Remote: service confidence (or top probability when absent).
    /// Local: parameter similarity to the target.
    pub fn score(&self, classification: &Classification, guess: &ParameterVector, target: &ParameterVector) -> f64 {
        match classification.source {
            ClassificationSource::Remote => classification
                .confidence
                .or_else(|| classification.top().map(|r| r.probability))
                .unwrap_or(0.0)
                .clamp(0.0, 1.0),
            ClassificationSource::Local => Self::parameter_similarity(guess, target),
        }
    }

    /// Pick the feedback tier for an attempt
    pub fn tier(
        thresholds: &FeedbackThresholds,
        won: bool,
        classification: &Classification,
        target_id: &str,
        similarity: f64,
    ) -> FeedbackTier {
        let top = classification.top();
        let correct_top = top.map(|r| r.archetype_id == target_id).unwrap_or(false);
        let confident = top.map(|r| r.probability >= thresholds.confident_top).unwrap_or(false);

        if won {
            FeedbackTier::Won
        } else if correct_top && !confident {
            FeedbackTier::CorrectLowConfidence
        } else if similarity >= thresholds.close {
            FeedbackTier::Close
        } else if similarity >= thresholds.good {
            FeedbackTier::Good
        } else if similarity >= thresholds.fair {
            FeedbackTier::Fair
        } else {
            FeedbackTier::Poor
        }
    }

    /// Message key for a tier; winning messages have random variants
    pub fn message_key(tier: FeedbackTier, random: &mut dyn RandomSource) -> &'static str {
        if tier != FeedbackTier::Won {
            return tier.message_key();
        }
        if random.chance(0.5) {
            if random.chance(0.5) {
                WON_MESSAGE_KEYS[1]
            } else {
                WON_MESSAGE_KEYS[2]
            }
        } else {
            WON_MESSAGE_KEYS[0]
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
