//! Range classifier: deterministic local archetype scoring
//!
//! Per-dimension affinity from the distance between a value and an
//! archetype's declared range, a weighted composite per archetype, then
//! normalization into a full ranked distribution over the catalog.

use crate::core::ArchetypeCatalog;
use crate::types::{Archetype, ClassificationResult, Dimension, DimensionRange, ParameterVector};
use crate::{
    AFFINITY_WEIGHT_ATMOSPHERE, AFFINITY_WEIGHT_COMPOSITION, AFFINITY_WEIGHT_MASS,
    AFFINITY_WEIGHT_ORBITAL_DISTANCE, AFFINITY_WEIGHT_RADIUS, AFFINITY_WEIGHT_TEMPERATURE,
    EDGE_AFFINITY, INSIDE_FALLOFF, SCORE_SHARPNESS,
};

/// Anything that can produce a full local distribution.
/// The orchestrator depends on this rather than on `RangeClassifier` directly.
pub trait LocalClassifier: Send + Sync {
    fn classify(&self, vector: &ParameterVector, catalog: &ArchetypeCatalog) -> Vec<ClassificationResult>;
}

/// Range-based local classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeClassifier {
    /// Exponent applied to composites before normalization; 1 = plain sum-normalization
    sharpness: i32,
}

impl Default for RangeClassifier {
    fn default() -> Self {
        Self::with_sharpness(SCORE_SHARPNESS)
    }
}

impl RangeClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exponents below 1 are raised to 1
    pub fn with_sharpness(sharpness: i32) -> Self {
        Self {
            sharpness: sharpness.max(1),
        }
    }

    pub fn sharpness(&self) -> i32 {
        self.sharpness
    }

    /// Weight of a scored dimension; brightness is never scored
    pub fn weight(dim: Dimension) -> f64 {
        match dim {
            Dimension::Mass => AFFINITY_WEIGHT_MASS,
            Dimension::Radius => AFFINITY_WEIGHT_RADIUS,
            Dimension::Temperature => AFFINITY_WEIGHT_TEMPERATURE,
            Dimension::OrbitalDistance => AFFINITY_WEIGHT_ORBITAL_DISTANCE,
            Dimension::Atmosphere => AFFINITY_WEIGHT_ATMOSPHERE,
            Dimension::Composition => AFFINITY_WEIGHT_COMPOSITION,
            Dimension::Brightness => 0.0,
        }
    }

    /// Closeness of a value to a range, in [0, 1]
    pub fn affinity(value: f64, range: &DimensionRange) -> f64 {
        if !value.is_finite() {
            return 0.0;
        }
        let width = range.width();
        if width <= 0.0 {
            // Degenerate range: exact hit or linear decay relative to the value scale
            let scale = range.min.abs().max(1.0);
            let d = (value - range.min).abs() / scale;
            return if d == 0.0 { 1.0 } else { (EDGE_AFFINITY * (1.0 - d)).max(0.0) };
        }

        if range.contains(value) {
            let half = width / 2.0;
            let off_center = (value - range.center()).abs() / half;
            (1.0 - INSIDE_FALLOFF * off_center).clamp(EDGE_AFFINITY, 1.0)
        } else {
            let overshoot = if value < range.min {
                range.min - value
            } else {
                value - range.max
            };
            (EDGE_AFFINITY * (1.0 - overshoot / width)).max(0.0)
        }
    }

    /// Weighted mean affinity over the archetype's declared dimensions
    pub fn composite(vector: &ParameterVector, archetype: &Archetype) -> f64 {
        let mut weighted = 0.0;
        let mut total = 0.0;
        for (dim, range) in &archetype.ranges {
            let w = Self::weight(*dim);
            weighted += w * Self::affinity(vector.get(*dim), range);
            total += w;
        }
        if total <= 0.0 {
            return 0.0;
        }
        (weighted / total).clamp(0.0, 1.0)
    }

    /// Sharpened composite used for normalization
    fn score(&self, vector: &ParameterVector, archetype: &Archetype) -> f64 {
        Self::composite(vector, archetype).powi(self.sharpness)
    }

    /// Full ranked distribution over every archetype in the catalog
    pub fn classify(&self, vector: &ParameterVector, catalog: &ArchetypeCatalog) -> Vec<ClassificationResult> {
        let archetypes = catalog.enumerate();
        let scores: Vec<f64> = archetypes.iter().map(|a| self.score(vector, a)).collect();
        let sum: f64 = scores.iter().sum();

        let probabilities: Vec<f64> = if sum > 0.0 && sum.is_finite() {
            scores.iter().map(|s| s / sum).collect()
        } else {
            let uniform = 1.0 / archetypes.len() as f64;
            vec![uniform; archetypes.len()]
        };

        // Declared order in, stable sort keeps it for ties
        let mut order: Vec<usize> = (0..archetypes.len()).collect();
        order.sort_by(|&a, &b| probabilities[b].total_cmp(&probabilities[a]));

        order
            .into_iter()
            .enumerate()
            .map(|(rank, i)| ClassificationResult {
                archetype_id: archetypes[i].id.clone(),
                probability: probabilities[i],
                rank,
            })
            .collect()
    }
}

impl LocalClassifier for RangeClassifier {
    fn classify(&self, vector: &ParameterVector, catalog: &ArchetypeCatalog) -> Vec<ClassificationResult> {
        RangeClassifier::classify(self, vector, catalog)
    }
}

// =============================================================================
// TESTS
// =============================================================================
