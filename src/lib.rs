//! ExoQuest: exoplanet archetype classification engine
//!
//! Parameter vector → (remote model | local range classifier) → ranked
//! archetype distribution → win state machine for a guessing session.

pub mod config;
pub mod core;
pub mod error;
pub mod types;

// =============================================================================
// WIN THRESHOLDS [C] - empirically tuned, overridable via EngineConfig
// =============================================================================

/// Minimum target probability when the target sits in the top two
pub const WIN_TOP_TWO_MIN_PROBABILITY: f64 = 0.6;

/// Minimum target probability when the target is the top result
pub const WIN_TOP_ONE_MIN_PROBABILITY: f64 = 0.7;

/// Ranks strictly below this count as "top two"
pub const WIN_TOP_RANK_LIMIT: usize = 2;

// =============================================================================
// FEEDBACK TIERS [C] - cosmetic only, independent of the win predicate
// =============================================================================

pub const FEEDBACK_CLOSE: f64 = 0.8;
pub const FEEDBACK_GOOD: f64 = 0.6;
pub const FEEDBACK_FAIR: f64 = 0.4;

/// Top result probability below which a correct top guess is "low confidence"
pub const FEEDBACK_CONFIDENT_TOP: f64 = 0.8;

// =============================================================================
// RANGE CLASSIFIER WEIGHTS [C] - physical significance (sum = 1.0)
// =============================================================================

pub const AFFINITY_WEIGHT_MASS: f64 = 0.20;
pub const AFFINITY_WEIGHT_RADIUS: f64 = 0.20;
pub const AFFINITY_WEIGHT_TEMPERATURE: f64 = 0.20;
pub const AFFINITY_WEIGHT_ORBITAL_DISTANCE: f64 = 0.15;
pub const AFFINITY_WEIGHT_ATMOSPHERE: f64 = 0.125;
pub const AFFINITY_WEIGHT_COMPOSITION: f64 = 0.125;

/// Affinity at the boundary of a declared range
pub const EDGE_AFFINITY: f64 = 0.8;

/// Affinity lost between the centre of a range and its boundary
pub const INSIDE_FALLOFF: f64 = 1.0 - EDGE_AFFINITY;

/// Exponent applied to composite scores before normalization
pub const SCORE_SHARPNESS: i32 = 16;

// =============================================================================
// SIMILARITY WEIGHTS [C] - all seven dimensions (sum = 1.0)
// =============================================================================

pub const SIMILARITY_WEIGHT_MASS: f64 = 0.2;
pub const SIMILARITY_WEIGHT_RADIUS: f64 = 0.2;
pub const SIMILARITY_WEIGHT_TEMPERATURE: f64 = 0.2;
pub const SIMILARITY_WEIGHT_ORBITAL_DISTANCE: f64 = 0.1;
pub const SIMILARITY_WEIGHT_ATMOSPHERE: f64 = 0.1;
pub const SIMILARITY_WEIGHT_COMPOSITION: f64 = 0.1;
pub const SIMILARITY_WEIGHT_BRIGHTNESS: f64 = 0.1;

// =============================================================================
// REMOTE SERVICE
// =============================================================================

pub const DEFAULT_REMOTE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REMOTE_ENDPOINT: &str = "/predict";
pub const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 5000;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "0.1.0";
