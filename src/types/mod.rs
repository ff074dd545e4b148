//! Core types for ExoQuest

mod archetype;
mod classification;
mod feedback;
mod output;
mod params;
mod state;

pub use archetype::{Archetype, AtmosphereStyle, GlowStyle, RingStyle, VisualConfig};
pub use classification::{Classification, ClassificationResult, ClassificationSource};
pub use feedback::{FeedbackTier, WON_MESSAGE_KEYS};
pub use output::AttemptOutput;
pub use params::{Dimension, DimensionRange, ParameterVector};
pub use state::GameState;
