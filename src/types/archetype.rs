//! Archetype records and their visual metadata

use serde::{Deserialize, Serialize};

use crate::types::{Dimension, DimensionRange};

/// An exoplanet category with declared parameter ranges.
///
/// Immutable once placed in a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archetype {
    /// Unique id, e.g. "Earth-like"
    pub id: String,
    /// Scored ranges; a subset of the parameter dimensions
    pub ranges: Vec<(Dimension, DimensionRange)>,
    /// Locale-independent name key
    pub name_key: String,
    /// Locale-independent description key
    pub description_key: String,
    /// Rendering hints for the visualization layer
    pub visual: VisualConfig,
}

impl Archetype {
    /// Build an archetype whose keys derive from a slug (`planet.<slug>.name`)
    pub fn new(
        id: impl Into<String>,
        slug: &str,
        ranges: Vec<(Dimension, DimensionRange)>,
        visual: VisualConfig,
    ) -> Self {
        Self {
            id: id.into(),
            ranges,
            name_key: format!("planet.{}.name", slug),
            description_key: format!("planet.{}.desc", slug),
            visual,
        }
    }

    /// Declared range for a dimension, if scored
    pub fn range(&self, dim: Dimension) -> Option<DimensionRange> {
        self.ranges
            .iter()
            .find(|(d, _)| *d == dim)
            .map(|(_, r)| *r)
    }
}

/// Visual configuration consumed by the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualConfig {
    pub texture_url: String,
    /// 0xRRGGBB
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atmosphere: Option<AtmosphereStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rings: Option<RingStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glow: Option<GlowStyle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereStyle {
    pub density: f64,
    pub color: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingStyle {
    pub color: u32,
    pub opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlowStyle {
    pub color: u32,
    pub intensity: f64,
}
