//! Archetype catalog: the fixed, ordered table of exoplanet categories
//!
//! Declared order is the tie-break order for classification results, and the
//! first entry (Earth-like) is the default for unknown ids.

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::{CatalogError, ClassifyError};
use crate::types::{
    Archetype, AtmosphereStyle, ClassificationResult, Dimension, DimensionRange, GlowStyle,
    RingStyle, VisualConfig,
};

lazy_static! {
    static ref BUILTIN: Arc<ArchetypeCatalog> = Arc::new(ArchetypeCatalog::from_validated(builtin_archetypes()));
}

/// Immutable keyed catalog of archetypes
#[derive(Debug, Clone)]
pub struct ArchetypeCatalog {
    archetypes: Vec<Archetype>,
    index: HashMap<String, usize>,
}

impl ArchetypeCatalog {
    /// Shared built-in catalog, built once per process
    pub fn builtin() -> Arc<ArchetypeCatalog> {
        Arc::clone(&BUILTIN)
    }

    /// Build a catalog from custom archetypes; first entry becomes the default
    pub fn new(archetypes: Vec<Archetype>) -> Result<Self, CatalogError> {
        if archetypes.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashMap::new();
        for (i, a) in archetypes.iter().enumerate() {
            if seen.insert(a.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId(a.id.clone()));
            }
            for (dim, range) in &a.ranges {
                if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
                    return Err(CatalogError::InvalidRange {
                        archetype: a.id.clone(),
                        dimension: dim.name().to_string(),
                        min: range.min,
                        max: range.max,
                    });
                }
            }
        }
        Ok(Self::from_validated(archetypes))
    }

    fn from_validated(archetypes: Vec<Archetype>) -> Self {
        let index = archetypes
            .iter()
            .enumerate()
            .map(|(i, a)| (a.id.clone(), i))
            .collect();
        Self { archetypes, index }
    }

    /// Look up an archetype by id
    pub fn lookup(&self, id: &str) -> Result<&Archetype, ClassifyError> {
        self.index
            .get(id)
            .map(|&i| &self.archetypes[i])
            .ok_or_else(|| ClassifyError::UnknownArchetype(id.to_string()))
    }

    /// Look up an archetype, falling back to the default on a miss
    pub fn resolve(&self, id: &str) -> &Archetype {
        match self.lookup(id) {
            Ok(a) => a,
            Err(e) => {
                debug!(error = %e, default = %self.default_archetype().id, "using default archetype");
                self.default_archetype()
            }
        }
    }

    /// All archetypes in declared order
    pub fn enumerate(&self) -> &[Archetype] {
        &self.archetypes
    }

    /// Declared position of an id
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// The declared default (first) archetype
    pub fn default_archetype(&self) -> &Archetype {
        &self.archetypes[0]
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    /// Visual config for an archetype id; None when unknown
    pub fn get_archetype_visual_config(&self, id: &str) -> Option<&VisualConfig> {
        self.lookup(id).ok().map(|a| &a.visual)
    }

    /// Visual config for the top entry of a ranked list
    pub fn top_visual_config(&self, results: &[ClassificationResult]) -> Option<&VisualConfig> {
        results
            .first()
            .and_then(|r| self.get_archetype_visual_config(&r.archetype_id))
    }
}

// =============================================================================
// BUILT-IN TABLE
// =============================================================================

fn ranges(values: [(f64, f64); 6]) -> Vec<(Dimension, DimensionRange)> {
    let dims = [
        Dimension::Mass,
        Dimension::Radius,
        Dimension::Temperature,
        Dimension::OrbitalDistance,
        Dimension::Atmosphere,
        Dimension::Composition,
    ];
    dims.iter()
        .zip(values)
        .map(|(d, (min, max))| (*d, DimensionRange::new(min, max)))
        .collect()
}

fn visual(
    texture: &str,
    color: u32,
    atmosphere: Option<(f64, u32)>,
    rings: Option<(u32, f64)>,
    glow: Option<(u32, f64)>,
) -> VisualConfig {
    VisualConfig {
        texture_url: texture.to_string(),
        color,
        atmosphere: atmosphere.map(|(density, color)| AtmosphereStyle { density, color }),
        rings: rings.map(|(color, opacity)| RingStyle { color, opacity }),
        glow: glow.map(|(color, intensity)| GlowStyle { color, intensity }),
    }
}

/// Ranges: mass, radius, temperature, orbital distance, atmosphere, composition
fn builtin_archetypes() -> Vec<Archetype> {
    vec![
        Archetype::new(
            "Earth-like",
            "earth_like",
            ranges([(0.5, 2.0), (0.8, 1.5), (250.0, 320.0), (0.7, 1.5), (0.8, 1.2), (60.0, 90.0)]),
            visual("/textures/earth.jpg", 0x4a90e2, Some((1.0, 0x87ceeb)), None, Some((0x87ceeb, 0.3))),
        ),
        Archetype::new(
            "Sub Earth",
            "sub_earth",
            ranges([(0.1, 0.5), (0.3, 0.8), (200.0, 300.0), (0.5, 1.5), (0.3, 1.0), (40.0, 80.0)]),
            visual("/textures/earth.jpg", 0x8b4513, Some((0.3, 0xffa500)), None, None),
        ),
        Archetype::new(
            "Super Earth",
            "super_earth",
            ranges([(2.0, 10.0), (1.2, 2.0), (200.0, 350.0), (0.5, 2.0), (1.0, 50.0), (30.0, 80.0)]),
            visual("/textures/earth.jpg", 0x228b22, Some((1.5, 0x90ee90)), None, Some((0x90ee90, 0.4))),
        ),
        Archetype::new(
            "Hot Jupiter",
            "hot_jupiter",
            ranges([(50.0, 500.0), (8.0, 15.0), (500.0, 2000.0), (0.01, 0.1), (50.0, 200.0), (0.0, 20.0)]),
            visual("/textures/jupiter.jpg", 0xff6347, Some((5.0, 0xff4500)), None, Some((0xff4500, 0.8))),
        ),
        Archetype::new(
            "Gas Giant",
            "gas_giant",
            ranges([(50.0, 1000.0), (8.0, 20.0), (100.0, 500.0), (1.0, 10.0), (50.0, 200.0), (0.0, 20.0)]),
            visual(
                "/textures/jupiter.jpg",
                0xffa500,
                Some((3.0, 0xffff00)),
                Some((0xffffff, 0.6)),
                Some((0xffff00, 0.5)),
            ),
        ),
        Archetype::new(
            "Ice Giant",
            "ice_giant",
            ranges([(10.0, 50.0), (3.0, 8.0), (50.0, 200.0), (5.0, 30.0), (10.0, 100.0), (20.0, 60.0)]),
            visual(
                "/textures/urano.jpg",
                0x4169e1,
                Some((2.0, 0x87ceeb)),
                Some((0xffffff, 0.4)),
                Some((0x87ceeb, 0.3)),
            ),
        ),
        Archetype::new(
            "Ocean World",
            "ocean_world",
            ranges([(0.5, 5.0), (0.8, 2.0), (250.0, 350.0), (0.5, 2.0), (0.5, 2.0), (80.0, 100.0)]),
            visual("/textures/ocean.jpg", 0x0066cc, Some((1.2, 0x00bfff)), None, Some((0x00bfff, 0.4))),
        ),
        Archetype::new(
            "Desert World",
            "desert_world",
            ranges([(0.3, 3.0), (0.5, 1.5), (300.0, 600.0), (0.3, 1.5), (0.1, 1.0), (0.0, 20.0)]),
            visual("/textures/desert.jpg", 0xcd853f, Some((0.5, 0xffa500)), None, None),
        ),
    ]
}

// =============================================================================
// TESTS
// =============================================================================
