//! Parameter vector: the 7-dimensional description of a candidate planet

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::SessionError;

/// One axis of the parameter vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Earth masses
    Mass,
    /// Earth radii
    Radius,
    /// Kelvin
    Temperature,
    /// AU
    OrbitalDistance,
    /// Relative atmospheric density
    Atmosphere,
    /// Percent rocky/water fraction, [0, 100]
    Composition,
    /// Host star luminosity
    Brightness,
}

impl Dimension {
    /// All dimensions in declared order
    pub const ALL: [Dimension; 7] = [
        Dimension::Mass,
        Dimension::Radius,
        Dimension::Temperature,
        Dimension::OrbitalDistance,
        Dimension::Atmosphere,
        Dimension::Composition,
        Dimension::Brightness,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Mass => "mass",
            Dimension::Radius => "radius",
            Dimension::Temperature => "temperature",
            Dimension::OrbitalDistance => "orbital_distance",
            Dimension::Atmosphere => "atmosphere",
            Dimension::Composition => "composition",
            Dimension::Brightness => "brightness",
        }
    }

    /// Input-control bounds (min, max)
    pub fn bounds(&self) -> DimensionRange {
        match self {
            Dimension::Mass => DimensionRange::new(0.1, 1000.0),
            Dimension::Radius => DimensionRange::new(0.1, 20.0),
            Dimension::Temperature => DimensionRange::new(50.0, 2000.0),
            Dimension::OrbitalDistance => DimensionRange::new(0.01, 30.0),
            Dimension::Atmosphere => DimensionRange::new(0.1, 200.0),
            Dimension::Composition => DimensionRange::new(0.0, 100.0),
            Dimension::Brightness => DimensionRange::new(0.1, 2.0),
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Dimension {
    type Err = SessionError;

    /// Accepts snake_case, camelCase and a few short aliases
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "mass" | "m" => Ok(Dimension::Mass),
            "radius" | "r" => Ok(Dimension::Radius),
            "temperature" | "temp" | "t" => Ok(Dimension::Temperature),
            "orbitaldistance" | "distance" | "orbit" => Ok(Dimension::OrbitalDistance),
            "atmosphere" | "atm" => Ok(Dimension::Atmosphere),
            "composition" | "comp" => Ok(Dimension::Composition),
            "brightness" | "lum" => Ok(Dimension::Brightness),
            _ => Err(SessionError::UnknownDimension(s.trim().to_string())),
        }
    }
}

/// Closed interval [min, max]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionRange {
    pub min: f64,
    pub max: f64,
}

impl DimensionRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn center(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Overlap with another range, if any
    pub fn intersect(&self, other: &DimensionRange) -> Option<DimensionRange> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (min <= max).then(|| DimensionRange::new(min, max))
    }
}

/// The 7-dimensional physical description of a planet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterVector {
    pub mass: f64,
    pub radius: f64,
    pub temperature: f64,
    pub orbital_distance: f64,
    pub atmosphere: f64,
    pub composition: f64,
    pub brightness: f64,
}

impl Default for ParameterVector {
    /// The guess every session starts from: an Earth twin around a Sun twin
    fn default() -> Self {
        Self {
            mass: 1.0,
            radius: 1.0,
            temperature: 288.0,
            orbital_distance: 1.0,
            atmosphere: 1.0,
            composition: 70.0,
            brightness: 1.0,
        }
    }
}

impl ParameterVector {
    /// Build a vector from a per-dimension function
    pub fn from_fn(mut f: impl FnMut(Dimension) -> f64) -> Self {
        Self {
            mass: f(Dimension::Mass),
            radius: f(Dimension::Radius),
            temperature: f(Dimension::Temperature),
            orbital_distance: f(Dimension::OrbitalDistance),
            atmosphere: f(Dimension::Atmosphere),
            composition: f(Dimension::Composition),
            brightness: f(Dimension::Brightness),
        }
    }

    pub fn get(&self, dim: Dimension) -> f64 {
        match dim {
            Dimension::Mass => self.mass,
            Dimension::Radius => self.radius,
            Dimension::Temperature => self.temperature,
            Dimension::OrbitalDistance => self.orbital_distance,
            Dimension::Atmosphere => self.atmosphere,
            Dimension::Composition => self.composition,
            Dimension::Brightness => self.brightness,
        }
    }

    fn slot(&mut self, dim: Dimension) -> &mut f64 {
        match dim {
            Dimension::Mass => &mut self.mass,
            Dimension::Radius => &mut self.radius,
            Dimension::Temperature => &mut self.temperature,
            Dimension::OrbitalDistance => &mut self.orbital_distance,
            Dimension::Atmosphere => &mut self.atmosphere,
            Dimension::Composition => &mut self.composition,
            Dimension::Brightness => &mut self.brightness,
        }
    }

    /// Set one dimension, clamped to its control bounds.
    /// Returns the stored value.
    pub fn set(&mut self, dim: Dimension, value: f64) -> Result<f64, SessionError> {
        if !value.is_finite() {
            return Err(SessionError::InvalidValue {
                dimension: dim.name().to_string(),
                value,
            });
        }
        let clamped = dim.bounds().clamp(value);
        *self.slot(dim) = clamped;
        Ok(clamped)
    }

    /// Copy with every dimension clamped to its control bounds
    pub fn clamped(&self) -> Self {
        let mut out = *self;
        for dim in Dimension::ALL {
            let v = out.get(dim);
            *out.slot(dim) = if v.is_finite() { dim.bounds().clamp(v) } else { dim.bounds().min };
        }
        out
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_parse_aliases() {
        assert_eq!("orbitalDistance".parse::<Dimension>().unwrap(), Dimension::OrbitalDistance);
        assert_eq!("orbital_distance".parse::<Dimension>().unwrap(), Dimension::OrbitalDistance);
        assert_eq!("TEMP".parse::<Dimension>().unwrap(), Dimension::Temperature);
        assert!(matches!(
            "gravity".parse::<Dimension>(),
            Err(SessionError::UnknownDimension(_))
        ));
    }

    #[test]
    fn test_set_clamps_to_bounds() {
        let mut v = ParameterVector::default();
        assert_eq!(v.set(Dimension::Composition, 140.0).unwrap(), 100.0);
        assert_eq!(v.composition, 100.0);
        assert_eq!(v.set(Dimension::Mass, -3.0).unwrap(), 0.1);
    }

    #[test]
    fn test_set_rejects_nan() {
        let mut v = ParameterVector::default();
        assert!(v.set(Dimension::Radius, f64::NAN).is_err());
        assert_eq!(v.radius, 1.0);
    }

    #[test]
    fn test_range_intersect() {
        let a = DimensionRange::new(0.0, 10.0);
        let b = DimensionRange::new(5.0, 20.0);
        assert_eq!(a.intersect(&b), Some(DimensionRange::new(5.0, 10.0)));
        assert_eq!(a.intersect(&DimensionRange::new(11.0, 12.0)), None);
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let json = serde_json::to_value(ParameterVector::default()).unwrap();
        assert_eq!(json["orbitalDistance"], 1.0);
    }
}
