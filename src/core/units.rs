//! Unit conversion from the parameter vector to remote-service fields

use serde::{Deserialize, Serialize};

use crate::types::ParameterVector;

/// Days in a Julian year
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Floor for the estimated stellar effective temperature (K)
pub const MIN_STELLAR_TEMPERATURE_K: f64 = 3000.0;

/// Kelvin gained per unit of brightness above the 0.1 baseline
pub const STELLAR_TEMPERATURE_PER_BRIGHTNESS: f64 = 2000.0;

pub const STELLAR_RADIUS_MIN: f64 = 0.1;
pub const STELLAR_RADIUS_MAX: f64 = 10.0;
pub const SNR_MIN: f64 = 1.0;
pub const SNR_MAX: f64 = 50.0;

/// Request body for the remote classifier (Kepler KOI column names)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RemoteFeatures {
    /// Planet radius (Earth radii)
    pub koi_prad: f64,
    /// Equilibrium temperature (K)
    pub koi_teq: f64,
    /// Orbital period (days)
    pub koi_period: f64,
    /// Transit signal-to-noise ratio
    pub koi_model_snr: f64,
    /// Stellar effective temperature (K)
    pub koi_steff: f64,
    /// Stellar radius (solar radii)
    pub koi_srad: f64,
}

/// Pure derivations; no clamping of the input vector itself
#[derive(Debug, Default, Clone, Copy)]
pub struct UnitConverter;

impl UnitConverter {
    pub fn new() -> Self {
        Self
    }

    /// Kepler's third law for a solar-mass host: P[yr] = a[AU]^1.5
    pub fn orbital_period_days(orbital_distance_au: f64) -> f64 {
        (orbital_distance_au.powi(3)).sqrt() * DAYS_PER_YEAR
    }

    pub fn stellar_temperature_k(brightness: f64) -> f64 {
        (MIN_STELLAR_TEMPERATURE_K + (brightness - 0.1) * STELLAR_TEMPERATURE_PER_BRIGHTNESS)
            .max(MIN_STELLAR_TEMPERATURE_K)
    }

    pub fn stellar_radius_solar(mass: f64) -> f64 {
        (mass * 0.5 + 0.5).clamp(STELLAR_RADIUS_MIN, STELLAR_RADIUS_MAX)
    }

    pub fn signal_to_noise(mass: f64, radius: f64, brightness: f64) -> f64 {
        (mass * radius * brightness * 5.0).clamp(SNR_MIN, SNR_MAX)
    }

    /// All remote fields for a vector
    pub fn convert(&self, v: &ParameterVector) -> RemoteFeatures {
        RemoteFeatures {
            koi_prad: v.radius,
            koi_teq: v.temperature,
            koi_period: Self::orbital_period_days(v.orbital_distance),
            koi_model_snr: Self::signal_to_noise(v.mass, v.radius, v.brightness),
            koi_steff: Self::stellar_temperature_k(v.brightness),
            koi_srad: Self::stellar_radius_solar(v.mass),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
