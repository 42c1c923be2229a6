//! Pipeline configuration
//!
//! All inputs of a simulation run are plain numbers; `OctConfig` collects
//! them and `validate()` rejects values no stage can work with before any
//! array is allocated.
//!
//! License: MIT

use crate::error::{OctError, OctResult};
use crate::generators::spectral::Layer;

/// Dynamic range constants for the fixed-range truncation policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionParams {
    /// dB value mapped to pixel 0
    pub floor_db: f64,
    /// dB span mapped onto [0, 255]
    pub range_db: f64,
}

impl Default for CompressionParams {
    fn default() -> Self {
        Self {
            floor_db: -10.0,
            range_db: 38.0,
        }
    }
}

impl CompressionParams {
    pub fn validate(&self) -> OctResult<()> {
        if !self.floor_db.is_finite() {
            return Err(OctError::config(format!(
                "floor_db must be finite, got {}",
                self.floor_db
            )));
        }
        if !(self.range_db.is_finite() && self.range_db > 0.0) {
            return Err(OctError::config(format!(
                "range_db must be positive, got {}",
                self.range_db
            )));
        }
        Ok(())
    }
}

/// Complete simulation configuration
///
/// Wavelengths are in the same length unit as the layer depths (nm in the
/// defaults); `k_min = 2π/λ_max` and `k_max = 2π/λ_min`.
#[derive(Debug, Clone, PartialEq)]
pub struct OctConfig {
    /// Samples per spectral line
    pub n_samples: usize,
    /// Shortest source wavelength
    pub lambda_min: f64,
    /// Longest source wavelength
    pub lambda_max: f64,
    /// Simulated reflectors
    pub layers: Vec<Layer>,
    /// Standard deviation of the additive Gaussian noise
    pub noise_amp: f64,
    /// Number of scan lines (1 = A-scan)
    pub n_lines: usize,
    /// Base seed for the per-line noise streams
    pub seed: u64,
    pub compression: CompressionParams,
}

impl Default for OctConfig {
    fn default() -> Self {
        Self {
            n_samples: 1024,
            lambda_min: 820.0,
            lambda_max: 880.0,
            layers: vec![Layer::new(80.0, 60_000.0), Layer::new(8.0, 500_000.0)],
            noise_amp: 10.0,
            n_lines: 1,
            seed: 42,
            compression: CompressionParams::default(),
        }
    }
}

impl OctConfig {
    /// Defaults for a 100-line B-scan
    pub fn bscan() -> Self {
        Self {
            n_lines: 100,
            ..Self::default()
        }
    }

    pub fn k_min(&self) -> f64 {
        2.0 * std::f64::consts::PI / self.lambda_max
    }

    pub fn k_max(&self) -> f64 {
        2.0 * std::f64::consts::PI / self.lambda_min
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> OctResult<()> {
        if self.n_samples < 2 {
            return Err(OctError::config(format!(
                "n_samples must be at least 2, got {}",
                self.n_samples
            )));
        }
        if self.n_lines == 0 {
            return Err(OctError::config("n_lines must be positive, got 0"));
        }
        if !(self.lambda_min.is_finite() && self.lambda_min > 0.0)
            || !(self.lambda_max.is_finite() && self.lambda_max > 0.0)
        {
            return Err(OctError::config(format!(
                "wavelengths must be positive (lambda_min={}, lambda_max={})",
                self.lambda_min, self.lambda_max
            )));
        }
        if self.lambda_min >= self.lambda_max {
            return Err(OctError::config(format!(
                "lambda_min must be below lambda_max ({} >= {})",
                self.lambda_min, self.lambda_max
            )));
        }
        if !(self.noise_amp.is_finite() && self.noise_amp >= 0.0) {
            return Err(OctError::config(format!(
                "noise_amp must be non-negative, got {}",
                self.noise_amp
            )));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            if !layer.amplitude.is_finite() || !layer.depth.is_finite() {
                return Err(OctError::config(format!(
                    "layer {} has non-finite parameters (amplitude={}, depth={})",
                    i, layer.amplitude, layer.depth
                )));
            }
        }
        self.compression.validate()
    }
}
