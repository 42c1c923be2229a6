//! Spectral Signal Synthesizer
//!
//! Forward model of a spectral-domain interferogram: each reflector
//! contributes a cosine in wavenumber whose frequency is set by its depth.
//!
//! License: MIT

use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;

use crate::error::{OctError, OctResult};

/// A simulated reflector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    /// Reflectivity strength
    pub amplitude: f64,
    /// Oscillation frequency in the wavenumber domain (same unit as 1/k)
    pub depth: f64,
}

impl Layer {
    pub fn new(amplitude: f64, depth: f64) -> Self {
        Self { amplitude, depth }
    }
}

/// Linearly spaced wavenumber samples, `k_min` and `k_max` inclusive
#[derive(Debug, Clone, PartialEq)]
pub struct WavenumberAxis {
    k: Vec<f64>,
}

impl WavenumberAxis {
    /// Equivalent of `linspace(k_min, k_max, n)`.
    ///
    /// `n == 1` yields `[k_min]`; `n == 0` yields an empty axis.
    pub fn linspace(k_min: f64, k_max: f64, n: usize) -> Self {
        let k = match n {
            0 => Vec::new(),
            1 => vec![k_min],
            _ => {
                let step = (k_max - k_min) / (n - 1) as f64;
                // Pin the last sample so k_max is exact
                (0..n)
                    .map(|i| if i == n - 1 { k_max } else { k_min + step * i as f64 })
                    .collect()
            }
        };
        Self { k }
    }

    /// Axis spanning the wavenumbers of a source between two wavelengths
    pub fn from_wavelengths(lambda_min: f64, lambda_max: f64, n: usize) -> Self {
        Self::linspace(2.0 * PI / lambda_max, 2.0 * PI / lambda_min, n)
    }

    pub fn len(&self) -> usize {
        self.k.len()
    }

    pub fn is_empty(&self) -> bool {
        self.k.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.k
    }

    /// Sample spacing `k[1] - k[0]` (0.0 for axes shorter than two samples)
    pub fn spacing(&self) -> f64 {
        if self.k.len() < 2 {
            0.0
        } else {
            self.k[1] - self.k[0]
        }
    }
}

/// Noiseless interferogram: `Σ amplitude · cos(2π · depth · k)`
pub fn layer_signal(axis: &WavenumberAxis, layers: &[Layer]) -> Vec<f64> {
    let mut signal = vec![0.0; axis.len()];

    for layer in layers {
        let omega = 2.0 * PI * layer.depth;
        for (sample, &k) in signal.iter_mut().zip(axis.values()) {
            *sample += layer.amplitude * (omega * k).cos();
        }
    }

    signal
}

/// Synthesize one raw spectral line.
///
/// Every call draws fresh i.i.d. Gaussian noise with standard deviation
/// `noise_amp` from `rng`; `noise_amp == 0` gives the noiseless signal.
pub fn synthesize_line<R: Rng + ?Sized>(
    axis: &WavenumberAxis,
    layers: &[Layer],
    noise_amp: f64,
    rng: &mut R,
) -> OctResult<Vec<f64>> {
    if !(noise_amp.is_finite() && noise_amp >= 0.0) {
        return Err(OctError::config(format!(
            "noise_amp must be non-negative, got {}",
            noise_amp
        )));
    }
    let noise = Normal::new(0.0, noise_amp)
        .map_err(|e| OctError::config(format!("invalid noise_amp {}: {}", noise_amp, e)))?;

    let mut signal = layer_signal(axis, layers);
    for sample in signal.iter_mut() {
        *sample += noise.sample(rng);
    }
    Ok(signal)
}
