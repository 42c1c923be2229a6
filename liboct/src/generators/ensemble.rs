//! Line-Ensemble Generator
//!
//! Builds the raw B-scan: one independently-noised spectral line per row.
//! Line `i` draws from ChaCha8 stream `i` of the base seed, so any line can
//! be regenerated on its own and the result never depends on the order in
//! which lines are produced.
//!
//! License: MIT

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::spectral::{synthesize_line, Layer, WavenumberAxis};
use crate::error::{OctError, OctResult};
use crate::matrix::LineMatrix;

/// RNG dedicated to scan line `line` of a run seeded with `seed`
pub fn line_rng(seed: u64, line: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(line as u64);
    rng
}

/// Generate a single line of the ensemble (row `line` of `generate_ensemble`)
pub fn generate_line(
    axis: &WavenumberAxis,
    layers: &[Layer],
    noise_amp: f64,
    seed: u64,
    line: usize,
) -> OctResult<Vec<f64>> {
    let mut rng = line_rng(seed, line);
    synthesize_line(axis, layers, noise_amp, &mut rng)
}

/// Generate an `n_lines x axis.len()` raw signal ensemble
pub fn generate_ensemble(
    axis: &WavenumberAxis,
    layers: &[Layer],
    noise_amp: f64,
    n_lines: usize,
    seed: u64,
) -> OctResult<LineMatrix<f64>> {
    if n_lines == 0 {
        return Err(OctError::config("n_lines must be positive, got 0"));
    }

    let rows = (0..n_lines)
        .map(|line| generate_line(axis, layers, noise_amp, seed, line))
        .collect::<OctResult<Vec<_>>>()?;

    let ensemble = LineMatrix::from_rows(rows)?;
    debug!(
        lines = ensemble.rows(),
        samples = ensemble.cols(),
        noise_amp,
        "generated raw ensemble"
    );
    Ok(ensemble)
}
