//! Depth Reconstructor
//!
//! Turns a wavenumber-domain line into a linear depth profile (A-scan):
//! forward FFT, 1/N normalization, single-sided amplitude correction and
//! magnitude of the non-negative half of the spectrum.
//!
//! License: MIT

use rustfft::{num_complex::Complex, FftPlanner};
use std::cell::RefCell;
use tracing::debug;

use crate::error::OctResult;
use crate::generators::spectral::WavenumberAxis;
use crate::matrix::LineMatrix;

// Plans are cached inside the planner; keep one per thread so repeated
// lines of the same length reuse the plan.
thread_local! {
    static FFT_PLANNER: RefCell<FftPlanner<f64>> = RefCell::new(FftPlanner::new());
}

/// Depth label for each bin of a reconstructed profile
#[derive(Debug, Clone, PartialEq)]
pub struct DepthAxis {
    z: Vec<f64>,
    n_samples: usize,
    dk: f64,
}

impl DepthAxis {
    /// Positive half of `fftfreq(n_samples, d = dk)`: `z_i = i / (N · Δk)`
    pub fn new(n_samples: usize, dk: f64) -> Self {
        let half = n_samples / 2;
        let scale = 1.0 / (n_samples as f64 * dk);
        Self {
            z: (0..half).map(|i| i as f64 * scale).collect(),
            n_samples,
            dk,
        }
    }

    pub fn from_wavenumbers(axis: &WavenumberAxis) -> Self {
        Self::new(axis.len(), axis.spacing())
    }

    pub fn values(&self) -> &[f64] {
        &self.z
    }

    pub fn len(&self) -> usize {
        self.z.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z.is_empty()
    }

    /// Depth covered by one bin
    pub fn resolution(&self) -> f64 {
        1.0 / (self.n_samples as f64 * self.dk)
    }

    /// Bin nearest to `depth`, or `None` if it falls outside the half spectrum
    pub fn bin_for_depth(&self, depth: f64) -> Option<usize> {
        let bin = (depth * self.n_samples as f64 * self.dk).round();
        if bin.is_finite() && bin >= 0.0 && (bin as usize) < self.z.len() {
            Some(bin as usize)
        } else {
            None
        }
    }
}

/// Reconstruct the linear depth profile of one line.
///
/// Output length is `row.len() / 2`; every value is non-negative. Bins
/// `1..N/2` are doubled to fold in the discarded negative frequencies,
/// bin 0 (DC) is left as is.
pub fn reconstruct_line<T>(row: &[T]) -> Vec<f64>
where
    T: Copy + Into<f64>,
{
    let n = row.len();
    let half = n / 2;
    if half == 0 {
        return Vec::new();
    }

    let mut buffer: Vec<Complex<f64>> = row
        .iter()
        .map(|&x| Complex::new(x.into(), 0.0))
        .collect();

    FFT_PLANNER.with(|planner| {
        let fft = planner.borrow_mut().plan_fft_forward(n);
        fft.process(&mut buffer);
    });

    let inv_n = 1.0 / n as f64;
    buffer[..half]
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let scale = if i == 0 { inv_n } else { 2.0 * inv_n };
            c.norm() * scale
        })
        .collect()
}

/// Reconstruct every row of an ensemble (`rows x N` -> `rows x N/2`)
pub fn reconstruct_ensemble<T>(ensemble: &LineMatrix<T>) -> OctResult<LineMatrix<f64>>
where
    T: Copy + Into<f64>,
{
    let profile = ensemble.map_rows(reconstruct_line)?;
    debug!(
        lines = profile.rows(),
        bins = profile.cols(),
        "reconstructed depth profiles"
    );
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_output_length_is_half() {
        for n in [2usize, 3, 7, 64, 100, 1023, 1024] {
            let row = vec![1u8; n];
            assert_eq!(reconstruct_line(&row).len(), n / 2, "n = {}", n);
        }
        assert!(reconstruct_line::<u8>(&[]).is_empty());
        assert!(reconstruct_line(&[5u8]).is_empty());
    }

    #[test]
    fn test_constant_row_is_pure_dc() {
        let profile = reconstruct_line(&vec![100u8; 64]);
        assert_relative_eq!(profile[0], 100.0, epsilon = 1e-9);
        assert!(profile[1..].iter().all(|&v| v < 1e-9));
    }

    #[test]
    fn test_integer_bin_cosine_amplitude() {
        // A cosine of amplitude A at an exact bin shows up as A after doubling
        let n = 256;
        let row: Vec<f64> = (0..n)
            .map(|i| 5.0 * (2.0 * PI * 17.0 * i as f64 / n as f64).cos())
            .collect();
        let profile = reconstruct_line(&row);
        assert_relative_eq!(profile[17], 5.0, epsilon = 1e-9);
        for (i, &v) in profile.iter().enumerate() {
            if i != 17 {
                assert!(v < 1e-9, "leak at bin {}: {}", i, v);
            }
        }
    }

    #[test]
    fn test_non_negative() {
        let row: Vec<u8> = (0..200).map(|i| ((i * 37) % 251) as u8).collect();
        assert!(reconstruct_line(&row).iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_ensemble_shape() {
        let m = LineMatrix::from_rows(vec![vec![0u8; 100]; 3]).unwrap();
        let p = reconstruct_ensemble(&m).unwrap();
        assert_eq!(p.shape(), (3, 50));
    }

    #[test]
    fn test_depth_axis() {
        let axis = WavenumberAxis::from_wavelengths(820.0, 880.0, 1024);
        let depth = DepthAxis::from_wavenumbers(&axis);
        assert_eq!(depth.len(), 512);
        assert_eq!(depth.values()[0], 0.0);
        assert_relative_eq!(depth.values()[1], depth.resolution(), epsilon = 1e-9);
        assert_eq!(depth.bin_for_depth(0.0), Some(0));
        // A layer at depth d lands near z = d
        let bin = depth.bin_for_depth(60_000.0).unwrap();
        assert!((depth.values()[bin] - 60_000.0).abs() <= depth.resolution() / 2.0 + 1e-6);
        assert_eq!(depth.bin_for_depth(1e9), None);
        assert_eq!(depth.bin_for_depth(-1e6), None);
    }
}
