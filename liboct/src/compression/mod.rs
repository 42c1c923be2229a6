//! Quantization and dynamic range compression
//!
//! Two different 8-bit mappings live here:
//!
//! - **Raw quantization** of wavenumber-domain lines is per row: each row is
//!   shifted so its own minimum is 0, then clipped to [0, 255]. Rows are
//!   deliberately not rescaled, so a row whose shifted range exceeds 255
//!   loses its top samples (logged as a warning).
//! - **Log compression** of depth profiles converts to dB and then applies a
//!   [`CompressionPolicy`]. The global policy normalizes against the min/max
//!   of the whole ensemble, not per row, so lines stay comparable.
//!
//! All mappings round half to even, so exact .5 ties land on the even
//! count.
//!
//! # Non-finite values
//!
//! `20·log10(0)` is `-inf`. The global policy ignores non-finite values
//! when computing min/max and maps them to 0 (`-inf`, NaN) or 255 (`+inf`);
//! a row with no finite value at all is rejected with
//! `OctError::DegenerateInput`. The truncation policy needs no statistics
//! and simply clips.
//!
//! License: MIT

use tracing::{debug, warn};

use crate::config::CompressionParams;
use crate::error::{OctError, OctResult};
use crate::matrix::LineMatrix;

/// Final 8-bit scaling rule applied to a log profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompressionPolicy {
    /// Shift by the global minimum, scale the global maximum to 255
    GlobalNormalize,
    /// Shift by `floor_db`, scale `range_db` onto 255, clip
    FixedRange { floor_db: f64, range_db: f64 },
}

impl From<CompressionParams> for CompressionPolicy {
    fn from(p: CompressionParams) -> Self {
        CompressionPolicy::FixedRange {
            floor_db: p.floor_db,
            range_db: p.range_db,
        }
    }
}

impl CompressionPolicy {
    /// Quantize a whole log profile with this policy
    pub fn apply(&self, log_profile: &LineMatrix<f64>) -> OctResult<LineMatrix<u8>> {
        match *self {
            CompressionPolicy::GlobalNormalize => quantize_log_global(log_profile),
            CompressionPolicy::FixedRange { floor_db, range_db } => {
                quantize_log_truncated(log_profile, floor_db, range_db)
            }
        }
    }
}

// ============================================================================
// Raw line quantization
// ============================================================================

/// Quantize one raw line to 8 bits: `round(clip(row - min(row), 0, 255))`.
///
/// # Edge Cases
/// - **Empty row**: returns an empty vector
/// - **Constant row**: all zeros
/// - **Shifted values above 255**: clipped, not rescaled
pub fn quantize_raw_row(row: &[f64]) -> Vec<u8> {
    if row.is_empty() {
        return Vec::new();
    }

    let min_val = row.iter().cloned().fold(f64::INFINITY, f64::min);

    row.iter()
        .map(|&v| (v - min_val).clamp(0.0, 255.0).round_ties_even() as u8)
        .collect()
}

/// Number of samples in `row` that `quantize_raw_row` clips at 255
pub fn raw_clipped_count(row: &[f64]) -> usize {
    let min_val = row.iter().cloned().fold(f64::INFINITY, f64::min);
    row.iter().filter(|&&v| v - min_val > 255.0).count()
}

/// Quantize each row of a raw ensemble independently
pub fn quantize_raw(ensemble: &LineMatrix<f64>) -> OctResult<LineMatrix<u8>> {
    for (i, row) in ensemble.iter_rows().enumerate() {
        let clipped = raw_clipped_count(row);
        if clipped > 0 {
            warn!(row = i, clipped, "raw line exceeds 8-bit range after min-shift; samples clipped");
        }
    }
    ensemble.map_rows(quantize_raw_row)
}

// ============================================================================
// Log conversion
// ============================================================================

/// `20 · log10(v)` element-wise; zero maps to `-inf`
pub fn to_decibels(profile: &LineMatrix<f64>) -> LineMatrix<f64> {
    profile.map(|v| 20.0 * v.log10())
}

// ============================================================================
// Log profile quantization
// ============================================================================

/// Finite (min, max) of the whole profile.
///
/// Fails with `DegenerateInput` on the first row that holds no finite value.
fn finite_range(profile: &LineMatrix<f64>) -> OctResult<(f64, f64)> {
    let mut min_val = f64::INFINITY;
    let mut max_val = f64::NEG_INFINITY;

    for (i, row) in profile.iter_rows().enumerate() {
        let mut any_finite = false;
        for &v in row.iter().filter(|v| v.is_finite()) {
            any_finite = true;
            min_val = min_val.min(v);
            max_val = max_val.max(v);
        }
        if !any_finite {
            return Err(OctError::DegenerateInput { row: i });
        }
    }

    Ok((min_val, max_val))
}

/// Global min/max policy.
///
/// `round((v - min) / (max - min) · 255)` with min/max over every finite
/// element of the profile. When all finite values are equal the image is
/// all zeros.
pub fn quantize_log_global(log_profile: &LineMatrix<f64>) -> OctResult<LineMatrix<u8>> {
    let (min_val, max_val) = finite_range(log_profile)?;
    let span = max_val - min_val;
    let inv_span = if span > 0.0 { 1.0 / span } else { 0.0 };

    debug!(min_db = min_val, max_db = max_val, "global log quantization");

    Ok(log_profile.map(|v| {
        if v.is_finite() {
            ((v - min_val) * inv_span * 255.0).round_ties_even().clamp(0.0, 255.0) as u8
        } else if v == f64::INFINITY {
            255
        } else {
            0
        }
    }))
}

/// Fixed-range truncation policy.
///
/// `round(clip((v - floor_db) / range_db · 255, 0, 255))`. Values outside
/// `[floor_db, floor_db + range_db]` saturate.
pub fn quantize_log_truncated(
    log_profile: &LineMatrix<f64>,
    floor_db: f64,
    range_db: f64,
) -> OctResult<LineMatrix<u8>> {
    CompressionParams { floor_db, range_db }.validate()?;

    let scale = 255.0 / range_db;
    Ok(log_profile.map(|v| {
        let scaled = ((v - floor_db) * scale).clamp(0.0, 255.0);
        // NaN survives clamp; send it to the floor like -inf
        if scaled.is_nan() {
            0
        } else {
            scaled.round_ties_even() as u8
        }
    }))
}
