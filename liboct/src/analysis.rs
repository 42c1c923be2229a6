//! Depth Profile Analysis
//!
//! Locates reflector peaks in a linear depth profile so a reconstruction
//! can be checked against the layers that produced it.
//!
//! License: MIT

use crate::generators::spectral::Layer;
use crate::reconstruction::DepthAxis;

/// A local maximum of a depth profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub bin: usize,
    pub depth: f64,
    pub magnitude: f64,
}

impl Peak {
    /// Magnitude in dB
    pub fn magnitude_db(&self) -> f64 {
        20.0 * self.magnitude.log10()
    }
}

/// Strongest local maxima of `profile`, sorted by magnitude (descending).
///
/// The DC and last bins are skipped. A bin is a local maximum when it is
/// at least as large as both neighbours and strictly larger than one.
pub fn find_peaks(profile: &[f64], axis: &DepthAxis, max_peaks: usize) -> Vec<Peak> {
    if profile.len() < 3 {
        return Vec::new();
    }

    let mut peaks: Vec<Peak> = (1..profile.len() - 1)
        .filter(|&i| {
            let (left, v, right) = (profile[i - 1], profile[i], profile[i + 1]);
            v >= left && v >= right && (v > left || v > right)
        })
        .map(|i| make_peak(profile, axis, i))
        .collect();

    // NaN magnitudes sort last
    peaks.sort_by(|a, b| match (a.magnitude.is_nan(), b.magnitude.is_nan()) {
        (true, true) => std::cmp::Ordering::Equal,
        (true, false) => std::cmp::Ordering::Greater,
        (false, true) => std::cmp::Ordering::Less,
        (false, false) => b
            .magnitude
            .partial_cmp(&a.magnitude)
            .unwrap_or(std::cmp::Ordering::Equal),
    });
    peaks.truncate(max_peaks);
    peaks
}

/// Largest bin within `radius` of `center`
pub fn peak_near(profile: &[f64], axis: &DepthAxis, center: usize, radius: usize) -> Option<Peak> {
    if center >= profile.len() {
        return None;
    }
    let lo = center.saturating_sub(radius);
    let hi = (center + radius).min(profile.len() - 1);

    (lo..=hi)
        .max_by(|&a, &b| {
            profile[a]
                .partial_cmp(&profile[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|i| make_peak(profile, axis, i))
}

/// Peak closest to each layer's expected bin (`None` for layers beyond
/// the measurable depth range)
pub fn locate_layers(
    profile: &[f64],
    axis: &DepthAxis,
    layers: &[Layer],
    radius: usize,
) -> Vec<Option<Peak>> {
    layers
        .iter()
        .map(|layer| {
            axis.bin_for_depth(layer.depth)
                .and_then(|bin| peak_near(profile, axis, bin, radius))
        })
        .collect()
}

fn make_peak(profile: &[f64], axis: &DepthAxis, bin: usize) -> Peak {
    Peak {
        bin,
        depth: axis.values().get(bin).copied().unwrap_or(f64::NAN),
        magnitude: profile[bin],
    }
}
