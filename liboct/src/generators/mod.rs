//! Signal Generators Module
//!
//! Wavenumber-domain forward model and the per-line ensemble built on it.
//!
//! License: MIT

pub mod spectral;
pub mod ensemble;

// Re-export main types and functions
pub use spectral::{layer_signal, synthesize_line, Layer, WavenumberAxis};
pub use ensemble::{generate_ensemble, generate_line, line_rng};
