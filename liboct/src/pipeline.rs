//! End-to-end simulation pipeline
//!
//! synthesize -> quantize raw -> reconstruct -> log -> 8-bit image
//!
//! Every stage produces a new array; `PipelineOutput` keeps all of them so
//! the rendering side can show any stage next to its axis.
//!
//! License: MIT

use tracing::{debug, info};

use crate::compression::{quantize_log_global, quantize_log_truncated, quantize_raw, to_decibels};
use crate::config::OctConfig;
use crate::error::OctResult;
use crate::generators::{generate_ensemble, WavenumberAxis};
use crate::matrix::LineMatrix;
use crate::reconstruction::{reconstruct_ensemble, DepthAxis};

/// Every intermediate and final array of one run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub wavenumbers: WavenumberAxis,
    pub depths: DepthAxis,
    /// `n_lines x n_samples` synthesized signal before quantization
    pub raw: LineMatrix<f64>,
    /// `n_lines x n_samples`
    pub raw_8bit: LineMatrix<u8>,
    /// `n_lines x n_samples/2`
    pub linear: LineMatrix<f64>,
    /// `n_lines x n_samples/2`, dB
    pub log: LineMatrix<f64>,
    /// Global min/max normalized image
    pub global_8bit: LineMatrix<u8>,
    /// Fixed floor/range truncated image
    pub truncated_8bit: LineMatrix<u8>,
}

/// Simulation pipeline bound to a validated configuration
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: OctConfig,
    axis: WavenumberAxis,
}

impl Pipeline {
    /// Validate `config` and precompute the wavenumber axis
    pub fn new(config: OctConfig) -> OctResult<Self> {
        config.validate()?;
        let axis = WavenumberAxis::from_wavelengths(config.lambda_min, config.lambda_max, config.n_samples);
        Ok(Self { config, axis })
    }

    pub fn config(&self) -> &OctConfig {
        &self.config
    }

    pub fn wavenumbers(&self) -> &WavenumberAxis {
        &self.axis
    }

    pub fn depth_axis(&self) -> DepthAxis {
        DepthAxis::from_wavenumbers(&self.axis)
    }

    /// Raw signal ensemble for this configuration
    pub fn synthesize(&self) -> OctResult<LineMatrix<f64>> {
        generate_ensemble(
            &self.axis,
            &self.config.layers,
            self.config.noise_amp,
            self.config.n_lines,
            self.config.seed,
        )
    }

    /// Run every stage once
    pub fn run(&self) -> OctResult<PipelineOutput> {
        let raw = self.synthesize()?;
        let raw_8bit = quantize_raw(&raw)?;
        let linear = reconstruct_ensemble(&raw_8bit)?;
        let log = to_decibels(&linear);

        let global_8bit = quantize_log_global(&log)?;
        let c = self.config.compression;
        let truncated_8bit = quantize_log_truncated(&log, c.floor_db, c.range_db)?;

        debug!(
            raw = ?raw.shape(),
            profile = ?linear.shape(),
            "pipeline stages complete"
        );
        info!(
            lines = self.config.n_lines,
            samples = self.config.n_samples,
            layers = self.config.layers.len(),
            "simulation finished"
        );

        Ok(PipelineOutput {
            wavenumbers: self.axis.clone(),
            depths: self.depth_axis(),
            raw,
            raw_8bit,
            linear,
            log,
            global_8bit,
            truncated_8bit,
        })
    }
}

/// Convenience wrapper: validate, build and run
pub fn simulate(config: OctConfig) -> OctResult<PipelineOutput> {
    Pipeline::new(config)?.run()
}
