//! liboct - Spectral-Domain OCT Simulation Library
//!
//! Synthesizes spectral-domain interferograms, reconstructs depth profiles
//! (A-scans / B-scans) by FFT and compresses them into 8-bit images.
//! Provides Python bindings via PyO3 (optional) so plotting can stay on the
//! Python side.
//!
//! # Features
//! - Wavenumber-domain forward model with any number of reflecting layers
//! - Reproducible per-line Gaussian noise (ChaCha8 streams)
//! - rustfft-based depth reconstruction
//! - Per-line raw quantization and two log-domain 8-bit policies
//!
//! # License
//! MIT License

pub mod analysis;
pub mod compression;
pub mod config;
pub mod error;
pub mod generators;
pub mod matrix;
pub mod pipeline;
pub mod reconstruction;

pub use compression::CompressionPolicy;
pub use config::{CompressionParams, OctConfig};
pub use error::{OctError, OctResult};
pub use generators::{Layer, WavenumberAxis};
pub use matrix::LineMatrix;
pub use pipeline::{simulate, Pipeline, PipelineOutput};
pub use reconstruction::DepthAxis;

// ============================================================================
// Python Bindings (only when python feature is enabled)
// ============================================================================

#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray1, PyArray2, PyArrayMethods};
    use pyo3::prelude::*;
    use pyo3::types::PyDict;

    use super::{compression, reconstruction, CompressionParams, LineMatrix, OctConfig, OctError, Layer};

    /// liboct - spectral-domain OCT simulation
    #[pymodule]
    pub fn liboct(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(simulate, m)?)?;
        m.add_function(wrap_pyfunction!(depth_profile, m)?)?;
        m.add_function(wrap_pyfunction!(quantize_raw_line, m)?)?;
        Ok(())
    }

    fn to_pyerr(e: OctError) -> PyErr {
        pyo3::exceptions::PyValueError::new_err(e.to_string())
    }

    fn matrix_to_py<'py, T: numpy::Element + Copy>(
        py: Python<'py>,
        m: LineMatrix<T>,
    ) -> PyResult<Bound<'py, PyArray2<T>>> {
        let (rows, cols) = m.shape();
        numpy::PyArray::from_vec(py, m.into_vec())
            .reshape([rows, cols])
            .map_err(|e| pyo3::exceptions::PyRuntimeError::new_err(
                format!("Failed to reshape array: {:?}", e)
            ))
    }

    /// Run the full pipeline and return every stage as a numpy array
    #[pyfunction]
    #[pyo3(signature = (
        n_samples=1024,
        n_lines=1,
        layers=vec![(80.0, 60000.0), (8.0, 500000.0)],
        noise_amp=10.0,
        lambda_min=820.0,
        lambda_max=880.0,
        seed=42,
        floor_db=-10.0,
        range_db=38.0
    ))]
    #[allow(clippy::too_many_arguments)]
    fn simulate<'py>(
        py: Python<'py>,
        n_samples: usize,
        n_lines: usize,
        layers: Vec<(f64, f64)>,
        noise_amp: f64,
        lambda_min: f64,
        lambda_max: f64,
        seed: u64,
        floor_db: f64,
        range_db: f64,
    ) -> PyResult<Bound<'py, PyDict>> {
        let config = OctConfig {
            n_samples,
            lambda_min,
            lambda_max,
            layers: layers.into_iter().map(|(a, d)| Layer::new(a, d)).collect(),
            noise_amp,
            n_lines,
            seed,
            compression: CompressionParams { floor_db, range_db },
        };
        let out = py.allow_threads(|| super::simulate(config)).map_err(to_pyerr)?;

        let dict = PyDict::new(py);
        dict.set_item("k", out.wavenumbers.values().to_vec().into_pyarray(py))?;
        dict.set_item("z", out.depths.values().to_vec().into_pyarray(py))?;
        dict.set_item("raw", matrix_to_py(py, out.raw)?)?;
        dict.set_item("raw_8bit", matrix_to_py(py, out.raw_8bit)?)?;
        dict.set_item("linear", matrix_to_py(py, out.linear)?)?;
        dict.set_item("log", matrix_to_py(py, out.log)?)?;
        dict.set_item("global_8bit", matrix_to_py(py, out.global_8bit)?)?;
        dict.set_item("truncated_8bit", matrix_to_py(py, out.truncated_8bit)?)?;
        Ok(dict)
    }

    /// Linear depth profile of one line
    #[pyfunction]
    fn depth_profile<'py>(py: Python<'py>, line: Vec<f64>) -> Bound<'py, PyArray1<f64>> {
        reconstruction::reconstruct_line(&line).into_pyarray(py)
    }

    /// Per-line 8-bit raw quantization
    #[pyfunction]
    fn quantize_raw_line<'py>(py: Python<'py>, line: Vec<f64>) -> Bound<'py, PyArray1<u8>> {
        compression::quantize_raw_row(&line).into_pyarray(py)
    }
}

// Re-export the Python module when python feature is enabled
#[cfg(feature = "python")]
pub use python::liboct;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_module() {
        let out = simulate(OctConfig {
            n_samples: 128,
            ..OctConfig::default()
        })
        .unwrap();
        assert_eq!(out.raw_8bit.shape(), (1, 128));
        assert_eq!(out.global_8bit.shape(), (1, 64));
    }

    #[test]
    fn test_policy_variants_share_log_profile() {
        let out = simulate(OctConfig::default()).unwrap();
        let global = CompressionPolicy::GlobalNormalize.apply(&out.log).unwrap();
        let fixed = CompressionPolicy::from(CompressionParams::default())
            .apply(&out.log)
            .unwrap();
        assert_eq!(global, out.global_8bit);
        assert_eq!(fixed, out.truncated_8bit);
    }
}
