//! Python bindings for sample streams and window shapes

use numpy::PyReadonlyArray1;
use pyo3::prelude::*;

use crate::spectrum::WindowType;
use crate::stream::{SampleSource, SampleStream};

/// Window type enum exposed to Python
#[pyclass(name = "WindowType")]
#[derive(Clone)]
pub enum PyWindowType {
    Hann,
    Hamming,
    Blackman,
    Rectangular,
}

impl From<PyWindowType> for WindowType {
    fn from(py_win: PyWindowType) -> Self {
        match py_win {
            PyWindowType::Hann => WindowType::Hann,
            PyWindowType::Hamming => WindowType::Hamming,
            PyWindowType::Blackman => WindowType::Blackman,
            PyWindowType::Rectangular => WindowType::Rectangular,
        }
    }
}

/// In-memory sample stream exposed to Python
#[pyclass(name = "SampleStream")]
#[derive(Clone)]
pub struct PySampleStream {
    pub(crate) inner: SampleStream,
}

#[pymethods]
impl PySampleStream {
    /// Create a new sample stream
    ///
    /// Args:
    ///     samples: Audio samples as numpy array
    ///     scale: Multiplier applied to every sample
    ///     block_len: Samples handed out per upstream block
    #[new]
    #[pyo3(signature = (samples, scale=1.0, block_len=1024))]
    fn new(samples: PyReadonlyArray1<f64>, scale: f64, block_len: usize) -> Self {
        let inner = SampleStream::new(samples.as_array().to_vec())
            .with_block_len(block_len)
            .with_scale(scale);

        Self { inner }
    }

    /// Independent copy of this stream (separate read cursor)
    fn copy(&self) -> Self {
        self.clone()
    }

    /// Scale factor
    #[getter]
    fn scale(&self) -> f64 {
        self.inner.scale()
    }

    /// Samples not yet read through this stream
    fn remaining(&self) -> usize {
        self.inner.remaining()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}
