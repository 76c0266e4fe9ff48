//! PyO3 bindings for Python integration

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::error::FrameError;

mod stream_bindings;
mod frames_bindings;

/// Python module definition
#[pymodule]
fn spectral_frames(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<stream_bindings::PySampleStream>()?;
    m.add_class::<stream_bindings::PyWindowType>()?;
    m.add_class::<frames_bindings::PySpectralFrames>()?;
    m.add_function(wrap_pyfunction!(frames_bindings::spectrogram, m)?)?;

    Ok(())
}

/// Argument errors become `ValueError`, everything else `RuntimeError`
pub(crate) fn to_py_err(err: FrameError) -> PyErr {
    match &err {
        FrameError::InvalidArgument(_) | FrameError::InconsistentWindowLength { .. } => {
            PyValueError::new_err(err.to_string())
        }
        FrameError::Upstream(_) | FrameError::Shape(_) => PyRuntimeError::new_err(err.to_string()),
    }
}
