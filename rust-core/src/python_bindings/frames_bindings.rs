//! Python bindings for spectral frame extraction

use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray1};
use pyo3::prelude::*;

use super::stream_bindings::{PySampleStream, PyWindowType};
use super::to_py_err;
use crate::spectrum::{FrameConfig, FrameParams, SpectralFrames, WindowType};
use crate::stream::{SampleSource, SampleStream};

/// Stream with attached frame extraction state
///
/// Wraps its own copy of the stream, so the caller's stream object keeps
/// its read position.
#[pyclass(name = "SpectralFrames")]
pub struct PySpectralFrames {
    frames: SpectralFrames<SampleStream>,
}

#[pymethods]
impl PySpectralFrames {
    #[new]
    fn new(stream: PyRef<'_, PySampleStream>) -> Self {
        Self {
            frames: SpectralFrames::new(stream.inner.clone()),
        }
    }

    /// Produce the next packed spectral frame, then advance
    ///
    /// Args:
    ///     window_len: Frame length (must not change between calls)
    ///     step: Samples to advance after the frame
    ///     window: Window coefficients (first call only)
    ///     window_type: Standard window, used when `window` is not given
    ///
    /// Returns:
    ///     Frame as numpy array, or None once the stream has ended
    #[pyo3(signature = (window_len, step, window=None, window_type=None))]
    fn next_frame<'py>(
        &mut self,
        py: Python<'py>,
        window_len: i64,
        step: i64,
        window: Option<PyReadonlyArray1<f64>>,
        window_type: Option<PyWindowType>,
    ) -> PyResult<Option<&'py PyArray1<f64>>> {
        let params = FrameParams::from_signed(window_len, step).map_err(to_py_err)?;

        // The window is only read when the state is created
        let shape = if self.frames.state().is_none() {
            match (window, window_type) {
                (Some(coeffs), _) => Some(SampleStream::new(coeffs.as_array().to_vec())),
                (None, Some(win)) => Some(WindowType::from(win).source(params.window_len)),
                (None, None) => None,
            }
        } else {
            None
        };
        let shape = shape.as_ref().map(|w| w as &dyn SampleSource);

        let frame = self.frames.next_frame_with(params, shape).map_err(to_py_err)?;

        Ok(frame.map(|f| PyArray1::from_vec(py, f.into_vec())))
    }

    /// Valid buffered samples (0 before the first frame)
    #[getter]
    fn fill_count(&self) -> usize {
        self.frames.state().map_or(0, |s| s.fill_count())
    }

    /// Real samples left before the end, or None if the end is not yet known
    #[getter]
    fn termination_countdown(&self) -> Option<usize> {
        self.frames.state().and_then(|s| s.termination_countdown())
    }
}

/// Extract all frames of a stream into a 2-D array (frames x window_len)
///
/// Args:
///     stream: Sample stream (read through an independent copy)
///     window_len: Frame length
///     step: Samples to advance between frames
///     window_type: Window applied before the transform
///     max_frames: Optional frame limit
#[pyfunction]
#[pyo3(signature = (stream, window_len=2048, step=512, window_type=PyWindowType::Hann, max_frames=None))]
pub fn spectrogram<'py>(
    py: Python<'py>,
    stream: PyRef<'_, PySampleStream>,
    window_len: i64,
    step: i64,
    window_type: PyWindowType,
    max_frames: Option<usize>,
) -> PyResult<&'py PyArray2<f64>> {
    let config = FrameConfig::from_signed(window_len, step, window_type.into(), max_frames)
        .map_err(to_py_err)?;

    let matrix = crate::spectrum::spectrogram(stream.inner.clone(), &config).map_err(to_py_err)?;

    Ok(matrix.into_pyarray(py))
}
