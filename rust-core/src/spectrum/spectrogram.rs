//! Config-driven frame iteration and spectrogram assembly

use ndarray::Array2;

use super::extractor::{FrameParams, SpectralFrames};
use super::frame::Frame;
use super::windowing::WindowType;
use crate::error::Result;
use crate::stream::{SampleSource, SampleStream};

/// Frame extraction configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct FrameConfig {
    /// Samples per frame
    pub window_len: usize,

    /// Samples to advance between frames
    pub step: usize,

    /// Window applied before the transform
    pub window_type: WindowType,

    /// Stop after this many frames (required for unbounded sources)
    pub max_frames: Option<usize>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            window_len: 2048,
            step: 512,
            window_type: WindowType::Hann,
            max_frames: None,
        }
    }
}

impl FrameConfig {
    /// Build a configuration from signed (scripting) arguments
    ///
    /// Rejects window lengths below 1 and negative steps.
    pub fn from_signed(
        window_len: i64,
        step: i64,
        window_type: WindowType,
        max_frames: Option<usize>,
    ) -> Result<Self> {
        let params = FrameParams::from_signed(window_len, step)?;
        Ok(Self {
            window_len: params.window_len,
            step: params.step,
            window_type,
            max_frames,
        })
    }

    /// Check the configuration and convert it to frame arguments
    pub fn validate(&self) -> Result<FrameParams> {
        FrameParams::new(self.window_len, self.step)
    }

    /// Window-shape source for this configuration (`None` = rectangular)
    pub fn window_source(&self) -> Option<SampleStream> {
        match self.window_type {
            WindowType::Rectangular => None,
            shape => Some(shape.source(self.window_len)),
        }
    }
}

/// Iterator over the remaining frames of a stream
///
/// Yields frames until the stream ends or an error occurs; an error is
/// yielded once and ends the iteration.
pub struct FrameIter<'a, S> {
    frames: &'a mut SpectralFrames<S>,
    params: FrameParams,
    window: Option<SampleStream>,
    remaining: Option<usize>,
    done: bool,
}

impl<'a, S: SampleSource> Iterator for FrameIter<'a, S> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.remaining == Some(0) {
            return None;
        }

        let window = self.window.take();
        let window = window.as_ref().map(|w| w as &dyn SampleSource);

        match self.frames.next_frame_with(self.params, window) {
            Ok(Some(frame)) => {
                if let Some(remaining) = self.remaining.as_mut() {
                    *remaining -= 1;
                }
                Some(Ok(frame))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<S: SampleSource> SpectralFrames<S> {
    /// Iterate over frames using `config`
    pub fn frames(&mut self, config: &FrameConfig) -> Result<FrameIter<'_, S>> {
        let params = config.validate()?;

        Ok(FrameIter {
            frames: self,
            params,
            window: config.window_source(),
            remaining: config.max_frames,
            done: false,
        })
    }
}

/// Extract every frame of `source` into a `(frames, window_len)` matrix
///
/// Each row is one packed frame. Unbounded sources need `max_frames`.
pub fn spectrogram<S: SampleSource>(source: S, config: &FrameConfig) -> Result<Array2<f64>> {
    let mut frames = SpectralFrames::new(source);
    let mut flat = Vec::new();
    let mut rows = 0;

    for frame in frames.frames(config)? {
        flat.extend_from_slice(frame?.as_slice());
        rows += 1;
    }

    Ok(Array2::from_shape_vec((rows, config.window_len), flat)?)
}
