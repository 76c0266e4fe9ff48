//! Streaming spectral frame extraction
//!
//! Pulls samples from a lazy source into a window-length buffer, transforms
//! the windowed buffer, then slides forward by a caller-chosen step. The
//! per-stream state is created on the first request and lives as long as the
//! stream it reads from.
//!
//! Termination: once the source signals its end, the number of real samples
//! still buffered becomes a countdown that every step decrements. When it
//! reaches zero only implicit trailing silence is left, and the next request
//! reports end of stream instead of a frame.

use tracing::{debug, trace};

use super::fft::FftEngine;
use super::frame::Frame;
use super::windowing::read_window;
use crate::error::{FrameError, Result};
use crate::stream::{SampleBlock, SampleBuffer, SampleSource};

/// Validated frame request arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameParams {
    /// Samples per frame (at least 1)
    pub window_len: usize,

    /// Samples to advance after each frame
    pub step: usize,
}

impl FrameParams {
    pub fn new(window_len: usize, step: usize) -> Result<Self> {
        if window_len < 1 {
            return Err(FrameError::InvalidArgument(
                "window length must be at least 1".into(),
            ));
        }
        Ok(Self { window_len, step })
    }

    /// Validate arguments arriving from a signed (scripting) interface
    pub fn from_signed(window_len: i64, step: i64) -> Result<Self> {
        if window_len < 1 {
            return Err(FrameError::InvalidArgument(format!(
                "window length must be at least 1 (got {})",
                window_len
            )));
        }
        if step < 0 {
            return Err(FrameError::InvalidArgument(format!(
                "step must not be negative (got {})",
                step
            )));
        }
        let window_len = usize::try_from(window_len)
            .map_err(|_| FrameError::InvalidArgument("window length too large".into()))?;
        let step = usize::try_from(step)
            .map_err(|_| FrameError::InvalidArgument("step too large".into()))?;
        Self::new(window_len, step)
    }
}

/// Per-stream extraction state
#[derive(Debug)]
pub struct FrameState {
    /// Fixed for the lifetime of the state
    window_len: usize,

    /// Scaled samples not yet shifted out
    buffer: SampleBuffer,

    /// Window coefficients, one per buffered sample
    window: Vec<f64>,

    /// Current upstream block and read position within it
    block: Vec<f64>,
    block_pos: usize,

    /// Set once the source has yielded its end marker
    upstream_ended: bool,

    /// Real samples left before only silence remains (None until the end is seen)
    termination: Option<usize>,

    /// Upstream samples still to be skipped from the last step
    pending_skip: usize,

    fft: FftEngine,
}

impl FrameState {
    fn new(window_len: usize, window: Option<&dyn SampleSource>) -> Result<Self> {
        let window = match window {
            Some(source) => read_window(source, window_len).map_err(FrameError::Upstream)?,
            None => vec![1.0; window_len],
        };

        Ok(Self {
            window_len,
            buffer: SampleBuffer::new(window_len),
            window,
            block: Vec::new(),
            block_pos: 0,
            upstream_ended: false,
            termination: None,
            pending_skip: 0,
            fft: FftEngine::new(window_len),
        })
    }

    /// Window length this state was created with
    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Number of valid buffered samples
    pub fn fill_count(&self) -> usize {
        self.buffer.fill_count()
    }

    /// Buffered samples left before the stream's logical end, if it has been seen
    pub fn termination_countdown(&self) -> Option<usize> {
        self.termination
    }

    /// True once every real sample has been shifted out
    pub fn is_terminated(&self) -> bool {
        self.termination == Some(0)
    }

    /// Currently buffered (scaled) samples, oldest first
    pub fn buffered(&self) -> Vec<f64> {
        self.buffer.to_vec()
    }

    /// Window coefficients
    pub fn window(&self) -> &[f64] {
        &self.window
    }

    fn next_frame<S: SampleSource + ?Sized>(
        &mut self,
        source: &mut S,
        step: usize,
    ) -> Result<Option<Frame>> {
        if self.is_terminated() {
            return Ok(None);
        }

        self.skip_upstream(source)?;
        self.refill(source)?;

        // Refill is what discovers the end, so this must come after it
        if self.is_terminated() {
            debug!(window_len = self.window_len, "spectral stream ended");
            return Ok(None);
        }

        let packed = self.fft.transform_packed(self.buffer.iter(), &self.window);
        self.advance(step);

        Ok(Some(Frame::from_packed(packed)))
    }

    fn refill<S: SampleSource + ?Sized>(&mut self, source: &mut S) -> Result<()> {
        let scale = source.scale();

        while !self.buffer.is_full() {
            if self.block_pos == self.block.len() && !self.upstream_ended {
                self.pull(source)?;
                continue;
            }

            let sample = if self.upstream_ended {
                0.0
            } else {
                let s = self.block[self.block_pos];
                self.block_pos += 1;
                s * scale
            };
            self.buffer.push(sample);
        }

        Ok(())
    }

    fn pull<S: SampleSource + ?Sized>(&mut self, source: &mut S) -> Result<()> {
        match source.next_block().map_err(FrameError::Upstream)? {
            SampleBlock::Samples(block) => {
                self.block = block;
                self.block_pos = 0;
            }
            SampleBlock::End => {
                self.upstream_ended = true;
                self.block.clear();
                self.block_pos = 0;
                if self.termination.is_none() {
                    let remaining = self.buffer.fill_count();
                    trace!(remaining, "upstream end reached");
                    self.termination = Some(remaining);
                }
            }
        }
        Ok(())
    }

    fn advance(&mut self, step: usize) {
        self.buffer.shift(step);

        if let Some(countdown) = self.termination.as_mut() {
            *countdown = countdown.saturating_sub(step);
            if *countdown == 0 {
                debug!(window_len = self.window_len, "last real sample shifted out");
            }
        }

        // Stepping past the buffer skips samples that belong to no frame
        self.pending_skip = step.saturating_sub(self.window_len);
    }

    fn skip_upstream<S: SampleSource + ?Sized>(&mut self, source: &mut S) -> Result<()> {
        if self.pending_skip > 0 {
            trace!(skip = self.pending_skip, "skipping upstream samples");
        }

        while self.pending_skip > 0 && !self.upstream_ended {
            let remaining = self.block.len() - self.block_pos;
            if remaining >= self.pending_skip {
                self.block_pos += self.pending_skip;
                self.pending_skip = 0;
            } else {
                self.pending_skip -= remaining;
                self.block_pos = self.block.len();
                self.pull(source)?;
            }
        }

        // Nothing left to skip past the end
        self.pending_skip = 0;
        Ok(())
    }
}

/// A sample stream annotated with its frame extraction state
///
/// The state is created on the first [`next_frame`](Self::next_frame) call and
/// is owned exclusively by this stream. To analyze the same audio twice (e.g.
/// at two step sizes) duplicate the source and wrap each copy separately.
pub struct SpectralFrames<S> {
    source: S,
    state: Option<FrameState>,
}

impl<S: SampleSource> SpectralFrames<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: None,
        }
    }

    /// Produce the next spectral frame, then advance by `step` samples
    ///
    /// # Arguments
    /// * `window_len` - Frame length; must match the length used on the first call
    /// * `step` - Samples to advance after this frame (may exceed `window_len`)
    /// * `window` - Window-shape source, read only on the first call and
    ///   through a duplicate, so the caller's cursor stays put; `None` gives a
    ///   rectangular window
    ///
    /// When `step` exceeds `window_len`, the upstream samples between frames
    /// are skipped at the start of the *next* call rather than in this one.
    /// An upstream error surfaces from that next call, and the unfinished skip
    /// is resumed on the call after it.
    ///
    /// # Returns
    /// `Ok(None)` once the stream has ended
    pub fn next_frame(
        &mut self,
        window_len: usize,
        step: usize,
        window: Option<&dyn SampleSource>,
    ) -> Result<Option<Frame>> {
        let params = FrameParams::new(window_len, step)?;
        self.next_frame_with(params, window)
    }

    /// Same as [`next_frame`](Self::next_frame) with pre-validated arguments
    pub fn next_frame_with(
        &mut self,
        params: FrameParams,
        window: Option<&dyn SampleSource>,
    ) -> Result<Option<Frame>> {
        if let Some(state) = &self.state {
            if state.window_len != params.window_len {
                return Err(FrameError::InconsistentWindowLength {
                    expected: state.window_len,
                    requested: params.window_len,
                });
            }
        }

        let state = match self.state.take() {
            Some(state) => state,
            None => {
                debug!(
                    window_len = params.window_len,
                    rectangular = window.is_none(),
                    "initializing spectral frame state"
                );
                FrameState::new(params.window_len, window)?
            }
        };
        let state = self.state.insert(state);

        state.next_frame(&mut self.source, params.step)
    }

    /// Extraction state, if any frame has been requested yet
    pub fn state(&self) -> Option<&FrameState> {
        self.state.as_ref()
    }

    /// Underlying source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Release the extraction state and return the source
    pub fn into_source(self) -> S {
        self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{SampleStream, SourceError};

    fn frames(samples: Vec<f64>, block_len: usize) -> SpectralFrames<SampleStream> {
        SpectralFrames::new(SampleStream::new(samples).with_block_len(block_len))
    }

    #[test]
    fn test_rejects_zero_window_len() {
        let mut f = frames(vec![1.0; 8], 4);
        let err = f.next_frame(0, 1, None).unwrap_err();
        assert!(matches!(err, FrameError::InvalidArgument(_)));

        // No state was created
        assert!(f.state().is_none());
    }

    #[test]
    fn test_signed_params() {
        assert!(matches!(
            FrameParams::from_signed(0, 1),
            Err(FrameError::InvalidArgument(_))
        ));
        assert!(matches!(
            FrameParams::from_signed(4, -1),
            Err(FrameError::InvalidArgument(_))
        ));
        assert_eq!(
            FrameParams::from_signed(4, 2).unwrap(),
            FrameParams { window_len: 4, step: 2 }
        );
    }

    #[test]
    fn test_window_len_is_fixed() {
        let mut f = frames(vec![1.0; 16], 4);
        f.next_frame(4, 2, None).unwrap();
        let before = f.state().unwrap().buffered();

        let err = f.next_frame(8, 2, None).unwrap_err();
        assert!(matches!(
            err,
            FrameError::InconsistentWindowLength { expected: 4, requested: 8 }
        ));

        // State untouched by the rejected call
        assert_eq!(f.state().unwrap().buffered(), before);
    }

    #[test]
    fn test_overlap_retains_tail() {
        let samples: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        let mut f = frames(samples, 3);

        f.next_frame(4, 1, None).unwrap().unwrap();
        assert_eq!(f.state().unwrap().buffered(), vec![2.0, 3.0, 4.0]);

        f.next_frame(4, 1, None).unwrap().unwrap();
        assert_eq!(f.state().unwrap().buffered(), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_scale_applied_once() {
        let source = SampleStream::new(vec![1.0, 1.0]).with_scale(0.5);
        let mut f = SpectralFrames::new(source);

        let frame = f.next_frame(2, 0, None).unwrap().unwrap();
        assert!((frame.dc() - 1.0).abs() < 1e-12);
        assert_eq!(f.state().unwrap().buffered(), vec![0.5, 0.5]);
    }

    #[test]
    fn test_window_read_once() {
        let mut f = frames(vec![1.0; 8], 8);
        let window = SampleStream::new(vec![0.0, 1.0]);

        f.next_frame(2, 2, Some(&window)).unwrap();
        assert_eq!(f.state().unwrap().window(), &[0.0, 1.0]);

        // Read through a duplicate: the caller's cursor did not move
        assert_eq!(window.remaining(), 2);

        // Later window arguments are ignored
        let other = SampleStream::new(vec![5.0, 5.0]);
        f.next_frame(2, 2, Some(&other)).unwrap();
        assert_eq!(f.state().unwrap().window(), &[0.0, 1.0]);
        assert_eq!(other.remaining(), 2);
    }

    #[test]
    fn test_countdown_discovered_during_refill() {
        let mut f = frames(vec![1.0, 2.0, 3.0], 8);

        f.next_frame(4, 1, None).unwrap().unwrap();
        let state = f.state().unwrap();
        // 3 real samples buffered at discovery, then one step
        assert_eq!(state.termination_countdown(), Some(2));
        assert_eq!(state.buffered(), vec![2.0, 3.0, 0.0]);
    }

    #[test]
    fn test_terminated_is_absorbing() {
        let mut f = frames(vec![1.0, 2.0], 8);

        assert!(f.next_frame(2, 2, None).unwrap().is_some());
        assert!(f.next_frame(2, 2, None).unwrap().is_none());
        assert!(f.state().unwrap().is_terminated());
        assert!(f.next_frame(2, 2, None).unwrap().is_none());
    }

    struct FailingSource;

    impl SampleSource for FailingSource {
        fn next_block(&mut self) -> std::result::Result<SampleBlock, SourceError> {
            Err("disk went away".into())
        }

        fn duplicate(&self) -> Box<dyn SampleSource> {
            Box::new(FailingSource)
        }
    }

    #[test]
    fn test_upstream_error_propagates() {
        let mut f = SpectralFrames::new(FailingSource);
        let err = f.next_frame(4, 4, None).unwrap_err();

        match err {
            FrameError::Upstream(source) => assert_eq!(source.to_string(), "disk went away"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
