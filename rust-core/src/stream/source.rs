//! Pull-based sample sources
//!
//! A source hands out audio in blocks of arbitrary length and signals the end
//! of the stream with an explicit marker. Every sample a consumer reads is
//! multiplied by the source's scale factor.

use std::sync::Arc;

/// Error raised by an upstream source while pulling a block
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Default number of samples handed out per block
pub const DEFAULT_BLOCK_LEN: usize = 1024;

/// One pull from a sample source
#[derive(Debug, Clone, PartialEq)]
pub enum SampleBlock {
    /// Next run of samples (unscaled, may be empty)
    Samples(Vec<f64>),

    /// End of stream; only implicit silence follows
    End,
}

impl SampleBlock {
    /// True for the end-of-stream marker
    pub fn is_end(&self) -> bool {
        matches!(self, SampleBlock::End)
    }
}

/// Lazy, possibly unbounded sequence of audio samples
///
/// Implementations should keep returning [`SampleBlock::End`] once the stream
/// is exhausted.
pub trait SampleSource {
    /// Pull the next block of samples
    fn next_block(&mut self) -> Result<SampleBlock, SourceError>;

    /// Independent copy reading on from the current position
    ///
    /// Pulling from the copy must not advance `self`.
    fn duplicate(&self) -> Box<dyn SampleSource>;

    /// Constant multiplier applied to every sample
    fn scale(&self) -> f64 {
        1.0
    }
}

impl<S: SampleSource + ?Sized> SampleSource for &mut S {
    fn next_block(&mut self) -> Result<SampleBlock, SourceError> {
        (**self).next_block()
    }

    fn duplicate(&self) -> Box<dyn SampleSource> {
        (**self).duplicate()
    }

    fn scale(&self) -> f64 {
        (**self).scale()
    }
}

impl<S: SampleSource + ?Sized> SampleSource for Box<S> {
    fn next_block(&mut self) -> Result<SampleBlock, SourceError> {
        (**self).next_block()
    }

    fn duplicate(&self) -> Box<dyn SampleSource> {
        (**self).duplicate()
    }

    fn scale(&self) -> f64 {
        (**self).scale()
    }
}

/// In-memory sample stream
///
/// Sample data is shared between clones; each clone reads through its own
/// cursor, so duplicating a stream never disturbs other readers.
#[derive(Debug, Clone)]
pub struct SampleStream {
    samples: Arc<[f64]>,
    position: usize,
    block_len: usize,
    scale: f64,
}

impl SampleStream {
    /// Create stream over `samples` with default block length and unit scale
    pub fn new(samples: impl Into<Arc<[f64]>>) -> Self {
        Self {
            samples: samples.into(),
            position: 0,
            block_len: DEFAULT_BLOCK_LEN,
            scale: 1.0,
        }
    }

    /// Set block length (clamped to at least 1)
    pub fn with_block_len(mut self, block_len: usize) -> Self {
        self.block_len = block_len.max(1);
        self
    }

    /// Set scale factor
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Total number of samples in the stream
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the stream holds no samples at all
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples not yet handed out by this cursor
    pub fn remaining(&self) -> usize {
        self.samples.len() - self.position
    }
}

impl SampleSource for SampleStream {
    fn next_block(&mut self) -> Result<SampleBlock, SourceError> {
        if self.position >= self.samples.len() {
            return Ok(SampleBlock::End);
        }
        let end = (self.position + self.block_len).min(self.samples.len());
        let block = self.samples[self.position..end].to_vec();
        self.position = end;
        Ok(SampleBlock::Samples(block))
    }

    fn duplicate(&self) -> Box<dyn SampleSource> {
        Box::new(self.clone())
    }

    fn scale(&self) -> f64 {
        self.scale
    }
}

/// Lazy source over any sample iterator
///
/// Pulls at most `block_len` samples per block; the stream ends when the
/// iterator does. Infinite iterators give infinite streams.
#[derive(Debug, Clone)]
pub struct IterSource<I> {
    iter: I,
    block_len: usize,
    scale: f64,
    finished: bool,
}

impl<I: Iterator<Item = f64>> IterSource<I> {
    pub fn new(iter: I) -> Self {
        Self {
            iter,
            block_len: DEFAULT_BLOCK_LEN,
            scale: 1.0,
            finished: false,
        }
    }

    /// Set block length (clamped to at least 1)
    pub fn with_block_len(mut self, block_len: usize) -> Self {
        self.block_len = block_len.max(1);
        self
    }

    /// Set scale factor
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

impl<I: Iterator<Item = f64> + Clone + 'static> SampleSource for IterSource<I> {
    fn next_block(&mut self) -> Result<SampleBlock, SourceError> {
        if self.finished {
            return Ok(SampleBlock::End);
        }
        let block: Vec<f64> = self.iter.by_ref().take(self.block_len).collect();
        if block.is_empty() {
            self.finished = true;
            return Ok(SampleBlock::End);
        }
        Ok(SampleBlock::Samples(block))
    }

    fn duplicate(&self) -> Box<dyn SampleSource> {
        Box::new(self.clone())
    }

    fn scale(&self) -> f64 {
        self.scale
    }
}
