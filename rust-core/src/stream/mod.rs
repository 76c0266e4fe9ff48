//! Upstream sample sources and frame buffering

pub mod source;
pub mod buffer;

pub use source::{IterSource, SampleBlock, SampleSource, SampleStream, SourceError};
pub use buffer::SampleBuffer;
