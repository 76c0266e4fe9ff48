//! Spectral Frames - Streaming Windowed FFT Core
//!
//! Pulls samples from lazy, arbitrarily long audio streams, windows them and
//! returns packed half-spectrum frames, sliding forward by a caller-chosen
//! step. Optional Python bindings expose the same primitive to scripts.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![allow(non_local_definitions)]

pub mod error;
pub mod spectrum;
pub mod stream;
#[cfg(feature = "python")]
pub mod python_bindings;

pub use error::{FrameError, Result};
pub use spectrum::{spectrogram, Frame, FrameConfig, FrameParams, SpectralFrames, WindowType};
pub use stream::{IterSource, SampleBlock, SampleSource, SampleStream, SourceError};
