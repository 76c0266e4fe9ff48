//! Windowed spectral frame extraction with FFT

pub mod fft;
pub mod windowing;
pub mod frame;
pub mod extractor;
pub mod spectrogram;

pub use fft::FftEngine;
pub use windowing::{generate_window, read_window, WindowType};
pub use frame::Frame;
pub use extractor::{FrameParams, FrameState, SpectralFrames};
pub use spectrogram::{spectrogram, FrameConfig, FrameIter};
