//! FFT engine for windowed frames
//!
//! Forward, unnormalized complex transform of a real frame, packed into
//! the half-spectrum layout returned to callers.

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// FFT engine for fixed-length real frames
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Forward FFT processor
    fft: Arc<dyn Fft<f64>>,

    /// Reusable working buffer (real part = windowed samples, imaginary part zeroed)
    buffer: Vec<Complex<f64>>,

    /// Reusable scratch space for in-place processing
    scratch: Vec<Complex<f64>>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples, any length)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(fft_size);

        let buffer = vec![Complex::new(0.0, 0.0); fft_size];
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Self {
            fft_size,
            fft,
            buffer,
            scratch,
        }
    }

    /// Window a frame, transform it and pack the result
    ///
    /// # Arguments
    /// * `samples` - Frame samples (missing trailing samples are treated as zero)
    /// * `window` - Window coefficients, one per sample
    ///
    /// # Returns
    /// `fft_size` values: DC, then (2·Re, -2·Im) pairs for bins 1..N/2,
    /// then the Nyquist real part when N is even
    pub fn transform_packed(&mut self, samples: impl Iterator<Item = f64>, window: &[f64]) -> Vec<f64> {
        self.buffer.fill(Complex::new(0.0, 0.0));
        for ((slot, s), &w) in self.buffer.iter_mut().zip(samples).zip(window) {
            slot.re = s * w;
        }

        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        pack_half_spectrum(&self.buffer)
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
}

/// Pack a full complex spectrum of a real signal into `N` real values
///
/// Bin 0 is stored as-is, bins `1..N/2` as doubled cosine/sine pairs, and for
/// even `N` the Nyquist bin (real by symmetry) in the last slot, undoubled.
pub fn pack_half_spectrum(spectrum: &[Complex<f64>]) -> Vec<f64> {
    let len = spectrum.len();
    let mut packed = vec![0.0; len];
    if len == 0 {
        return packed;
    }

    packed[0] = spectrum[0].re;
    for i in (2..len).step_by(2) {
        let bin = spectrum[i / 2];
        packed[i - 1] = bin.re * 2.0;
        packed[i] = bin.im * -2.0;
    }
    if len % 2 == 0 {
        packed[len - 1] = spectrum[len / 2].re;
    }

    packed
}

impl std::fmt::Debug for FftEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FftEngine")
            .field("fft_size", &self.fft_size)
            .finish()
    }
}
