//! Window functions for spectral frame extraction
//!
//! Window coefficients reach the extractor as a sample source, so standard
//! shapes and arbitrary caller-supplied curves go through the same path.

use std::f64::consts::PI;

use crate::stream::{SampleBlock, SampleSource, SampleStream, SourceError};

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum WindowType {
    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/(M-1))
    #[default]
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/(M-1))
    Hamming,

    /// Blackman window: w[n] = 0.42 - 0.5*cos(2πn/(M-1)) + 0.08*cos(4πn/(M-1))
    Blackman,

    /// Rectangular window (no windowing)
    Rectangular,
}

impl WindowType {
    /// Window coefficients as a sample source of exactly `length` samples
    pub fn source(self, length: usize) -> SampleStream {
        SampleStream::new(generate_window(self, length)).with_block_len(length)
    }
}

/// Generate window coefficients
///
/// # Arguments
/// * `window_type` - Type of window function
/// * `length` - Number of samples (M)
///
/// # Returns
/// Vector of window coefficients w[n] for n = 0..M-1
pub fn generate_window(window_type: WindowType, length: usize) -> Vec<f64> {
    // A single-point symmetric window degenerates to 1
    if length == 1 || window_type == WindowType::Rectangular {
        return vec![1.0; length];
    }

    let m = length as f64;
    (0..length)
        .map(|n| {
            let angle = 2.0 * PI * n as f64 / (m - 1.0);
            match window_type {
                WindowType::Hann => 0.5 - 0.5 * angle.cos(),
                WindowType::Hamming => 0.54 - 0.46 * angle.cos(),
                WindowType::Blackman => 0.42 - 0.5 * angle.cos() + 0.08 * (2.0 * angle).cos(),
                WindowType::Rectangular => 1.0,
            }
        })
        .collect()
}

/// Read exactly `length` scaled coefficients from a window-shape source
///
/// Reads through an independent copy, so `source` itself is not advanced.
/// Coefficients past the end of the source are zero.
pub fn read_window(source: &dyn SampleSource, length: usize) -> Result<Vec<f64>, SourceError> {
    let mut copy = source.duplicate();
    let scale = copy.scale();
    let mut window = Vec::with_capacity(length);

    while window.len() < length {
        match copy.next_block()? {
            SampleBlock::Samples(block) => {
                let togo = (length - window.len()).min(block.len());
                window.extend(block[..togo].iter().map(|&w| w * scale));
            }
            SampleBlock::End => {
                window.resize(length, 0.0);
            }
        }
    }

    Ok(window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_generation() {
        let length = 161;

        let hann = generate_window(WindowType::Hann, length);
        let hamming = generate_window(WindowType::Hamming, length);
        let blackman = generate_window(WindowType::Blackman, length);

        assert_eq!(hann.len(), length);
        assert_eq!(hamming.len(), length);
        assert_eq!(blackman.len(), length);

        // Symmetric
        assert!((hann[0] - hann[length - 1]).abs() < 1e-10);
        assert!((hamming[0] - hamming[length - 1]).abs() < 1e-10);
        assert!((blackman[0] - blackman[length - 1]).abs() < 1e-10);

        // Peak of 1.0 at the center
        let center = length / 2;
        assert!((hann[center] - 1.0).abs() < 1e-10);
        assert!((hamming[center] - 1.0).abs() < 1e-10);
        assert!((blackman[center] - 1.0).abs() < 1e-10);

        // Hamming should have non-zero endpoints (0.08)
        assert!(hamming[0] > 0.07 && hamming[0] < 0.09);
    }

    #[test]
    fn test_rectangular_and_single_point() {
        let window = generate_window(WindowType::Rectangular, 100);
        assert!(window.iter().all(|&w| w == 1.0));

        assert_eq!(generate_window(WindowType::Hann, 1), vec![1.0]);
        assert!(generate_window(WindowType::Blackman, 0).is_empty());
    }

    #[test]
    fn test_read_window_spans_blocks_and_scales() {
        let source = SampleStream::new(vec![1.0, 2.0, 3.0, 4.0, 5.0])
            .with_block_len(2)
            .with_scale(2.0);

        let window = read_window(&source, 3).unwrap();
        assert_eq!(window, vec![2.0, 4.0, 6.0]);

        // Read through a copy
        assert_eq!(source.remaining(), 5);
    }

    #[test]
    fn test_read_window_pads_short_source() {
        let source = SampleStream::new(vec![0.5, 0.5]);
        let window = read_window(&source, 4).unwrap();
        assert_eq!(window, vec![0.5, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_window_source_matches_generated() {
        let source = WindowType::Hamming.source(64);
        let window = read_window(&source, 64).unwrap();
        assert_eq!(window, generate_window(WindowType::Hamming, 64));
    }
}
