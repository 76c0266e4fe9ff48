//! Packed half-spectrum frames

/// One windowed transform of a stream, packed as
/// `[DC, cos₁, sin₁, cos₂, sin₂, …, (Nyquist)]`
///
/// The frame has exactly as many values as the analysis window. Cosine and
/// sine slots hold twice the real part and minus twice the imaginary part of
/// the corresponding bin; the Nyquist slot exists only for even lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    values: Vec<f64>,
}

impl Frame {
    pub(crate) fn from_packed(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Frame length (equals the window length)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// DC term (sum of the windowed samples)
    pub fn dc(&self) -> f64 {
        self.values.first().copied().unwrap_or(0.0)
    }

    /// Number of (cosine, sine) bin pairs, excluding DC and Nyquist
    pub fn num_bins(&self) -> usize {
        self.values.len().saturating_sub(1) / 2
    }

    /// Cosine and sine components of bin `k`, for `k` in `1..=num_bins()`
    pub fn bin(&self, k: usize) -> Option<(f64, f64)> {
        if k == 0 || k > self.num_bins() {
            return None;
        }
        Some((self.values[2 * k - 1], self.values[2 * k]))
    }

    /// Nyquist term, present only for even frame lengths
    pub fn nyquist(&self) -> Option<f64> {
        let len = self.values.len();
        if len >= 2 && len % 2 == 0 {
            Some(self.values[len - 1])
        } else {
            None
        }
    }

    /// Amplitude of the sinusoid at bin `k`, assuming a rectangular window
    ///
    /// A component `A·cos(2πkn/N + φ)` spanning exactly `k` cycles per frame
    /// yields `A`.
    pub fn bin_amplitude(&self, k: usize) -> Option<f64> {
        self.bin(k)
            .map(|(c, s)| c.hypot(s) / self.values.len() as f64)
    }

    /// Packed values
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Take the packed values
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }
}

impl AsRef<[f64]> for Frame {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

impl std::ops::Index<usize> for Frame {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.values[index]
    }
}
