//! Fixed-capacity sample buffer for frame extraction
//!
//! FIFO of scaled samples backed by a ring buffer, so sliding the analysis
//! window forward is a head advance rather than a copy of the retained tail.

use ringbuf::{HeapConsumer, HeapProducer, HeapRb};

/// Buffered samples awaiting transform, oldest first
pub struct SampleBuffer {
    producer: HeapProducer<f64>,
    consumer: HeapConsumer<f64>,
    capacity: usize,
}

impl SampleBuffer {
    /// Create new buffer holding at most `capacity` samples
    ///
    /// # Arguments
    /// * `capacity` - Window length in samples (must be non-zero)
    pub fn new(capacity: usize) -> Self {
        let rb = HeapRb::<f64>::new(capacity);
        let (producer, consumer) = rb.split();

        Self {
            producer,
            consumer,
            capacity,
        }
    }

    /// Append one sample at position `fill_count()`
    ///
    /// # Returns
    /// `false` if the buffer was already full and the sample was dropped
    pub fn push(&mut self, sample: f64) -> bool {
        self.producer.push(sample).is_ok()
    }

    /// Drop the oldest `step` samples (floored at an empty buffer)
    ///
    /// Retained samples move to the front of the window.
    ///
    /// # Returns
    /// Number of samples actually removed
    pub fn shift(&mut self, step: usize) -> usize {
        self.consumer.skip(step)
    }

    /// Number of valid buffered samples
    pub fn fill_count(&self) -> usize {
        self.consumer.len()
    }

    /// Check if every slot holds a sample
    pub fn is_full(&self) -> bool {
        self.fill_count() == self.capacity
    }

    /// Buffered samples, oldest first
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.consumer.iter().copied()
    }

    /// Copy buffered samples out
    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }

    /// Get buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl std::fmt::Debug for SampleBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleBuffer")
            .field("capacity", &self.capacity)
            .field("fill_count", &self.fill_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_and_overflow() {
        let mut buffer = SampleBuffer::new(3);

        assert!(buffer.push(1.0));
        assert!(buffer.push(2.0));
        assert!(buffer.push(3.0));
        assert!(buffer.is_full());

        // Full buffer rejects further samples
        assert!(!buffer.push(4.0));
        assert_eq!(buffer.to_vec(), vec![1.0, 2.0, 3.0]);
        assert_eq!(buffer.fill_count(), buffer.capacity());
    }

    #[test]
    fn test_shift_keeps_tail() {
        let mut buffer = SampleBuffer::new(4);
        for s in [1.0, 2.0, 3.0, 4.0] {
            buffer.push(s);
        }

        assert_eq!(buffer.shift(1), 1);
        assert_eq!(buffer.to_vec(), vec![2.0, 3.0, 4.0]);

        // Refill wraps around the ring
        buffer.push(5.0);
        assert_eq!(buffer.to_vec(), vec![2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_shift_past_end_empties() {
        let mut buffer = SampleBuffer::new(4);
        buffer.push(1.0);
        buffer.push(2.0);

        assert_eq!(buffer.shift(10), 2);
        assert_eq!(buffer.fill_count(), 0);
        assert_eq!(buffer.shift(1), 0);

        // Emptying does not shrink the ring
        assert_eq!(buffer.capacity(), 4);
    }
}
