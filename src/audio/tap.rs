//! Rolling amplitude buffer feeding the waveform display

use parking_lot::Mutex;
use std::sync::Arc;

/// About two seconds of mono audio at 16 kHz
pub const DEFAULT_TAP_CAPACITY: usize = 16_000 * 2;

/// Shared rolling buffer of recent mono samples. The capture callback
/// pushes from the audio thread; the waveform takes snapshots on the
/// UI thread.
#[derive(Clone)]
pub struct AmplitudeTap {
    samples: Arc<Mutex<Vec<f32>>>,
    capacity: usize,
}

impl AmplitudeTap {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Arc::new(Mutex::new(Vec::with_capacity(capacity))),
            capacity,
        }
    }

    /// Append samples, discarding the oldest beyond capacity
    pub fn push(&self, new_samples: &[f32]) {
        let mut samples = self.samples.lock();
        samples.extend_from_slice(new_samples);
        let len = samples.len();
        if len > self.capacity {
            samples.drain(..len - self.capacity);
        }
    }

    /// Append interleaved frames, averaging channels down to mono
    pub fn push_frames(&self, data: &[f32], channels: usize) {
        if channels <= 1 {
            self.push(data);
            return;
        }
        let mono: Vec<f32> = data
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();
        self.push(&mono);
    }

    /// Copy of the current contents, oldest first
    pub fn snapshot(&self) -> Vec<f32> {
        self.samples.lock().clone()
    }

    pub fn clear(&self) {
        self.samples.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.lock().is_empty()
    }
}

impl Default for AmplitudeTap {
    fn default() -> Self {
        Self::new(DEFAULT_TAP_CAPACITY)
    }
}
