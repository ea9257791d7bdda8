//! Mono PCM sample buffers and full-window iteration

/// Mono 16-bit PCM audio with its sample rate
///
/// Immutable once read; the pipeline only ever borrows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleBuffer {
    /// Signed amplitudes, one per sample
    samples: Vec<i16>,
    /// Sample rate in Hz
    sample_rate: u32,
}

impl SampleBuffer {
    /// Create a new sample buffer
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// All samples
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds (0.0 for a zero sample rate)
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Leading `seconds` of audio, or the whole buffer if it is shorter
    pub fn head(&self, seconds: u32) -> &[i16] {
        let limit = (seconds as usize).saturating_mul(self.sample_rate as usize);
        &self.samples[..limit.min(self.samples.len())]
    }
}

/// Iterator over full-length windows of a sample slice
///
/// Windows start at `0, step, 2 * step, ...`; a trailing window shorter than
/// `size` is never yielded.
#[derive(Debug, Clone)]
pub struct Windows<'a> {
    data: &'a [i16],
    size: usize,
    step: usize,
    position: usize,
}

impl<'a> Iterator for Windows<'a> {
    type Item = &'a [i16];

    fn next(&mut self) -> Option<Self::Item> {
        if self.size == 0 || self.step == 0 {
            return None;
        }

        if self.position + self.size > self.data.len() {
            return None;
        }

        let window = &self.data[self.position..self.position + self.size];
        self.position += self.step;
        Some(window)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = full_window_count(self.data.len().saturating_sub(self.position), self.size, self.step);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Windows<'_> {}

/// Iterate over the full windows of `data`
///
/// A zero `size` or `step` yields nothing.
pub fn windows(data: &[i16], size: usize, step: usize) -> Windows<'_> {
    Windows {
        data,
        size,
        step,
        position: 0,
    }
}

/// Number of full windows of `size` samples, `step` apart, in `len` samples
pub fn full_window_count(len: usize, size: usize, step: usize) -> usize {
    if size == 0 || step == 0 || len < size {
        return 0;
    }
    (len - size) / step + 1
}
