//! Spectral-peak fingerprints
//!
//! A fingerprint is the compact, comparable representation of a clip:
//! - Windowed magnitude spectrum ([`spectrum`])
//! - Band grouping and time/frequency grid ([`binning`])
//! - Top-K peaks per grid cell ([`peaks`])

pub mod binning;
pub mod peaks;
pub mod spectrum;

use std::collections::BTreeMap;

use crate::config::AlignmentConfig;
use crate::error::AlignError;

/// Sparse map from frequency-index to the time-indices where it peaked
///
/// A frequency may list the same time more than once, and lists keep the
/// order in which peaks were extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fingerprint {
    peaks: BTreeMap<usize, Vec<usize>>,
}

impl Fingerprint {
    /// Create an empty fingerprint
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a peak of `frequency` at `time`
    pub fn insert(&mut self, frequency: usize, time: usize) {
        self.peaks.entry(frequency).or_default().push(time);
    }

    /// Time-indices at which `frequency` peaked
    pub fn times(&self, frequency: usize) -> Option<&[usize]> {
        self.peaks.get(&frequency).map(Vec::as_slice)
    }

    /// `(frequency, times)` entries in ascending frequency order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        self.peaks.iter().map(|(&f, times)| (f, times.as_slice()))
    }

    /// Number of distinct frequencies
    pub fn frequency_count(&self) -> usize {
        self.peaks.len()
    }

    /// Total number of recorded peaks
    pub fn peak_count(&self) -> usize {
        self.peaks.values().map(Vec::len).sum()
    }

    /// Whether no peak was recorded
    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }
}

/// Fingerprint a mono PCM slice
///
/// Runs the spectrum, binning and peak stages with the sizes in `config`.
/// Fewer samples than one window produce an empty fingerprint.
///
/// # Errors
///
/// Returns `AlignError::InvalidInput` if `config` fails validation
///
/// # Example
///
/// ```
/// use clipsync::{fingerprint_samples, AlignmentConfig};
///
/// let samples: Vec<i16> = (0..44100).map(|i| ((i * 31) % 4000) as i16 - 2000).collect();
/// let fp = fingerprint_samples(&samples, &AlignmentConfig::default())?;
/// assert!(!fp.is_empty());
/// # Ok::<(), clipsync::AlignError>(())
/// ```
pub fn fingerprint_samples(
    samples: &[i16],
    config: &AlignmentConfig,
) -> Result<Fingerprint, AlignError> {
    config.validate()?;

    let frames = spectrum::spectral_frames(samples, config.window_size, config.overlap)?;
    let bands = binning::group_bands(&frames, config.band_height);
    drop(frames);
    let cells = binning::grid_cells(bands, config.bucket_width);

    Ok(peaks::extract_peaks(&cells, config.peaks_per_cell))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_accessors() {
        let mut fp = Fingerprint::new();
        assert!(fp.is_empty());

        fp.insert(40, 3);
        fp.insert(12, 7);
        fp.insert(40, 3);

        assert_eq!(fp.frequency_count(), 2);
        assert_eq!(fp.peak_count(), 3);
        assert_eq!(fp.times(40), Some(&[3, 3][..]));
        assert_eq!(fp.times(99), None);

        let freqs: Vec<usize> = fp.iter().map(|(f, _)| f).collect();
        assert_eq!(freqs, vec![12, 40]);
    }

    #[test]
    fn test_short_input_gives_empty_fingerprint() {
        let fp = fingerprint_samples(&[1, 2, 3], &AlignmentConfig::default()).unwrap();
        assert!(fp.is_empty());
    }

    #[test]
    fn test_peaks_bounded_per_cell() {
        // 2 buckets x 1 band with default sizes: at most 2 * 7 peaks
        let samples: Vec<i16> = (0..1024 * 60).map(|i| ((i * 7919) % 3001) as i16 - 1500).collect();
        let fp = fingerprint_samples(&samples, &AlignmentConfig::default()).unwrap();
        assert!(fp.peak_count() <= 14);
        assert!(fp.peak_count() > 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AlignmentConfig {
            bucket_width: 0,
            ..AlignmentConfig::default()
        };
        assert!(fingerprint_samples(&[0; 4096], &config).is_err());
    }
}
