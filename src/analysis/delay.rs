//! Histogram voting over matched peak time differences
//!
//! Every matched pair votes for `subject time - reference time`; the most
//! voted delta is the delay estimate. When several deltas share the top
//! count, the one met *last* in first-insertion order wins. This ordering
//! dependence is part of the estimator's definition, so the mode is taken by
//! an explicit scan instead of a library max.

use std::collections::HashMap;

use crate::analysis::matching::TimePair;
use crate::analysis::result::DelayEstimate;
use crate::error::AlignError;

/// Vote counts per delta, remembering the order deltas first appeared
#[derive(Debug, Clone, Default)]
pub struct DelayHistogram {
    counts: Vec<(i64, u32)>,
    index: HashMap<i64, usize>,
}

impl DelayHistogram {
    /// Create an empty histogram
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a histogram from matched pairs
    pub fn from_pairs(pairs: &[TimePair]) -> Self {
        let mut histogram = Self::new();
        for &(subject, reference) in pairs {
            histogram.add(subject as i64 - reference as i64);
        }
        histogram
    }

    /// Count one vote for `delta`
    pub fn add(&mut self, delta: i64) {
        match self.index.get(&delta) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.index.insert(delta, self.counts.len());
                self.counts.push((delta, 1));
            }
        }
    }

    /// Votes for `delta`
    pub fn count(&self, delta: i64) -> u32 {
        self.index
            .get(&delta)
            .map(|&slot| self.counts[slot].1)
            .unwrap_or(0)
    }

    /// Number of distinct deltas
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no vote was cast
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `(delta, votes)` entries in first-insertion order
    pub fn entries(&self) -> &[(i64, u32)] {
        &self.counts
    }

    /// Most voted delta and its count, last one wins on ties
    ///
    /// Returns `None` for an empty histogram.
    pub fn mode(&self) -> Option<(i64, u32)> {
        let mut best: Option<(i64, u32)> = None;
        for &(delta, count) in &self.counts {
            match best {
                Some((_, best_count)) if count < best_count => {}
                _ => best = Some((delta, count)),
            }
        }
        best
    }
}

/// Estimate the delay between two clips from their matched peaks
///
/// # Arguments
///
/// * `pairs` - Output of [`match_peaks`](super::matching::match_peaks)
/// * `sample_rate` - Sample rate shared by both clips, in Hz
/// * `window_size` - FFT window size `W` the fingerprints were built with
///
/// # Errors
///
/// Returns `AlignError::InsufficientData` when there is nothing to vote on,
/// and `AlignError::InvalidInput` for a zero sample rate or window size.
pub fn vote_delay(
    pairs: &[TimePair],
    sample_rate: u32,
    window_size: usize,
) -> Result<DelayEstimate, AlignError> {
    let histogram = DelayHistogram::from_pairs(pairs);

    let (delta_steps, votes) = histogram.mode().ok_or_else(|| {
        AlignError::InsufficientData("No matching peaks between subject and reference".to_string())
    })?;
    let delay_ms = steps_to_millis(delta_steps, sample_rate, window_size)?;

    log::debug!(
        "Delay vote: {} distinct deltas, winner {} steps ({} ms) with {} votes",
        histogram.len(),
        delta_steps,
        delay_ms,
        votes
    );

    Ok(DelayEstimate {
        delta_steps,
        votes,
        delay_ms,
    })
}

/// Convert a delay in window steps to whole milliseconds
///
/// One step counts as `window_size / sample_rate` seconds, whatever the
/// overlap. The delay in seconds is rounded to 4 decimals, then scaled to
/// milliseconds and truncated toward zero. The arithmetic is done in integer
/// tenths of a millisecond so exact values never lose a unit to float error.
///
/// # Errors
///
/// Returns `AlignError::InvalidInput` for a zero sample rate or window size
///
/// # Example
///
/// ```
/// use clipsync::analysis::delay::steps_to_millis;
///
/// // 2 steps of 1024 samples at 44.1 kHz = 0.046439... s -> 0.0464 s -> 46 ms
/// assert_eq!(steps_to_millis(2, 44100, 1024)?, 46);
/// assert_eq!(steps_to_millis(-2, 44100, 1024)?, -46);
/// # Ok::<(), clipsync::AlignError>(())
/// ```
pub fn steps_to_millis(delta_steps: i64, sample_rate: u32, window_size: usize) -> Result<i64, AlignError> {
    if sample_rate == 0 {
        return Err(AlignError::InvalidInput(
            "Sample rate must be > 0".to_string(),
        ));
    }

    if window_size == 0 {
        return Err(AlignError::InvalidInput(
            "Window size must be > 0".to_string(),
        ));
    }

    let seconds = delta_steps as f64 * window_size as f64 / sample_rate as f64;
    let tenths_of_ms = (seconds * 10_000.0).round() as i64;

    Ok(tenths_of_ms / 10)
}
