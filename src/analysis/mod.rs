//! Fingerprint comparison and result types
//!
//! - Peak matching by shared frequency
//! - Delay histogram voting
//! - Result types

pub mod delay;
pub mod matching;
pub mod result;

use crate::config::AlignmentConfig;
use crate::error::AlignError;
use crate::features::fingerprint::Fingerprint;

use self::delay::vote_delay;
use self::matching::match_peaks;
use self::result::DelayEstimate;

/// Estimate the delay of `subject` relative to `reference`
///
/// Both fingerprints must come from audio at `sample_rate`, built with the
/// same `config`.
///
/// # Errors
///
/// Returns `AlignError::InsufficientData` if either fingerprint is empty or
/// they share no frequency, and `AlignError::InvalidInput` for a zero sample
/// rate.
pub fn compare_fingerprints(
    subject: &Fingerprint,
    reference: &Fingerprint,
    sample_rate: u32,
    config: &AlignmentConfig,
) -> Result<DelayEstimate, AlignError> {
    if sample_rate == 0 {
        return Err(AlignError::InvalidInput(
            "Sample rate must be > 0".to_string(),
        ));
    }

    if subject.is_empty() {
        return Err(AlignError::InsufficientData(format!(
            "Subject audio is shorter than one {}-sample window",
            config.window_size
        )));
    }

    if reference.is_empty() {
        return Err(AlignError::InsufficientData(format!(
            "Reference audio is shorter than one {}-sample window",
            config.window_size
        )));
    }

    let pairs = match_peaks(subject, reference);
    vote_delay(&pairs, sample_rate, config.window_size)
}
