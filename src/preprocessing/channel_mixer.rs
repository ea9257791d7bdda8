//! Channel mixing utilities (multi-channel to mono conversion)

use crate::error::AlignError;

/// Average interleaved channels into mono
///
/// # Arguments
///
/// * `samples` - Interleaved samples (`L R L R ...` for stereo)
/// * `channels` - Number of interleaved channels
///
/// # Returns
///
/// Mono samples, one per complete frame; a trailing partial frame is dropped
///
/// # Errors
///
/// Returns `AlignError::InvalidInput` if `channels` is zero
pub fn downmix_interleaved(samples: &[i16], channels: usize) -> Result<Vec<i16>, AlignError> {
    if channels == 0 {
        return Err(AlignError::InvalidInput(
            "Channel count must be > 0".to_string(),
        ));
    }

    if channels == 1 {
        return Ok(samples.to_vec());
    }

    log::debug!(
        "Down-mixing {} interleaved samples from {} channels",
        samples.len(),
        channels
    );

    Ok(samples
        .chunks_exact(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect())
}
