//! # clipsync
//!
//! Audio-fingerprint alignment for multi-camera and multi-microphone
//! recordings: estimates the time offset at which one clip's audio best
//! matches another's, with no clock, slate or timecode.
//!
//! ## Features
//!
//! - **Fingerprinting**: windowed magnitude spectrum, coarse time/frequency
//!   grid, top-K peaks per grid cell
//! - **Delay estimation**: frequency-matched peak pairs vote for a time
//!   difference; the most voted one wins
//! - **Candidate selection**: first / overlapping / last / best-voted
//!   reference clip on a timeline track
//! - **Decoding**: Symphonia-based decoding to mono PCM with an on-disk WAV
//!   cache
//!
//! ## Quick Start
//!
//! ```no_run
//! use clipsync::io::decoder::decode_audio;
//! use clipsync::{estimate_delay, AlignmentConfig};
//!
//! let reference = decode_audio("camera_a.mp4")?;
//! let subject = decode_audio("camera_b.mp4")?;
//!
//! let estimate = estimate_delay(&subject, &reference, &AlignmentConfig::default())?;
//! println!("camera_b lags camera_a by {} ms ({} votes)", estimate.delay_ms, estimate.votes);
//! # Ok::<(), clipsync::AlignError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! PCM → Spectrum → Bands → Grid cells → Peaks (fingerprint)
//!                                           ↓
//!              Candidate selection ← Delay vote ← Peak matching
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;
pub mod sync;

// Re-export main types
pub use analysis::compare_fingerprints;
pub use analysis::result::{AlignmentResult, DelayEstimate};
pub use config::AlignmentConfig;
pub use error::AlignError;
pub use features::fingerprint::{fingerprint_samples, Fingerprint};
pub use io::sample_buffer::SampleBuffer;
pub use sync::selection::{align_clip, ClipAudioSource, SelectionPolicy};
pub use sync::timeline::{Clip, Track};

/// Estimate the delay of one clip relative to another
///
/// Fingerprints the first `config.subject_duration_secs` of `subject` and
/// the first `config.reference_duration_secs` of `reference`, matches their
/// peaks and returns the most voted time difference.
///
/// # Arguments
///
/// * `subject` - Clip being positioned
/// * `reference` - Clip it is aligned against (same sample rate)
/// * `config` - Pipeline sizes and duration caps
///
/// # Returns
///
/// `DelayEstimate` whose `delay_ms` is positive when the subject lags the
/// reference
///
/// # Errors
///
/// - `AlignError::InvalidInput` for a zero or mismatched sample rate, or an
///   invalid configuration
/// - `AlignError::InsufficientData` when either clip is shorter than one
///   window or the clips share no spectral peak
///
/// # Example
///
/// ```
/// use clipsync::{estimate_delay, AlignmentConfig, SampleBuffer};
///
/// let noise: Vec<i16> = (0..44100 * 3u32)
///     .map(|i| (i.wrapping_mul(2_654_435_761) >> 20) as i16)
///     .collect();
/// let clip = SampleBuffer::new(noise, 44100);
///
/// let estimate = estimate_delay(&clip, &clip, &AlignmentConfig::default())?;
/// assert_eq!(estimate.delta_steps, 0);
/// # Ok::<(), clipsync::AlignError>(())
/// ```
pub fn estimate_delay(
    subject: &SampleBuffer,
    reference: &SampleBuffer,
    config: &AlignmentConfig,
) -> Result<DelayEstimate, AlignError> {
    if subject.sample_rate() == 0 || reference.sample_rate() == 0 {
        return Err(AlignError::InvalidInput(
            "Sample rate must be > 0".to_string(),
        ));
    }

    if subject.sample_rate() != reference.sample_rate() {
        return Err(AlignError::InvalidInput(format!(
            "Sample rates differ: subject {} Hz, reference {} Hz",
            subject.sample_rate(),
            reference.sample_rate()
        )));
    }

    log::debug!(
        "Estimating delay: subject {} samples, reference {} samples at {} Hz",
        subject.len(),
        reference.len(),
        subject.sample_rate()
    );

    let subject_fp = fingerprint_samples(subject.head(config.subject_duration_secs), config)?;
    let reference_fp = fingerprint_samples(reference.head(config.reference_duration_secs), config)?;

    compare_fingerprints(&subject_fp, &reference_fp, subject.sample_rate(), config)
}
