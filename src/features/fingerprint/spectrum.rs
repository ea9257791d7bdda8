//! Windowed magnitude spectrum
//!
//! Slices a PCM buffer into full-length windows and computes the magnitude of
//! the positive-frequency half of each window's DFT.
//!
//! # Algorithm
//!
//! 1. Window starts at `0, W - O, 2(W - O), ...` while a full window remains
//! 2. DFT of the raw window (no Hann or other taper)
//! 3. `|X[k]| = sqrt(re² + im²)` for `k < W / 2`, rounded to 2 decimals
//!
//! Rounding coarsens floating-point noise so equal magnitudes compare equal
//! and peak ties resolve the same way on every platform.
//!
//! # Example
//!
//! ```
//! use clipsync::features::fingerprint::spectrum::spectral_frames;
//!
//! let samples = vec![0i16; 4096];
//! let frames = spectral_frames(&samples, 1024, 0)?;
//! assert_eq!(frames.len(), 4);
//! assert_eq!(frames[0].len(), 512);
//! # Ok::<(), clipsync::AlignError>(())
//! ```

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::AlignError;
use crate::io::sample_buffer::{full_window_count, windows};

/// Magnitudes of one window, `window_size / 2` values
pub type SpectralFrame = Vec<f64>;

/// Compute one spectral frame per full window
///
/// # Arguments
///
/// * `samples` - Mono PCM samples
/// * `window_size` - Samples per window (W, must be even and > 0)
/// * `overlap` - Samples shared by consecutive windows (O, must be < W)
///
/// # Returns
///
/// Frames in time order; frame `t` is time-index `t`. A trailing partial
/// window is dropped, so fewer than `window_size` samples yield no frames.
///
/// # Errors
///
/// Returns `AlignError::InvalidInput` for an unusable window/overlap pair
pub fn spectral_frames(
    samples: &[i16],
    window_size: usize,
    overlap: usize,
) -> Result<Vec<SpectralFrame>, AlignError> {
    if window_size == 0 || window_size % 2 != 0 {
        return Err(AlignError::InvalidInput(format!(
            "Window size must be a positive even number, got {}",
            window_size
        )));
    }

    if overlap >= window_size {
        return Err(AlignError::InvalidInput(format!(
            "Overlap ({}) must be smaller than the window size ({})",
            overlap, window_size
        )));
    }

    let step = window_size - overlap;
    let frame_count = full_window_count(samples.len(), window_size, step);

    log::debug!(
        "Computing {} spectral frames: {} samples, window={}, overlap={}",
        frame_count,
        samples.len(),
        window_size,
        overlap
    );

    if frame_count == 0 {
        return Ok(Vec::new());
    }

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(window_size);
    let mut scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];
    let mut buffer: Vec<Complex<f64>> = Vec::with_capacity(window_size);

    let mut frames = Vec::with_capacity(frame_count);
    for window in windows(samples, window_size, step) {
        buffer.clear();
        buffer.extend(window.iter().map(|&s| Complex::new(s as f64, 0.0)));
        fft.process_with_scratch(&mut buffer, &mut scratch);

        frames.push(
            buffer[..window_size / 2]
                .iter()
                .map(|c| round_magnitude((c.re * c.re + c.im * c.im).sqrt()))
                .collect(),
        );
    }

    Ok(frames)
}

/// Round a magnitude to 2 decimal digits
fn round_magnitude(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count_and_length() {
        let samples = vec![1i16; 1024 * 3 + 500];
        let frames = spectral_frames(&samples, 1024, 0).unwrap();
        assert_eq!(frames.len(), 3);
        assert!(frames.iter().all(|f| f.len() == 512));
    }

    #[test]
    fn test_overlap_adds_frames() {
        let samples = vec![1i16; 4096];
        let frames = spectral_frames(&samples, 1024, 512).unwrap();
        // Starts at 0, 512, ..., 3072
        assert_eq!(frames.len(), 7);
    }

    #[test]
    fn test_short_buffer_yields_nothing() {
        let samples = vec![100i16; 1023];
        assert!(spectral_frames(&samples, 1024, 0).unwrap().is_empty());
        assert!(spectral_frames(&[], 1024, 0).unwrap().is_empty());
    }

    #[test]
    fn test_dc_signal() {
        // Constant input puts all energy in bin 0: |X[0]| = N * amplitude
        let samples = vec![2i16; 64];
        let frames = spectral_frames(&samples, 64, 0).unwrap();
        assert_eq!(frames[0][0], 128.0);
        assert!(frames[0][1..].iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_pure_tone_peaks_at_its_bin() {
        // 8 cycles per 256-sample window lands exactly on bin 8
        let samples: Vec<i16> = (0..256)
            .map(|i| ((i as f64 * 8.0 * 2.0 * std::f64::consts::PI / 256.0).sin() * 1000.0) as i16)
            .collect();
        let frames = spectral_frames(&samples, 256, 0).unwrap();
        let peak = frames[0]
            .iter()
            .enumerate()
            .fold((0, 0.0), |best, (i, &m)| if m > best.1 { (i, m) } else { best });
        assert_eq!(peak.0, 8);
    }

    #[test]
    fn test_magnitudes_rounded() {
        let samples: Vec<i16> = (0..128).map(|i| (i * 7 % 13) as i16).collect();
        let frames = spectral_frames(&samples, 128, 0).unwrap();
        for &m in &frames[0] {
            assert!(((m * 100.0).round() - m * 100.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_invalid_params() {
        let samples = vec![0i16; 2048];
        assert!(spectral_frames(&samples, 0, 0).is_err());
        assert!(spectral_frames(&samples, 1023, 0).is_err());
        assert!(spectral_frames(&samples, 1024, 1024).is_err());
    }
}
