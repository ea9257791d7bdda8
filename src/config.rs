//! Configuration parameters for clip alignment

use serde::{Deserialize, Serialize};

use crate::error::AlignError;
use crate::sync::selection::SelectionPolicy;

/// Alignment configuration parameters
///
/// Both clips of a comparison must be fingerprinted with the same values;
/// fingerprints built with different window, band, bucket or peak settings
/// are not comparable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    // Spectral transform
    /// Samples per FFT window (default: 1024)
    pub window_size: usize,

    /// Samples shared by consecutive windows (default: 0)
    pub overlap: usize,

    // Grid binning
    /// Frequency bins per band (default: 512)
    pub band_height: usize,

    /// Time steps per bucket (default: 43, about one second at 44.1 kHz)
    pub bucket_width: usize,

    /// Peaks retained per grid cell (default: 7)
    pub peaks_per_cell: usize,

    // Orchestration
    /// Seconds of subject audio analysed (default: 120)
    pub subject_duration_secs: u32,

    /// Seconds of each reference clip analysed (default: 60)
    pub reference_duration_secs: u32,

    /// Which reference candidates are compared and which result wins
    /// (default: FirstMatch)
    pub policy: SelectionPolicy,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            window_size: 1024,
            overlap: 0,
            band_height: 512,
            bucket_width: 43,
            peaks_per_cell: 7,
            subject_duration_secs: 120,
            reference_duration_secs: 60,
            policy: SelectionPolicy::FirstMatch,
        }
    }
}

impl AlignmentConfig {
    /// Check that the configuration describes a usable grid
    ///
    /// # Errors
    ///
    /// Returns `AlignError::InvalidInput` for zero sizes, an odd window size,
    /// or an overlap that is not smaller than the window.
    pub fn validate(&self) -> Result<(), AlignError> {
        if self.window_size == 0 || self.window_size % 2 != 0 {
            return Err(AlignError::InvalidInput(format!(
                "Window size must be a positive even number, got {}",
                self.window_size
            )));
        }

        if self.overlap >= self.window_size {
            return Err(AlignError::InvalidInput(format!(
                "Overlap ({}) must be smaller than the window size ({})",
                self.overlap, self.window_size
            )));
        }

        if self.band_height == 0 {
            return Err(AlignError::InvalidInput("Band height must be > 0".to_string()));
        }

        if self.bucket_width == 0 {
            return Err(AlignError::InvalidInput("Bucket width must be > 0".to_string()));
        }

        if self.peaks_per_cell == 0 {
            return Err(AlignError::InvalidInput("Peaks per cell must be > 0".to_string()));
        }

        Ok(())
    }
}
