//! Feature extraction modules
//!
//! - Spectral-peak fingerprinting (spectrum, grid binning, peak extraction)

pub mod fingerprint;
