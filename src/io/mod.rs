//! Audio I/O modules
//!
//! Audio decoding (Symphonia), WAV caching (hound) and sample buffering.

pub mod cache;
pub mod decoder;
pub mod sample_buffer;
