//! Audio preprocessing modules
//!
//! Utilities for bringing decoded audio into the shape the fingerprinting
//! pipeline expects:
//! - Channel mixing (multi-channel to mono)

pub mod channel_mixer;
