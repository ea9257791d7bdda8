//! Timeline synchronisation
//!
//! - Clip and track placement
//! - Reference candidate selection

pub mod selection;
pub mod timeline;
