//! Per-cell peak extraction
//!
//! Keeps the strongest few points of every grid cell with an incremental
//! insert-or-evict-min working set. The result is deliberately an
//! approximate top-K: the outcome depends on arrival order when magnitudes
//! tie, and that order is part of the fingerprint definition.
//!
//! # Algorithm
//!
//! For each point of a cell, in arrival order:
//! 1. Admit it if the set holds fewer than K points, or if its magnitude is
//!    strictly greater than the current minimum
//! 2. If the set now holds K + 1 points, evict one minimum-magnitude point
//!    (the earliest admitted one among equal minima)
//!
//! Retained points then contribute `frequency -> time` entries to the
//! fingerprint.

use crate::features::fingerprint::binning::{GridCells, SpectralPoint};
use crate::features::fingerprint::Fingerprint;

/// Bounded working set of the strongest points seen so far
#[derive(Debug, Clone)]
pub struct TopK {
    capacity: usize,
    entries: Vec<SpectralPoint>,
}

impl TopK {
    /// Create an empty working set holding at most `capacity` points
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity + 1),
        }
    }

    /// Offer a point to the set
    ///
    /// Returns `true` if the point was admitted. A point equal to the current
    /// minimum is turned away from a full set, so the earlier of two tied
    /// points stays until something strictly stronger arrives.
    pub fn offer(&mut self, point: SpectralPoint) -> bool {
        if self.capacity == 0 {
            return false;
        }

        let admit = match self.min_magnitude() {
            Some(min) => self.entries.len() < self.capacity || point.magnitude > min,
            None => true,
        };
        if !admit {
            return false;
        }

        self.entries.push(point);
        if self.entries.len() > self.capacity {
            self.evict_min();
        }
        true
    }

    /// Smallest retained magnitude
    pub fn min_magnitude(&self) -> Option<f64> {
        self.entries
            .iter()
            .map(|p| p.magnitude)
            .fold(None, |min, m| match min {
                Some(current) if current <= m => Some(current),
                _ => Some(m),
            })
    }

    /// Number of retained points
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been retained
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Retained points in admission order
    pub fn entries(&self) -> &[SpectralPoint] {
        &self.entries
    }

    /// Consume the set, returning retained points in admission order
    pub fn into_entries(self) -> Vec<SpectralPoint> {
        self.entries
    }

    fn evict_min(&mut self) {
        // Strict `<`: the oldest of equal minima goes
        let mut victim = 0;
        for (i, p) in self.entries.iter().enumerate().skip(1) {
            if p.magnitude < self.entries[victim].magnitude {
                victim = i;
            }
        }
        self.entries.remove(victim);
    }
}

/// Strongest points of one cell, at most `peaks_per_cell`
pub fn cell_peaks(points: &[SpectralPoint], peaks_per_cell: usize) -> Vec<SpectralPoint> {
    let mut top = TopK::new(peaks_per_cell);
    for &point in points {
        top.offer(point);
    }
    top.into_entries()
}

/// Build a fingerprint from the peaks of every grid cell
///
/// Cells are visited in ascending `(bucket, band)` order and each retained
/// point appends its time-index to the list of its frequency-index.
///
/// # Arguments
///
/// * `cells` - Output of [`grid_cells`](super::binning::grid_cells)
/// * `peaks_per_cell` - K, the number of points kept per cell
pub fn extract_peaks(cells: &GridCells, peaks_per_cell: usize) -> Fingerprint {
    let mut fingerprint = Fingerprint::new();

    for points in cells.values() {
        for peak in cell_peaks(points, peaks_per_cell) {
            fingerprint.insert(peak.frequency, peak.time);
        }
    }

    log::debug!(
        "Extracted {} peaks over {} frequencies from {} cells",
        fingerprint.peak_count(),
        fingerprint.frequency_count(),
        cells.len()
    );

    fingerprint
}
