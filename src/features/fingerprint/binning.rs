//! Coarse time/frequency binning of spectral frames
//!
//! Two regroupings, neither of which loses information:
//! - frequency bands ("horizontal bins"): `band = frequency / band_height`
//! - grid cells: `(time / bucket_width, band)`
//!
//! Occupancy is sparse relative to the full plane for short clips, so both
//! are ordered maps rather than dense arrays. Ordered maps also make the
//! iteration order, and therefore the fingerprint, deterministic.

use std::collections::BTreeMap;

use crate::features::fingerprint::spectrum::SpectralFrame;

/// One spectral magnitude at a (time, frequency) position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralPoint {
    /// Rounded magnitude
    pub magnitude: f64,

    /// Frame index (window ordinal)
    pub time: usize,

    /// Frequency bin index within the frame
    pub frequency: usize,
}

/// Frequency band index -> every point of that band, across the whole clip
pub type HorizontalBins = BTreeMap<usize, Vec<SpectralPoint>>;

/// Grid cell key: `(time bucket, frequency band)`
pub type CellKey = (usize, usize);

/// Grid cell -> points inside that time/frequency rectangle
pub type GridCells = BTreeMap<CellKey, Vec<SpectralPoint>>;

/// Group every spectral magnitude by frequency band
///
/// Points are appended frame by frame, lowest frequency first, so each band
/// lists its points in arrival order.
///
/// # Arguments
///
/// * `frames` - Spectral frames in time order
/// * `band_height` - Frequency bins per band (must be > 0)
pub fn group_bands(frames: &[SpectralFrame], band_height: usize) -> HorizontalBins {
    let mut bins = HorizontalBins::new();
    if band_height == 0 {
        return bins;
    }

    for (time, frame) in frames.iter().enumerate() {
        for (frequency, &magnitude) in frame.iter().enumerate() {
            bins.entry(frequency / band_height)
                .or_default()
                .push(SpectralPoint {
                    magnitude,
                    time,
                    frequency,
                });
        }
    }

    log::debug!(
        "Grouped {} frames into {} frequency bands",
        frames.len(),
        bins.len()
    );

    bins
}

/// Split each frequency band into fixed-width time buckets
///
/// Consumes the bands; points keep their per-band arrival order inside each
/// cell.
///
/// # Arguments
///
/// * `bands` - Output of [`group_bands`]
/// * `bucket_width` - Time steps per bucket (must be > 0)
pub fn grid_cells(bands: HorizontalBins, bucket_width: usize) -> GridCells {
    let mut cells = GridCells::new();
    if bucket_width == 0 {
        return cells;
    }

    for (band, points) in bands {
        for point in points {
            cells
                .entry((point.time / bucket_width, band))
                .or_default()
                .push(point);
        }
    }

    log::debug!("Binned spectrum into {} grid cells", cells.len());

    cells
}
