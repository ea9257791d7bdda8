//! Clip placement on a timeline track
//!
//! Only what alignment needs: where each clip sits, and whether a computed
//! shift can be applied without breaking the track's ordering.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AlignError;

/// A recording placed on the timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clip {
    /// Identifier reported back in alignment results
    pub id: String,

    /// Media file holding the clip's audio, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Timeline position of the first sample, in ms
    pub start_ms: i64,

    /// Timeline position just past the last sample, in ms
    pub end_ms: i64,
}

impl Clip {
    /// Create a clip spanning `duration_ms` from `start_ms`
    pub fn new(id: impl Into<String>, start_ms: i64, duration_ms: i64) -> Self {
        Self {
            id: id.into(),
            path: None,
            start_ms,
            end_ms: start_ms + duration_ms,
        }
    }

    /// Attach the media file holding this clip's audio
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Media file path, if set
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Length on the timeline, in ms
    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }

    /// Whether the two clips share any timeline position
    pub fn overlaps(&self, other: &Clip) -> bool {
        self.start_ms < other.end_ms && other.start_ms < self.end_ms
    }
}

/// Ordered, non-overlapping sequence of clips
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    clips: Vec<Clip>,
}

impl Track {
    /// Build a track, ordering the clips by start position
    pub fn new(mut clips: Vec<Clip>) -> Self {
        clips.sort_by_key(|c| c.start_ms);
        Self { clips }
    }

    /// Clips in start order
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Position of the clip with `id`
    pub fn position(&self, id: &str) -> Option<usize> {
        self.clips.iter().position(|c| c.id == id)
    }

    /// End of the last clip, 0 for an empty track
    pub fn end_ms(&self) -> i64 {
        self.clips.iter().map(|c| c.end_ms).max().unwrap_or(0)
    }

    /// Append a clip right after the current end of the track
    ///
    /// A 1 ms gap keeps the new clip from touching its predecessor.
    pub fn append(&mut self, id: impl Into<String>, duration_ms: i64) -> &Clip {
        let start = if self.clips.is_empty() { 0 } else { self.end_ms() + 1 };
        self.clips.push(Clip::new(id, start, duration_ms));
        &self.clips[self.clips.len() - 1]
    }

    /// Move the clip at `index` by `shift_ms`
    ///
    /// # Errors
    ///
    /// Returns `AlignError::InvalidInput` if the index is out of range, if the
    /// first clip would start before 0, or if any other clip would start at
    /// or before the end of its predecessor. The track is left unchanged.
    pub fn shift_clip(&mut self, index: usize, shift_ms: i64) -> Result<&Clip, AlignError> {
        let clip = self.clips.get(index).ok_or_else(|| {
            AlignError::InvalidInput(format!("No clip at position {}", index))
        })?;
        let new_start = clip.start_ms + shift_ms;

        if index == 0 && new_start < 0 {
            return Err(AlignError::InvalidInput(format!(
                "Clip {} would start before the timeline ({} ms)",
                clip.id, new_start
            )));
        }

        if index > 0 && new_start <= self.clips[index - 1].end_ms {
            return Err(AlignError::InvalidInput(format!(
                "Clip {} would overlap {} ({} ms <= {} ms)",
                clip.id,
                self.clips[index - 1].id,
                new_start,
                self.clips[index - 1].end_ms
            )));
        }

        let clip = &mut self.clips[index];
        clip.start_ms += shift_ms;
        clip.end_ms += shift_ms;
        log::debug!("Shifted clip {} by {} ms to {} ms", clip.id, shift_ms, clip.start_ms);

        Ok(&self.clips[index])
    }
}
