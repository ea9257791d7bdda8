//! On-disk cache of decoded mono audio
//!
//! Decoding a camera recording is the slow, I/O-bound part of an alignment
//! run. Decoded audio is stored as 16-bit mono WAV under a key derived from
//! the source's size and name, so aligning against the same source again
//! skips the decoder.

use std::path::{Path, PathBuf};

use crate::error::AlignError;
use crate::io::decoder::{decode_audio, read_wav, write_wav};
use crate::io::sample_buffer::SampleBuffer;

/// Directory-backed cache of decoded audio
#[derive(Debug, Clone)]
pub struct AudioCache {
    dir: PathBuf,
}

impl AudioCache {
    /// Use `dir` as the cache directory, creating it if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, AlignError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Location of the cached WAV for `source`
    pub fn entry_path(&self, source: &Path) -> Result<PathBuf, AlignError> {
        Ok(self.dir.join(format!("{}.wav", cache_key(source)?)))
    }

    /// Whether `source` already has a cached decode
    pub fn contains(&self, source: &Path) -> bool {
        self.entry_path(source).map(|p| p.exists()).unwrap_or(false)
    }

    /// Decoded mono audio of `source`, decoding and storing it on a miss
    pub fn load(&self, source: &Path) -> Result<SampleBuffer, AlignError> {
        let entry = self.entry_path(source)?;

        if entry.exists() {
            log::debug!(
                "Cache hit for {} ({})",
                source.display(),
                entry.display()
            );
            return read_wav(&entry);
        }

        let buffer = decode_audio(source)?;
        write_wav(&entry, &buffer)?;
        log::debug!("Cached decoded audio of {} at {}", source.display(), entry.display());

        Ok(buffer)
    }
}

/// Content-derived cache key: `"<size in bytes>_<file stem>"`
///
/// Two files with the same name but different sizes get different keys.
pub fn cache_key(source: &Path) -> Result<String, AlignError> {
    let size = std::fs::metadata(source)?.len();
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            AlignError::InvalidInput(format!("No usable file name in {}", source.display()))
        })?;

    Ok(format!("{}_{}", size, stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_source(path: &Path, len: usize) {
        let samples: Vec<i16> = (0..len).map(|i| ((i * 37) % 2000) as i16 - 1000).collect();
        write_wav(path, &SampleBuffer::new(samples, 16000)).unwrap();
    }

    #[test]
    fn test_cache_key_uses_size_and_stem() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("camera_a.wav");
        write_source(&source, 100);

        let size = std::fs::metadata(&source).unwrap().len();
        assert_eq!(cache_key(&source).unwrap(), format!("{}_camera_a", size));
    }

    #[test]
    fn test_cache_miss_then_hit() {
        let src_dir = tempfile::tempdir().unwrap();
        let cache_dir = tempfile::tempdir().unwrap();
        let source = src_dir.path().join("take1.wav");
        write_source(&source, 1600);

        let cache = AudioCache::new(cache_dir.path()).unwrap();
        assert!(!cache.contains(&source));

        let first = cache.load(&source).unwrap();
        assert!(cache.contains(&source));

        // The cached entry is still readable once the source is gone
        let entry = cache.entry_path(&source).unwrap();
        std::fs::remove_file(&source).unwrap();
        let second = read_wav(&entry).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1600);
    }

    #[test]
    fn test_cache_missing_source() {
        let cache_dir = tempfile::tempdir().unwrap();
        let cache = AudioCache::new(cache_dir.path()).unwrap();
        assert!(cache.load(Path::new("/no/such/clip.mp4")).is_err());
    }
}
