//! Example: Align a subject recording against one or more reference recordings
//!
//! Usage:
//!   cargo run --release --example align_clips -- [--policy first|overlap|last|best]
//!       [--config cfg.json] [--cache DIR] [--json] <subject> <reference1> [<reference2> ...]
//!
//! The references are laid end to end on one track (1 ms apart), the subject
//! is placed at 0 on its own track, and the shift that aligns the subject is
//! printed.

use clipsync::io::cache::AudioCache;
use clipsync::{align_clip, AlignmentConfig, Clip, ClipAudioSource, SelectionPolicy, Track};
use std::env;
use std::path::{Path, PathBuf};

fn clip_for(cache: &AudioCache, path: &str, track: &mut Track) -> Result<Clip, Box<dyn std::error::Error>> {
    let audio = cache.load(Path::new(path))?;
    let duration_ms = (audio.duration_seconds() * 1000.0).round() as i64;

    let placed = track.append(path, duration_ms).clone();
    Ok(placed.with_path(path))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut json = false;
    let mut policy: Option<SelectionPolicy> = None;
    let mut config_path: Option<String> = None;
    let mut cache_dir: Option<PathBuf> = None;
    let mut paths: Vec<String> = Vec::new();

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--policy" => {
                let v = args.first().ok_or("--policy requires a value")?.parse()?;
                args.remove(0);
                policy = Some(v);
            }
            "--config" => {
                config_path = Some(args.first().ok_or("--config requires a path")?.clone());
                args.remove(0);
            }
            "--cache" => {
                cache_dir = Some(PathBuf::from(args.first().ok_or("--cache requires a directory")?));
                args.remove(0);
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: align_clips [--policy first|overlap|last|best] [--config cfg.json] \
                     [--cache DIR] [--json] <subject> <reference>...\n\
                     \n\
                     --policy P     Candidate selection policy (default: first)\n\
                     --config FILE  JSON alignment configuration (missing keys use defaults)\n\
                     --cache DIR    Decoded-audio cache directory (default: system temp dir)\n\
                     --json         Emit the result as JSON\n"
                );
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    if paths.len() < 2 {
        eprintln!("ERROR: Provide a subject and at least one reference file. Use --help for usage.");
        std::process::exit(2);
    }

    let mut config = match &config_path {
        Some(p) => serde_json::from_str::<AlignmentConfig>(&std::fs::read_to_string(p)?)?,
        None => AlignmentConfig::default(),
    };
    if let Some(p) = policy {
        config.policy = p;
    }
    config.validate()?;

    let cache = AudioCache::new(cache_dir.unwrap_or_else(|| env::temp_dir().join("clipsync-cache")))?;

    let mut subject_track = Track::default();
    let subject = clip_for(&cache, &paths[0], &mut subject_track)?;

    let mut reference_track = Track::default();
    let mut candidates = Vec::new();
    for path in &paths[1..] {
        candidates.push(clip_for(&cache, path, &mut reference_track)?);
    }

    eprintln!(
        "Aligning {} against {} reference(s), policy={}",
        subject.id,
        candidates.len(),
        config.policy
    );

    // Loading goes through the trait so every clip hits the cache
    let source: &(dyn ClipAudioSource + Sync) = &cache;
    let result = align_clip(&subject, &candidates, &config, source)?;

    let aligned = Clip::new(
        subject.id.clone(),
        result.aligned_start_ms(subject.start_ms),
        subject.duration_ms(),
    );
    let overlaps_reference = reference_track
        .position(&result.reference_id)
        .map(|i| aligned.overlaps(&reference_track.clips()[i]))
        .unwrap_or(false);
    if !overlaps_reference {
        log::warn!("{} lands outside {} once shifted", subject.id, result.reference_id);
    }

    if json {
        println!("{}", serde_json::to_string(&result)?);
    } else {
        println!(
            "{}: delay {} ms vs {} ({} votes), shift {} ms -> starts at {} ms",
            subject.id,
            result.estimate.delay_ms,
            result.reference_id,
            result.estimate.votes,
            result.shift_ms,
            result.aligned_start_ms(subject.start_ms)
        );
    }

    Ok(())
}
