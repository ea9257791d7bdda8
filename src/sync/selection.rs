//! Reference candidate selection
//!
//! Aligns one subject clip against the clips of another track. Which
//! candidates are compared, and whose estimate wins, is set by a
//! [`SelectionPolicy`]:
//!
//! | Policy            | Candidates compared                      | Winner              |
//! |-------------------|------------------------------------------|---------------------|
//! | `FirstMatch`      | in order, until one yields an estimate   | that one            |
//! | `OverlappingOnly` | those starting before the subject ends   | last successful     |
//! | `LastMatch`       | all eligible                             | last successful     |
//! | `BestVotes`       | all eligible                             | most delay votes    |
//!
//! Candidates ending before the subject starts are never compared.
//!
//! Policies that compare every eligible candidate run the comparisons on the
//! rayon pool, one task per candidate, and reduce the results in candidate
//! order, so the outcome matches a sequential scan.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::compare_fingerprints;
use crate::analysis::result::{AlignmentResult, DelayEstimate};
use crate::config::AlignmentConfig;
use crate::error::AlignError;
use crate::features::fingerprint::fingerprint_samples;
use crate::io::cache::AudioCache;
use crate::io::sample_buffer::SampleBuffer;
use crate::sync::timeline::Clip;

/// Candidate selection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Stop at the first candidate that yields an estimate
    #[default]
    FirstMatch,
    /// Only compare candidates starting no later than the subject's end;
    /// the last successful one wins
    OverlappingOnly,
    /// Compare every eligible candidate; the last successful one wins
    LastMatch,
    /// Compare every eligible candidate; the estimate with the most votes wins
    BestVotes,
}

impl SelectionPolicy {
    /// Short name used on command lines
    pub fn name(&self) -> &'static str {
        match self {
            SelectionPolicy::FirstMatch => "first",
            SelectionPolicy::OverlappingOnly => "overlap",
            SelectionPolicy::LastMatch => "last",
            SelectionPolicy::BestVotes => "best",
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SelectionPolicy {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" | "first_match" => Ok(SelectionPolicy::FirstMatch),
            "overlap" | "overlapping" | "overlapping_only" => Ok(SelectionPolicy::OverlappingOnly),
            "last" | "last_match" => Ok(SelectionPolicy::LastMatch),
            "best" | "best_votes" => Ok(SelectionPolicy::BestVotes),
            other => Err(AlignError::InvalidInput(format!(
                "Unknown selection policy '{}' (expected first, overlap, last or best)",
                other
            ))),
        }
    }
}

/// Provides the decoded audio of a clip
///
/// Implemented for closures and for [`AudioCache`] (which reads
/// [`Clip::path`]). Loading failures are fatal to the alignment run.
pub trait ClipAudioSource {
    /// Mono audio of `clip`
    fn load(&self, clip: &Clip) -> Result<SampleBuffer, AlignError>;
}

impl<F> ClipAudioSource for F
where
    F: Fn(&Clip) -> Result<SampleBuffer, AlignError>,
{
    fn load(&self, clip: &Clip) -> Result<SampleBuffer, AlignError> {
        self(clip)
    }
}

impl ClipAudioSource for AudioCache {
    fn load(&self, clip: &Clip) -> Result<SampleBuffer, AlignError> {
        let path = clip.path().ok_or_else(|| {
            AlignError::InvalidInput(format!("Clip {} has no media path", clip.id))
        })?;
        AudioCache::load(self, path)
    }
}

/// Candidates that `policy` allows to be compared with `subject`, in order
///
/// Candidates ending before the subject starts are skipped. Under
/// `OverlappingOnly` the scan stops at the first candidate starting after
/// the subject ends.
pub fn eligible_candidates<'a>(
    subject: &Clip,
    candidates: &'a [Clip],
    policy: SelectionPolicy,
) -> Vec<&'a Clip> {
    let mut eligible = Vec::new();

    for candidate in candidates {
        if candidate.end_ms < subject.start_ms {
            log::debug!("{} skipped, no backward matching", candidate.id);
            continue;
        }

        if policy == SelectionPolicy::OverlappingOnly && candidate.start_ms > subject.end_ms {
            log::debug!(
                "{} starts after {} ends, no further overlapping candidates",
                candidate.id,
                subject.id
            );
            break;
        }

        eligible.push(candidate);
    }

    eligible
}

/// Align a subject clip against a sequence of reference candidates
///
/// # Arguments
///
/// * `subject` - Clip being positioned
/// * `candidates` - Reference clips, in timeline order
/// * `config` - Pipeline sizes, duration caps and selection policy
/// * `source` - Loader for clip audio
///
/// # Returns
///
/// The chosen reference, the delay against it, and the shift to add to the
/// subject's start (`reference start - subject start - delay`)
///
/// # Errors
///
/// - `AlignError::NoCandidate` if the policy leaves nothing to compare
/// - `AlignError::InsufficientData` if no compared candidate produced an
///   estimate
/// - any loading error from `source`, or `InvalidInput` when a candidate's
///   sample rate differs from the subject's
pub fn align_clip<S>(
    subject: &Clip,
    candidates: &[Clip],
    config: &AlignmentConfig,
    source: &S,
) -> Result<AlignmentResult, AlignError>
where
    S: ClipAudioSource + Sync + ?Sized,
{
    config.validate()?;

    let eligible = eligible_candidates(subject, candidates, config.policy);
    if eligible.is_empty() {
        return Err(AlignError::NoCandidate(format!(
            "No reference clip can be compared with {} under the {} policy",
            subject.id, config.policy
        )));
    }

    log::info!(
        "Aligning {} against {} of {} candidates ({} policy)",
        subject.id,
        eligible.len(),
        candidates.len(),
        config.policy
    );

    let subject_audio = source.load(subject)?;
    let subject_fp = fingerprint_samples(subject_audio.head(config.subject_duration_secs), config)?;

    let compare = |candidate: &Clip| -> Result<DelayEstimate, AlignError> {
        let reference_audio = source.load(candidate)?;
        if reference_audio.sample_rate() != subject_audio.sample_rate() {
            return Err(AlignError::InvalidInput(format!(
                "Sample rate of {} ({} Hz) differs from {} ({} Hz)",
                candidate.id,
                reference_audio.sample_rate(),
                subject.id,
                subject_audio.sample_rate()
            )));
        }

        let reference_fp =
            fingerprint_samples(reference_audio.head(config.reference_duration_secs), config)?;
        compare_fingerprints(&subject_fp, &reference_fp, subject_audio.sample_rate(), config)
    };

    let (chosen, compared) = match config.policy {
        SelectionPolicy::FirstMatch => first_match(&eligible, &compare)?,
        _ => {
            let outcomes: Vec<Result<DelayEstimate, AlignError>> =
                eligible.par_iter().map(|&c| compare(c)).collect();
            (reduce_outcomes(&eligible, outcomes, config.policy)?, eligible.len())
        }
    };

    let (reference, estimate) = chosen.ok_or_else(|| {
        AlignError::InsufficientData(format!(
            "None of the {} compared candidates shares enough audio with {}",
            compared, subject.id
        ))
    })?;

    let shift_ms = reference.start_ms - subject.start_ms - estimate.delay_ms;
    log::info!(
        "Aligned {} with {}: delay {} ms ({} votes), shift {} ms",
        subject.id,
        reference.id,
        estimate.delay_ms,
        estimate.votes,
        shift_ms
    );

    Ok(AlignmentResult {
        reference_id: reference.id.clone(),
        estimate,
        shift_ms,
        candidates_compared: compared,
    })
}

type Chosen<'a> = Option<(&'a Clip, DelayEstimate)>;

fn first_match<'a, F>(eligible: &[&'a Clip], compare: F) -> Result<(Chosen<'a>, usize), AlignError>
where
    F: Fn(&Clip) -> Result<DelayEstimate, AlignError>,
{
    for (i, &candidate) in eligible.iter().enumerate() {
        match compare(candidate) {
            Ok(estimate) => {
                log::info!("Found diff {} ms with {}", estimate.delay_ms, candidate.id);
                return Ok((Some((candidate, estimate)), i + 1));
            }
            Err(e) if e.is_insufficient_data() => {
                log::warn!("{} skipped: {}", candidate.id, e);
            }
            Err(e) => return Err(e),
        }
    }

    Ok((None, eligible.len()))
}

fn reduce_outcomes<'a>(
    eligible: &[&'a Clip],
    outcomes: Vec<Result<DelayEstimate, AlignError>>,
    policy: SelectionPolicy,
) -> Result<Chosen<'a>, AlignError> {
    let mut chosen: Chosen<'a> = None;

    for (&candidate, outcome) in eligible.iter().zip(outcomes) {
        let estimate = match outcome {
            Ok(estimate) => estimate,
            Err(e) if e.is_insufficient_data() => {
                log::warn!("{} skipped: {}", candidate.id, e);
                continue;
            }
            Err(e) => return Err(e),
        };
        log::info!("Found diff {} ms with {}", estimate.delay_ms, candidate.id);

        let replace = match (policy, &chosen) {
            (SelectionPolicy::BestVotes, Some((_, best))) => estimate.votes > best.votes,
            _ => true,
        };
        if replace {
            chosen = Some((candidate, estimate));
        }
    }

    Ok(chosen)
}
