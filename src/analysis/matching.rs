//! Cross-matching of two fingerprints by shared frequency

use crate::features::fingerprint::Fingerprint;

/// One matched peak: `(subject time-index, reference time-index)`
pub type TimePair = (usize, usize);

/// Pair up every subject peak with every reference peak of the same frequency
///
/// Frequencies are visited in ascending order of the subject fingerprint;
/// for each, the subject's time list is the outer loop and the reference's
/// the inner one. No tolerance is applied: frequencies must be equal.
///
/// # Arguments
///
/// * `subject` - Fingerprint of the clip being positioned
/// * `reference` - Fingerprint of the clip it is aligned against
///
/// # Returns
///
/// All matched pairs, empty if the fingerprints share no frequency
///
/// # Example
///
/// ```
/// use clipsync::analysis::matching::match_peaks;
/// use clipsync::features::fingerprint::Fingerprint;
///
/// let mut subject = Fingerprint::new();
/// subject.insert(100, 12);
/// let mut reference = Fingerprint::new();
/// reference.insert(100, 10);
/// reference.insert(200, 4);
///
/// assert_eq!(match_peaks(&subject, &reference), vec![(12, 10)]);
/// ```
pub fn match_peaks(subject: &Fingerprint, reference: &Fingerprint) -> Vec<TimePair> {
    let mut pairs = Vec::new();

    for (frequency, subject_times) in subject.iter() {
        let Some(reference_times) = reference.times(frequency) else {
            continue;
        };

        pairs.reserve(subject_times.len() * reference_times.len());
        for &s in subject_times {
            for &r in reference_times {
                pairs.push((s, r));
            }
        }
    }

    log::debug!(
        "Matched {} peak pairs ({} subject / {} reference peaks)",
        pairs.len(),
        subject.peak_count(),
        reference.peak_count()
    );

    pairs
}
