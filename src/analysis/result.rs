//! Alignment result types

use serde::{Deserialize, Serialize};

/// Outcome of comparing one subject clip with one reference clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DelayEstimate {
    /// Winning `subject - reference` time difference, in window steps
    ///
    /// Positive means the subject lags the reference: its audio content
    /// appears later in the subject recording.
    pub delta_steps: i64,

    /// Number of matched peak pairs that voted for `delta_steps`
    pub votes: u32,

    /// `delta_steps` converted to milliseconds (same sign)
    pub delay_ms: i64,
}

/// Final decision of candidate selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentResult {
    /// Identifier of the reference clip the subject was aligned against
    pub reference_id: String,

    /// Delay of the subject relative to that reference
    pub estimate: DelayEstimate,

    /// Milliseconds to add to the subject's timeline start
    ///
    /// `reference start - subject start - delay_ms`: after applying it, the
    /// subject's audio coincides with the reference's on the timeline.
    pub shift_ms: i64,

    /// Number of candidates compared before the decision was made
    pub candidates_compared: usize,
}

impl AlignmentResult {
    /// Subject start position after applying the shift
    pub fn aligned_start_ms(&self, subject_start_ms: i64) -> i64 {
        subject_start_ms + self.shift_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_serializes() {
        let result = AlignmentResult {
            reference_id: "cam-b".to_string(),
            estimate: DelayEstimate {
                delta_steps: 2,
                votes: 11,
                delay_ms: 46,
            },
            shift_ms: 954,
            candidates_compared: 1,
        };

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"reference_id\":\"cam-b\""));
        assert!(json.contains("\"delay_ms\":46"));

        let back: AlignmentResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
        assert_eq!(back.aligned_start_ms(1000), 1954);
    }
}
