//! Per-stage epistemic states
//!
//! Each stage classifies its own outcome from a closed set. All seven enums
//! share the `NotStarted`, `Processing` and `FailedInternal` members; the
//! remaining members name stage-specific completed or degraded outcomes.
//! `FailedInternal` is the only classification that propagates; everything
//! else is non-blocking for the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} token: {token}")]
pub struct ParseStateError {
    pub kind: &'static str,
    pub token: String,
}

impl ParseStateError {
    fn new(kind: &'static str, token: &str) -> Self {
        Self {
            kind,
            token: token.to_string(),
        }
    }
}

/// `fmt::Display` via `as_str` for the state enums below.
macro_rules! fmt_as_str {
    () => {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    };
}

/// Normalized view of a stage state, used by QA/QC and propagation checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageDisposition {
    NotStarted,
    InFlight,
    Completed,
    Degraded,
    FailedInternal,
}

impl StageDisposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageDisposition::NotStarted => "not_started",
            StageDisposition::InFlight => "in_flight",
            StageDisposition::Completed => "completed",
            StageDisposition::Degraded => "degraded",
            StageDisposition::FailedInternal => "failed_internal",
        }
    }
}

impl fmt::Display for StageDisposition {
    fmt_as_str!();
}

/// Encoding classification of one signal component at L1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingStatus {
    AssumedUtf8,
    DetectedBinary,
    PossibleEncodingIssue,
    Unknown,
}

impl EncodingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EncodingStatus::AssumedUtf8 => "assumed_utf8",
            EncodingStatus::DetectedBinary => "detected_binary",
            EncodingStatus::PossibleEncodingIssue => "possible_encoding_issue",
            EncodingStatus::Unknown => "unknown",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, ParseStateError> {
        match s {
            "assumed_utf8" => Ok(EncodingStatus::AssumedUtf8),
            "detected_binary" => Ok(EncodingStatus::DetectedBinary),
            "possible_encoding_issue" => Ok(EncodingStatus::PossibleEncodingIssue),
            "unknown" => Ok(EncodingStatus::Unknown),
            _ => Err(ParseStateError::new("encoding status", s)),
        }
    }
}

impl fmt::Display for EncodingStatus {
    fmt_as_str!();
}

/// L1 Startle outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum L1EpistemicState {
    #[default]
    NotStarted,
    Processing,
    /// Raw-signal references generated for every component.
    SignalRefsGenerated,
    FailedInternal,
}

impl L1EpistemicState {
    pub fn as_str(&self) -> &'static str {
        match self {
            L1EpistemicState::NotStarted => "not_started",
            L1EpistemicState::Processing => "processing",
            L1EpistemicState::SignalRefsGenerated => "signal_refs_generated",
            L1EpistemicState::FailedInternal => "failed_internal",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, ParseStateError> {
        match s {
            "not_started" => Ok(L1EpistemicState::NotStarted),
            "processing" => Ok(L1EpistemicState::Processing),
            "signal_refs_generated" => Ok(L1EpistemicState::SignalRefsGenerated),
            "failed_internal" => Ok(L1EpistemicState::FailedInternal),
            _ => Err(ParseStateError::new("L1 epistemic state", s)),
        }
    }

    pub fn disposition(&self) -> StageDisposition {
        match self {
            L1EpistemicState::NotStarted => StageDisposition::NotStarted,
            L1EpistemicState::Processing => StageDisposition::InFlight,
            L1EpistemicState::SignalRefsGenerated => StageDisposition::Completed,
            L1EpistemicState::FailedInternal => StageDisposition::FailedInternal,
        }
    }
}

impl fmt::Display for L1EpistemicState {
    fmt_as_str!();
}

/// L2 FrameClick outcome. Degraded causes are distinct named states so
/// callers can branch on why framing fell short, not just that it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum L2EpistemicState {
    #[default]
    NotStarted,
    Processing,
    Framed,
    /// No communication-context map was supplied at all.
    CommContextMissing,
    /// A communication-context map was supplied but carried zero entries.
    CommContextEmpty,
    FrameAmbiguous,
    InputOversized,
    FailedInternal,
}

impl L2EpistemicState {
    pub fn as_str(&self) -> &'static str {
        match self {
            L2EpistemicState::NotStarted => "not_started",
            L2EpistemicState::Processing => "processing",
            L2EpistemicState::Framed => "framed",
            L2EpistemicState::CommContextMissing => "comm_context_missing",
            L2EpistemicState::CommContextEmpty => "comm_context_empty",
            L2EpistemicState::FrameAmbiguous => "frame_ambiguous",
            L2EpistemicState::InputOversized => "input_oversized",
            L2EpistemicState::FailedInternal => "failed_internal",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, ParseStateError> {
        match s {
            "not_started" => Ok(L2EpistemicState::NotStarted),
            "processing" => Ok(L2EpistemicState::Processing),
            "framed" => Ok(L2EpistemicState::Framed),
            "comm_context_missing" => Ok(L2EpistemicState::CommContextMissing),
            "comm_context_empty" => Ok(L2EpistemicState::CommContextEmpty),
            "frame_ambiguous" => Ok(L2EpistemicState::FrameAmbiguous),
            "input_oversized" => Ok(L2EpistemicState::InputOversized),
            "failed_internal" => Ok(L2EpistemicState::FailedInternal),
            _ => Err(ParseStateError::new("L2 epistemic state", s)),
        }
    }

    pub fn disposition(&self) -> StageDisposition {
        match self {
            L2EpistemicState::NotStarted => StageDisposition::NotStarted,
            L2EpistemicState::Processing => StageDisposition::InFlight,
            L2EpistemicState::Framed => StageDisposition::Completed,
            L2EpistemicState::CommContextMissing
            | L2EpistemicState::CommContextEmpty
            | L2EpistemicState::FrameAmbiguous
            | L2EpistemicState::InputOversized => StageDisposition::Degraded,
            L2EpistemicState::FailedInternal => StageDisposition::FailedInternal,
        }
    }
}

impl fmt::Display for L2EpistemicState {
    fmt_as_str!();
}

/// L3 KeymapClick outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum L3EpistemicState {
    #[default]
    NotStarted,
    Processing,
    Keymapped,
    ClarificationNeeded,
    FailedInternal,
}

impl L3EpistemicState {
    pub fn as_str(&self) -> &'static str {
        match self {
            L3EpistemicState::NotStarted => "not_started",
            L3EpistemicState::Processing => "processing",
            L3EpistemicState::Keymapped => "keymapped",
            L3EpistemicState::ClarificationNeeded => "clarification_needed",
            L3EpistemicState::FailedInternal => "failed_internal",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, ParseStateError> {
        match s {
            "not_started" => Ok(L3EpistemicState::NotStarted),
            "processing" => Ok(L3EpistemicState::Processing),
            "keymapped" => Ok(L3EpistemicState::Keymapped),
            "clarification_needed" => Ok(L3EpistemicState::ClarificationNeeded),
            "failed_internal" => Ok(L3EpistemicState::FailedInternal),
            _ => Err(ParseStateError::new("L3 epistemic state", s)),
        }
    }

    pub fn disposition(&self) -> StageDisposition {
        match self {
            L3EpistemicState::NotStarted => StageDisposition::NotStarted,
            L3EpistemicState::Processing => StageDisposition::InFlight,
            L3EpistemicState::Keymapped => StageDisposition::Completed,
            L3EpistemicState::ClarificationNeeded => StageDisposition::Degraded,
            L3EpistemicState::FailedInternal => StageDisposition::FailedInternal,
        }
    }
}

impl fmt::Display for L3EpistemicState {
    fmt_as_str!();
}

/// L4 AnchorClick outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum L4EpistemicState {
    #[default]
    NotStarted,
    Processing,
    Anchored,
    ClarificationNeeded,
    FailedInternal,
}

impl L4EpistemicState {
    pub fn as_str(&self) -> &'static str {
        match self {
            L4EpistemicState::NotStarted => "not_started",
            L4EpistemicState::Processing => "processing",
            L4EpistemicState::Anchored => "anchored",
            L4EpistemicState::ClarificationNeeded => "clarification_needed",
            L4EpistemicState::FailedInternal => "failed_internal",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, ParseStateError> {
        match s {
            "not_started" => Ok(L4EpistemicState::NotStarted),
            "processing" => Ok(L4EpistemicState::Processing),
            "anchored" => Ok(L4EpistemicState::Anchored),
            "clarification_needed" => Ok(L4EpistemicState::ClarificationNeeded),
            "failed_internal" => Ok(L4EpistemicState::FailedInternal),
            _ => Err(ParseStateError::new("L4 epistemic state", s)),
        }
    }

    pub fn disposition(&self) -> StageDisposition {
        match self {
            L4EpistemicState::NotStarted => StageDisposition::NotStarted,
            L4EpistemicState::Processing => StageDisposition::InFlight,
            L4EpistemicState::Anchored => StageDisposition::Completed,
            L4EpistemicState::ClarificationNeeded => StageDisposition::Degraded,
            L4EpistemicState::FailedInternal => StageDisposition::FailedInternal,
        }
    }
}

impl fmt::Display for L4EpistemicState {
    fmt_as_str!();
}

/// L5 FieldClick outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum L5EpistemicState {
    #[default]
    NotStarted,
    Processing,
    FieldBound,
    ClarificationNeeded,
    FailedInternal,
}

impl L5EpistemicState {
    pub fn as_str(&self) -> &'static str {
        match self {
            L5EpistemicState::NotStarted => "not_started",
            L5EpistemicState::Processing => "processing",
            L5EpistemicState::FieldBound => "field_bound",
            L5EpistemicState::ClarificationNeeded => "clarification_needed",
            L5EpistemicState::FailedInternal => "failed_internal",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, ParseStateError> {
        match s {
            "not_started" => Ok(L5EpistemicState::NotStarted),
            "processing" => Ok(L5EpistemicState::Processing),
            "field_bound" => Ok(L5EpistemicState::FieldBound),
            "clarification_needed" => Ok(L5EpistemicState::ClarificationNeeded),
            "failed_internal" => Ok(L5EpistemicState::FailedInternal),
            _ => Err(ParseStateError::new("L5 epistemic state", s)),
        }
    }

    pub fn disposition(&self) -> StageDisposition {
        match self {
            L5EpistemicState::NotStarted => StageDisposition::NotStarted,
            L5EpistemicState::Processing => StageDisposition::InFlight,
            L5EpistemicState::FieldBound => StageDisposition::Completed,
            L5EpistemicState::ClarificationNeeded => StageDisposition::Degraded,
            L5EpistemicState::FailedInternal => StageDisposition::FailedInternal,
        }
    }
}

impl fmt::Display for L5EpistemicState {
    fmt_as_str!();
}

/// L6 ReflectBoom outcome: completed, deferred or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum L6EpistemicState {
    #[default]
    NotStarted,
    Processing,
    Reflected,
    Deferred,
    FailedInternal,
}

impl L6EpistemicState {
    pub fn as_str(&self) -> &'static str {
        match self {
            L6EpistemicState::NotStarted => "not_started",
            L6EpistemicState::Processing => "processing",
            L6EpistemicState::Reflected => "reflected",
            L6EpistemicState::Deferred => "deferred",
            L6EpistemicState::FailedInternal => "failed_internal",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, ParseStateError> {
        match s {
            "not_started" => Ok(L6EpistemicState::NotStarted),
            "processing" => Ok(L6EpistemicState::Processing),
            "reflected" => Ok(L6EpistemicState::Reflected),
            "deferred" => Ok(L6EpistemicState::Deferred),
            "failed_internal" => Ok(L6EpistemicState::FailedInternal),
            _ => Err(ParseStateError::new("L6 epistemic state", s)),
        }
    }

    pub fn disposition(&self) -> StageDisposition {
        match self {
            L6EpistemicState::NotStarted => StageDisposition::NotStarted,
            L6EpistemicState::Processing => StageDisposition::InFlight,
            L6EpistemicState::Reflected => StageDisposition::Completed,
            L6EpistemicState::Deferred => StageDisposition::Degraded,
            L6EpistemicState::FailedInternal => StageDisposition::FailedInternal,
        }
    }
}

impl fmt::Display for L6EpistemicState {
    fmt_as_str!();
}

/// L7 ApplyDone outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum L7EpistemicState {
    #[default]
    NotStarted,
    Processing,
    Applied,
    Deferred,
    FailedInternal,
}

impl L7EpistemicState {
    pub fn as_str(&self) -> &'static str {
        match self {
            L7EpistemicState::NotStarted => "not_started",
            L7EpistemicState::Processing => "processing",
            L7EpistemicState::Applied => "applied",
            L7EpistemicState::Deferred => "deferred",
            L7EpistemicState::FailedInternal => "failed_internal",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, ParseStateError> {
        match s {
            "not_started" => Ok(L7EpistemicState::NotStarted),
            "processing" => Ok(L7EpistemicState::Processing),
            "applied" => Ok(L7EpistemicState::Applied),
            "deferred" => Ok(L7EpistemicState::Deferred),
            "failed_internal" => Ok(L7EpistemicState::FailedInternal),
            _ => Err(ParseStateError::new("L7 epistemic state", s)),
        }
    }

    pub fn disposition(&self) -> StageDisposition {
        match self {
            L7EpistemicState::NotStarted => StageDisposition::NotStarted,
            L7EpistemicState::Processing => StageDisposition::InFlight,
            L7EpistemicState::Applied => StageDisposition::Completed,
            L7EpistemicState::Deferred => StageDisposition::Degraded,
            L7EpistemicState::FailedInternal => StageDisposition::FailedInternal,
        }
    }
}

impl fmt::Display for L7EpistemicState {
    fmt_as_str!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_status_roundtrip() {
        for status in &[
            EncodingStatus::AssumedUtf8,
            EncodingStatus::DetectedBinary,
            EncodingStatus::PossibleEncodingIssue,
            EncodingStatus::Unknown,
        ] {
            let parsed = EncodingStatus::from_str(status.as_str()).unwrap();
            assert_eq!(*status, parsed);
        }
    }

    #[test]
    fn test_l2_state_roundtrip() {
        for state in &[
            L2EpistemicState::NotStarted,
            L2EpistemicState::Processing,
            L2EpistemicState::Framed,
            L2EpistemicState::CommContextMissing,
            L2EpistemicState::CommContextEmpty,
            L2EpistemicState::FrameAmbiguous,
            L2EpistemicState::InputOversized,
            L2EpistemicState::FailedInternal,
        ] {
            let parsed = L2EpistemicState::from_str(state.as_str()).unwrap();
            assert_eq!(*state, parsed);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown_token() {
        assert!(L1EpistemicState::from_str("bogus").is_err());
        assert!(EncodingStatus::from_str("").is_err());
    }

    #[test]
    fn test_defaults_are_not_started() {
        assert_eq!(L1EpistemicState::default(), L1EpistemicState::NotStarted);
        assert_eq!(L7EpistemicState::default(), L7EpistemicState::NotStarted);
    }

    #[test]
    fn test_dispositions() {
        assert_eq!(
            L1EpistemicState::SignalRefsGenerated.disposition(),
            StageDisposition::Completed
        );
        assert_eq!(
            L2EpistemicState::CommContextEmpty.disposition(),
            StageDisposition::Degraded
        );
        assert_eq!(
            L6EpistemicState::Deferred.disposition(),
            StageDisposition::Degraded
        );
        assert_eq!(
            L4EpistemicState::FailedInternal.disposition(),
            StageDisposition::FailedInternal
        );
    }

    #[test]
    fn test_serde_tokens_match_as_str() {
        let json = serde_json::to_string(&L2EpistemicState::CommContextMissing).unwrap();
        assert_eq!(json, "\"comm_context_missing\"");
        let json = serde_json::to_string(&EncodingStatus::AssumedUtf8).unwrap();
        assert_eq!(json, "\"assumed_utf8\"");
    }
}
