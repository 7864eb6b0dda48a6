//! Stage error taxonomy
//!
//! Errors raised inside a stage's validate/transform phase. They never cross
//! the stage boundary as errors: the stage converts them into a
//! `FailedInternal` classification recorded in both the content container and
//! the trace record, and the pipeline always returns a well-formed Seed.

use madaseed_schema::{StageId, UidError, WireError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StageError>;

#[derive(Error, Debug)]
pub enum StageError {
    #[error("uid generation failed: {0}")]
    Uid(#[from] UidError),

    #[error("malformed reception timestamp `{raw}`: {source}")]
    Timestamp {
        raw: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("stage {current} requires {missing}, found it {found}")]
    MissingPriorStage {
        current: StageId,
        missing: StageId,
        found: String,
    },

    #[error("wire boundary failure: {0}")]
    Wire(#[from] WireError),

    #[error("stage cancelled: {0}")]
    Cancelled(String),
}

impl StageError {
    /// Coarse classification of the failure, recorded for diagnostics.
    pub fn class(&self) -> ErrorClass {
        match self {
            StageError::Timestamp { .. } => ErrorClass::InputValidation,
            StageError::Uid(_) | StageError::Cancelled(_) => ErrorClass::InternalGeneration,
            StageError::MissingPriorStage { .. } | StageError::Wire(_) => ErrorClass::Structural,
        }
    }
}

/// Error class per the pipeline's failure taxonomy: input validation errors
/// recover locally, generation and structural errors escalate to the stage's
/// `FailedInternal` classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    InputValidation,
    InternalGeneration,
    Structural,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::InputValidation => "input_validation",
            ErrorClass::InternalGeneration => "internal_generation",
            ErrorClass::Structural => "structural",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "input_validation" => Some(ErrorClass::InputValidation),
            "internal_generation" => Some(ErrorClass::InternalGeneration),
            "structural" => Some(ErrorClass::Structural),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_class_roundtrip() {
        for class in &[
            ErrorClass::InputValidation,
            ErrorClass::InternalGeneration,
            ErrorClass::Structural,
        ] {
            let parsed = ErrorClass::from_str(class.as_str()).unwrap();
            assert_eq!(*class, parsed);
        }
        assert!(ErrorClass::from_str("other").is_none());
    }

    #[test]
    fn test_stage_error_classification() {
        let err = StageError::Uid(UidError::EmptyTypeHint);
        assert_eq!(err.class(), ErrorClass::InternalGeneration);

        let err = StageError::MissingPriorStage {
            current: StageId::L3KeymapClick,
            missing: StageId::L2FrameClick,
            found: "not_started".to_string(),
        };
        assert_eq!(err.class(), ErrorClass::Structural);

        let parse_err = madaseed_schema::clock::parse_utc("garbage").unwrap_err();
        let err = StageError::Timestamp {
            raw: "garbage".to_string(),
            source: parse_err,
        };
        assert_eq!(err.class(), ErrorClass::InputValidation);
        assert!(err.to_string().contains("garbage"));
    }
}
