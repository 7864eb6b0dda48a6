//! Wire boundary
//!
//! Stages are invoked as separate nodes in a host-controlled graph, so the
//! Seed must cross a serialization boundary between every pair of stages.
//! The wire form is one self-describing JSON document per Seed. Missing
//! optional fields are defaulted on the way in; a malformed or unknown shape
//! surfaces as `WireError` for the orchestrator's error-Seed path.

use crate::seed::Seed;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WireError {
    #[error("seed serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("seed deserialization failed: {0}")]
    Deserialize(#[source] serde_json::Error),
}

/// Render a Seed as its wire document.
pub fn to_json(seed: &Seed) -> Result<String, WireError> {
    serde_json::to_string_pretty(seed).map_err(WireError::Serialize)
}

/// Rehydrate a Seed from a wire document.
pub fn from_json(raw: &str) -> Result<Seed, WireError> {
    serde_json::from_str(raw).map_err(WireError::Deserialize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::UID_HINT_TRACE_EVENT;
    use crate::stage::StageId;
    use crate::uid::CruxUid;

    #[test]
    fn test_roundtrip_fresh_seed() {
        let seed = Seed::new(CruxUid::generate(UID_HINT_TRACE_EVENT).unwrap());
        let json = to_json(&seed).unwrap();
        let back = from_json(&json).unwrap();
        assert_eq!(seed, back);
    }

    #[test]
    fn test_roundtrip_error_seed() {
        let seed = Seed::error_seed(StageId::L5FieldClick, "missing prior container");
        let back = from_json(&to_json(&seed).unwrap()).unwrap();
        assert_eq!(seed, back);
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        assert!(from_json("not json at all").is_err());
        assert!(from_json("{\"version\": \"0.3.0\"}").is_err());
    }

    #[test]
    fn test_missing_optionals_are_defaulted() {
        let seed = Seed::new(CruxUid::generate(UID_HINT_TRACE_EVENT).unwrap());
        let mut doc: serde_json::Value = serde_json::from_str(&to_json(&seed).unwrap()).unwrap();

        // Strip optional top-level sections the way an older writer might.
        doc.as_object_mut().unwrap().remove("seed_qa_qc");
        doc.as_object_mut().unwrap().remove("seed_completion_timestamp");

        let back = from_json(&doc.to_string()).unwrap();
        assert_eq!(back.seed_qa_qc, Default::default());
        assert!(back.seed_completion_timestamp.is_none());
    }
}
