//! Trace metadata
//!
//! One audit record per stage in a flat section. Each record echoes the
//! stage's epistemic state, carries the completion timestamp (`None` until
//! the stage runs) and stage-specific provenance. The trace section and the
//! content containers are two views of one timeline and must agree on seed
//! id and per-stage state.

use crate::content::CommContextDisposition;
use crate::stage::StageId;
use crate::states::{
    L1EpistemicState, L2EpistemicState, L3EpistemicState, L4EpistemicState, L5EpistemicState,
    L6EpistemicState, L7EpistemicState,
};
use crate::uid::CruxUid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TRACE_SCHEMA_VERSION: &str = "0.1.0";

fn trace_version() -> String {
    TRACE_SCHEMA_VERSION.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct L1Trace {
    #[serde(default = "trace_version")]
    pub version: String,
    pub procedure: String,
    #[serde(default)]
    pub completion_timestamp: Option<DateTime<Utc>>,
    pub epistemic_state: L1EpistemicState,
    #[serde(default)]
    pub creation_time_from_context: Option<DateTime<Utc>>,
    #[serde(default)]
    pub input_origin: Option<String>,
    #[serde(default)]
    pub signal_component_count: usize,
    #[serde(default)]
    pub generated_signal_ref_uids: Vec<CruxUid>,
    #[serde(default)]
    pub error_details: Option<String>,
}

impl Default for L1Trace {
    fn default() -> Self {
        Self {
            version: trace_version(),
            procedure: StageId::L1Startle.procedure().to_string(),
            completion_timestamp: None,
            epistemic_state: L1EpistemicState::default(),
            creation_time_from_context: None,
            input_origin: None,
            signal_component_count: 0,
            generated_signal_ref_uids: Vec::new(),
            error_details: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct L2Trace {
    #[serde(default = "trace_version")]
    pub version: String,
    pub procedure: String,
    #[serde(default)]
    pub completion_timestamp: Option<DateTime<Utc>>,
    pub epistemic_state: L2EpistemicState,
    #[serde(default)]
    pub frame_type: Option<String>,
    #[serde(default)]
    pub comm_context_disposition: CommContextDisposition,
    #[serde(default)]
    pub error_details: Option<String>,
}

impl Default for L2Trace {
    fn default() -> Self {
        Self {
            version: trace_version(),
            procedure: StageId::L2FrameClick.procedure().to_string(),
            completion_timestamp: None,
            epistemic_state: L2EpistemicState::default(),
            frame_type: None,
            comm_context_disposition: CommContextDisposition::default(),
            error_details: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct L3Trace {
    #[serde(default = "trace_version")]
    pub version: String,
    pub procedure: String,
    #[serde(default)]
    pub completion_timestamp: Option<DateTime<Utc>>,
    pub epistemic_state: L3EpistemicState,
    #[serde(default)]
    pub keymap_binding_uid: Option<CruxUid>,
    #[serde(default)]
    pub override_applied: bool,
    #[serde(default)]
    pub error_details: Option<String>,
}

impl Default for L3Trace {
    fn default() -> Self {
        Self {
            version: trace_version(),
            procedure: StageId::L3KeymapClick.procedure().to_string(),
            completion_timestamp: None,
            epistemic_state: L3EpistemicState::default(),
            keymap_binding_uid: None,
            override_applied: false,
            error_details: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct L4Trace {
    #[serde(default = "trace_version")]
    pub version: String,
    pub procedure: String,
    #[serde(default)]
    pub completion_timestamp: Option<DateTime<Utc>>,
    pub epistemic_state: L4EpistemicState,
    #[serde(default)]
    pub persona_profile_uid: Option<CruxUid>,
    #[serde(default)]
    pub override_applied: bool,
    #[serde(default)]
    pub error_details: Option<String>,
}

impl Default for L4Trace {
    fn default() -> Self {
        Self {
            version: trace_version(),
            procedure: StageId::L4AnchorClick.procedure().to_string(),
            completion_timestamp: None,
            epistemic_state: L4EpistemicState::default(),
            persona_profile_uid: None,
            override_applied: false,
            error_details: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct L5Trace {
    #[serde(default = "trace_version")]
    pub version: String,
    pub procedure: String,
    #[serde(default)]
    pub completion_timestamp: Option<DateTime<Utc>>,
    pub epistemic_state: L5EpistemicState,
    #[serde(default)]
    pub field_instance_uid: Option<CruxUid>,
    #[serde(default)]
    pub override_applied: bool,
    #[serde(default)]
    pub error_details: Option<String>,
}

impl Default for L5Trace {
    fn default() -> Self {
        Self {
            version: trace_version(),
            procedure: StageId::L5FieldClick.procedure().to_string(),
            completion_timestamp: None,
            epistemic_state: L5EpistemicState::default(),
            field_instance_uid: None,
            override_applied: false,
            error_details: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct L6Trace {
    #[serde(default = "trace_version")]
    pub version: String,
    pub procedure: String,
    #[serde(default)]
    pub completion_timestamp: Option<DateTime<Utc>>,
    pub epistemic_state: L6EpistemicState,
    #[serde(default)]
    pub presentation_intent: Option<String>,
    #[serde(default)]
    pub payload_kind: Option<String>,
    #[serde(default)]
    pub error_details: Option<String>,
}

impl Default for L6Trace {
    fn default() -> Self {
        Self {
            version: trace_version(),
            procedure: StageId::L6ReflectBoom.procedure().to_string(),
            completion_timestamp: None,
            epistemic_state: L6EpistemicState::default(),
            presentation_intent: None,
            payload_kind: None,
            error_details: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct L7Trace {
    #[serde(default = "trace_version")]
    pub version: String,
    pub procedure: String,
    #[serde(default)]
    pub completion_timestamp: Option<DateTime<Utc>>,
    pub epistemic_state: L7EpistemicState,
    #[serde(default)]
    pub action_intent: Option<String>,
    #[serde(default)]
    pub backlog_mutation_count: usize,
    #[serde(default)]
    pub seed_output_count: usize,
    #[serde(default)]
    pub error_details: Option<String>,
}

impl Default for L7Trace {
    fn default() -> Self {
        Self {
            version: trace_version(),
            procedure: StageId::L7ApplyDone.procedure().to_string(),
            completion_timestamp: None,
            epistemic_state: L7EpistemicState::default(),
            action_intent: None,
            backlog_mutation_count: 0,
            seed_output_count: 0,
            error_details: None,
        }
    }
}

/// Flat trace section, one record per stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceMetadata {
    pub trace_id: CruxUid,
    #[serde(default)]
    pub l1_trace: L1Trace,
    #[serde(default)]
    pub l2_trace: L2Trace,
    #[serde(default)]
    pub l3_trace: L3Trace,
    #[serde(default)]
    pub l4_trace: L4Trace,
    #[serde(default)]
    pub l5_trace: L5Trace,
    #[serde(default)]
    pub l6_trace: L6Trace,
    #[serde(default)]
    pub l7_trace: L7Trace,
}

impl TraceMetadata {
    pub fn new(trace_id: CruxUid) -> Self {
        Self {
            trace_id,
            l1_trace: L1Trace::default(),
            l2_trace: L2Trace::default(),
            l3_trace: L3Trace::default(),
            l4_trace: L4Trace::default(),
            l5_trace: L5Trace::default(),
            l6_trace: L6Trace::default(),
            l7_trace: L7Trace::default(),
        }
    }

    /// Completion timestamp of the given stage's trace record.
    pub fn completion_of(&self, stage: StageId) -> Option<DateTime<Utc>> {
        match stage {
            StageId::L1Startle => self.l1_trace.completion_timestamp,
            StageId::L2FrameClick => self.l2_trace.completion_timestamp,
            StageId::L3KeymapClick => self.l3_trace.completion_timestamp,
            StageId::L4AnchorClick => self.l4_trace.completion_timestamp,
            StageId::L5FieldClick => self.l5_trace.completion_timestamp,
            StageId::L6ReflectBoom => self.l6_trace.completion_timestamp,
            StageId::L7ApplyDone => self.l7_trace.completion_timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_traces_have_no_completion() {
        let traces = TraceMetadata::new(CruxUid::error_fallback());
        for stage in StageId::ALL {
            assert!(traces.completion_of(stage).is_none());
        }
    }

    #[test]
    fn test_default_procedures_match_stage_ids() {
        let traces = TraceMetadata::new(CruxUid::error_fallback());
        assert_eq!(traces.l1_trace.procedure, "sop.startle");
        assert_eq!(traces.l4_trace.procedure, "sop.anchor_click");
        assert_eq!(traces.l7_trace.procedure, "sop.apply_done");
    }

    #[test]
    fn test_trace_schema_version_applied() {
        let traces = TraceMetadata::new(CruxUid::error_fallback());
        assert_eq!(traces.l2_trace.version, TRACE_SCHEMA_VERSION);
    }
}
