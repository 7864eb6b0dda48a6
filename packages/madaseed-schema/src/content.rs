//! Seed content containers
//!
//! Raw signals plus the seven per-stage content objects. The stage containers
//! form a fixed-size struct-of-structs indexed by stage number; every
//! container defaults to a placeholder whose epistemic state is `NotStarted`.
//! A stage mutates only its own slot, and only with a fully formed object.

use crate::event::CommContext;
use crate::states::{
    EncodingStatus, L1EpistemicState, L2EpistemicState, L3EpistemicState, L4EpistemicState,
    L5EpistemicState, L6EpistemicState, L7EpistemicState,
};
use crate::uid::CruxUid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const L1_CONTENT_VERSION: &str = "0.1.1";
pub const L2_CONTENT_VERSION: &str = "0.1.2";
pub const L3_CONTENT_VERSION: &str = "0.1.1";
pub const L4_CONTENT_VERSION: &str = "0.1.1";
pub const L5_CONTENT_VERSION: &str = "0.1.1";
pub const L6_CONTENT_VERSION: &str = "0.1.2";
pub const L7_CONTENT_VERSION: &str = "0.1.1";

/// Component role recorded on the synthetic entry for an empty input event.
pub const ROLE_PLACEHOLDER_EMPTY: &str = "placeholder_empty_input";

/// Payload of the synthetic raw signal for an empty input event.
pub const EMPTY_INPUT_SENTINEL: &str = "[[EMPTY_INPUT_EVENT]]";

/// One ingested input fragment. Append-only inside the Seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSignalItem {
    pub raw_input_id: CruxUid,
    pub raw_input_signal: String,
}

/// L1 metadata entry describing one raw signal, 1:1 linked by uid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalComponentMetadata {
    pub component_role: String,
    pub raw_signal_ref_uid: CruxUid,
    pub byte_size_hint: u64,
    #[serde(default)]
    pub media_type_hint: Option<String>,
    pub encoding_status: EncodingStatus,
}

/// L1 Startle content: reception provenance plus per-component metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct L1StartleContent {
    pub version: String,
    pub epistemic_state: L1EpistemicState,
    #[serde(default)]
    pub trace_creation_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub input_origin: Option<String>,
    #[serde(default)]
    pub signal_components: Vec<SignalComponentMetadata>,
    #[serde(default)]
    pub error_details: Option<String>,
}

impl Default for L1StartleContent {
    fn default() -> Self {
        Self {
            version: L1_CONTENT_VERSION.to_string(),
            epistemic_state: L1EpistemicState::default(),
            trace_creation_time: None,
            input_origin: None,
            signal_components: Vec::new(),
            error_details: None,
        }
    }
}

/// How the L2 communication context arrived. Absent and empty are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommContextDisposition {
    #[default]
    NotEvaluated,
    Absent,
    Empty,
    Provided,
}

/// L2 FrameClick content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct L2FrameContent {
    pub version: String,
    pub epistemic_state: L2EpistemicState,
    #[serde(default)]
    pub frame_type: Option<String>,
    pub comm_context_disposition: CommContextDisposition,
    #[serde(default)]
    pub comm_context: Option<CommContext>,
    #[serde(default)]
    pub input_byte_total: u64,
    #[serde(default)]
    pub error_details: Option<String>,
}

impl Default for L2FrameContent {
    fn default() -> Self {
        Self {
            version: L2_CONTENT_VERSION.to_string(),
            epistemic_state: L2EpistemicState::default(),
            frame_type: None,
            comm_context_disposition: CommContextDisposition::default(),
            comm_context: None,
            input_byte_total: 0,
            error_details: None,
        }
    }
}

/// L3 KeymapClick content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct L3KeymapContent {
    pub version: String,
    pub epistemic_state: L3EpistemicState,
    #[serde(default)]
    pub keymap_binding_uid: Option<CruxUid>,
    #[serde(default)]
    pub override_applied: bool,
    #[serde(default)]
    pub interpretable_component_count: usize,
    #[serde(default)]
    pub error_details: Option<String>,
}

impl Default for L3KeymapContent {
    fn default() -> Self {
        Self {
            version: L3_CONTENT_VERSION.to_string(),
            epistemic_state: L3EpistemicState::default(),
            keymap_binding_uid: None,
            override_applied: false,
            interpretable_component_count: 0,
            error_details: None,
        }
    }
}

/// L4 AnchorClick content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct L4AnchorContent {
    pub version: String,
    pub epistemic_state: L4EpistemicState,
    #[serde(default)]
    pub persona_profile_uid: Option<CruxUid>,
    #[serde(default)]
    pub override_applied: bool,
    #[serde(default)]
    pub anchor_note: Option<String>,
    #[serde(default)]
    pub error_details: Option<String>,
}

impl Default for L4AnchorContent {
    fn default() -> Self {
        Self {
            version: L4_CONTENT_VERSION.to_string(),
            epistemic_state: L4EpistemicState::default(),
            persona_profile_uid: None,
            override_applied: false,
            anchor_note: None,
            error_details: None,
        }
    }
}

/// L5 FieldClick content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct L5FieldContent {
    pub version: String,
    pub epistemic_state: L5EpistemicState,
    #[serde(default)]
    pub field_instance_uid: Option<CruxUid>,
    #[serde(default)]
    pub override_applied: bool,
    #[serde(default)]
    pub participant_count: usize,
    #[serde(default)]
    pub error_details: Option<String>,
}

impl Default for L5FieldContent {
    fn default() -> Self {
        Self {
            version: L5_CONTENT_VERSION.to_string(),
            epistemic_state: L5EpistemicState::default(),
            field_instance_uid: None,
            override_applied: false,
            participant_count: 0,
            error_details: None,
        }
    }
}

/// One component of a multimodal reflection package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultimodalComponent {
    pub media_type: String,
    pub content: String,
}

/// The L6 reflection payload: exactly one of the four shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReflectionPayload {
    FormattedText {
        text: String,
    },
    StructuredData {
        data: serde_json::Value,
    },
    MultimodalPackage {
        components: Vec<MultimodalComponent>,
    },
    ApiPayload {
        #[serde(default)]
        endpoint_hint: Option<String>,
        body: serde_json::Value,
    },
}

impl ReflectionPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            ReflectionPayload::FormattedText { .. } => "formatted_text",
            ReflectionPayload::StructuredData { .. } => "structured_data",
            ReflectionPayload::MultimodalPackage { .. } => "multimodal_package",
            ReflectionPayload::ApiPayload { .. } => "api_payload",
        }
    }
}

/// L6 ReflectBoom content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct L6ReflectionContent {
    pub version: String,
    pub epistemic_state: L6EpistemicState,
    #[serde(default)]
    pub presentation_intent: Option<String>,
    #[serde(default)]
    pub payload: Option<ReflectionPayload>,
    #[serde(default)]
    pub error_details: Option<String>,
}

impl Default for L6ReflectionContent {
    fn default() -> Self {
        Self {
            version: L6_CONTENT_VERSION.to_string(),
            epistemic_state: L6EpistemicState::default(),
            presentation_intent: None,
            payload: None,
            error_details: None,
        }
    }
}

/// Backlog learning-loop depth for an L7 mutation intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopKind {
    Single,
    Double,
    Triple,
}

/// One backlog-mutation intent emitted by L7.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacklogMutation {
    pub loop_kind: LoopKind,
    pub intent: String,
    #[serde(default)]
    pub target_uid: Option<CruxUid>,
}

/// A labeled "next step" choice attached to an output stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextStepOption {
    pub label: String,
    #[serde(default)]
    pub action_ref: Option<String>,
}

/// One named output stream emitted by L7.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedOutput {
    pub output_uid: CruxUid,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub target_consumer_hint: Option<String>,
    #[serde(default)]
    pub options: Vec<NextStepOption>,
}

/// L7 ApplyDone content: the final application object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct L7ApplicationContent {
    pub version: String,
    pub epistemic_state: L7EpistemicState,
    #[serde(default)]
    pub action_intent: Option<String>,
    #[serde(default)]
    pub backlog_mutations: Vec<BacklogMutation>,
    #[serde(default)]
    pub seed_outputs: Vec<SeedOutput>,
    #[serde(default)]
    pub error_details: Option<String>,
}

impl Default for L7ApplicationContent {
    fn default() -> Self {
        Self {
            version: L7_CONTENT_VERSION.to_string(),
            epistemic_state: L7EpistemicState::default(),
            action_intent: None,
            backlog_mutations: Vec::new(),
            seed_outputs: Vec::new(),
            error_details: None,
        }
    }
}

/// Flat struct-of-structs holding all seven stage containers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StageContents {
    #[serde(default)]
    pub l1_startle: L1StartleContent,
    #[serde(default)]
    pub l2_frame: L2FrameContent,
    #[serde(default)]
    pub l3_keymap: L3KeymapContent,
    #[serde(default)]
    pub l4_anchor: L4AnchorContent,
    #[serde(default)]
    pub l5_field: L5FieldContent,
    #[serde(default)]
    pub l6_reflection: L6ReflectionContent,
    #[serde(default)]
    pub l7_application: L7ApplicationContent,
}

/// Seed content: the append-only raw signal list plus the stage containers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeedContent {
    #[serde(default)]
    pub raw_signals: Vec<RawSignalItem>,
    #[serde(default)]
    pub stages: StageContents,
}
