/*
 * MadaSeed Schema
 *
 * Data model for the epistemic seed processing pipeline: the Seed record
 * (content containers + trace metadata + QA/QC verdict), typed CRUX
 * identifiers, the timestamp service, the upstream input-event contract and
 * the JSON wire boundary crossed between stages.
 *
 * The Seed is append-only: each stage populates exactly its own container and
 * trace slot, everything earlier is preserved, everything later stays at
 * placeholder defaults.
 */

pub mod clock;
pub mod content;
pub mod event;
pub mod qa_qc;
pub mod seed;
pub mod stage;
pub mod states;
pub mod trace;
pub mod uid;
pub mod wire;

// Re-exports
pub use content::{
    BacklogMutation, CommContextDisposition, L1StartleContent, L2FrameContent, L3KeymapContent,
    L4AnchorContent, L5FieldContent, L6ReflectionContent, L7ApplicationContent, LoopKind,
    MultimodalComponent, NextStepOption, RawSignalItem, ReflectionPayload, SeedContent,
    SeedOutput, SignalComponentMetadata, StageContents, EMPTY_INPUT_SENTINEL,
    ROLE_PLACEHOLDER_EMPTY,
};
pub use event::{CommContext, DataComponent, InputEvent, ROLE_ATTACHMENT_REF, ROLE_PRIMARY_TEXT};
pub use qa_qc::{QaQcAssessment, SeedIntegrity, StageFlag};
pub use seed::{Seed, SEED_SCHEMA_VERSION, UID_HINT_TRACE_EVENT};
pub use stage::StageId;
pub use states::{
    EncodingStatus, L1EpistemicState, L2EpistemicState, L3EpistemicState, L4EpistemicState,
    L5EpistemicState, L6EpistemicState, L7EpistemicState, ParseStateError, StageDisposition,
};
pub use trace::{
    L1Trace, L2Trace, L3Trace, L4Trace, L5Trace, L6Trace, L7Trace, TraceMetadata,
};
pub use uid::{CruxUid, UidError};
pub use wire::{from_json, to_json, WireError};
