//! L2 FrameClick
//!
//! Classifies the communicative frame of the ingested signal. Degraded
//! outcomes are distinct named states (missing vs empty context, ambiguous
//! frame, oversized input) so callers can branch on why framing fell short.

use crate::stages::prior_stage_blocker;
use madaseed_schema::clock;
use madaseed_schema::content::{CommContextDisposition, L2FrameContent};
use madaseed_schema::trace::L2Trace;
use madaseed_schema::{
    CommContext, EncodingStatus, L2EpistemicState, Seed, StageId, ROLE_ATTACHMENT_REF,
    ROLE_PLACEHOLDER_EMPTY,
};
use tracing::{error, info};

/// Inputs larger than this are not framed inline.
pub const MAX_FRAMEABLE_BYTES: u64 = 1_048_576;

pub const FRAME_TEXTUAL: &str = "textual_exchange";
pub const FRAME_REFERENCED_ARTIFACT: &str = "referenced_artifact_exchange";
pub const FRAME_BINARY_ARTIFACT: &str = "binary_artifact_exchange";
pub const FRAME_EMPTY_SIGNAL: &str = "empty_signal_frame";

/// Run L2 over the Seed, populating only the L2 container and trace record.
pub fn frame_click(mut seed: Seed, comm_context: Option<&CommContext>) -> Seed {
    if let Some(blocker) = prior_stage_blocker(&seed, StageId::L2FrameClick) {
        let detail = blocker.to_string();
        error!(seed_id = %seed.seed_id, error = %detail, "L2 frame_click failed internally");
        let completed_at = clock::now_no_earlier_than(seed.latest_timestamp());
        seed.mark_internal_failure(StageId::L2FrameClick, &detail, completed_at);
        return seed;
    }

    let context_disposition = match comm_context {
        None => CommContextDisposition::Absent,
        Some(map) if map.is_empty() => CommContextDisposition::Empty,
        Some(_) => CommContextDisposition::Provided,
    };

    let components = &seed.seed_content.stages.l1_startle.signal_components;
    let input_byte_total: u64 = components.iter().map(|c| c.byte_size_hint).sum();
    let frame_type = classify_frame(&seed);

    let epistemic_state = if input_byte_total > MAX_FRAMEABLE_BYTES {
        L2EpistemicState::InputOversized
    } else if frame_type.is_none() {
        L2EpistemicState::FrameAmbiguous
    } else {
        match context_disposition {
            CommContextDisposition::Absent => L2EpistemicState::CommContextMissing,
            CommContextDisposition::Empty => L2EpistemicState::CommContextEmpty,
            _ => L2EpistemicState::Framed,
        }
    };
    let completed_at = clock::now_no_earlier_than(seed.latest_timestamp());

    seed.seed_content.stages.l2_frame = L2FrameContent {
        epistemic_state,
        frame_type: frame_type.clone(),
        comm_context_disposition: context_disposition,
        comm_context: comm_context.cloned(),
        input_byte_total,
        error_details: None,
        ..Default::default()
    };
    seed.trace_metadata.l2_trace = L2Trace {
        epistemic_state,
        completion_timestamp: Some(completed_at),
        frame_type,
        comm_context_disposition: context_disposition,
        error_details: None,
        ..Default::default()
    };

    info!(
        seed_id = %seed.seed_id,
        state = %epistemic_state,
        bytes = input_byte_total,
        "L2 frame_click complete"
    );
    seed
}

/// Frame classification from the L1 component roles and encodings. `None`
/// means the mix was unclassifiable.
fn classify_frame(seed: &Seed) -> Option<String> {
    let components = &seed.seed_content.stages.l1_startle.signal_components;

    if components
        .iter()
        .any(|c| c.component_role == ROLE_PLACEHOLDER_EMPTY)
    {
        return Some(FRAME_EMPTY_SIGNAL.to_string());
    }
    if components
        .iter()
        .any(|c| c.component_role == ROLE_ATTACHMENT_REF)
    {
        return Some(FRAME_REFERENCED_ARTIFACT.to_string());
    }
    if components
        .iter()
        .all(|c| c.encoding_status == EncodingStatus::AssumedUtf8)
    {
        return Some(FRAME_TEXTUAL.to_string());
    }
    if components
        .iter()
        .all(|c| c.encoding_status == EncodingStatus::DetectedBinary)
    {
        return Some(FRAME_BINARY_ARTIFACT.to_string());
    }
    None
}
