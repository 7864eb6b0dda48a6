//! L6 ReflectBoom
//!
//! Renders the interpreted Seed into exactly one reflection payload shape:
//! formatted text, structured data, a multimodal component list or an API
//! payload. An unrecognized presentation intent defers reflection rather
//! than failing it.

use crate::stages::prior_stage_blocker;
use madaseed_schema::clock;
use madaseed_schema::content::{
    L6ReflectionContent, MultimodalComponent, ReflectionPayload,
};
use madaseed_schema::trace::L6Trace;
use madaseed_schema::{L6EpistemicState, Seed, StageId};
use serde_json::json;
use tracing::{error, info};

pub const INTENT_FORMATTED_TEXT: &str = "formatted_text";
pub const INTENT_STRUCTURED_DATA: &str = "structured_data";
pub const INTENT_MULTIMODAL_PACKAGE: &str = "multimodal_package";
pub const INTENT_API_PAYLOAD: &str = "api_payload";

pub fn reflect_boom(mut seed: Seed, presentation_intent: Option<&str>) -> Seed {
    if let Some(blocker) = prior_stage_blocker(&seed, StageId::L6ReflectBoom) {
        let detail = blocker.to_string();
        error!(seed_id = %seed.seed_id, error = %detail, "L6 reflect_boom failed internally");
        let completed_at = clock::now_no_earlier_than(seed.latest_timestamp());
        seed.mark_internal_failure(StageId::L6ReflectBoom, &detail, completed_at);
        return seed;
    }

    let intent = presentation_intent.unwrap_or(INTENT_FORMATTED_TEXT);
    let payload = match intent {
        INTENT_FORMATTED_TEXT => Some(ReflectionPayload::FormattedText {
            text: collected_text(&seed),
        }),
        INTENT_STRUCTURED_DATA => Some(ReflectionPayload::StructuredData {
            data: structured_view(&seed),
        }),
        INTENT_MULTIMODAL_PACKAGE => Some(ReflectionPayload::MultimodalPackage {
            components: multimodal_components(&seed),
        }),
        INTENT_API_PAYLOAD => Some(ReflectionPayload::ApiPayload {
            endpoint_hint: None,
            body: json!({
                "seed_id": seed.seed_id.as_str(),
                "content": collected_text(&seed),
            }),
        }),
        _ => None,
    };

    let epistemic_state = if payload.is_some() {
        L6EpistemicState::Reflected
    } else {
        L6EpistemicState::Deferred
    };
    let payload_kind = payload.as_ref().map(|p| p.kind().to_string());
    let completed_at = clock::now_no_earlier_than(seed.latest_timestamp());

    seed.seed_content.stages.l6_reflection = L6ReflectionContent {
        epistemic_state,
        presentation_intent: Some(intent.to_string()),
        payload,
        error_details: None,
        ..Default::default()
    };
    seed.trace_metadata.l6_trace = L6Trace {
        epistemic_state,
        completion_timestamp: Some(completed_at),
        presentation_intent: Some(intent.to_string()),
        payload_kind,
        error_details: None,
        ..Default::default()
    };

    info!(
        seed_id = %seed.seed_id,
        state = %epistemic_state,
        intent = intent,
        "L6 reflect_boom complete"
    );
    seed
}

fn collected_text(seed: &Seed) -> String {
    seed.seed_content
        .raw_signals
        .iter()
        .map(|rs| rs.raw_input_signal.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

fn structured_view(seed: &Seed) -> serde_json::Value {
    let stage_states: Vec<serde_json::Value> = seed
        .stage_dispositions()
        .into_iter()
        .map(|(stage, disposition, _)| {
            json!({ "stage": stage.as_str(), "disposition": disposition.as_str() })
        })
        .collect();

    json!({
        "seed_id": seed.seed_id.as_str(),
        "frame_type": seed.seed_content.stages.l2_frame.frame_type,
        "raw_signal_count": seed.seed_content.raw_signals.len(),
        "stage_states": stage_states,
    })
}

fn multimodal_components(seed: &Seed) -> Vec<MultimodalComponent> {
    let metadata = &seed.seed_content.stages.l1_startle.signal_components;
    seed.seed_content
        .raw_signals
        .iter()
        .map(|rs| {
            let media_type = metadata
                .iter()
                .find(|m| m.raw_signal_ref_uid == rs.raw_input_id)
                .and_then(|m| m.media_type_hint.clone())
                .unwrap_or_else(|| "text/plain".to_string());
            MultimodalComponent {
                media_type,
                content: rs.raw_input_signal.clone(),
            }
        })
        .collect()
}
