//! L3 KeymapClick
//!
//! Binds the surface keymap used to interpret the signal. Pure passthrough of
//! all earlier containers; only the L3 slot is written.

use crate::error::Result;
use crate::stages::prior_stage_blocker;
use madaseed_schema::clock;
use madaseed_schema::content::L3KeymapContent;
use madaseed_schema::trace::L3Trace;
use madaseed_schema::{
    CruxUid, EncodingStatus, L3EpistemicState, Seed, StageId, ROLE_PLACEHOLDER_EMPTY,
};
use tracing::{error, info};

pub const UID_HINT_KEYMAP_BINDING: &str = "keymap_binding";

pub fn keymap_click(mut seed: Seed, binding_override: Option<&CruxUid>) -> Seed {
    if let Some(blocker) = prior_stage_blocker(&seed, StageId::L3KeymapClick) {
        let detail = blocker.to_string();
        error!(seed_id = %seed.seed_id, error = %detail, "L3 keymap_click failed internally");
        let completed_at = clock::now_no_earlier_than(seed.latest_timestamp());
        seed.mark_internal_failure(StageId::L3KeymapClick, &detail, completed_at);
        return seed;
    }

    match build_content(&seed, binding_override) {
        Ok(content) => {
            let completed_at = clock::now_no_earlier_than(seed.latest_timestamp());
            seed.trace_metadata.l3_trace = L3Trace {
                epistemic_state: content.epistemic_state,
                completion_timestamp: Some(completed_at),
                keymap_binding_uid: content.keymap_binding_uid.clone(),
                override_applied: content.override_applied,
                error_details: None,
                ..Default::default()
            };
            info!(
                seed_id = %seed.seed_id,
                state = %content.epistemic_state,
                "L3 keymap_click complete"
            );
            seed.seed_content.stages.l3_keymap = content;
            seed
        }
        Err(err) => {
            let detail = format!("L3 keymap_click internal failure ({}): {}", err.class(), err);
            error!(seed_id = %seed.seed_id, error = %err, "L3 keymap_click failed internally");
            let completed_at = clock::now_no_earlier_than(seed.latest_timestamp());
            seed.mark_internal_failure(StageId::L3KeymapClick, &detail, completed_at);
            seed
        }
    }
}

fn build_content(seed: &Seed, binding_override: Option<&CruxUid>) -> Result<L3KeymapContent> {
    let components = &seed.seed_content.stages.l1_startle.signal_components;
    let interpretable_component_count = components
        .iter()
        .filter(|c| {
            c.component_role != ROLE_PLACEHOLDER_EMPTY
                && c.encoding_status == EncodingStatus::AssumedUtf8
        })
        .count();

    if interpretable_component_count == 0 {
        // Nothing to interpret: no binding is chosen, the caller must clarify.
        return Ok(L3KeymapContent {
            epistemic_state: L3EpistemicState::ClarificationNeeded,
            keymap_binding_uid: None,
            override_applied: false,
            interpretable_component_count,
            error_details: None,
            ..Default::default()
        });
    }

    let (binding_uid, override_applied) = match binding_override {
        Some(uid) => (uid.clone(), true),
        None => (CruxUid::generate(UID_HINT_KEYMAP_BINDING)?, false),
    };

    Ok(L3KeymapContent {
        epistemic_state: L3EpistemicState::Keymapped,
        keymap_binding_uid: Some(binding_uid),
        override_applied,
        interpretable_component_count,
        error_details: None,
        ..Default::default()
    })
}
