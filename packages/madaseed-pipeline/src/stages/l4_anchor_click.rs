//! L4 AnchorClick
//!
//! Anchors the interpretation to a persona profile. The override, when
//! present, scopes the binding decision; otherwise a default profile id is
//! generated for this Seed.

use crate::error::Result;
use crate::stages::prior_stage_blocker;
use madaseed_schema::clock;
use madaseed_schema::content::L4AnchorContent;
use madaseed_schema::trace::L4Trace;
use madaseed_schema::{CruxUid, L4EpistemicState, Seed, StageId};
use tracing::{error, info};

pub const UID_HINT_PERSONA_PROFILE: &str = "persona_profile";

pub fn anchor_click(mut seed: Seed, persona_override: Option<&CruxUid>) -> Seed {
    if let Some(blocker) = prior_stage_blocker(&seed, StageId::L4AnchorClick) {
        let detail = blocker.to_string();
        error!(seed_id = %seed.seed_id, error = %detail, "L4 anchor_click failed internally");
        let completed_at = clock::now_no_earlier_than(seed.latest_timestamp());
        seed.mark_internal_failure(StageId::L4AnchorClick, &detail, completed_at);
        return seed;
    }

    match build_content(&seed, persona_override) {
        Ok(content) => {
            let completed_at = clock::now_no_earlier_than(seed.latest_timestamp());
            seed.trace_metadata.l4_trace = L4Trace {
                epistemic_state: content.epistemic_state,
                completion_timestamp: Some(completed_at),
                persona_profile_uid: content.persona_profile_uid.clone(),
                override_applied: content.override_applied,
                error_details: None,
                ..Default::default()
            };
            info!(
                seed_id = %seed.seed_id,
                state = %content.epistemic_state,
                "L4 anchor_click complete"
            );
            seed.seed_content.stages.l4_anchor = content;
            seed
        }
        Err(err) => {
            let detail = format!("L4 anchor_click internal failure ({}): {}", err.class(), err);
            error!(seed_id = %seed.seed_id, error = %err, "L4 anchor_click failed internally");
            let completed_at = clock::now_no_earlier_than(seed.latest_timestamp());
            seed.mark_internal_failure(StageId::L4AnchorClick, &detail, completed_at);
            seed
        }
    }
}

fn build_content(seed: &Seed, persona_override: Option<&CruxUid>) -> Result<L4AnchorContent> {
    let (persona_uid, override_applied) = match persona_override {
        Some(uid) => (uid.clone(), true),
        None => (CruxUid::generate(UID_HINT_PERSONA_PROFILE)?, false),
    };

    let anchor_note = seed
        .seed_content
        .stages
        .l1_startle
        .input_origin
        .as_ref()
        .map(|origin| format!("anchored for origin {}", origin));

    Ok(L4AnchorContent {
        epistemic_state: L4EpistemicState::Anchored,
        persona_profile_uid: Some(persona_uid),
        override_applied,
        anchor_note,
        error_details: None,
        ..Default::default()
    })
}
