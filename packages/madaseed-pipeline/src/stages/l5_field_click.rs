//! L5 FieldClick
//!
//! Resolves the field instance (the shared interaction space) the Seed
//! participates in. Like L3 and L4, a pure passthrough of earlier containers.

use crate::error::Result;
use crate::stages::prior_stage_blocker;
use madaseed_schema::clock;
use madaseed_schema::content::L5FieldContent;
use madaseed_schema::trace::L5Trace;
use madaseed_schema::{CruxUid, L5EpistemicState, Seed, StageId};
use std::collections::BTreeSet;
use tracing::{error, info};

pub const UID_HINT_FIELD_INSTANCE: &str = "field_instance";

pub fn field_click(mut seed: Seed, field_override: Option<&CruxUid>) -> Seed {
    if let Some(blocker) = prior_stage_blocker(&seed, StageId::L5FieldClick) {
        let detail = blocker.to_string();
        error!(seed_id = %seed.seed_id, error = %detail, "L5 field_click failed internally");
        let completed_at = clock::now_no_earlier_than(seed.latest_timestamp());
        seed.mark_internal_failure(StageId::L5FieldClick, &detail, completed_at);
        return seed;
    }

    match build_content(&seed, field_override) {
        Ok(content) => {
            let completed_at = clock::now_no_earlier_than(seed.latest_timestamp());
            seed.trace_metadata.l5_trace = L5Trace {
                epistemic_state: content.epistemic_state,
                completion_timestamp: Some(completed_at),
                field_instance_uid: content.field_instance_uid.clone(),
                override_applied: content.override_applied,
                error_details: None,
                ..Default::default()
            };
            info!(
                seed_id = %seed.seed_id,
                state = %content.epistemic_state,
                "L5 field_click complete"
            );
            seed.seed_content.stages.l5_field = content;
            seed
        }
        Err(err) => {
            let detail = format!("L5 field_click internal failure ({}): {}", err.class(), err);
            error!(seed_id = %seed.seed_id, error = %err, "L5 field_click failed internally");
            let completed_at = clock::now_no_earlier_than(seed.latest_timestamp());
            seed.mark_internal_failure(StageId::L5FieldClick, &detail, completed_at);
            seed
        }
    }
}

fn build_content(seed: &Seed, field_override: Option<&CruxUid>) -> Result<L5FieldContent> {
    let (field_uid, override_applied) = match field_override {
        Some(uid) => (uid.clone(), true),
        None => (CruxUid::generate(UID_HINT_FIELD_INSTANCE)?, false),
    };

    // Participants: the origin (if named) plus one per distinct component role.
    let l1 = &seed.seed_content.stages.l1_startle;
    let roles: BTreeSet<&str> = l1
        .signal_components
        .iter()
        .map(|c| c.component_role.as_str())
        .collect();
    let participant_count = roles.len() + usize::from(l1.input_origin.is_some());

    Ok(L5FieldContent {
        epistemic_state: L5EpistemicState::FieldBound,
        field_instance_uid: Some(field_uid),
        override_applied,
        participant_count,
        error_details: None,
        ..Default::default()
    })
}
