//! L7 ApplyDone
//!
//! Terminal stage. Encodes the final application object (backlog-mutation
//! intents plus named output streams with next-step choices), sets the Seed
//! completion timestamp (the only stage allowed to) and computes the QA/QC
//! verdict as the pipeline's final act.

use crate::error::Result;
use crate::stages::prior_stage_blocker;
use madaseed_schema::clock;
use madaseed_schema::content::{
    BacklogMutation, L7ApplicationContent, LoopKind, NextStepOption, ReflectionPayload, SeedOutput,
};
use madaseed_schema::trace::L7Trace;
use madaseed_schema::{
    CruxUid, L7EpistemicState, QaQcAssessment, Seed, StageDisposition, StageId,
};
use tracing::{error, info};

pub const UID_HINT_SEED_OUTPUT: &str = "seed_output";

pub const INTENT_PRESENT: &str = "present";
pub const INTENT_DEFER: &str = "defer";

pub const MUTATION_REVIEW_DEGRADED: &str = "review_degraded_stages";
pub const MUTATION_QUARANTINE: &str = "quarantine_seed";

pub const OUTPUT_FINAL_PRESENTATION: &str = "final_presentation";

pub fn apply_done(mut seed: Seed, action_intent: Option<&str>) -> Seed {
    if let Some(blocker) = prior_stage_blocker(&seed, StageId::L7ApplyDone) {
        let detail = blocker.to_string();
        error!(seed_id = %seed.seed_id, error = %detail, "L7 apply_done failed internally");
        return finalize_failed(seed, &detail);
    }

    let intent = action_intent.unwrap_or(INTENT_PRESENT);
    match build_content(&seed, intent) {
        Ok(content) => {
            let completed_at = clock::now_no_earlier_than(seed.latest_timestamp());
            seed.trace_metadata.l7_trace = L7Trace {
                epistemic_state: content.epistemic_state,
                completion_timestamp: Some(completed_at),
                action_intent: content.action_intent.clone(),
                backlog_mutation_count: content.backlog_mutations.len(),
                seed_output_count: content.seed_outputs.len(),
                error_details: None,
                ..Default::default()
            };
            info!(
                seed_id = %seed.seed_id,
                state = %content.epistemic_state,
                outputs = content.seed_outputs.len(),
                "L7 apply_done complete"
            );
            seed.seed_content.stages.l7_application = content;

            // Terminalize: completion timestamp, then the verdict.
            seed.seed_completion_timestamp = Some(completed_at);
            seed.seed_qa_qc =
                QaQcAssessment::from_dispositions(&seed.stage_dispositions(), completed_at);
            seed
        }
        Err(err) => {
            let detail = format!("L7 apply_done internal failure ({}): {}", err.class(), err);
            error!(seed_id = %seed.seed_id, error = %err, "L7 apply_done failed internally");
            finalize_failed(seed, &detail)
        }
    }
}

/// Fatal L7 path: record `FailedInternal`, queue a quarantine mutation and
/// still compute the verdict. The completion timestamp stays unset; the Seed
/// is terminal through the fatal classification instead.
fn finalize_failed(mut seed: Seed, detail: &str) -> Seed {
    let completed_at = clock::now_no_earlier_than(seed.latest_timestamp());
    seed.mark_internal_failure(StageId::L7ApplyDone, detail, completed_at);

    seed.seed_content
        .stages
        .l7_application
        .backlog_mutations
        .push(BacklogMutation {
            loop_kind: LoopKind::Double,
            intent: MUTATION_QUARANTINE.to_string(),
            target_uid: Some(seed.seed_id.clone()),
        });
    seed.trace_metadata.l7_trace.backlog_mutation_count = 1;

    seed.seed_qa_qc = QaQcAssessment::from_dispositions(&seed.stage_dispositions(), completed_at);
    seed
}

fn build_content(seed: &Seed, intent: &str) -> Result<L7ApplicationContent> {
    if intent != INTENT_PRESENT {
        // Deferred application: the Seed still terminalizes, with an empty
        // application object and the intent on record.
        return Ok(L7ApplicationContent {
            epistemic_state: L7EpistemicState::Deferred,
            action_intent: Some(intent.to_string()),
            backlog_mutations: Vec::new(),
            seed_outputs: Vec::new(),
            error_details: None,
            ..Default::default()
        });
    }

    let degraded: Vec<StageId> = seed
        .stage_dispositions()
        .into_iter()
        .filter(|(_, disposition, _)| *disposition == StageDisposition::Degraded)
        .map(|(stage, _, _)| stage)
        .collect();

    let mut backlog_mutations = Vec::new();
    if !degraded.is_empty() {
        backlog_mutations.push(BacklogMutation {
            loop_kind: LoopKind::Single,
            intent: MUTATION_REVIEW_DEGRADED.to_string(),
            target_uid: Some(seed.seed_id.clone()),
        });
    }

    let mut options = vec![NextStepOption {
        label: "archive_seed".to_string(),
        action_ref: Some("sop.archive".to_string()),
    }];
    if !degraded.is_empty() {
        options.push(NextStepOption {
            label: MUTATION_REVIEW_DEGRADED.to_string(),
            action_ref: Some("sop.review".to_string()),
        });
    }

    let output = SeedOutput {
        output_uid: CruxUid::generate(UID_HINT_SEED_OUTPUT)?,
        name: OUTPUT_FINAL_PRESENTATION.to_string(),
        content: presentation_text(seed),
        target_consumer_hint: seed.seed_content.stages.l1_startle.input_origin.clone(),
        options,
    };

    Ok(L7ApplicationContent {
        epistemic_state: L7EpistemicState::Applied,
        action_intent: Some(intent.to_string()),
        backlog_mutations,
        seed_outputs: vec![output],
        error_details: None,
        ..Default::default()
    })
}

/// Render the L6 reflection payload into the output stream's content.
fn presentation_text(seed: &Seed) -> String {
    match seed.seed_content.stages.l6_reflection.payload.as_ref() {
        Some(ReflectionPayload::FormattedText { text }) => text.clone(),
        Some(ReflectionPayload::StructuredData { data }) => data.to_string(),
        Some(ReflectionPayload::MultimodalPackage { components }) => {
            format!("multimodal package with {} component(s)", components.len())
        }
        Some(ReflectionPayload::ApiPayload { body, .. }) => body.to_string(),
        None => String::new(),
    }
}
