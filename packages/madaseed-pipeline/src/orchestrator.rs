//! Pipeline orchestrator
//!
//! Drives L1..L7 in fixed order, threading the Seed from stage to stage.
//! Hosts may also invoke single stages as separate graph nodes, persisting
//! the Seed between them; the JSON entry points tolerate a pre-serialized
//! Seed at any boundary and synthesize an error Seed on a malformed document
//! instead of aborting.

use crate::error::StageError;
use crate::stages;
use madaseed_schema::{wire, CommContext, CruxUid, InputEvent, Seed, StageId, WireError};
use tracing::{error, info};

/// Optional per-stage overrides threaded by the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct PipelineOverrides {
    pub l2_comm_context: Option<CommContext>,
    pub l3_keymap_binding: Option<CruxUid>,
    pub l4_persona_profile: Option<CruxUid>,
    pub l5_field_instance: Option<CruxUid>,
    pub l6_presentation_intent: Option<String>,
    pub l7_action_intent: Option<String>,
}

/// The seven-stage pipeline with its configured overrides.
#[derive(Debug, Clone, Default)]
pub struct SeedPipeline {
    overrides: PipelineOverrides,
}

impl SeedPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: PipelineOverrides) -> Self {
        Self { overrides }
    }

    /// Whole-pipeline entry point: L1..L7 in fixed order.
    pub fn run(&self, event: &InputEvent) -> Seed {
        info!("starting seed pipeline run");
        self.continue_from_l2(stages::startle(event))
    }

    /// Run L2..L7 over an already-started Seed.
    fn continue_from_l2(&self, mut seed: Seed) -> Seed {
        for stage in &StageId::ALL[1..] {
            debug_assert!(
                self.previous_completed(&seed, *stage),
                "stage {} started before its predecessor completed",
                stage
            );
            seed = self.dispatch(*stage, seed);
        }

        info!(
            seed_id = %seed.seed_id,
            verdict = %seed.seed_qa_qc.overall_integrity,
            "seed pipeline run finished"
        );
        seed
    }

    /// Single-stage entry point for graph hosts holding a deserialized Seed.
    ///
    /// L1 consumes an input event, not a Seed; routing it here is a host
    /// contract violation and yields an error Seed rather than a panic.
    pub fn run_stage(&self, stage: StageId, seed: Seed) -> Seed {
        match stage {
            StageId::L1Startle => {
                error!("run_stage invoked for L1, which requires an input event");
                Seed::error_seed(
                    StageId::L1Startle,
                    "L1 startle consumes an input event, not a seed document",
                )
            }
            _ => self.dispatch(stage, seed),
        }
    }

    /// Whole-pipeline entry point from a serialized input event. A malformed
    /// event yields an error Seed at L1 and the pipeline continues over it
    /// rather than aborting.
    pub fn run_json(&self, event_json: &str) -> Seed {
        match serde_json::from_str::<InputEvent>(event_json) {
            Ok(event) => self.run(&event),
            Err(err) => {
                let err = StageError::Wire(WireError::Deserialize(err));
                error!(error = %err, class = %err.class(), "input event deserialization failed");
                let seed = Seed::error_seed(
                    StageId::L1Startle,
                    format!("input event deserialization failed: {}", err),
                );
                self.continue_from_l2(seed)
            }
        }
    }

    /// Single-stage entry point from a serialized boundary document.
    ///
    /// For L1 the document is an input event; for every other stage it is a
    /// Seed. A malformed document becomes an error Seed with `FailedInternal`
    /// at the detecting stage, and processing continues from there.
    pub fn run_stage_json(&self, stage: StageId, raw: &str) -> Seed {
        match stage {
            StageId::L1Startle => match serde_json::from_str::<InputEvent>(raw) {
                Ok(event) => stages::startle(&event),
                Err(err) => {
                    let err = StageError::Wire(WireError::Deserialize(err));
                    error!(error = %err, class = %err.class(), "input event deserialization failed");
                    Seed::error_seed(
                        stage,
                        format!("input event deserialization failed: {}", err),
                    )
                }
            },
            _ => match wire::from_json(raw) {
                Ok(seed) => self.dispatch(stage, seed),
                Err(err) => {
                    let err = StageError::from(err);
                    error!(stage = %stage, error = %err, class = %err.class(), "seed deserialization failed");
                    self.dispatch(stage, Seed::error_seed(stage, err.to_string()))
                }
            },
        }
    }

    fn dispatch(&self, stage: StageId, seed: Seed) -> Seed {
        let o = &self.overrides;
        match stage {
            StageId::L1Startle => seed, // unreachable via public entry points
            StageId::L2FrameClick => stages::frame_click(seed, o.l2_comm_context.as_ref()),
            StageId::L3KeymapClick => stages::keymap_click(seed, o.l3_keymap_binding.as_ref()),
            StageId::L4AnchorClick => stages::anchor_click(seed, o.l4_persona_profile.as_ref()),
            StageId::L5FieldClick => stages::field_click(seed, o.l5_field_instance.as_ref()),
            StageId::L6ReflectBoom => {
                stages::reflect_boom(seed, o.l6_presentation_intent.as_deref())
            }
            StageId::L7ApplyDone => stages::apply_done(seed, o.l7_action_intent.as_deref()),
        }
    }

    /// Invariant check: stage N+1 never starts before stage N's trace
    /// completion timestamp is set.
    fn previous_completed(&self, seed: &Seed, stage: StageId) -> bool {
        match stage.predecessor() {
            Some(prev) => seed.trace_metadata.completion_of(prev).is_some(),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use madaseed_schema::{
        L1EpistemicState, L7EpistemicState, SeedIntegrity, StageDisposition,
    };

    #[test]
    fn test_full_run_terminalizes() {
        let pipeline = SeedPipeline::new();
        let seed = pipeline.run(&InputEvent::from_text("Hello", Some("Test")));

        assert!(seed.seed_completion_timestamp.is_some());
        assert_ne!(
            seed.seed_qa_qc.overall_integrity,
            SeedIntegrity::NotYetAssessed
        );
        for (_, disposition, _) in seed.stage_dispositions() {
            assert_ne!(disposition, StageDisposition::NotStarted);
        }
    }

    #[test]
    fn test_overrides_are_threaded() {
        let persona = CruxUid::generate("persona_profile").unwrap();
        let pipeline = SeedPipeline::with_overrides(PipelineOverrides {
            l4_persona_profile: Some(persona.clone()),
            l6_presentation_intent: Some("structured_data".to_string()),
            ..Default::default()
        });
        let seed = pipeline.run(&InputEvent::from_text("Hello", Some("Test")));

        assert_eq!(
            seed.seed_content.stages.l4_anchor.persona_profile_uid.as_ref(),
            Some(&persona)
        );
        assert_eq!(
            seed.trace_metadata.l6_trace.payload_kind.as_deref(),
            Some("structured_data")
        );
    }

    #[test]
    fn test_run_stage_accepts_serialized_seed() {
        let pipeline = SeedPipeline::new();
        let l1 = stages::startle(&InputEvent::from_text("Hello", None));
        let doc = wire::to_json(&l1).unwrap();

        let l2 = pipeline.run_stage_json(StageId::L2FrameClick, &doc);
        assert!(l2
            .trace_metadata
            .completion_of(StageId::L2FrameClick)
            .is_some());
        // The seed id survives the boundary unchanged.
        assert_eq!(l2.seed_id, l1.seed_id);
    }

    #[test]
    fn test_malformed_boundary_document_becomes_error_seed() {
        let pipeline = SeedPipeline::new();
        let seed = pipeline.run_stage_json(StageId::L4AnchorClick, "{{{ not json");

        assert_eq!(
            seed.seed_content.stages.l4_anchor.epistemic_state.disposition(),
            StageDisposition::FailedInternal
        );
        assert_eq!(seed.seed_id.type_hint(), Some("error_seed"));
    }

    #[test]
    fn test_malformed_input_event_becomes_error_seed() {
        let pipeline = SeedPipeline::new();
        let seed = pipeline.run_json("not an event");
        assert_eq!(
            seed.seed_content.stages.l1_startle.epistemic_state,
            L1EpistemicState::FailedInternal
        );
        assert!(seed
            .seed_content
            .stages
            .l1_startle
            .error_details
            .is_some());
        // The pipeline continued instead of aborting: the verdict is computed.
        assert_eq!(
            seed.seed_qa_qc.overall_integrity,
            SeedIntegrity::CompromisedInternalFailure
        );
    }

    #[test]
    fn test_run_stage_rejects_l1_with_seed() {
        let pipeline = SeedPipeline::new();
        let seed = pipeline.run_stage(
            StageId::L1Startle,
            stages::startle(&InputEvent::from_text("x", None)),
        );
        assert_eq!(
            seed.seed_content.stages.l1_startle.epistemic_state,
            L1EpistemicState::FailedInternal
        );
    }

    #[test]
    fn test_internal_failure_propagates_to_verdict() {
        let pipeline = SeedPipeline::new();
        // Malformed timestamp fails L1 internally; the rest of the pipeline
        // still runs and the verdict reports the compromise.
        let event = InputEvent {
            reception_timestamp: "bogus".to_string(),
            origin_hint: None,
            data_components: vec![],
        };
        let mut seed = stages::startle(&event);
        for stage in &StageId::ALL[1..] {
            seed = pipeline.run_stage(*stage, seed);
        }

        assert_eq!(
            seed.seed_qa_qc.overall_integrity,
            SeedIntegrity::CompromisedInternalFailure
        );
        assert_eq!(
            seed.seed_content.stages.l7_application.epistemic_state,
            L7EpistemicState::FailedInternal
        );
        // Well-formed and terminal despite the failure.
        assert!(seed.is_terminal());
    }
}
