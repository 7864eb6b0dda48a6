//! Serialization boundary between stage nodes.
//!
//! Hosts persist and transmit the Seed between stages, so every boundary
//! must survive a serialize/deserialize round trip, and a malformed document
//! must fall back to the error-Seed path instead of raising.

use madaseed_pipeline::SeedPipeline;
use madaseed_schema::{wire, InputEvent, SeedIntegrity, StageDisposition, StageId};

#[test]
fn test_round_trip_is_field_equivalent_at_every_boundary() {
    let pipeline = SeedPipeline::new();
    let mut seed = madaseed_pipeline::startle(&InputEvent::from_text("boundary", Some("Test")));

    for stage in &StageId::ALL[1..] {
        // Cross the wire before each stage, as a graph host would.
        let doc = wire::to_json(&seed).unwrap();
        let rehydrated = wire::from_json(&doc).unwrap();
        assert_eq!(seed, rehydrated, "round trip diverged before {}", stage);

        seed = pipeline.run_stage(*stage, rehydrated);
    }

    // And once more on the terminal Seed.
    let doc = wire::to_json(&seed).unwrap();
    assert_eq!(seed, wire::from_json(&doc).unwrap());
    assert!(seed.seed_completion_timestamp.is_some());
}

#[test]
fn test_stage_by_stage_json_invocation() {
    let pipeline = SeedPipeline::new();
    let event = InputEvent::from_text("per-node", Some("Test"));
    let event_doc = serde_json::to_string(&event).unwrap();

    let mut doc = wire::to_json(&pipeline.run_stage_json(StageId::L1Startle, &event_doc)).unwrap();
    for stage in &StageId::ALL[1..] {
        let seed = pipeline.run_stage_json(*stage, &doc);
        assert!(
            seed.trace_metadata.completion_of(*stage).is_some(),
            "stage {} did not stamp completion",
            stage
        );
        doc = wire::to_json(&seed).unwrap();
    }

    let terminal = wire::from_json(&doc).unwrap();
    assert!(terminal.seed_completion_timestamp.is_some());
    assert_eq!(
        terminal.seed_qa_qc.overall_integrity,
        SeedIntegrity::DegradedRecoverable
    );
}

#[test]
fn test_malformed_document_mid_pipeline_synthesizes_and_continues() {
    let pipeline = SeedPipeline::new();
    let seed = pipeline.run_stage_json(StageId::L5FieldClick, "{\"seed\": \"truncated");

    // Detecting stage carries the failure; the stage then ran over the
    // synthesized Seed, so its trace completion is set.
    assert_eq!(
        seed.stage_dispositions()[4].1,
        StageDisposition::FailedInternal
    );
    assert!(seed
        .trace_metadata
        .completion_of(StageId::L5FieldClick)
        .is_some());
    assert_eq!(seed.seed_id.type_hint(), Some("error_seed"));

    // The synthesized Seed keeps flowing through later stages.
    let seed = pipeline.run_stage(StageId::L6ReflectBoom, seed);
    let seed = pipeline.run_stage(StageId::L7ApplyDone, seed);
    assert_eq!(
        seed.seed_qa_qc.overall_integrity,
        SeedIntegrity::CompromisedInternalFailure
    );
}

#[test]
fn test_unknown_fields_are_tolerated() {
    let seed = madaseed_pipeline::startle(&InputEvent::from_text("extra", None));
    let mut doc: serde_json::Value =
        serde_json::from_str(&wire::to_json(&seed).unwrap()).unwrap();
    doc.as_object_mut()
        .unwrap()
        .insert("x_host_annotation".to_string(), serde_json::json!({"a": 1}));

    let rehydrated = wire::from_json(&doc.to_string()).unwrap();
    assert_eq!(seed, rehydrated);
}
