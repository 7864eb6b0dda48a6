//! The Seed record
//!
//! Top-level append-only provenance-and-content record threaded through the
//! seven stages. The seed id is assigned once at L1, doubles as the trace id,
//! and is never regenerated. The Seed exclusively owns all containers and
//! trace records.

use crate::clock;
use crate::content::SeedContent;
use crate::qa_qc::QaQcAssessment;
use crate::stage::StageId;
use crate::states::{
    L1EpistemicState, L2EpistemicState, L3EpistemicState, L4EpistemicState, L5EpistemicState,
    L6EpistemicState, L7EpistemicState, StageDisposition,
};
use crate::trace::TraceMetadata;
use crate::uid::CruxUid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SEED_SCHEMA_VERSION: &str = "0.3.0";

/// UID type hint for the seed/trace id generated at L1.
pub const UID_HINT_TRACE_EVENT: &str = "trace_event_L1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    pub version: String,
    pub seed_id: CruxUid,
    pub seed_content: SeedContent,
    pub trace_metadata: TraceMetadata,
    #[serde(default)]
    pub seed_qa_qc: QaQcAssessment,
    #[serde(default)]
    pub seed_completion_timestamp: Option<DateTime<Utc>>,
}

impl Seed {
    /// A fresh Seed shell: all containers and trace records at placeholder
    /// defaults, QA/QC not yet assessed, completion timestamp unset.
    pub fn new(seed_id: CruxUid) -> Self {
        let trace_metadata = TraceMetadata::new(seed_id.clone());
        Self {
            version: SEED_SCHEMA_VERSION.to_string(),
            seed_id,
            seed_content: SeedContent::default(),
            trace_metadata,
            seed_qa_qc: QaQcAssessment::default(),
            seed_completion_timestamp: None,
        }
    }

    /// Synthesize a well-formed errored Seed with a best-effort id and
    /// `FailedInternal` recorded at the detecting stage, in both the content
    /// container and the trace record.
    pub fn error_seed(detecting_stage: StageId, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        let mut seed = Seed::new(CruxUid::error_fallback());
        let now = clock::now_utc();

        seed.seed_content.stages.l1_startle.trace_creation_time = Some(now);
        seed.mark_internal_failure(detecting_stage, &detail, now);
        seed
    }

    /// Record `FailedInternal` at `stage` with the given error text, stamping
    /// the trace completion timestamp. Used for synthesized error Seeds.
    pub fn mark_internal_failure(
        &mut self,
        stage: StageId,
        detail: &str,
        completed_at: DateTime<Utc>,
    ) {
        let stages = &mut self.seed_content.stages;
        let traces = &mut self.trace_metadata;
        match stage {
            StageId::L1Startle => {
                stages.l1_startle.epistemic_state = L1EpistemicState::FailedInternal;
                stages.l1_startle.error_details = Some(detail.to_string());
                traces.l1_trace.epistemic_state = L1EpistemicState::FailedInternal;
                traces.l1_trace.error_details = Some(detail.to_string());
                traces.l1_trace.completion_timestamp = Some(completed_at);
            }
            StageId::L2FrameClick => {
                stages.l2_frame.epistemic_state = L2EpistemicState::FailedInternal;
                stages.l2_frame.error_details = Some(detail.to_string());
                traces.l2_trace.epistemic_state = L2EpistemicState::FailedInternal;
                traces.l2_trace.error_details = Some(detail.to_string());
                traces.l2_trace.completion_timestamp = Some(completed_at);
            }
            StageId::L3KeymapClick => {
                stages.l3_keymap.epistemic_state = L3EpistemicState::FailedInternal;
                stages.l3_keymap.error_details = Some(detail.to_string());
                traces.l3_trace.epistemic_state = L3EpistemicState::FailedInternal;
                traces.l3_trace.error_details = Some(detail.to_string());
                traces.l3_trace.completion_timestamp = Some(completed_at);
            }
            StageId::L4AnchorClick => {
                stages.l4_anchor.epistemic_state = L4EpistemicState::FailedInternal;
                stages.l4_anchor.error_details = Some(detail.to_string());
                traces.l4_trace.epistemic_state = L4EpistemicState::FailedInternal;
                traces.l4_trace.error_details = Some(detail.to_string());
                traces.l4_trace.completion_timestamp = Some(completed_at);
            }
            StageId::L5FieldClick => {
                stages.l5_field.epistemic_state = L5EpistemicState::FailedInternal;
                stages.l5_field.error_details = Some(detail.to_string());
                traces.l5_trace.epistemic_state = L5EpistemicState::FailedInternal;
                traces.l5_trace.error_details = Some(detail.to_string());
                traces.l5_trace.completion_timestamp = Some(completed_at);
            }
            StageId::L6ReflectBoom => {
                stages.l6_reflection.epistemic_state = L6EpistemicState::FailedInternal;
                stages.l6_reflection.error_details = Some(detail.to_string());
                traces.l6_trace.epistemic_state = L6EpistemicState::FailedInternal;
                traces.l6_trace.error_details = Some(detail.to_string());
                traces.l6_trace.completion_timestamp = Some(completed_at);
            }
            StageId::L7ApplyDone => {
                stages.l7_application.epistemic_state = L7EpistemicState::FailedInternal;
                stages.l7_application.error_details = Some(detail.to_string());
                traces.l7_trace.epistemic_state = L7EpistemicState::FailedInternal;
                traces.l7_trace.error_details = Some(detail.to_string());
                traces.l7_trace.completion_timestamp = Some(completed_at);
            }
        }
    }

    /// Per-stage dispositions read from the content containers, with any
    /// recorded error detail.
    pub fn stage_dispositions(&self) -> Vec<(StageId, StageDisposition, Option<String>)> {
        let s = &self.seed_content.stages;
        vec![
            (
                StageId::L1Startle,
                s.l1_startle.epistemic_state.disposition(),
                s.l1_startle.error_details.clone(),
            ),
            (
                StageId::L2FrameClick,
                s.l2_frame.epistemic_state.disposition(),
                s.l2_frame.error_details.clone(),
            ),
            (
                StageId::L3KeymapClick,
                s.l3_keymap.epistemic_state.disposition(),
                s.l3_keymap.error_details.clone(),
            ),
            (
                StageId::L4AnchorClick,
                s.l4_anchor.epistemic_state.disposition(),
                s.l4_anchor.error_details.clone(),
            ),
            (
                StageId::L5FieldClick,
                s.l5_field.epistemic_state.disposition(),
                s.l5_field.error_details.clone(),
            ),
            (
                StageId::L6ReflectBoom,
                s.l6_reflection.epistemic_state.disposition(),
                s.l6_reflection.error_details.clone(),
            ),
            (
                StageId::L7ApplyDone,
                s.l7_application.epistemic_state.disposition(),
                s.l7_application.error_details.clone(),
            ),
        ]
    }

    /// Per-stage dispositions read from the trace records. Must agree with
    /// `stage_dispositions`; the two sections are views of one timeline.
    pub fn trace_dispositions(&self) -> Vec<(StageId, StageDisposition)> {
        let t = &self.trace_metadata;
        vec![
            (StageId::L1Startle, t.l1_trace.epistemic_state.disposition()),
            (
                StageId::L2FrameClick,
                t.l2_trace.epistemic_state.disposition(),
            ),
            (
                StageId::L3KeymapClick,
                t.l3_trace.epistemic_state.disposition(),
            ),
            (
                StageId::L4AnchorClick,
                t.l4_trace.epistemic_state.disposition(),
            ),
            (
                StageId::L5FieldClick,
                t.l5_trace.epistemic_state.disposition(),
            ),
            (
                StageId::L6ReflectBoom,
                t.l6_trace.epistemic_state.disposition(),
            ),
            (
                StageId::L7ApplyDone,
                t.l7_trace.epistemic_state.disposition(),
            ),
        ]
    }

    /// Latest instant recorded anywhere in the Seed; floor for the next
    /// stage's completion timestamp.
    pub fn latest_timestamp(&self) -> Option<DateTime<Utc>> {
        let mut latest = self.seed_content.stages.l1_startle.trace_creation_time;
        for stage in StageId::ALL {
            let completion = self.trace_metadata.completion_of(stage);
            if completion > latest {
                latest = completion;
            }
        }
        if self.seed_completion_timestamp > latest {
            latest = self.seed_completion_timestamp;
        }
        latest
    }

    pub fn has_internal_failure(&self) -> bool {
        self.stage_dispositions()
            .iter()
            .any(|(_, d, _)| *d == StageDisposition::FailedInternal)
    }

    /// Terminal once L7 set the completion timestamp or a stage entered a
    /// fatal classification.
    pub fn is_terminal(&self) -> bool {
        self.seed_completion_timestamp.is_some() || self.has_internal_failure()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_seed() -> Seed {
        Seed::new(CruxUid::generate(UID_HINT_TRACE_EVENT).unwrap())
    }

    #[test]
    fn test_new_seed_shell() {
        let seed = fresh_seed();
        assert_eq!(seed.version, SEED_SCHEMA_VERSION);
        assert_eq!(seed.seed_id, seed.trace_metadata.trace_id);
        assert!(seed.seed_completion_timestamp.is_none());
        assert!(!seed.is_terminal());
        for (_, disposition, _) in seed.stage_dispositions() {
            assert_eq!(disposition, StageDisposition::NotStarted);
        }
    }

    #[test]
    fn test_error_seed_marks_detecting_stage() {
        let seed = Seed::error_seed(StageId::L3KeymapClick, "deserialization failed");
        assert!(seed.has_internal_failure());
        assert!(seed.is_terminal());
        assert_eq!(
            seed.seed_content.stages.l3_keymap.epistemic_state,
            L3EpistemicState::FailedInternal
        );
        assert_eq!(
            seed.trace_metadata.l3_trace.error_details.as_deref(),
            Some("deserialization failed")
        );
        assert!(seed
            .trace_metadata
            .l3_trace
            .completion_timestamp
            .is_some());
        assert_eq!(seed.seed_id.type_hint(), Some("error_seed"));

        // Untouched stages stay at placeholder defaults.
        assert_eq!(
            seed.seed_content.stages.l2_frame.epistemic_state,
            L2EpistemicState::NotStarted
        );
    }

    #[test]
    fn test_content_and_trace_views_agree_after_failure() {
        let seed = Seed::error_seed(StageId::L6ReflectBoom, "boom");
        let content: Vec<_> = seed
            .stage_dispositions()
            .into_iter()
            .map(|(s, d, _)| (s, d))
            .collect();
        assert_eq!(content, seed.trace_dispositions());
    }

    #[test]
    fn test_latest_timestamp_tracks_completions() {
        let mut seed = fresh_seed();
        assert!(seed.latest_timestamp().is_none());

        let t0 = clock::now_utc();
        seed.seed_content.stages.l1_startle.trace_creation_time = Some(t0);
        assert_eq!(seed.latest_timestamp(), Some(t0));

        let t1 = t0 + chrono::Duration::seconds(5);
        seed.trace_metadata.l1_trace.completion_timestamp = Some(t1);
        assert_eq!(seed.latest_timestamp(), Some(t1));
    }
}
