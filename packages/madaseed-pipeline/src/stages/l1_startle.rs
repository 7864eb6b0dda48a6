//! L1 Startle
//!
//! Ingests the upstream input event and creates the Seed: one raw-signal
//! entry plus one metadata entry per data component, 1:1 linked by generated
//! uid. An empty component list yields exactly one synthetic placeholder
//! entry instead of failing. Internal errors (malformed reception timestamp,
//! uid generation failure) never reach the caller; they produce a well-formed
//! errored Seed with L1 classified `FailedInternal`.

use crate::error::{Result, StageError};
use madaseed_schema::clock;
use madaseed_schema::content::{
    L1StartleContent, RawSignalItem, SignalComponentMetadata, EMPTY_INPUT_SENTINEL,
    ROLE_PLACEHOLDER_EMPTY,
};
use madaseed_schema::trace::L1Trace;
use madaseed_schema::{
    CruxUid, EncodingStatus, InputEvent, L1EpistemicState, Seed, StageId, UID_HINT_TRACE_EVENT,
};
use tracing::{error, info};

pub const UID_HINT_RAW_SIGNAL: &str = "raw_signal_content";
pub const UID_HINT_RAW_PLACEHOLDER: &str = "raw_signal_placeholder";

/// Media hints classified as binary regardless of their top-level type. A URI
/// list is a reference container, not inline text content.
const BINARY_MEDIA_HINTS: &[&str] = &[
    "application/octet-stream",
    "application/pdf",
    "application/zip",
    "application/msword",
    "text/uri-list",
];

/// Run L1 over an input event, producing the initial Seed.
pub fn startle(event: &InputEvent) -> Seed {
    match build_seed(event) {
        Ok(seed) => {
            info!(
                seed_id = %seed.seed_id,
                components = seed.seed_content.raw_signals.len(),
                "L1 startle complete"
            );
            seed
        }
        Err(err) => {
            let detail = format!("L1 startle internal failure ({}): {}", err.class(), err);
            error!(error = %err, class = %err.class(), "L1 startle failed internally");

            let mut seed = Seed::error_seed(StageId::L1Startle, &detail);
            seed.seed_content.stages.l1_startle.input_origin = event.origin_hint.clone();
            seed.trace_metadata.l1_trace.input_origin = event.origin_hint.clone();
            seed
        }
    }
}

fn build_seed(event: &InputEvent) -> Result<Seed> {
    // Validate the host-supplied reception timestamp before anything else.
    let received_at =
        clock::parse_utc(&event.reception_timestamp).map_err(|source| StageError::Timestamp {
            raw: event.reception_timestamp.clone(),
            source,
        })?;

    let seed_id = CruxUid::generate(UID_HINT_TRACE_EVENT)?;
    let creation_time = clock::now_no_earlier_than(Some(received_at));

    let mut raw_signals = Vec::new();
    let mut signal_components = Vec::new();

    if event.data_components.is_empty() {
        // Zero components: synthesize exactly one placeholder entry.
        let uid = CruxUid::generate(UID_HINT_RAW_PLACEHOLDER)?;
        raw_signals.push(RawSignalItem {
            raw_input_id: uid.clone(),
            raw_input_signal: EMPTY_INPUT_SENTINEL.to_string(),
        });
        signal_components.push(SignalComponentMetadata {
            component_role: ROLE_PLACEHOLDER_EMPTY.to_string(),
            raw_signal_ref_uid: uid,
            byte_size_hint: 0,
            media_type_hint: None,
            encoding_status: EncodingStatus::Unknown,
        });
    } else {
        for component in &event.data_components {
            let uid = CruxUid::generate(UID_HINT_RAW_SIGNAL)?;
            raw_signals.push(RawSignalItem {
                raw_input_id: uid.clone(),
                raw_input_signal: component.content_handle.clone(),
            });
            signal_components.push(SignalComponentMetadata {
                component_role: component.role_hint.clone(),
                raw_signal_ref_uid: uid,
                byte_size_hint: component.effective_byte_size(),
                media_type_hint: component.media_type_hint.clone(),
                encoding_status: classify_encoding(component.media_type_hint.as_deref()),
            });
        }
    }

    let generated_signal_ref_uids: Vec<CruxUid> = signal_components
        .iter()
        .map(|meta| meta.raw_signal_ref_uid.clone())
        .collect();
    let completed_at = clock::now_no_earlier_than(Some(creation_time));

    let mut seed = Seed::new(seed_id);
    seed.seed_content.raw_signals = raw_signals;
    seed.seed_content.stages.l1_startle = L1StartleContent {
        epistemic_state: L1EpistemicState::SignalRefsGenerated,
        trace_creation_time: Some(creation_time),
        input_origin: event.origin_hint.clone(),
        signal_components: signal_components.clone(),
        error_details: None,
        ..Default::default()
    };
    seed.trace_metadata.l1_trace = L1Trace {
        epistemic_state: L1EpistemicState::SignalRefsGenerated,
        completion_timestamp: Some(completed_at),
        creation_time_from_context: Some(creation_time),
        input_origin: event.origin_hint.clone(),
        signal_component_count: signal_components.len(),
        generated_signal_ref_uids,
        error_details: None,
        ..Default::default()
    };

    Ok(seed)
}

/// Encoding classification from the media-type hint. Explicit binary hints
/// win over the `text/*` rule so `text/uri-list` lands as binary.
fn classify_encoding(media_type_hint: Option<&str>) -> EncodingStatus {
    let hint = match media_type_hint {
        Some(h) => h.trim().to_ascii_lowercase(),
        None => return EncodingStatus::Unknown,
    };
    if hint.is_empty() {
        return EncodingStatus::Unknown;
    }
    if BINARY_MEDIA_HINTS.contains(&hint.as_str())
        || hint.starts_with("image/")
        || hint.starts_with("audio/")
        || hint.starts_with("video/")
    {
        EncodingStatus::DetectedBinary
    } else if hint.starts_with("text/") {
        EncodingStatus::AssumedUtf8
    } else {
        EncodingStatus::PossibleEncodingIssue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use madaseed_schema::{StageDisposition, ROLE_PRIMARY_TEXT};

    #[test]
    fn test_single_text_component() {
        let seed = startle(&InputEvent::from_text("Hello", Some("Test")));

        let l1 = &seed.seed_content.stages.l1_startle;
        assert_eq!(l1.epistemic_state, L1EpistemicState::SignalRefsGenerated);
        assert_eq!(l1.input_origin.as_deref(), Some("Test"));
        assert_eq!(seed.seed_content.raw_signals.len(), 1);
        assert_eq!(seed.seed_content.raw_signals[0].raw_input_signal, "Hello");
        assert_eq!(l1.signal_components.len(), 1);
        assert_eq!(l1.signal_components[0].component_role, ROLE_PRIMARY_TEXT);
        assert_eq!(
            l1.signal_components[0].encoding_status,
            EncodingStatus::AssumedUtf8
        );
    }

    #[test]
    fn test_metadata_links_raw_signals_one_to_one() {
        let event =
            InputEvent::from_text("body", Some("Test")).with_attachment_ref("urn:crux:uid::a::1");
        let seed = startle(&event);

        let l1 = &seed.seed_content.stages.l1_startle;
        assert_eq!(seed.seed_content.raw_signals.len(), 2);
        assert_eq!(l1.signal_components.len(), 2);
        for meta in &l1.signal_components {
            let matches = seed
                .seed_content
                .raw_signals
                .iter()
                .filter(|rs| rs.raw_input_id == meta.raw_signal_ref_uid)
                .count();
            assert_eq!(matches, 1, "metadata entry must reference exactly one raw signal");
        }
    }

    #[test]
    fn test_empty_event_synthesizes_placeholder() {
        let event = InputEvent {
            reception_timestamp: "2024-05-01T12:00:00Z".to_string(),
            origin_hint: Some("Test".to_string()),
            data_components: vec![],
        };
        let seed = startle(&event);

        let l1 = &seed.seed_content.stages.l1_startle;
        assert_eq!(l1.epistemic_state, L1EpistemicState::SignalRefsGenerated);
        assert_eq!(seed.seed_content.raw_signals.len(), 1);
        assert_eq!(
            seed.seed_content.raw_signals[0].raw_input_signal,
            EMPTY_INPUT_SENTINEL
        );
        assert_eq!(l1.signal_components.len(), 1);
        assert_eq!(l1.signal_components[0].component_role, ROLE_PLACEHOLDER_EMPTY);
        assert_eq!(l1.signal_components[0].byte_size_hint, 0);
        assert_eq!(
            l1.signal_components[0].raw_signal_ref_uid.type_hint(),
            Some(UID_HINT_RAW_PLACEHOLDER)
        );
    }

    #[test]
    fn test_malformed_timestamp_degrades_not_panics() {
        let event = InputEvent {
            reception_timestamp: "yesterday-ish".to_string(),
            origin_hint: Some("Test".to_string()),
            data_components: vec![],
        };
        let seed = startle(&event);

        let l1 = &seed.seed_content.stages.l1_startle;
        assert_eq!(l1.epistemic_state, L1EpistemicState::FailedInternal);
        assert!(l1.error_details.as_deref().unwrap().contains("yesterday-ish"));
        assert_eq!(
            seed.trace_metadata.l1_trace.epistemic_state,
            L1EpistemicState::FailedInternal
        );
        assert!(seed.trace_metadata.l1_trace.error_details.is_some());
        // The origin hint survives onto the errored record.
        assert_eq!(l1.input_origin.as_deref(), Some("Test"));
    }

    #[test]
    fn test_completion_not_before_creation() {
        let seed = startle(&InputEvent::from_text("t", None));
        let l1 = &seed.seed_content.stages.l1_startle;
        let creation = l1.trace_creation_time.unwrap();
        let completion = seed.trace_metadata.l1_trace.completion_timestamp.unwrap();
        assert!(completion >= creation);
    }

    #[test]
    fn test_later_stages_remain_placeholder() {
        let seed = startle(&InputEvent::from_text("t", None));
        for (stage, disposition, _) in seed.stage_dispositions() {
            if stage == StageId::L1Startle {
                assert_eq!(disposition, StageDisposition::Completed);
            } else {
                assert_eq!(disposition, StageDisposition::NotStarted);
            }
        }
    }

    #[test]
    fn test_encoding_classification_precedence() {
        assert_eq!(
            classify_encoding(Some("text/plain")),
            EncodingStatus::AssumedUtf8
        );
        assert_eq!(
            classify_encoding(Some("text/uri-list")),
            EncodingStatus::DetectedBinary
        );
        assert_eq!(
            classify_encoding(Some("application/octet-stream")),
            EncodingStatus::DetectedBinary
        );
        assert_eq!(
            classify_encoding(Some("image/png")),
            EncodingStatus::DetectedBinary
        );
        assert_eq!(
            classify_encoding(Some("application/x-madaseed")),
            EncodingStatus::PossibleEncodingIssue
        );
        assert_eq!(classify_encoding(None), EncodingStatus::Unknown);
        assert_eq!(classify_encoding(Some("  ")), EncodingStatus::Unknown);
    }

    #[test]
    fn test_seed_id_doubles_as_trace_id() {
        let seed = startle(&InputEvent::from_text("x", None));
        assert_eq!(seed.seed_id, seed.trace_metadata.trace_id);
        assert_eq!(seed.seed_id.type_hint(), Some(UID_HINT_TRACE_EVENT));
        assert_eq!(
            seed.trace_metadata.l1_trace.signal_component_count,
            seed.seed_content.stages.l1_startle.signal_components.len()
        );
    }
}
