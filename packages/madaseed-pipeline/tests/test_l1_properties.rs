//! Property coverage for L1's 1:1 raw-signal/metadata linkage.

use madaseed_pipeline::SeedPipeline;
use madaseed_schema::{wire, DataComponent, InputEvent};
use proptest::prelude::*;

fn component_strategy() -> impl Strategy<Value = DataComponent> {
    let role = prop_oneof![
        Just("primary_text_content".to_string()),
        Just("attachment_reference".to_string()),
        "[a-z_]{1,16}",
    ];
    let media = prop::option::of(prop_oneof![
        Just("text/plain".to_string()),
        Just("text/uri-list".to_string()),
        Just("application/pdf".to_string()),
        Just("application/x-custom".to_string()),
        Just("image/png".to_string()),
    ]);
    (role, "[ -~]{0,48}", prop::option::of(0u64..65_536), media).prop_map(
        |(role_hint, content_handle, byte_size_hint, media_type_hint)| DataComponent {
            role_hint,
            content_handle,
            byte_size_hint,
            media_type_hint,
        },
    )
}

proptest! {
    #[test]
    fn l1_links_one_metadata_entry_per_component(
        components in prop::collection::vec(component_strategy(), 1..8)
    ) {
        let event = InputEvent {
            reception_timestamp: "2024-05-01T12:00:00Z".to_string(),
            origin_hint: Some("prop".to_string()),
            data_components: components.clone(),
        };
        let seed = madaseed_pipeline::startle(&event);
        let l1 = &seed.seed_content.stages.l1_startle;

        prop_assert_eq!(seed.seed_content.raw_signals.len(), components.len());
        prop_assert_eq!(l1.signal_components.len(), components.len());

        // Every metadata entry references exactly one raw signal.
        for meta in &l1.signal_components {
            let referenced = seed
                .seed_content
                .raw_signals
                .iter()
                .filter(|rs| rs.raw_input_id == meta.raw_signal_ref_uid)
                .count();
            prop_assert_eq!(referenced, 1);
        }

        // And no raw signal is orphaned.
        for raw in &seed.seed_content.raw_signals {
            prop_assert!(l1
                .signal_components
                .iter()
                .any(|meta| meta.raw_signal_ref_uid == raw.raw_input_id));
        }
    }

    #[test]
    fn full_run_always_yields_a_terminal_roundtrippable_seed(text in "[ -~]{0,64}") {
        let seed = SeedPipeline::new().run(&InputEvent::from_text(&text, Some("prop")));

        prop_assert!(seed.is_terminal());
        let rehydrated = wire::from_json(&wire::to_json(&seed).unwrap()).unwrap();
        prop_assert_eq!(seed, rehydrated);
    }
}
