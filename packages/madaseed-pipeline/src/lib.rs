/*
 * MadaSeed Pipeline
 *
 * Seven-stage epistemic seed processing: L1 Startle ingests an external
 * input event and creates the Seed; L2 FrameClick through L6 ReflectBoom
 * each advance it by exactly one stage; L7 ApplyDone terminalizes it with
 * the final application object and the QA/QC verdict.
 *
 * Stages never raise: every failure is classified and recorded inside the
 * Seed, and the pipeline always returns a well-formed value. Hosts can run
 * the whole pipeline or invoke stages as separate graph nodes across a JSON
 * serialization boundary.
 */

pub mod error;
pub mod orchestrator;
pub mod stages;
pub mod store;

// Re-exports
pub use error::{ErrorClass, StageError};
pub use orchestrator::{PipelineOverrides, SeedPipeline};
pub use stages::{
    anchor_click, apply_done, field_click, frame_click, keymap_click, reflect_boom, startle,
};
pub use store::{InMemorySeedStore, SeedStore, StoreError, StoreFilter, StoredObject};

/// Install a global tracing subscriber honoring `RUST_LOG`, defaulting to
/// `info`. Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
