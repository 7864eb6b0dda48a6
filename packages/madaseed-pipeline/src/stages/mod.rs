//! Stage processors L1..L7
//!
//! One module per stage. Shared contract: input = current Seed (plus an
//! optional stage-specific override), output = Seed with exactly that stage's
//! container and trace record populated. Earlier stages are untouched, later
//! stages stay at placeholder defaults, and no stage ever returns an error:
//! every failure is recorded inside the Seed.

pub mod l1_startle;
pub mod l2_frame_click;
pub mod l3_keymap_click;
pub mod l4_anchor_click;
pub mod l5_field_click;
pub mod l6_reflect_boom;
pub mod l7_apply_done;

pub use l1_startle::startle;
pub use l2_frame_click::frame_click;
pub use l3_keymap_click::keymap_click;
pub use l4_anchor_click::anchor_click;
pub use l5_field_click::field_click;
pub use l6_reflect_boom::reflect_boom;
pub use l7_apply_done::apply_done;

use crate::error::StageError;
use madaseed_schema::{Seed, StageDisposition, StageId};

/// Structural guard: every stage before `current` must have run and must not
/// have failed internally. Returns the blocking error, if any.
pub(crate) fn prior_stage_blocker(seed: &Seed, current: StageId) -> Option<StageError> {
    for (stage, disposition, _) in seed.stage_dispositions() {
        if stage.number() >= current.number() {
            break;
        }
        match disposition {
            StageDisposition::Completed | StageDisposition::Degraded => {}
            StageDisposition::NotStarted
            | StageDisposition::InFlight
            | StageDisposition::FailedInternal => {
                return Some(StageError::MissingPriorStage {
                    current,
                    missing: stage,
                    found: disposition.as_str().to_string(),
                });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use madaseed_schema::{CruxUid, InputEvent};

    #[test]
    fn test_prior_stage_blocker_on_fresh_seed() {
        let seed = Seed::new(CruxUid::generate("trace_event_L1").unwrap());
        let blocker = prior_stage_blocker(&seed, StageId::L2FrameClick).unwrap();
        assert!(matches!(
            blocker,
            StageError::MissingPriorStage {
                missing: StageId::L1Startle,
                ..
            }
        ));
    }

    #[test]
    fn test_prior_stage_blocker_after_l1() {
        let seed = startle(&InputEvent::from_text("hi", None));
        assert!(prior_stage_blocker(&seed, StageId::L2FrameClick).is_none());
        // L3 still blocked: L2 has not run.
        assert!(prior_stage_blocker(&seed, StageId::L3KeymapClick).is_some());
    }

    #[test]
    fn test_prior_stage_blocker_after_internal_failure() {
        let seed = Seed::error_seed(StageId::L2FrameClick, "boom");
        let blocker = prior_stage_blocker(&seed, StageId::L3KeymapClick).unwrap();
        assert!(matches!(
            blocker,
            StageError::MissingPriorStage {
                missing: StageId::L1Startle,
                ..
            }
        ));
    }
}
