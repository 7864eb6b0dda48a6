//! QA/QC assessment
//!
//! End-of-pipeline integrity verdict. Defaults to "not yet assessed" and is
//! computed exactly once, by L7, as the pipeline's final act.

use crate::stage::StageId;
use crate::states::{ParseStateError, StageDisposition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const QA_QC_VERSION: &str = "0.1.0";

/// Overall Seed integrity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedIntegrity {
    #[default]
    NotYetAssessed,
    /// Every stage completed cleanly.
    Sound,
    /// One or more stages degraded but none failed internally.
    DegradedRecoverable,
    /// At least one stage classified `FailedInternal`.
    CompromisedInternalFailure,
}

impl SeedIntegrity {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeedIntegrity::NotYetAssessed => "not_yet_assessed",
            SeedIntegrity::Sound => "sound",
            SeedIntegrity::DegradedRecoverable => "degraded_recoverable",
            SeedIntegrity::CompromisedInternalFailure => "compromised_internal_failure",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, ParseStateError> {
        match s {
            "not_yet_assessed" => Ok(SeedIntegrity::NotYetAssessed),
            "sound" => Ok(SeedIntegrity::Sound),
            "degraded_recoverable" => Ok(SeedIntegrity::DegradedRecoverable),
            "compromised_internal_failure" => Ok(SeedIntegrity::CompromisedInternalFailure),
            _ => Err(ParseStateError {
                kind: "seed integrity",
                token: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SeedIntegrity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One per-stage note attached to the verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageFlag {
    pub stage: StageId,
    pub disposition: StageDisposition,
    #[serde(default)]
    pub detail: Option<String>,
}

/// The QA/QC verdict block on the Seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaQcAssessment {
    pub version: String,
    pub overall_integrity: SeedIntegrity,
    #[serde(default)]
    pub stage_flags: Vec<StageFlag>,
    #[serde(default)]
    pub assessed_at: Option<DateTime<Utc>>,
}

impl Default for QaQcAssessment {
    fn default() -> Self {
        Self {
            version: QA_QC_VERSION.to_string(),
            overall_integrity: SeedIntegrity::default(),
            stage_flags: Vec::new(),
            assessed_at: None,
        }
    }
}

impl QaQcAssessment {
    /// Fold per-stage dispositions into an overall verdict.
    pub fn from_dispositions(
        dispositions: &[(StageId, StageDisposition, Option<String>)],
        assessed_at: DateTime<Utc>,
    ) -> Self {
        let mut overall = SeedIntegrity::Sound;
        for (_, disposition, _) in dispositions {
            match disposition {
                StageDisposition::FailedInternal => {
                    overall = SeedIntegrity::CompromisedInternalFailure;
                    break;
                }
                StageDisposition::Degraded
                | StageDisposition::NotStarted
                | StageDisposition::InFlight => {
                    overall = SeedIntegrity::DegradedRecoverable;
                }
                StageDisposition::Completed => {}
            }
        }

        Self {
            version: QA_QC_VERSION.to_string(),
            overall_integrity: overall,
            stage_flags: dispositions
                .iter()
                .map(|(stage, disposition, detail)| StageFlag {
                    stage: *stage,
                    disposition: *disposition,
                    detail: detail.clone(),
                })
                .collect(),
            assessed_at: Some(assessed_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock;

    fn all_completed() -> Vec<(StageId, StageDisposition, Option<String>)> {
        StageId::ALL
            .iter()
            .map(|s| (*s, StageDisposition::Completed, None))
            .collect()
    }

    #[test]
    fn test_default_is_not_yet_assessed() {
        let qa = QaQcAssessment::default();
        assert_eq!(qa.overall_integrity, SeedIntegrity::NotYetAssessed);
        assert!(qa.assessed_at.is_none());
    }

    #[test]
    fn test_all_completed_is_sound() {
        let qa = QaQcAssessment::from_dispositions(&all_completed(), clock::now_utc());
        assert_eq!(qa.overall_integrity, SeedIntegrity::Sound);
        assert_eq!(qa.stage_flags.len(), 7);
    }

    #[test]
    fn test_degraded_stage_downgrades_verdict() {
        let mut dispositions = all_completed();
        dispositions[1].1 = StageDisposition::Degraded;
        let qa = QaQcAssessment::from_dispositions(&dispositions, clock::now_utc());
        assert_eq!(qa.overall_integrity, SeedIntegrity::DegradedRecoverable);
    }

    #[test]
    fn test_internal_failure_dominates() {
        let mut dispositions = all_completed();
        dispositions[1].1 = StageDisposition::Degraded;
        dispositions[4].1 = StageDisposition::FailedInternal;
        let qa = QaQcAssessment::from_dispositions(&dispositions, clock::now_utc());
        assert_eq!(
            qa.overall_integrity,
            SeedIntegrity::CompromisedInternalFailure
        );
    }

    #[test]
    fn test_integrity_roundtrip() {
        for integrity in &[
            SeedIntegrity::NotYetAssessed,
            SeedIntegrity::Sound,
            SeedIntegrity::DegradedRecoverable,
            SeedIntegrity::CompromisedInternalFailure,
        ] {
            let parsed = SeedIntegrity::from_str(integrity.as_str()).unwrap();
            assert_eq!(*integrity, parsed);
        }
    }
}
