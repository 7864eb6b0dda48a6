//! Stage identifiers
//!
//! The seven fixed pipeline stages. Containers and trace records are indexed
//! by stage number, so the identifier lives in the schema crate.

use crate::states::ParseStateError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the seven fixed pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageId {
    #[serde(rename = "L1_startle")]
    L1Startle,
    #[serde(rename = "L2_frame_click")]
    L2FrameClick,
    #[serde(rename = "L3_keymap_click")]
    L3KeymapClick,
    #[serde(rename = "L4_anchor_click")]
    L4AnchorClick,
    #[serde(rename = "L5_field_click")]
    L5FieldClick,
    #[serde(rename = "L6_reflect_boom")]
    L6ReflectBoom,
    #[serde(rename = "L7_apply_done")]
    L7ApplyDone,
}

impl StageId {
    pub const ALL: [StageId; 7] = [
        StageId::L1Startle,
        StageId::L2FrameClick,
        StageId::L3KeymapClick,
        StageId::L4AnchorClick,
        StageId::L5FieldClick,
        StageId::L6ReflectBoom,
        StageId::L7ApplyDone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageId::L1Startle => "L1_startle",
            StageId::L2FrameClick => "L2_frame_click",
            StageId::L3KeymapClick => "L3_keymap_click",
            StageId::L4AnchorClick => "L4_anchor_click",
            StageId::L5FieldClick => "L5_field_click",
            StageId::L6ReflectBoom => "L6_reflect_boom",
            StageId::L7ApplyDone => "L7_apply_done",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, ParseStateError> {
        match s {
            "L1_startle" => Ok(StageId::L1Startle),
            "L2_frame_click" => Ok(StageId::L2FrameClick),
            "L3_keymap_click" => Ok(StageId::L3KeymapClick),
            "L4_anchor_click" => Ok(StageId::L4AnchorClick),
            "L5_field_click" => Ok(StageId::L5FieldClick),
            "L6_reflect_boom" => Ok(StageId::L6ReflectBoom),
            "L7_apply_done" => Ok(StageId::L7ApplyDone),
            _ => Err(ParseStateError {
                kind: "stage id",
                token: s.to_string(),
            }),
        }
    }

    /// 1-based stage number.
    pub fn number(&self) -> u8 {
        match self {
            StageId::L1Startle => 1,
            StageId::L2FrameClick => 2,
            StageId::L3KeymapClick => 3,
            StageId::L4AnchorClick => 4,
            StageId::L5FieldClick => 5,
            StageId::L6ReflectBoom => 6,
            StageId::L7ApplyDone => 7,
        }
    }

    /// Stage procedure name recorded in trace records.
    pub fn procedure(&self) -> &'static str {
        match self {
            StageId::L1Startle => "sop.startle",
            StageId::L2FrameClick => "sop.frame_click",
            StageId::L3KeymapClick => "sop.keymap_click",
            StageId::L4AnchorClick => "sop.anchor_click",
            StageId::L5FieldClick => "sop.field_click",
            StageId::L6ReflectBoom => "sop.reflect_boom",
            StageId::L7ApplyDone => "sop.apply_done",
        }
    }

    /// The stage that must have completed before this one, if any.
    pub fn predecessor(&self) -> Option<StageId> {
        match self.number() {
            1 => None,
            n => Some(StageId::ALL[(n - 2) as usize]),
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
