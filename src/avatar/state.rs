//! Controller state machine states

use serde::{Deserialize, Serialize};

/// Which path currently drives the avatar.
///
/// Each variant carries the clip it is playing, so "falling with an override
/// clip" or "idle without a fallback decision" cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ControllerState {
    /// Procedural fall-and-spin toward the target pose, fallback clip looping
    FallingEntry { fallback: Option<String> },
    /// Entry finished; fallback clip keeps looping, transform pinned at target
    Idle { fallback: Option<String> },
    /// A requested clip owns the pose; no procedural writes
    ClipOverrideActive { clip: String },
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::FallingEntry { fallback: None }
    }
}

impl std::fmt::Display for ControllerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl ControllerState {
    /// Short state name for logs and diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Self::FallingEntry { .. } => "falling_entry",
            Self::Idle { .. } => "idle",
            Self::ClipOverrideActive { .. } => "clip_override_active",
        }
    }

    /// The clip this state has playing, if any
    pub fn active_clip(&self) -> Option<&str> {
        match self {
            Self::FallingEntry { fallback } | Self::Idle { fallback } => fallback.as_deref(),
            Self::ClipOverrideActive { clip } => Some(clip),
        }
    }

    /// Whether the controller writes the transform every frame
    pub fn is_procedural(&self) -> bool {
        matches!(self, Self::FallingEntry { .. })
    }
}
