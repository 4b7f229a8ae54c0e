//! Viewport profile resolution.
//!
//! Maps the display width to a discrete presentation profile. Pure and
//! total: no global lookups, no side effects.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::ViewportConfig;

/// Width (logical pixels) below which the compact profile applies.
pub const COMPACT_BELOW_PX: u32 = 768;

/// Which canonical profile a width resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    /// Narrow viewports (phones, small tablets)
    Compact,
    /// Everything else
    Standard,
}

impl std::fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileKind::Compact => write!(f, "compact"),
            ProfileKind::Standard => write!(f, "standard"),
        }
    }
}

/// Scale and anchor for the avatar at a given viewport size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PresentationProfile {
    pub kind: ProfileKind,
    /// Uniform model scale
    pub scale: f32,
    /// Resting position of the avatar
    pub base_position: Vec3,
}

impl PresentationProfile {
    /// The compact profile: scale 1.5, centered at the origin.
    pub fn compact() -> Self {
        Self {
            kind: ProfileKind::Compact,
            scale: 1.5,
            base_position: Vec3::ZERO,
        }
    }

    /// The standard profile: scale 2.2, lowered 2.5 units.
    pub fn standard() -> Self {
        Self {
            kind: ProfileKind::Standard,
            scale: 2.2,
            base_position: Vec3::new(0.0, -2.5, 0.0),
        }
    }
}

/// Resolve the canonical profile for `width_px`.
pub fn resolve_profile(width_px: u32) -> PresentationProfile {
    if width_px < COMPACT_BELOW_PX {
        PresentationProfile::compact()
    } else {
        PresentationProfile::standard()
    }
}

impl ViewportConfig {
    /// Resolve a profile using the configured threshold and profile values.
    pub fn resolve(&self, width_px: u32) -> PresentationProfile {
        if width_px < self.compact_below {
            PresentationProfile {
                kind: ProfileKind::Compact,
                scale: self.compact_scale,
                base_position: Vec3::from_array(self.compact_base),
            }
        } else {
            PresentationProfile {
                kind: ProfileKind::Standard,
                scale: self.standard_scale,
                base_position: Vec3::from_array(self.standard_base),
            }
        }
    }
}
