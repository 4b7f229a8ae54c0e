//! Avatar transform as seen by the renderer.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::viewport::PresentationProfile;

/// Position, vertical-axis rotation and uniform scale of the avatar root
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvatarTransform {
    /// World position
    pub position: Vec3,
    /// Rotation about +Y in radians
    pub rotation_y: f32,
    /// Uniform scale
    pub scale: f32,
}

impl Default for AvatarTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation_y: 0.0,
            scale: 1.0,
        }
    }
}

impl AvatarTransform {
    /// The resting pose for a profile: at the base position, facing forward.
    pub fn canonical(profile: &PresentationProfile) -> Self {
        Self {
            position: profile.base_position,
            rotation_y: 0.0,
            scale: profile.scale,
        }
    }

    /// Model matrix for the scene graph.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_rotation_y(self.rotation_y),
            self.position,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::resolve_profile;

    #[test]
    fn test_canonical_pose() {
        let pose = AvatarTransform::canonical(&resolve_profile(1024));
        assert_eq!(pose.position, Vec3::new(0.0, -2.5, 0.0));
        assert_eq!(pose.rotation_y, 0.0);
        assert_eq!(pose.scale, 2.2);
    }

    #[test]
    fn test_to_matrix() {
        let pose = AvatarTransform {
            position: Vec3::new(1.0, -2.5, 0.0),
            rotation_y: std::f32::consts::FRAC_PI_2,
            scale: 2.0,
        };
        let m = pose.to_matrix();

        let origin = m.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(pose.position, 1e-5));

        // +X rotated a quarter turn about +Y lands on -Z, then scaled
        let x = m.transform_vector3(Vec3::X);
        assert!(x.abs_diff_eq(Vec3::new(0.0, 0.0, -2.0), 1e-5));
    }
}
