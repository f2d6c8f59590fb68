use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Camera pose as consumed by a renderer: raw position plus unit basis vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraVectors {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
}

impl CameraVectors {
    pub fn right(&self) -> Vec3 {
        self.forward.cross(self.up).normalize_or(Vec3::X)
    }
}

impl Default for CameraVectors {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
        }
    }
}

/// Fixed visual constants fed to the scene shader every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConstants {
    pub contrast: f32,
    pub saturation: f32,
    pub brightness: f32,
    /// Maximum ray distance in world units.
    pub view_distance: f32,
    pub high_detail: bool,
}

impl Default for SceneConstants {
    fn default() -> Self {
        Self {
            contrast: 1.1,
            saturation: 1.12,
            brightness: 1.3,
            view_distance: 700.0,
            high_detail: false,
        }
    }
}
