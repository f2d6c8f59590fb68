use flythrough_common::{CameraVectors, LOCAL_FORWARD, LOCAL_RIGHT, LOCAL_UP, renormalize, rotate_unit};
use flythrough_input::CommandSet;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Starting pose and speeds for the fly camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub orientation: Quat,
    /// World units per second.
    pub movement_speed: f32,
    /// Radians per second, shared by pitch, yaw and roll.
    pub roll_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            movement_speed: 50.0,
            roll_speed: 0.8,
        }
    }
}

/// Fly camera with a free quaternion orientation (no gimbal clamp).
///
/// Camera motion lives outside the scheduler: it only sees the time step the
/// render loop hands it.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    orientation: Quat,
    pub movement_speed: f32,
    pub roll_speed: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl CameraState {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            position: config.position,
            orientation: renormalize(config.orientation),
            movement_speed: config.movement_speed,
            roll_speed: config.roll_speed,
        }
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Replace the orientation. The value is renormalized.
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = renormalize(orientation);
    }

    /// Integrate one time step of `dt` seconds under the active `inputs`.
    ///
    /// Translation uses the local frame at the start of the step; rotations
    /// are composed on the right so they act about camera-local axes.
    pub fn update(&mut self, dt: f32, inputs: &CommandSet) {
        if dt.is_nan() || dt <= 0.0 || inputs.is_empty() {
            return;
        }

        let frame = self.orientation;
        let distance = self.movement_speed * dt;
        let angle = self.roll_speed * dt;

        for command in inputs.iter() {
            if command.is_translation() {
                self.position += frame * (command.local_axis() * distance);
            } else {
                self.orientation *= Quat::from_axis_angle(command.local_axis(), angle);
            }
        }

        self.orientation = renormalize(self.orientation);
    }

    /// Unit forward, up and the raw position.
    pub fn derive_vectors(&self) -> CameraVectors {
        CameraVectors {
            position: self.position,
            forward: self.forward(),
            up: self.up(),
        }
    }

    pub fn forward(&self) -> Vec3 {
        rotate_unit(self.orientation, LOCAL_FORWARD)
    }

    pub fn up(&self) -> Vec3 {
        rotate_unit(self.orientation, LOCAL_UP)
    }

    pub fn right(&self) -> Vec3 {
        rotate_unit(self.orientation, LOCAL_RIGHT)
    }
}
