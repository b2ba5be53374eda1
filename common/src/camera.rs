//! Orbiting perspective camera
//!
//! The viewer maps the simulated region onto a cube of half-width 1, so the
//! camera works in those normalized units.

use glam::{Mat4, Vec3};

/// Distance that frames the unit view cube at the default field of view
const HOME_DISTANCE: f32 = 3.5;
const HOME_PITCH: f32 = 0.45;

/// Perspective camera that circles a target point
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl Camera3D {
    pub fn new(aspect_ratio: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::Z,
            fov: 45.0f32.to_radians(),
            aspect_ratio,
            near: 0.01,
            far: 100.0,
            distance: HOME_DISTANCE,
            yaw: 0.0,
            pitch: HOME_PITCH,
        };
        camera.update_orbital();
        camera
    }

    /// Back to the initial framing of the view cube
    pub fn reset(&mut self) {
        self.target = Vec3::ZERO;
        self.distance = HOME_DISTANCE;
        self.yaw = 0.0;
        self.pitch = HOME_PITCH;
        self.update_orbital();
    }

    /// Recomputes the eye position; orbits are in the xy-plane, so z is up
    pub fn update_orbital(&mut self) {
        self.position = self.target
            + Vec3::new(
                self.distance * self.pitch.cos() * self.yaw.sin(),
                -self.distance * self.pitch.cos() * self.yaw.cos(),
                self.distance * self.pitch.sin(),
            );
    }

    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-1.5, 1.5);
        self.update_orbital();
    }

    /// Multiplicative zoom; positive `delta` moves closer
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta * 0.1)).clamp(0.05, 50.0);
        self.update_orbital();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn update_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }
}
