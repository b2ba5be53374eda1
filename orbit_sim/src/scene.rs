//! Turns body snapshots into GPU instance data
//!
//! The simulated region `[-view_size, view_size]` AU on each axis is mapped
//! onto the unit cube the camera frames.

use celestial::scenario::{AU, SOLAR_RADIUS};
use celestial::{Body, RenderStatus, Renderer};

use crate::renderer::BodyInstance;

/// Smallest billboard radius in view units, keeps asteroids visible
const MIN_MARKER: f32 = 0.004;
/// Billboard radius per square root of marker area
const MARKER_SCALE: f32 = 0.004;

/// Marker area relative to a solar-radius body seen at one AU of view size.
fn marker_area(radius: f64, view_size: f64) -> f64 {
    radius / SOLAR_RADIUS * 1e2 / view_size
}

/// Renderer that records the latest frame for the GPU pass to upload.
///
/// Window shutdown is signalled through the driver, so frames always continue.
pub struct SceneCapture {
    view_size: f64,
    instances: Vec<BodyInstance>,
    frames: u64,
}

impl SceneCapture {
    /// `view_size` is the half-width of the visible region in AU
    pub fn new(view_size: f64) -> Self {
        Self {
            view_size,
            instances: Vec::new(),
            frames: 0,
        }
    }

    pub fn instances(&self) -> &[BodyInstance] {
        &self.instances
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for SceneCapture {
    fn display(&mut self, bodies: &[Body]) -> RenderStatus {
        let unit = self.view_size * AU;
        self.instances.clear();
        self.instances.extend(bodies.iter().map(|body| {
            let area = marker_area(body.radius, self.view_size) as f32;
            BodyInstance {
                position: body.position.to_scaled_vec3(unit).to_array(),
                radius: (area.sqrt() * MARKER_SCALE).max(MIN_MARKER),
                color: body.color,
            }
        }));
        self.frames += 1;

        RenderStatus::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use celestial::Vector3;

    fn body(x: f64, radius: f64) -> Body {
        Body::new(Vector3::new(x, 0.0, 0.0), Vector3::ZERO, 1.0, radius)
            .unwrap()
            .with_color([1.0, 0.0, 0.0, 1.0])
    }

    #[test]
    fn positions_are_scaled_to_view_cube() {
        let mut scene = SceneCapture::new(2.0);
        assert_eq!(scene.display(&[body(AU, 1.0), body(-2.0 * AU, 1.0)]), RenderStatus::Continue);

        let instances = scene.instances();
        assert_eq!(instances.len(), 2);
        assert!((instances[0].position[0] - 0.5).abs() < 1e-6);
        assert!((instances[1].position[0] + 1.0).abs() < 1e-6);
        assert_eq!(instances[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(scene.frames(), 1);
    }

    #[test]
    fn markers_grow_with_radius_but_stay_visible() {
        let mut scene = SceneCapture::new(2.0);
        scene.display(&[body(0.0, SOLAR_RADIUS), body(0.0, 1.0)]);

        let instances = scene.instances();
        assert!(instances[0].radius > instances[1].radius);
        assert_eq!(instances[1].radius, MIN_MARKER);
    }

    #[test]
    fn each_frame_replaces_the_last() {
        let mut scene = SceneCapture::new(1.0);
        scene.display(&[body(0.0, 1.0), body(1.0, 1.0)]);
        scene.display(&[body(0.0, 1.0)]);
        assert_eq!(scene.instances().len(), 1);
    }
}
