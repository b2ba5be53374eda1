//! Contract between the simulation and whatever draws it

use log::info;

use crate::body::Body;

/// Reply from a renderer after showing a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    Continue,
    /// The output went away (e.g. the window was closed); the run should end
    Closed,
}

/// Receives read-only snapshots of the body set between ticks.
///
/// The slice is only valid for the duration of the call: bodies can be
/// merged away before the next frame.
pub trait Renderer {
    fn display(&mut self, bodies: &[Body]) -> RenderStatus;
}

/// Headless renderer that writes body positions to the log
#[derive(Debug, Default)]
pub struct LogRenderer {
    frames: u64,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for LogRenderer {
    fn display(&mut self, bodies: &[Body]) -> RenderStatus {
        self.frames += 1;
        info!("frame {}: {} bodies", self.frames, bodies.len());
        for body in bodies {
            info!(
                "  {:<10} {} r={:.3e} m",
                body.label(),
                body.position,
                body.radius
            );
        }
        RenderStatus::Continue
    }
}

/// Forwarding impl so drivers can borrow a renderer owned elsewhere
impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn display(&mut self, bodies: &[Body]) -> RenderStatus {
        (**self).display(bodies)
    }
}
