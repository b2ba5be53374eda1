//! Shared windowing and camera code for the orbit viewer
//!
//! Keeps the wgpu/winit setup out of the simulation crate so the engine
//! stays usable headless.

pub mod camera;
pub mod graphics;

pub use camera::*;
pub use graphics::*;
