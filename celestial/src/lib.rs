//! Newtonian N-body simulation core
//!
//! This crate holds everything that does not touch a window:
//! - [`Vector3`] double-precision vector math
//! - [`Body`] point masses and the softened force law
//! - [`NBodyEngine`] direct O(n²) summation with body merging
//! - [`SimulationDriver`] the tick loop, calling a [`Renderer`] at checkpoints
//! - YAML scenario configuration and built-in scenarios

pub mod body;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod render;
pub mod scenario;
pub mod vector;

pub use body::{Body, G};
pub use config::{IntegrationScheme, ScenarioConfig, SimulationConfig};
pub use driver::{DriverState, SimulationDriver, StopReason};
pub use engine::{EngineConfig, MergeEvent, NBodyEngine, StepOutcome};
pub use error::SimError;
pub use render::{LogRenderer, RenderStatus, Renderer};
pub use vector::Vector3;
