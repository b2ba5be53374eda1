//! Tick loop tying the engine to a renderer

use log::{debug, info};

use crate::body::Body;
use crate::config::SimulationConfig;
use crate::engine::{NBodyEngine, StepOutcome};
use crate::error::SimError;
use crate::render::{RenderStatus, Renderer};

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The configured tick budget was used up
    TickLimit,
    /// The renderer reported that its output was closed
    RendererClosed,
    /// [`SimulationDriver::stop`] was called
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Running,
    Stopped(StopReason),
}

/// Steps the engine every tick and renders every `render_interval` ticks.
pub struct SimulationDriver<R: Renderer> {
    engine: NBodyEngine,
    renderer: R,
    render_interval: u64,
    max_ticks: Option<u64>,
    ticks: u64,
    merges: u64,
    state: DriverState,
}

impl<R: Renderer> SimulationDriver<R> {
    pub fn new(
        engine: NBodyEngine,
        renderer: R,
        render_interval: u64,
        max_ticks: Option<u64>,
    ) -> Result<Self, SimError> {
        if render_interval == 0 {
            return Err(SimError::InvalidConfig(
                "render_interval must be at least 1".to_string(),
            ));
        }

        let state = if max_ticks == Some(0) {
            DriverState::Stopped(StopReason::TickLimit)
        } else {
            DriverState::Running
        };

        Ok(Self {
            engine,
            renderer,
            render_interval,
            max_ticks,
            ticks: 0,
            merges: 0,
            state,
        })
    }

    /// Builds the engine and driver from a validated configuration
    pub fn from_config(
        bodies: Vec<Body>,
        config: &SimulationConfig,
        renderer: R,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let engine = NBodyEngine::new(bodies, config.engine())?;
        Self::new(engine, renderer, config.render_interval, config.max_ticks)
    }

    pub fn engine(&self) -> &NBodyEngine {
        &self.engine
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Merges observed so far
    pub fn merges(&self) -> u64 {
        self.merges
    }

    /// External stop signal. A driver that already stopped keeps its reason.
    pub fn stop(&mut self) {
        if self.is_running() {
            info!("simulation stopped externally after {} ticks", self.ticks);
            self.state = DriverState::Stopped(StopReason::External);
        }
    }

    /// Runs one tick. Returns whether a frame was displayed.
    pub fn tick(&mut self) -> Result<bool, SimError> {
        if !self.is_running() {
            return Ok(false);
        }

        let outcome = self.engine.step()?;
        self.ticks += 1;
        if let StepOutcome::Merged(_) = outcome {
            self.merges += 1;
        }

        let mut rendered = false;
        if self.ticks % self.render_interval == 0 {
            rendered = true;
            debug!("rendering frame at tick {}", self.ticks);
            if self.renderer.display(self.engine.bodies()) == RenderStatus::Closed {
                info!("renderer closed after {} ticks", self.ticks);
                self.state = DriverState::Stopped(StopReason::RendererClosed);
                return Ok(rendered);
            }
        }

        if self.max_ticks.is_some_and(|limit| self.ticks >= limit) {
            info!("tick limit reached after {} ticks", self.ticks);
            self.state = DriverState::Stopped(StopReason::TickLimit);
        }

        Ok(rendered)
    }

    /// Ticks until a frame has been displayed or the driver stops.
    pub fn run_until_frame(&mut self) -> Result<DriverState, SimError> {
        while self.is_running() {
            if self.tick()? {
                break;
            }
        }
        Ok(self.state)
    }

    /// Ticks until the driver stops and reports why.
    pub fn run(&mut self) -> Result<StopReason, SimError> {
        info!(
            "running {} bodies, rendering every {} ticks",
            self.engine.bodies().len(),
            self.render_interval
        );

        loop {
            if let DriverState::Stopped(reason) = self.state {
                return Ok(reason);
            }
            self.tick()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::vector::Vector3;

    /// Records how many bodies each frame saw, closing after `close_after`
    #[derive(Default)]
    struct RecordingRenderer {
        frames: Vec<usize>,
        close_after: Option<usize>,
    }

    impl Renderer for RecordingRenderer {
        fn display(&mut self, bodies: &[Body]) -> RenderStatus {
            self.frames.push(bodies.len());
            match self.close_after {
                Some(limit) if self.frames.len() >= limit => RenderStatus::Closed,
                _ => RenderStatus::Continue,
            }
        }
    }

    fn engine() -> NBodyEngine {
        let bodies = vec![
            Body::new(Vector3::ZERO, Vector3::ZERO, 1.0e24, 1.0).unwrap(),
            Body::new(Vector3::new(1.0e9, 0.0, 0.0), Vector3::ZERO, 1.0e20, 1.0).unwrap(),
        ];
        NBodyEngine::new(bodies, EngineConfig::default()).unwrap()
    }

    #[test]
    fn renders_every_interval_until_tick_limit() {
        let mut driver =
            SimulationDriver::new(engine(), RecordingRenderer::default(), 10, Some(35)).unwrap();

        assert_eq!(driver.run(), Ok(StopReason::TickLimit));
        assert_eq!(driver.ticks(), 35);
        assert_eq!(driver.engine().tick(), 35);
        assert_eq!(driver.renderer().frames, vec![2, 2, 2]);
    }

    #[test]
    fn closed_renderer_stops_gracefully() {
        let renderer = RecordingRenderer {
            close_after: Some(2),
            ..Default::default()
        };
        let mut driver = SimulationDriver::new(engine(), renderer, 5, None).unwrap();

        assert_eq!(driver.run(), Ok(StopReason::RendererClosed));
        assert_eq!(driver.ticks(), 10);
        assert_eq!(driver.state(), DriverState::Stopped(StopReason::RendererClosed));
    }

    #[test]
    fn run_until_frame_stops_at_render_checkpoints() {
        let mut driver =
            SimulationDriver::new(engine(), RecordingRenderer::default(), 4, Some(10)).unwrap();

        assert_eq!(driver.run_until_frame(), Ok(DriverState::Running));
        assert_eq!(driver.ticks(), 4);
        assert_eq!(driver.run_until_frame(), Ok(DriverState::Running));
        assert_eq!(driver.ticks(), 8);
        // Limit is hit before the next frame
        assert_eq!(
            driver.run_until_frame(),
            Ok(DriverState::Stopped(StopReason::TickLimit))
        );
        assert_eq!(driver.ticks(), 10);
        assert_eq!(driver.renderer().frames.len(), 2);
    }

    #[test]
    fn external_stop_halts_ticking() {
        let mut driver =
            SimulationDriver::new(engine(), RecordingRenderer::default(), 1, None).unwrap();
        driver.tick().unwrap();
        driver.stop();

        assert_eq!(driver.tick(), Ok(false));
        assert_eq!(driver.ticks(), 1);
        assert_eq!(driver.run(), Ok(StopReason::External));
    }

    #[test]
    fn failed_tick_is_not_counted() {
        let coincident = vec![
            Body::new(Vector3::ZERO, Vector3::ZERO, 1.0, 0.0).unwrap(),
            Body::new(Vector3::ZERO, Vector3::ZERO, 1.0, 0.0).unwrap(),
        ];
        let config = EngineConfig {
            softening: 0.0,
            ..EngineConfig::default()
        };
        let engine = NBodyEngine::new(coincident, config).unwrap();
        let mut driver =
            SimulationDriver::new(engine, RecordingRenderer::default(), 1, None).unwrap();

        assert!(matches!(driver.tick(), Err(SimError::SingularForce { .. })));
        assert_eq!(driver.ticks(), 0);
        assert_eq!(driver.engine().tick(), 0);
        assert!(driver.renderer().frames.is_empty());
    }

    #[test]
    fn rejects_zero_render_interval() {
        assert!(SimulationDriver::new(engine(), RecordingRenderer::default(), 0, None).is_err());
    }

    #[test]
    fn zero_tick_budget_never_steps() {
        let mut driver =
            SimulationDriver::new(engine(), RecordingRenderer::default(), 1, Some(0)).unwrap();
        assert_eq!(driver.run(), Ok(StopReason::TickLimit));
        assert_eq!(driver.ticks(), 0);
    }

    #[test]
    fn counts_merges() {
        let bodies = vec![
            Body::new(Vector3::ZERO, Vector3::ZERO, 2.0, 5.0).unwrap(),
            Body::new(Vector3::new(1.0, 0.0, 0.0), Vector3::ZERO, 1.0, 5.0).unwrap(),
        ];
        let config = SimulationConfig {
            render_interval: 1,
            max_ticks: Some(3),
            ..SimulationConfig::default()
        };
        let mut driver =
            SimulationDriver::from_config(bodies, &config, RecordingRenderer::default()).unwrap();

        driver.run().unwrap();
        assert_eq!(driver.merges(), 1);
        assert_eq!(driver.renderer().frames, vec![1, 1, 1]);
    }
}
