//! Scenario and run configuration, deserialized from YAML
//!
//! A scenario file has three optional sections:
//!
//! ```yaml
//! simulation:
//!   softening: 1.0e4        # metres, added in quadrature to separations
//!   dt: 1.0                 # seconds per tick (leapfrog only)
//!   collision_enabled: true
//!   render_interval: 3600   # ticks between frames
//!   integrator: leapfrog    # or euler-cromer
//!   max_ticks: 31536000     # omit or null to run until stopped
//!
//! preset:
//!   kind: random-planets    # or inner-planets
//!   count: 10
//!   overall_mass: 1.0e30
//!
//! bodies:
//!   - position: [1.0e11, 0.0, 0.0]
//!     velocity: [0.0, 3.0e4, 0.0]
//!     mass: 6.0e24
//!     radius: 6.4e6
//!     name: Earth
//!     color: cornflowerblue   # or [r, g, b, a]
//! ```

use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use serde::Deserialize;

use crate::body::{named_color, Body};
use crate::engine::EngineConfig;
use crate::error::SimError;
use crate::scenario;
use crate::vector::Vector3;

/// Time integration scheme used for every body
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum IntegrationScheme {
    /// Velocity then position with an implicit unit step, `dt` is ignored
    EulerCromer,
    /// Semi-implicit (kick-drift) update with the configured `dt`
    #[default]
    Leapfrog,
}

/// Numerical and run-loop options
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub softening: f64,
    pub dt: f64,
    pub collision_enabled: bool,
    pub render_interval: u64,
    pub integrator: IntegrationScheme,
    pub max_ticks: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            softening: 1e4,
            dt: 1.0,
            collision_enabled: true,
            render_interval: 3600,
            integrator: IntegrationScheme::Leapfrog,
            // One year of one-second ticks
            max_ticks: Some(31_536_000),
        }
    }
}

impl SimulationConfig {
    /// Engine half of the configuration
    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            softening: self.softening,
            dt: self.dt,
            collision_enabled: self.collision_enabled,
            integrator: self.integrator,
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        self.engine().validate()?;
        if self.render_interval == 0 {
            return Err(SimError::InvalidConfig(
                "render_interval must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Display color written either as `[r, g, b, a]` or as a CSS name
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ColorConfig {
    Rgba([f32; 4]),
    Named(String),
}

impl ColorConfig {
    pub fn resolve(&self) -> Result<[f32; 4], SimError> {
        match self {
            ColorConfig::Rgba(rgba) => Ok(*rgba),
            ColorConfig::Named(name) => named_color(name)
                .ok_or_else(|| SimError::InvalidConfig(format!("unknown color '{name}'"))),
        }
    }
}

/// Initial state of one body
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BodyConfig {
    pub position: [f64; 3],
    #[serde(default)]
    pub velocity: [f64; 3],
    pub mass: f64,
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<ColorConfig>,
}

impl BodyConfig {
    pub fn build(&self) -> Result<Body, SimError> {
        let mut body = Body::new(
            Vector3::from(self.position),
            Vector3::from(self.velocity),
            self.mass,
            self.radius,
        )?;
        if let Some(name) = &self.name {
            body = body.with_name(name);
        }
        if let Some(color) = &self.color {
            body = body.with_color(color.resolve()?);
        }
        Ok(body)
    }
}

/// Built-in body sets
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Preset {
    InnerPlanets,
    RandomPlanets { count: usize, overall_mass: f64 },
}

impl Preset {
    pub fn build(&self, seed: u64) -> Result<Vec<Body>, SimError> {
        match self {
            Preset::InnerPlanets => scenario::inner_planets(),
            Preset::RandomPlanets {
                count,
                overall_mass,
            } => {
                let mut rng = ChaChaRng::seed_from_u64(seed);
                scenario::random_planets(*count, *overall_mass, &mut rng)
            }
        }
    }
}

/// Top-level scenario file
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub preset: Option<Preset>,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml(source: &str) -> Result<Self, SimError> {
        let config: ScenarioConfig =
            serde_yaml::from_str(source).map_err(|e| SimError::InvalidConfig(e.to_string()))?;
        config.simulation.validate()?;
        Ok(config)
    }

    /// Preset bodies first, then the explicitly listed ones
    pub fn build_bodies(&self, seed: u64) -> Result<Vec<Body>, SimError> {
        let mut bodies = match &self.preset {
            Some(preset) => preset.build(seed)?,
            None => Vec::new(),
        };
        for body in &self.bodies {
            bodies.push(body.build()?);
        }

        if bodies.is_empty() {
            return Err(SimError::InvalidConfig("scenario has no bodies".to_string()));
        }
        Ok(bodies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = ScenarioConfig::from_yaml("{}").unwrap();
        assert_eq!(config.simulation, SimulationConfig::default());
        assert!(config.preset.is_none());
        assert!(config.bodies.is_empty());
    }

    #[test]
    fn parses_full_scenario() {
        let yaml = r#"
simulation:
  softening: 0.0
  dt: 60.0
  collision_enabled: true
  render_interval: 10
  integrator: euler-cromer
  max_ticks: null
preset:
  kind: random-planets
  count: 4
  overall_mass: 1.0e28
bodies:
  - position: [1.0e11, 0.0, 0.0]
    velocity: [0.0, 3.0e4, 0.0]
    mass: 6.0e24
    radius: 6.4e6
    name: Earth
    color: cornflowerblue
  - position: [0.0, 2.0e11, 0.0]
    mass: 6.4e23
    color: [1.0, 0.0, 0.0, 1.0]
"#;
        let config = ScenarioConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.simulation.integrator, IntegrationScheme::EulerCromer);
        assert_eq!(config.simulation.max_ticks, None);
        assert_eq!(config.simulation.render_interval, 10);
        assert_eq!(
            config.preset,
            Some(Preset::RandomPlanets {
                count: 4,
                overall_mass: 1.0e28
            })
        );

        let bodies = config.build_bodies(7).unwrap();
        assert_eq!(bodies.len(), 6);
        assert_eq!(bodies[4].label(), "Earth");
        assert_eq!(bodies[4].color, named_color("cornflowerblue").unwrap());
        assert_eq!(bodies[5].velocity, Vector3::ZERO);
        assert_eq!(bodies[5].color, [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn rejects_invalid_numbers() {
        assert!(ScenarioConfig::from_yaml("simulation: { dt: 0.0 }").is_err());
        assert!(ScenarioConfig::from_yaml("simulation: { softening: -1.0 }").is_err());
        assert!(ScenarioConfig::from_yaml("simulation: { render_interval: 0 }").is_err());
        assert!(ScenarioConfig::from_yaml(
            "simulation: { softening: 0.0, collision_enabled: false }"
        )
        .is_err());
        assert!(ScenarioConfig::from_yaml("simulation: { integrator: rk4 }").is_err());
    }

    #[test]
    fn rejects_misspelled_keys() {
        let err =
            ScenarioConfig::from_yaml("simulation: { colision_enabled: false }").unwrap_err();
        assert!(
            matches!(err, SimError::InvalidConfig(ref msg) if msg.contains("colision_enabled"))
        );

        assert!(ScenarioConfig::from_yaml(
            "bodies: [ { position: [0, 0, 0], mass: 1.0, radus: 2.0 } ]"
        )
        .is_err());
        assert!(ScenarioConfig::from_yaml("presets: { kind: inner-planets }").is_err());
    }

    #[test]
    fn body_errors_surface() {
        let config = ScenarioConfig::from_yaml("bodies: [ { position: [0, 0, 0], mass: -1.0 } ]")
            .unwrap();
        assert_eq!(config.build_bodies(0), Err(SimError::InvalidMass(-1.0)));

        let config = ScenarioConfig::from_yaml(
            "bodies: [ { position: [0, 0, 0], mass: 1.0, color: plaid } ]",
        )
        .unwrap();
        assert!(matches!(
            config.build_bodies(0),
            Err(SimError::InvalidConfig(_))
        ));

        let config = ScenarioConfig::from_yaml(
            "bodies: [ { position: [0, 0, 0], mass: 1.0, radius: -3.0 } ]",
        )
        .unwrap();
        assert_eq!(config.build_bodies(0), Err(SimError::InvalidRadius(-3.0)));

        assert!(ScenarioConfig::default().build_bodies(0).is_err());
    }

    #[test]
    fn inner_planets_preset() {
        let config = ScenarioConfig::from_yaml("preset: { kind: inner-planets }").unwrap();
        assert_eq!(config.build_bodies(0).unwrap().len(), 8);
    }
}
