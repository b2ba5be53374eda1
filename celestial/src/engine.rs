//! Direct-summation N-body engine
//!
//! Every tick visits each pair of bodies once (O(n²), no spatial
//! partitioning). A pair that overlaps is merged and ends the tick early:
//! forces already summed for that tick are thrown away and nobody moves, so
//! the next tick starts fresh on the reduced body set.

use log::{debug, warn};

use crate::body::{Body, G};
use crate::config::IntegrationScheme;
use crate::error::SimError;
use crate::vector::Vector3;

/// Numerical options for the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub softening: f64,
    pub dt: f64,
    pub collision_enabled: bool,
    pub integrator: IntegrationScheme,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            softening: 1e4,
            dt: 1.0,
            collision_enabled: true,
            integrator: IntegrationScheme::Leapfrog,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(SimError::InvalidConfig(format!(
                "dt must be positive and finite, got {}",
                self.dt
            )));
        }
        if !(self.softening >= 0.0 && self.softening.is_finite()) {
            return Err(SimError::InvalidConfig(format!(
                "softening must be non-negative and finite, got {}",
                self.softening
            )));
        }
        // Without softening, merging is the only guard against coincident bodies
        if self.softening == 0.0 && !self.collision_enabled {
            return Err(SimError::InvalidConfig(
                "softening must be positive when collisions are disabled".to_string(),
            ));
        }
        Ok(())
    }
}

/// Record of a merge performed by [`NBodyEngine::step`]
#[derive(Debug, Clone, PartialEq)]
pub struct MergeEvent {
    /// Index of the survivor in the body set after the merge
    pub survivor: usize,
    pub survivor_name: Option<String>,
    pub absorbed_name: Option<String>,
    pub merged_mass: f64,
}

/// What a single tick did
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Forces were applied and every body moved
    Integrated,
    /// Two bodies merged; no body was integrated this tick
    Merged(MergeEvent),
}

/// Owns the body set and advances it one tick at a time
#[derive(Debug, Clone)]
pub struct NBodyEngine {
    bodies: Vec<Body>,
    config: EngineConfig,
    ticks: u64,
    elapsed_time: f64,
}

impl NBodyEngine {
    pub fn new(bodies: Vec<Body>, config: EngineConfig) -> Result<Self, SimError> {
        config.validate()?;
        if config.integrator == IntegrationScheme::EulerCromer && config.dt != 1.0 {
            warn!(
                "euler-cromer integrates with a unit step, configured dt = {} is ignored",
                config.dt
            );
        }

        Ok(Self {
            bodies,
            config,
            ticks: 0,
            elapsed_time: 0.0,
        })
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of ticks stepped so far, merge ticks included
    pub fn tick(&self) -> u64 {
        self.ticks
    }

    /// Simulated seconds covered by integrated ticks
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    /// Advances the system by one tick.
    ///
    /// A failed step leaves the tick count and the body set untouched.
    pub fn step(&mut self) -> Result<StepOutcome, SimError> {
        let n = self.bodies.len();
        let mut forces = vec![Vector3::ZERO; n];

        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (&self.bodies[i], &self.bodies[j]);

                if self.config.collision_enabled && a.distance_to(b) < a.radius + b.radius {
                    // Pending forces are discarded along with `forces`
                    self.ticks += 1;
                    return Ok(StepOutcome::Merged(self.merge(i, j)));
                }

                let force = a.gravitational_force(b, self.config.softening)?;
                forces[i] += force;
                forces[j] -= force;
            }
        }

        self.ticks += 1;
        let dt = self.config.dt;
        for (body, force) in self.bodies.iter_mut().zip(forces) {
            body.advance(force, dt, self.config.integrator);
        }

        self.elapsed_time += match self.config.integrator {
            IntegrationScheme::EulerCromer => 1.0,
            IntegrationScheme::Leapfrog => dt,
        };

        Ok(StepOutcome::Integrated)
    }

    /// Merges bodies `i < j`; the heavier survives, the earlier one on ties.
    fn merge(&mut self, i: usize, j: usize) -> MergeEvent {
        let (survivor, absorbed) = if self.bodies[i].mass() >= self.bodies[j].mass() {
            (i, j)
        } else {
            (j, i)
        };

        let removed = self.bodies.remove(absorbed);
        // Removing an earlier index shifts the survivor down by one
        let survivor = if absorbed < survivor {
            survivor - 1
        } else {
            survivor
        };
        self.bodies[survivor].absorb(&removed);

        let event = MergeEvent {
            survivor,
            survivor_name: self.bodies[survivor].name.clone(),
            absorbed_name: removed.name.clone(),
            merged_mass: self.bodies[survivor].mass(),
        };
        debug!(
            "tick {}: {} absorbed {}, {} bodies left",
            self.ticks,
            self.bodies[survivor].label(),
            removed.label(),
            self.bodies.len()
        );
        event
    }

    pub fn center_of_mass(&self) -> Vector3 {
        let mut total_mass = 0.0;
        let mut com = Vector3::ZERO;

        for body in &self.bodies {
            com += body.position * body.mass();
            total_mass += body.mass();
        }

        if total_mass > 0.0 {
            com * (1.0 / total_mass)
        } else {
            Vector3::ZERO
        }
    }

    pub fn total_momentum(&self) -> Vector3 {
        self.bodies
            .iter()
            .fold(Vector3::ZERO, |sum, body| sum + body.momentum())
    }

    /// Kinetic plus softened potential energy, in joules
    pub fn total_energy(&self) -> f64 {
        let softening_sq = self.config.softening * self.config.softening;
        let mut kinetic = 0.0;
        let mut potential = 0.0;

        for (i, body_i) in self.bodies.iter().enumerate() {
            kinetic += body_i.kinetic_energy();

            for body_j in self.bodies.iter().skip(i + 1) {
                let r_sq = (body_j.position - body_i.position).length_squared();
                let r = (r_sq + softening_sq).sqrt();
                if r > 0.0 {
                    potential -= G * body_i.mass() * body_j.mass() / r;
                }
            }
        }

        kinetic + potential
    }
}
