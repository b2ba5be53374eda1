//! Point-mass bodies and the pairwise force law

use crate::config::IntegrationScheme;
use crate::error::SimError;
use crate::vector::Vector3;

/// Gravitational constant in m³/(kg·s²)
pub const G: f64 = 6.6743e-11;

/// Display color used when a scenario does not pick one (light gray)
pub const DEFAULT_COLOR: [f32; 4] = [0.827, 0.827, 0.827, 1.0];

const NAMED_COLORS: &[(&str, [f32; 4])] = &[
    ("lightgray", DEFAULT_COLOR),
    ("gray", [0.502, 0.502, 0.502, 1.0]),
    ("white", [1.0, 1.0, 1.0, 1.0]),
    ("yellow", [1.0, 1.0, 0.0, 1.0]),
    ("orange", [1.0, 0.647, 0.0, 1.0]),
    ("orangered", [1.0, 0.271, 0.0, 1.0]),
    ("red", [1.0, 0.0, 0.0, 1.0]),
    ("navajowhite", [1.0, 0.871, 0.678, 1.0]),
    ("cornflowerblue", [0.392, 0.584, 0.929, 1.0]),
    ("blue", [0.0, 0.0, 1.0, 1.0]),
];

/// Looks up an RGBA color by its CSS name, ignoring case
pub fn named_color(name: &str) -> Option<[f32; 4]> {
    let name = name.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, rgba)| *rgba)
}

/// A celestial body (star, planet, asteroid) treated as a point mass.
///
/// Net force is not stored here: the engine computes it fresh each tick and
/// hands it to [`Body::advance`].
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vector3,
    pub velocity: Vector3,
    mass: f64,
    pub radius: f64,
    pub name: Option<String>,
    pub color: [f32; 4],
}

impl Body {
    /// Creates a body, rejecting a mass that is not positive and finite or
    /// a radius that is negative or non-finite.
    pub fn new(
        position: Vector3,
        velocity: Vector3,
        mass: f64,
        radius: f64,
    ) -> Result<Self, SimError> {
        if !(mass > 0.0 && mass.is_finite()) {
            return Err(SimError::InvalidMass(mass));
        }
        if !(radius >= 0.0 && radius.is_finite()) {
            return Err(SimError::InvalidRadius(radius));
        }

        Ok(Self {
            position,
            velocity,
            mass,
            radius,
            name: None,
            color: DEFAULT_COLOR,
        })
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Name for log output, "unnamed" when none was given
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    pub fn distance_to(&self, other: &Body) -> f64 {
        (self.position - other.position).length()
    }

    /// Force exerted on this body by `other`, pointing from this body
    /// towards `other`.
    ///
    /// Magnitude is `G·m₁·m₂ / (d² + softening²)`. Coincident bodies have no
    /// direction: with zero softening that is a [`SimError::SingularForce`],
    /// with positive softening the pair contributes a zero force.
    pub fn gravitational_force(&self, other: &Body, softening: f64) -> Result<Vector3, SimError> {
        let direction = other.position - self.position;
        let distance = direction.length();

        if distance == 0.0 {
            if softening > 0.0 {
                return Ok(Vector3::ZERO);
            }
            return Err(SimError::SingularForce {
                first: self.label().to_string(),
                second: other.label().to_string(),
            });
        }

        let magnitude =
            G * self.mass * other.mass / (distance * distance + softening * softening);
        Ok(direction.normalize()? * magnitude)
    }

    /// Applies `force` for one step and moves the body.
    ///
    /// Both schemes update velocity first and then move with the new
    /// velocity; Euler-Cromer always uses a unit step and ignores `dt`.
    pub fn advance(&mut self, force: Vector3, dt: f64, scheme: IntegrationScheme) {
        let acceleration = force * (1.0 / self.mass);
        match scheme {
            IntegrationScheme::EulerCromer => {
                self.velocity += acceleration;
                self.position += self.velocity;
            }
            IntegrationScheme::Leapfrog => {
                self.velocity += acceleration * dt;
                self.position += self.velocity * dt;
            }
        }
    }

    /// Absorbs `other` using the simplified accretion rule.
    ///
    /// Velocities are summed rather than mass-weighted, so momentum is not
    /// conserved, and the radius grows by the square root of the absorbed
    /// radius. Both are placeholder rules kept as-is.
    pub fn absorb(&mut self, other: &Body) {
        self.mass += other.mass;
        self.velocity += other.velocity;
        self.radius += other.radius.sqrt();
    }

    pub fn momentum(&self) -> Vector3 {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }
}
