//! Error type shared by the vector math, bodies and the engine

use std::fmt;

/// Precondition violations raised by the simulation core.
///
/// None of these are transient: they point at a broken scenario or
/// configuration, so callers should surface them rather than retry.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Normalizing a vector of zero (or non-finite) length
    DegenerateVector,
    /// Two bodies share a position and no softening is configured
    SingularForce { first: String, second: String },
    /// A body was constructed with a mass that is not strictly positive
    InvalidMass(f64),
    /// A body was constructed with a negative or non-finite radius
    InvalidRadius(f64),
    /// Vector component access outside {0, 1, 2}
    IndexOutOfRange(usize),
    /// Rejected engine, driver or scenario configuration
    InvalidConfig(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::DegenerateVector => write!(f, "cannot normalize a zero-length vector"),
            SimError::SingularForce { first, second } => write!(
                f,
                "bodies {first} and {second} coincide and softening is zero"
            ),
            SimError::InvalidMass(mass) => {
                write!(f, "body mass must be positive and finite, got {mass}")
            }
            SimError::InvalidRadius(radius) => {
                write!(f, "body radius must be non-negative and finite, got {radius}")
            }
            SimError::IndexOutOfRange(index) => {
                write!(f, "vector index {index} out of range, expected 0, 1 or 2")
            }
            SimError::InvalidConfig(reason) => write!(f, "invalid configuration: {reason}"),
        }
    }
}

impl std::error::Error for SimError {}
