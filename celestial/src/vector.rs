//! 3D vector in double precision
//!
//! SI-scale scenarios mix masses around 1e30 kg with G around 1e-11, so the
//! physics runs in `f64` and only drops to `glam::Vec3` for rendering.

use glam::{DVec3, Vec3};
use std::fmt;
use std::ops::{Add, AddAssign, Index, Mul, Neg, Sub, SubAssign};

use crate::error::SimError;

/// A vector in 3D space. Arithmetic always returns a new value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn add(self, v: Vector3) -> Vector3 {
        Vector3::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }

    pub fn sub(self, v: Vector3) -> Vector3 {
        Vector3::new(self.x - v.x, self.y - v.y, self.z - v.z)
    }

    pub fn scale(self, f: f64) -> Vector3 {
        Vector3::new(self.x * f, self.y * f, self.z * f)
    }

    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Euclidean norm, without intermediate overflow or underflow
    pub fn length(self) -> f64 {
        self.x.hypot(self.y).hypot(self.z)
    }

    /// Unit vector with the same direction.
    ///
    /// Fails with [`SimError::DegenerateVector`] instead of producing NaN
    /// components when the vector is zero or has a non-finite component.
    pub fn normalize(self) -> Result<Vector3, SimError> {
        if !(self.x.is_finite() && self.y.is_finite() && self.z.is_finite()) {
            return Err(SimError::DegenerateVector);
        }
        let largest = self.x.abs().max(self.y.abs()).max(self.z.abs());
        if largest == 0.0 {
            return Err(SimError::DegenerateVector);
        }

        // Dividing by the largest component first keeps tiny and huge vectors in range
        let scaled = Vector3::new(self.x / largest, self.y / largest, self.z / largest);
        let length = scaled.length();
        Ok(Vector3::new(scaled.x / length, scaled.y / length, scaled.z / length))
    }

    /// Rescales this vector to unit length in place.
    ///
    /// Leaves the vector untouched when it fails.
    pub fn normalize_mut(&mut self) -> Result<(), SimError> {
        *self = self.normalize()?;
        Ok(())
    }

    /// Checked component access: 0 → x, 1 → y, 2 → z.
    pub fn component(&self, index: usize) -> Result<f64, SimError> {
        match index {
            0 => Ok(self.x),
            1 => Ok(self.y),
            2 => Ok(self.z),
            _ => Err(SimError::IndexOutOfRange(index)),
        }
    }

    /// Single-precision copy divided by `unit`, for GPU buffers
    pub fn to_scaled_vec3(self, unit: f64) -> Vec3 {
        (DVec3::from(self) / unit).as_vec3()
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::add(self, rhs)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::sub(self, rhs)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: f64) -> Vector3 {
        self.scale(rhs)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        self.scale(-1.0)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Vector3) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, rhs: Vector3) {
        *self = *self - rhs;
    }
}

/// Panics outside {0, 1, 2}; use [`Vector3::component`] for a checked read.
impl Index<usize> for Vector3 {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("{}", SimError::IndexOutOfRange(index)),
        }
    }
}

impl From<Vector3> for DVec3 {
    fn from(v: Vector3) -> Self {
        DVec3::new(v.x, v.y, v.z)
    }
}

impl From<DVec3> for Vector3 {
    fn from(v: DVec3) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Vector3::new(x, y, z)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_returns_new_vectors() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, -1.0, 0.5);

        assert_eq!(a + b, Vector3::new(5.0, 1.0, 3.5));
        assert_eq!(a - b, Vector3::new(-3.0, 3.0, 2.5));
        assert_eq!(a * 2.0, Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(-a, Vector3::new(-1.0, -2.0, -3.0));
        // Operands are untouched
        assert_eq!(a, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn length_is_euclidean_norm() {
        assert!((Vector3::new(3.0, 4.0, 12.0).length() - 13.0).abs() < 1e-12);
        assert_eq!(Vector3::ZERO.length(), 0.0);
    }

    #[test]
    fn normalize_yields_unit_vector() {
        let v = Vector3::new(0.0, -5.0, 0.0).normalize().unwrap();
        assert!((v.length() - 1.0).abs() < 1e-12);
        assert!((v.y + 1.0).abs() < 1e-12);
    }

    #[test]
    fn normalize_handles_extreme_magnitudes() {
        for x in [1e200, 1e-200, f64::MAX, 5e-324] {
            let v = Vector3::new(x, 0.0, 0.0).normalize().unwrap();
            assert_eq!(v, Vector3::new(1.0, 0.0, 0.0));
        }
        let v = Vector3::new(3e-300, 4e-300, 0.0).normalize().unwrap();
        assert!((v.x - 0.6).abs() < 1e-12);
        assert!((v.y - 0.8).abs() < 1e-12);
        assert!((Vector3::new(3e200, 4e200, 0.0).length() - 5e200).abs() < 1e188);
    }

    #[test]
    fn normalize_non_finite_is_degenerate() {
        assert!(Vector3::new(f64::NAN, 1.0, 0.0).normalize().is_err());
        assert!(Vector3::new(f64::INFINITY, 0.0, 0.0).normalize().is_err());
    }

    #[test]
    fn normalize_zero_vector_is_degenerate() {
        assert_eq!(Vector3::ZERO.normalize(), Err(SimError::DegenerateVector));

        let mut v = Vector3::ZERO;
        assert_eq!(v.normalize_mut(), Err(SimError::DegenerateVector));
        assert_eq!(v, Vector3::ZERO);
    }

    #[test]
    fn normalize_mut_rescales_in_place() {
        let mut v = Vector3::new(2.0, 0.0, 0.0);
        v.normalize_mut().unwrap();
        assert_eq!(v, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn component_access_is_checked() {
        let v = Vector3::new(7.0, 8.0, 9.0);
        assert_eq!(v.component(0), Ok(7.0));
        assert_eq!(v.component(2), Ok(9.0));
        assert_eq!(v.component(3), Err(SimError::IndexOutOfRange(3)));
        assert_eq!(v[1], 8.0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn index_operator_panics_past_z() {
        let _ = Vector3::ZERO[3];
    }

    #[test]
    fn display_lists_components() {
        assert_eq!(Vector3::new(1.0, 2.5, -3.0).to_string(), "Vector(1, 2.5, -3)");
    }
}
