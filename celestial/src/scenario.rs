//! Ready-made body sets
//!
//! All values are SI: metres, metres per second, kilograms.

use rand::Rng;
use rand_distr::{Distribution, Normal, StandardNormal};

use crate::body::{named_color, Body, G};
use crate::error::SimError;
use crate::vector::Vector3;

/// Astronomical unit in metres
pub const AU: f64 = 149_597_870_700.0;

/// Solar radius in metres, used as the reference marker size
pub const SOLAR_RADIUS: f64 = 6.957e8;

fn color(name: &str) -> [f32; 4] {
    named_color(name).unwrap_or(crate::body::DEFAULT_COLOR)
}

/// The Sun, the four inner planets and the three largest main-belt objects.
pub fn inner_planets() -> Result<Vec<Body>, SimError> {
    // (name, color, position, velocity, mass, radius)
    let table: [(&str, &str, [f64; 3], [f64; 3], f64, f64); 8] = [
        ("Sun", "yellow", [0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 1.98847e30, 6.957e8),
        (
            "Earth",
            "cornflowerblue",
            [-2.565786669256473e10, 1.459776345868732e11, -1.548952074754238e7],
            [-2.984330713107311e4, -5.272844521387671e3, 9.256858421500258e-1],
            5.97219e24,
            6.371e6,
        ),
        (
            "Mars",
            "orangered",
            [1.629806212726895e11, 1.449170333840721e11, -9.972368219362050e8],
            [-1.511758798465740e4, 2.024466077262084e4, 7.950950455491554e2],
            6.41693e23,
            3.390e6,
        ),
        (
            "Venus",
            "navajowhite",
            [-8.238126961879626e10, 7.005400357447663e10, 5.684910758346014e9],
            [-2.263904820538244e4, -2.701728799104976e4, 9.352522537487609e2],
            4.86732e24,
            6.051e6,
        ),
        (
            "Mercury",
            "gray",
            [-4.726172010176350e10, -4.671443491995941e10, 4.087355549094304e9],
            [2.476489737911525e4, -3.197373466563876e4, -4.885743869363329e3],
            3.30104e23,
            2.439e6,
        ),
        (
            "Ceres",
            "lightgray",
            [-3.250173761375654e11, -2.203419016964185e11, 5.291759744142130e10],
            [9.165639992762751e3, -1.610304458359491e4, -2.199191038589312e3],
            9.38350e20,
            4.697e5,
        ),
        (
            "Pallas",
            "lightgray",
            [-3.453585004297552e11, 2.151464493938778e10, 1.484082838948810e10],
            [-3.944259837966826e3, -1.692743937506040e4, 1.202778577972903e4],
            2.11000e20,
            2.700e5,
        ),
        (
            "Vesta",
            "lightgray",
            [2.896729116971705e11, -1.781911555651397e11, -2.990483159764896e10],
            [1.170943386515238e4, 1.610135702679393e4, -1.907600473100395e3],
            2.59000e20,
            2.627e5,
        ),
    ];

    table
        .iter()
        .map(|(name, color_name, position, velocity, mass, radius)| {
            Ok(Body::new(
                Vector3::from(*position),
                Vector3::from(*velocity),
                *mass,
                *radius,
            )?
            .with_name(name)
            .with_color(color(color_name)))
        })
        .collect()
}

/// `count` bodies at rest, scattered normally around the origin with a
/// standard deviation of half an AU per axis.
///
/// Masses are `|N(0, 1)| · overall_mass / count`, radii `N(1e7, 1)` metres.
pub fn random_planets<R: Rng + ?Sized>(
    count: usize,
    overall_mass: f64,
    rng: &mut R,
) -> Result<Vec<Body>, SimError> {
    if count == 0 {
        return Err(SimError::InvalidConfig(
            "random scenario needs at least one body".to_string(),
        ));
    }
    if !(overall_mass > 0.0 && overall_mass.is_finite()) {
        return Err(SimError::InvalidConfig(format!(
            "overall mass must be positive, got {overall_mass}"
        )));
    }

    let radius_dist =
        Normal::<f64>::new(1e7, 1.0).map_err(|e| SimError::InvalidConfig(e.to_string()))?;
    let mut bodies = Vec::with_capacity(count);
    for _ in 0..count {
        let [x, y, z]: [f64; 3] = [
            rng.sample(StandardNormal),
            rng.sample(StandardNormal),
            rng.sample(StandardNormal),
        ];
        let position = Vector3::new(x, y, z) * (0.5 * AU);
        let draw: f64 = rng.sample(StandardNormal);
        // A draw of exactly zero would be an invalid mass
        let mass = (draw.abs() * overall_mass / count as f64).max(f64::MIN_POSITIVE);
        let radius = radius_dist.sample(&mut *rng);
        bodies.push(Body::new(position, Vector3::ZERO, mass, radius)?);
    }

    Ok(bodies)
}

/// A light body on a circular orbit around a heavy one, in the
/// centre-of-mass frame so total momentum is zero.
///
/// The orbit lies in the xy-plane, with the orbiter starting on +x.
pub fn two_body_circular(
    central_mass: f64,
    orbiter_mass: f64,
    separation: f64,
) -> Result<Vec<Body>, SimError> {
    let total = central_mass + orbiter_mass;
    let relative_speed = (G * total / separation).sqrt();

    let central = Body::new(
        Vector3::new(-separation * orbiter_mass / total, 0.0, 0.0),
        Vector3::new(0.0, -relative_speed * orbiter_mass / total, 0.0),
        central_mass,
        0.0,
    )?
    .with_name("central")
    .with_color(color("yellow"));

    let orbiter = Body::new(
        Vector3::new(separation * central_mass / total, 0.0, 0.0),
        Vector3::new(0.0, relative_speed * central_mass / total, 0.0),
        orbiter_mass,
        0.0,
    )?
    .with_name("orbiter")
    .with_color(color("cornflowerblue"));

    Ok(vec![central, orbiter])
}

/// Period of the orbit produced by [`two_body_circular`], in seconds
pub fn circular_period(central_mass: f64, orbiter_mass: f64, separation: f64) -> f64 {
    2.0 * std::f64::consts::PI * (separation.powi(3) / (G * (central_mass + orbiter_mass))).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    #[test]
    fn inner_planets_are_named_and_colored() {
        let bodies = inner_planets().unwrap();
        assert_eq!(bodies.len(), 8);
        assert_eq!(bodies[0].label(), "Sun");
        assert_eq!(bodies[0].color, named_color("yellow").unwrap());
        assert_eq!(bodies[1].label(), "Earth");
        // Earth sits roughly one AU out
        assert!((bodies[1].distance_to(&bodies[0]) / AU - 1.0).abs() < 0.02);
    }

    #[test]
    fn random_planets_are_reproducible() {
        let a = random_planets(10, 1e30, &mut ChaChaRng::seed_from_u64(42)).unwrap();
        let b = random_planets(10, 1e30, &mut ChaChaRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);

        for body in &a {
            assert!(body.mass() > 0.0);
            assert_eq!(body.velocity, Vector3::ZERO);
            assert!((body.radius - 1e7).abs() < 10.0);
            assert!(body.position.length() < 10.0 * AU);
        }
    }

    #[test]
    fn random_planets_rejects_bad_input() {
        let mut rng = ChaChaRng::seed_from_u64(1);
        assert!(random_planets(0, 1e30, &mut rng).is_err());
        assert!(random_planets(3, 0.0, &mut rng).is_err());
    }

    #[test]
    fn two_body_setup_has_zero_momentum() {
        let bodies = two_body_circular(1e30, 1e24, AU).unwrap();
        let momentum = bodies[0].momentum() + bodies[1].momentum();
        assert!(momentum.length() < bodies[1].momentum().length() * 1e-12);
        assert!((bodies[0].distance_to(&bodies[1]) - AU).abs() < AU * 1e-12);
    }
}
