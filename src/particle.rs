use nalgebra::Vector2;

/// A single interacting body of the ensemble.
///
/// `force` and `potential_energy` are only meaningful right after the
/// ensemble recomputed them for the whole collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Position (m)
    pub position: Vector2<f64>,
    /// Velocity (m/s)
    pub velocity: Vector2<f64>,
    /// Net force from all other particles (N)
    pub force: Vector2<f64>,
    /// Interaction energy with every other particle (J)
    pub potential_energy: f64,
    /// Mass (kg)
    pub mass: f64,
    /// Radius (m)
    pub radius: f64,
}

impl Particle {
    /// Particle at rest at `position`.
    pub fn new(position: Vector2<f64>, mass: f64, radius: f64) -> Self {
        Self::with_velocity(position, Vector2::zeros(), mass, radius)
    }

    pub fn with_velocity(
        position: Vector2<f64>,
        velocity: Vector2<f64>,
        mass: f64,
        radius: f64,
    ) -> Self {
        Particle {
            position,
            velocity,
            force: Vector2::zeros(),
            potential_energy: 0.0,
            mass,
            radius,
        }
    }

    #[inline]
    pub fn speed_squared(&self) -> f64 {
        self.velocity.norm_squared()
    }

    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.speed_squared()
    }

    #[inline]
    pub fn momentum(&self) -> Vector2<f64> {
        self.velocity * self.mass
    }

    /// True when both coordinates lie within `[lo, hi]`.
    #[inline]
    pub fn is_inside(&self, lo: f64, hi: f64) -> bool {
        self.position.iter().all(|&c| c >= lo && c <= hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn kinetic_energy_uses_both_components() {
        let p = Particle::with_velocity(Vector2::zeros(), Vector2::new(3.0, 4.0), 2.0, 0.5);
        assert_relative_eq!(p.kinetic_energy(), 25.0);
        assert_relative_eq!(p.momentum().x, 6.0);
    }

    #[test]
    fn containment_checks_each_axis() {
        let inside = Particle::new(Vector2::new(0.9, -1.0), 1.0, 0.1);
        let outside = Particle::new(Vector2::new(0.0, 1.2), 1.0, 0.1);
        assert!(inside.is_inside(-1.0, 1.0));
        assert!(!outside.is_inside(-1.0, 1.0));
    }
}
