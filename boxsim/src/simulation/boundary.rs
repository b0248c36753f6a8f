//! Axis-aligned reflection at the walls of the boundary cube
//!
//! A body whose sphere pokes through a wall has that axis' velocity negated.
//! Position is never touched, so a slow body can sit outside the wall for a
//! few substeps before its reflected velocity carries it back.

use super::states::Particle;

#[derive(Debug, Clone, Copy)]
pub struct BoundaryReflector {
    pub half_extent: f64, // walls at +-half_extent on every axis
    pub radius: f64, // shared body radius
}

impl BoundaryReflector {
    pub fn new(half_extent: f64, radius: f64) -> Self {
        Self { half_extent, radius }
    }

    /// Flip the velocity component of every axis the body violates.
    /// Returns a bitmask of the flipped axes (bit 0 = x, 1 = y, 2 = z).
    pub fn reflect(&self, p: &mut Particle) -> u8 {
        let mut flipped = 0;
        for axis in 0..3 {
            let x = p.x[axis];
            if x - self.radius < -self.half_extent || x + self.radius > self.half_extent {
                p.v[axis] = -p.v[axis];
                flipped |= 1 << axis;
            }
        }
        flipped
    }

    pub fn reflect_all(&self, particles: &mut [Particle]) {
        for p in particles.iter_mut() {
            self.reflect(p);
        }
    }
}
