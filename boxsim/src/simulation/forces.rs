//! Per-substep velocity updates applied to the whole arena
//!
//! Both terms act once per substep and are not scaled by the timestep:
//! - gravity adds a constant vector, so more substeps per frame means more
//!   gravity per frame,
//! - damping multiplies velocity, so the per-frame decay is
//!   `damping_factor ^ substeps`.

use super::states::{NVec3, Particle};

pub fn apply_gravity(particles: &mut [Particle], gravity: NVec3) {
    for p in particles.iter_mut() {
        p.v += gravity;
    }
}

pub fn apply_damping(particles: &mut [Particle], damping_factor: f64) {
    for p in particles.iter_mut() {
        p.v *= damping_factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gravity_is_added_unscaled() {
        let mut ps = vec![Particle::new(NVec3::zeros(), NVec3::new(1.0, 0.0, 0.0), 3.0)];
        apply_gravity(&mut ps, NVec3::new(0.0, -2.0, 0.0));
        assert_eq!(ps[0].v, NVec3::new(1.0, -2.0, 0.0));
    }

    #[test]
    fn damping_scales_every_component() {
        let mut ps = vec![Particle::new(NVec3::zeros(), NVec3::new(2.0, -4.0, 8.0), 1.0)];
        apply_damping(&mut ps, 0.5);
        assert_eq!(ps[0].v, NVec3::new(1.0, -2.0, 4.0));
    }
}
