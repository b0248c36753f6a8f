//! Substepped explicit integrator for the particle arena
//!
//! One rendered frame is split into `substeps` equal slices. Each slice runs,
//! in this order:
//! 1. pairwise collision pass (index order, i < j)
//! 2. gravity
//! 3. damping
//! 4. drift: x += v * dt
//! 5. boundary reflection

use super::boundary::BoundaryReflector;
use super::collision::CollisionResolver;
use super::forces::{apply_damping, apply_gravity};
use super::params::SimulationConfig;
use super::states::ParticleSystem;

/// Advance the system by one frame of `frame_dt`, split into `substeps` slices.
/// Updates velocities, positions and `sys.t` in place.
pub fn step(sys: &mut ParticleSystem, cfg: &SimulationConfig, frame_dt: f64, substeps: u32) {
    if substeps == 0 {
        return;
    }

    let dt = frame_dt / substeps as f64;
    let walls = BoundaryReflector::new(cfg.half_extent, cfg.radius);

    for _ in 0..substeps {
        substep(sys, cfg, &walls, dt);
    }

    sys.t += frame_dt;
}

/// One slice of a frame with timestep `dt`
pub fn substep(sys: &mut ParticleSystem, cfg: &SimulationConfig, walls: &BoundaryReflector, dt: f64) {
    let particles = sys.particles.as_mut_slice();

    CollisionResolver::resolve_all(particles, cfg.radius);

    apply_gravity(particles, cfg.gravity);
    apply_damping(particles, cfg.damping_factor);

    // Drift with the freshly updated velocity
    for p in particles.iter_mut() {
        p.x += p.v * dt;
    }

    walls.reflect_all(particles);
}
