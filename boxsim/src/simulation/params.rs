//! Numerical and physical parameters for the simulation
//!
//! `SimulationConfig` holds the settings fixed for a simulation's lifetime:
//! - population size, shared radius and boundary half-extent,
//! - gravity and per-substep damping,
//! - substeps per rendered frame,
//! - mass range, initial speed scale and spawn region used at initialization

use super::error::{ConfigError, ConfigResult};
use super::states::NVec3;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub particle_count: usize, // fixed population size
    pub radius: f64, // shared collision radius
    pub half_extent: f64, // boundary cube spans [-half_extent, half_extent] on every axis
    pub gravity: NVec3, // added to every velocity once per substep
    pub damping_factor: f64, // velocity multiplier per substep, in (0, 1]
    pub substeps_per_frame: u32, // integrator substeps per advance()
    pub mass_range: (f64, f64), // masses drawn from [min, max)
    pub initial_velocity_scale: f64, // initial velocity components drawn from [-scale, scale)
    pub spawn_half_extent: f64, // initial positions drawn inside [-spawn, spawn]^3
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            particle_count: 24,
            radius: 0.1,
            half_extent: 2.0,
            gravity: NVec3::new(0.0, -0.0005, 0.0),
            damping_factor: 0.999,
            substeps_per_frame: 4,
            mass_range: (1.0, 3.0),
            initial_velocity_scale: 1.0,
            spawn_half_extent: 1.0,
        }
    }
}

impl SimulationConfig {
    /// Reject configurations that would produce an unusable simulation
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.radius > 0.0 && self.radius.is_finite()) {
            return Err(ConfigError::Radius(self.radius));
        }
        if !(self.half_extent > 0.0 && self.half_extent.is_finite()) {
            return Err(ConfigError::HalfExtent(self.half_extent));
        }
        if self.substeps_per_frame == 0 {
            return Err(ConfigError::Substeps);
        }
        if !(self.damping_factor > 0.0 && self.damping_factor <= 1.0) {
            return Err(ConfigError::Damping(self.damping_factor));
        }

        let (min, max) = self.mass_range;
        if !(min > 0.0 && min.is_finite() && max.is_finite() && max >= min) {
            return Err(ConfigError::MassRange(min, max));
        }

        if !(self.initial_velocity_scale >= 0.0 && self.initial_velocity_scale.is_finite()) {
            return Err(ConfigError::VelocityScale(self.initial_velocity_scale));
        }
        if !self.gravity.iter().all(|g| g.is_finite()) {
            return Err(ConfigError::Gravity);
        }
        if !(self.spawn_half_extent >= 0.0 && self.spawn_half_extent <= self.half_extent) {
            return Err(ConfigError::SpawnExtent(self.spawn_half_extent));
        }

        Ok(())
    }

    /// Centre distance below which two bodies overlap
    pub fn contact_distance(&self) -> f64 {
        2.0 * self.radius
    }
}
