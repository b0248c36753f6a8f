//! Core state types for the box simulation.
//!
//! Defines the particle arena:
//! - `Particle`       one body's position, velocity and mass
//! - `ParticleSystem` contiguous arena of particles plus the simulated time `t`
//! - `ParticleState`  read-only snapshot entry handed to renderers
//!
//! Radius and boundary half-extent are shared by every body and live in
//! `SimulationConfig`, not on the particle.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub m: f64, // mass, always > 0
}

impl Particle {
    pub fn new(x: NVec3, v: NVec3, m: f64) -> Self {
        Self { x, v, m }
    }

    /// Linear momentum `m * v`
    pub fn momentum(&self) -> NVec3 {
        self.v * self.m
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.m * self.v.norm_squared()
    }

    pub fn is_finite(&self) -> bool {
        self.x.iter().chain(self.v.iter()).all(|c| c.is_finite())
    }
}

#[derive(Debug, Clone)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>, // fixed population, addressed by index
    pub t: f64, // simulated time
}

impl ParticleSystem {
    pub fn new(particles: Vec<Particle>) -> Self {
        Self { particles, t: 0.0 }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Sum of `m * v` over the whole arena
    pub fn total_momentum(&self) -> NVec3 {
        self.particles
            .iter()
            .fold(NVec3::zeros(), |acc, p| acc + p.momentum())
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(Particle::kinetic_energy).sum()
    }

    /// Ordered copy of every body's state, safe to hand to a renderer
    pub fn snapshot(&self) -> Vec<ParticleState> {
        self.particles.iter().map(ParticleState::from).collect()
    }
}

/// One entry of the snapshot read by external renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleState {
    pub position: NVec3,
    pub velocity: NVec3,
    pub mass: f64,
}

impl From<&Particle> for ParticleState {
    fn from(p: &Particle) -> Self {
        Self {
            position: p.x,
            velocity: p.v,
            mass: p.m,
        }
    }
}
