//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – how the host drives the loop (viewer, frame count, frame delta, seed)
//! - [`ParametersConfig`] – physical and numerical parameters of the box
//! - [`BodyConfig`]       – optional explicit initial state for each body
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   viewer: false           # open the 3D viewer instead of running headless
//!   frames: 600             # frames to advance when headless
//!   frame_dt: 0.0166667     # simulated seconds per frame
//!   seed: 7                 # optional, makes random placement reproducible
//!
//! parameters:
//!   particle_count: 24
//!   radius: 0.1
//!   half_extent: 2.0
//!   gravity: [0.0, -0.0005, 0.0]
//!   damping_factor: 0.999
//!   substeps_per_frame: 4
//!   mass_range: [1.0, 3.0]
//!   initial_velocity_scale: 1.0
//!   spawn_half_extent: 1.0  # optional, defaults to half_extent / 2
//!
//! bodies:                   # optional, replaces random placement
//!   - position: [-0.5, 0.0, 0.0]
//!     velocity: [ 1.0, 0.0, 0.0]
//!     mass: 1.0
//! ```
//!
//! The scenario builder maps this into the validated runtime
//! [`SimulationConfig`](crate::simulation::params::SimulationConfig).

use serde::{Deserialize, Serialize};

use crate::simulation::params::SimulationConfig;
use crate::simulation::states::NVec3;

/// How the host drives the simulation
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub viewer: bool, // `true` - open the Bevy viewer, `false` - run headless
    #[serde(default = "default_frames")]
    pub frames: u64, // headless frame count
    #[serde(default = "default_frame_dt")]
    pub frame_dt: f64, // simulated seconds advanced per frame
    #[serde(default)]
    pub seed: Option<u64>, // deterministic seed for initial placement
}

fn default_frames() -> u64 {
    600
}

fn default_frame_dt() -> f64 {
    1.0 / 60.0
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewer: false,
            frames: default_frames(),
            frame_dt: default_frame_dt(),
            seed: None,
        }
    }
}

/// Physical and numerical parameters of the box
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ParametersConfig {
    pub particle_count: usize, // number of bodies
    pub radius: f64, // shared body radius
    pub half_extent: f64, // boundary cube half size
    pub gravity: [f64; 3], // added to velocity once per substep
    pub damping_factor: f64, // velocity multiplier per substep
    pub substeps_per_frame: u32, // substeps per advance
    pub mass_range: [f64; 2], // [min, max) for random masses
    pub initial_velocity_scale: f64, // random velocity components in [-scale, scale)
    #[serde(default)]
    pub spawn_half_extent: Option<f64>, // random positions inside [-s, s]^3
}

impl From<&ParametersConfig> for SimulationConfig {
    fn from(p: &ParametersConfig) -> Self {
        Self {
            particle_count: p.particle_count,
            radius: p.radius,
            half_extent: p.half_extent,
            gravity: NVec3::from(p.gravity),
            damping_factor: p.damping_factor,
            substeps_per_frame: p.substeps_per_frame,
            mass_range: (p.mass_range[0], p.mass_range[1]),
            initial_velocity_scale: p.initial_velocity_scale,
            spawn_half_extent: p.spawn_half_extent.unwrap_or(0.5 * p.half_extent),
        }
    }
}

/// Explicit initial state for one body
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct BodyConfig {
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    pub mass: f64,
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig, // host-side settings
    pub parameters: ParametersConfig, // physics parameters
    #[serde(default)]
    pub bodies: Option<Vec<BodyConfig>>, // explicit bodies, otherwise random placement
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }
}
