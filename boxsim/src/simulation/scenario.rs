//! Build fully-initialized simulations from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a `Scenario` bundle
//! containing:
//! - engine settings (`EngineConfig`)
//! - the validated runtime `SimulationConfig`
//! - the initial particle arena (`ParticleSystem` at t = 0)
//!
//! Bodies either come from the scenario's explicit `bodies` list or are drawn
//! from a seedable PRNG. After this point the simulation has no randomness.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::configuration::config::{BodyConfig, EngineConfig, ScenarioConfig};
use crate::simulation::engine::SimulationLoop;
use crate::simulation::error::{ConfigError, ConfigResult};
use crate::simulation::params::SimulationConfig;
use crate::simulation::states::{NVec3, Particle, ParticleSystem};

/// Runtime bundle built from a [`ScenarioConfig`]
#[derive(Debug, Clone)]
pub struct Scenario {
    pub engine: EngineConfig,
    pub config: SimulationConfig,
    pub system: ParticleSystem,
}

impl Scenario {
    pub fn build(cfg: ScenarioConfig) -> ConfigResult<Self> {
        let config = SimulationConfig::from(&cfg.parameters);
        config.validate()?;

        let system = match &cfg.bodies {
            Some(bodies) => explicit_bodies(&config, bodies)?,
            None => {
                let mut rng = match cfg.engine.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                random_bodies(&config, &mut rng)
            }
        };

        tracing::debug!(
            particles = system.len(),
            seed = ?cfg.engine.seed,
            explicit = cfg.bodies.is_some(),
            "scenario built"
        );

        Ok(Self {
            engine: cfg.engine,
            config,
            system,
        })
    }

    /// Hand the arena over to a frame-driven loop
    pub fn into_loop(self) -> ConfigResult<SimulationLoop> {
        SimulationLoop::new(self.config, self.system)
    }
}

/// Uniform placement inside the spawn cube, uniform velocity components and
/// masses in `[min, max)`
pub fn random_bodies<R: Rng>(cfg: &SimulationConfig, rng: &mut R) -> ParticleSystem {
    let s = cfg.spawn_half_extent;
    let vs = cfg.initial_velocity_scale;
    let (m_min, m_max) = cfg.mass_range;

    let particles = (0..cfg.particle_count)
        .map(|_| {
            let x = NVec3::new(
                symmetric(rng, s),
                symmetric(rng, s),
                symmetric(rng, s),
            );
            let v = NVec3::new(
                symmetric(rng, vs),
                symmetric(rng, vs),
                symmetric(rng, vs),
            );
            let m = if m_max > m_min { rng.gen_range(m_min..m_max) } else { m_min };
            Particle::new(x, v, m)
        })
        .collect();

    ParticleSystem::new(particles)
}

// Uniform in [-scale, scale); a zero scale gives exactly zero
fn symmetric<R: Rng>(rng: &mut R, scale: f64) -> f64 {
    if scale > 0.0 {
        rng.gen_range(-scale..scale)
    } else {
        0.0
    }
}

fn explicit_bodies(cfg: &SimulationConfig, bodies: &[BodyConfig]) -> ConfigResult<ParticleSystem> {
    if bodies.len() != cfg.particle_count {
        return Err(ConfigError::BodyCount {
            expected: cfg.particle_count,
            bodies: bodies.len(),
        });
    }

    let particles = bodies
        .iter()
        .enumerate()
        .map(|(i, bc)| {
            let p = Particle::new(NVec3::from(bc.position), NVec3::from(bc.velocity), bc.mass);
            if p.m > 0.0 && p.is_finite() {
                Ok(p)
            } else {
                Err(ConfigError::Body(i))
            }
        })
        .collect::<ConfigResult<Vec<_>>>()?;

    Ok(ParticleSystem::new(particles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::config::ParametersConfig;

    fn params(count: usize) -> ParametersConfig {
        ParametersConfig {
            particle_count: count,
            radius: 0.05,
            half_extent: 1.0,
            gravity: [0.0, -0.001, 0.0],
            damping_factor: 0.99,
            substeps_per_frame: 4,
            mass_range: [1.0, 3.0],
            initial_velocity_scale: 0.5,
            spawn_half_extent: Some(0.4),
        }
    }

    fn seeded(count: usize, seed: u64) -> ScenarioConfig {
        ScenarioConfig {
            engine: EngineConfig { seed: Some(seed), ..Default::default() },
            parameters: params(count),
            bodies: None,
        }
    }

    #[test]
    fn random_bodies_respect_ranges() {
        let scenario = Scenario::build(seeded(200, 3)).unwrap();

        assert_eq!(scenario.system.len(), 200);
        for p in &scenario.system.particles {
            assert!(p.x.iter().all(|c| c.abs() <= 0.4));
            assert!(p.v.iter().all(|c| c.abs() <= 0.5));
            assert!(p.m >= 1.0 && p.m < 3.0);
        }
    }

    #[test]
    fn same_seed_same_bodies() {
        let a = Scenario::build(seeded(16, 42)).unwrap();
        let b = Scenario::build(seeded(16, 42)).unwrap();
        let c = Scenario::build(seeded(16, 43)).unwrap();

        assert_eq!(a.system.particles, b.system.particles);
        assert_ne!(a.system.particles, c.system.particles);
    }

    #[test]
    fn degenerate_mass_range_gives_constant_mass() {
        let mut cfg = seeded(5, 1);
        cfg.parameters.mass_range = [2.0, 2.0];
        let scenario = Scenario::build(cfg).unwrap();
        assert!(scenario.system.particles.iter().all(|p| p.m == 2.0));
    }

    #[test]
    fn explicit_bodies_are_used_verbatim() {
        let mut cfg = seeded(2, 0);
        cfg.bodies = Some(vec![
            BodyConfig { position: [0.1, 0.0, 0.0], velocity: [1.0, 0.0, 0.0], mass: 1.0 },
            BodyConfig { position: [-0.1, 0.0, 0.0], velocity: [0.0, 0.0, 0.0], mass: 2.0 },
        ]);

        let scenario = Scenario::build(cfg).unwrap();
        assert_eq!(scenario.system.particles[0].x, NVec3::new(0.1, 0.0, 0.0));
        assert_eq!(scenario.system.particles[1].m, 2.0);
    }

    #[test]
    fn explicit_body_count_must_match() {
        let mut cfg = seeded(3, 0);
        cfg.bodies = Some(vec![BodyConfig {
            position: [0.0; 3],
            velocity: [0.0; 3],
            mass: 1.0,
        }]);

        let err = Scenario::build(cfg).unwrap_err();
        assert_eq!(err, ConfigError::BodyCount { expected: 3, bodies: 1 });
    }

    #[test]
    fn explicit_body_needs_positive_mass() {
        let mut cfg = seeded(1, 0);
        cfg.bodies = Some(vec![BodyConfig {
            position: [0.0; 3],
            velocity: [0.0; 3],
            mass: -1.0,
        }]);

        assert_eq!(Scenario::build(cfg).unwrap_err(), ConfigError::Body(0));
    }

    #[test]
    fn invalid_parameters_fail_fast() {
        let mut cfg = seeded(4, 0);
        cfg.parameters.substeps_per_frame = 0;
        assert_eq!(Scenario::build(cfg).unwrap_err(), ConfigError::Substeps);
    }

    #[test]
    fn scenario_hands_over_to_loop() {
        let sim = Scenario::build(seeded(8, 9)).unwrap().into_loop().unwrap();
        assert_eq!(sim.particles().len(), 8);
        assert!(!sim.is_running());
    }
}
