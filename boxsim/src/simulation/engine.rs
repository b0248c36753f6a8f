//! Frame-driven runtime around the integrator
//!
//! `SimulationLoop` owns the configuration and the particle arena and runs a
//! fixed number of substeps every time the host delivers a frame tick. The
//! host owns the per-frame callback; the loop only remembers the handle it was
//! given so it can cancel it symmetrically on `stop`/`dispose`.

use std::collections::BTreeSet;

use super::error::{ConfigError, ConfigResult};
use super::integrator;
use super::params::SimulationConfig;
use super::states::{Particle, ParticleState, ParticleSystem};

/// Registration token handed out by a `FrameHost`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(pub u64);

/// Anything that can deliver per-frame ticks (window event loop, test driver, ...)
pub trait FrameHost {
    fn register_frame_callback(&mut self) -> FrameHandle;
    fn cancel_frame_callback(&mut self, handle: FrameHandle);
}

#[derive(Debug)]
pub struct SimulationLoop {
    config: SimulationConfig,
    system: ParticleSystem,
    frame: Option<FrameHandle>, // live registration with the host, if any
    frames_advanced: u64,
}

impl SimulationLoop {
    /// Validate `config` and take ownership of an initialized arena
    pub fn new(config: SimulationConfig, system: ParticleSystem) -> ConfigResult<Self> {
        config.validate()?;
        if system.len() != config.particle_count {
            return Err(ConfigError::BodyCount {
                expected: config.particle_count,
                bodies: system.len(),
            });
        }
        if let Some(i) = system.particles.iter().position(|p| !(p.m > 0.0) || !p.is_finite()) {
            return Err(ConfigError::Body(i));
        }

        tracing::debug!(
            particles = system.len(),
            substeps = config.substeps_per_frame,
            "simulation loop created"
        );
        Ok(Self {
            config,
            system,
            frame: None,
            frames_advanced: 0,
        })
    }

    /// Advance one rendered frame. Always runs `substeps_per_frame` substeps,
    /// however long the host's real frame took.
    pub fn advance(&mut self, frame_dt: f64) {
        integrator::step(
            &mut self.system,
            &self.config,
            frame_dt,
            self.config.substeps_per_frame,
        );
        self.frames_advanced += 1;
    }

    /// Register the per-frame callback with `host`. No-op when already running.
    pub fn start<H: FrameHost>(&mut self, host: &mut H) {
        if self.frame.is_some() {
            return;
        }
        let handle = host.register_frame_callback();
        tracing::info!(handle = handle.0, "simulation started");
        self.frame = Some(handle);
    }

    /// Cancel the per-frame callback. No-op when not running.
    pub fn stop<H: FrameHost>(&mut self, host: &mut H) {
        if let Some(handle) = self.frame.take() {
            host.cancel_frame_callback(handle);
            tracing::info!(handle = handle.0, frames = self.frames_advanced, "simulation stopped");
        }
    }

    /// Tear down: cancel the callback and release the arena
    pub fn dispose<H: FrameHost>(mut self, host: &mut H) {
        self.stop(host);
        tracing::debug!(particles = self.system.len(), "simulation disposed");
    }

    pub fn is_running(&self) -> bool {
        self.frame.is_some()
    }

    pub fn frame_handle(&self) -> Option<FrameHandle> {
        self.frame
    }

    pub fn frames_advanced(&self) -> u64 {
        self.frames_advanced
    }

    /// Simulated time, the sum of every `frame_dt` advanced so far
    pub fn time(&self) -> f64 {
        self.system.t
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    pub fn particles(&self) -> &[Particle] {
        &self.system.particles
    }

    pub fn snapshot(&self) -> Vec<ParticleState> {
        self.system.snapshot()
    }
}

/// Headless host ticking at a fixed frame delta
#[derive(Debug)]
pub struct FixedStepHost {
    pub frame_dt: f64,
    active: BTreeSet<FrameHandle>,
    next_id: u64,
}

impl FixedStepHost {
    pub fn new(frame_dt: f64) -> Self {
        Self {
            frame_dt,
            active: BTreeSet::new(),
            next_id: 0,
        }
    }

    pub fn is_active(&self, handle: FrameHandle) -> bool {
        self.active.contains(&handle)
    }

    pub fn active_callbacks(&self) -> usize {
        self.active.len()
    }

    /// Deliver up to `frames` ticks to `sim`, stopping as soon as it no longer
    /// holds a live registration with this host. Returns the ticks delivered.
    pub fn pump(&mut self, sim: &mut SimulationLoop, frames: u64) -> u64 {
        let mut delivered = 0;
        while delivered < frames {
            match sim.frame_handle() {
                Some(handle) if self.is_active(handle) => {
                    sim.advance(self.frame_dt);
                    delivered += 1;
                }
                _ => break,
            }
        }
        delivered
    }
}

impl FrameHost for FixedStepHost {
    fn register_frame_callback(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.active.insert(handle);
        handle
    }

    fn cancel_frame_callback(&mut self, handle: FrameHandle) {
        self.active.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::states::NVec3;

    fn single_body_loop() -> SimulationLoop {
        let cfg = SimulationConfig {
            particle_count: 1,
            gravity: NVec3::zeros(),
            damping_factor: 1.0,
            ..Default::default()
        };
        let sys = ParticleSystem::new(vec![Particle::new(
            NVec3::zeros(),
            NVec3::new(0.1, 0.0, 0.0),
            1.0,
        )]);
        SimulationLoop::new(cfg, sys).unwrap()
    }

    #[test]
    fn new_rejects_invalid_config() {
        let cfg = SimulationConfig { half_extent: -1.0, ..Default::default() };
        let err = SimulationLoop::new(cfg, ParticleSystem::new(vec![])).unwrap_err();
        assert_eq!(err, ConfigError::HalfExtent(-1.0));
    }

    #[test]
    fn new_rejects_population_mismatch() {
        let cfg = SimulationConfig { particle_count: 2, ..Default::default() };
        let sys = ParticleSystem::new(vec![Particle::new(NVec3::zeros(), NVec3::zeros(), 1.0)]);
        let err = SimulationLoop::new(cfg, sys).unwrap_err();
        assert_eq!(err, ConfigError::BodyCount { expected: 2, bodies: 1 });
    }

    #[test]
    fn new_rejects_massless_body() {
        let cfg = SimulationConfig { particle_count: 1, ..Default::default() };
        let sys = ParticleSystem::new(vec![Particle::new(NVec3::zeros(), NVec3::zeros(), 0.0)]);
        assert_eq!(SimulationLoop::new(cfg, sys).unwrap_err(), ConfigError::Body(0));
    }

    #[test]
    fn advance_runs_without_registration() {
        let mut sim = single_body_loop();
        sim.advance(0.5);
        assert_eq!(sim.frames_advanced(), 1);
        assert!((sim.time() - 0.5).abs() < 1e-15);
        assert!(!sim.is_running());
    }

    #[test]
    fn start_is_idempotent() {
        let mut host = FixedStepHost::new(0.016);
        let mut sim = single_body_loop();

        sim.start(&mut host);
        let first = sim.frame_handle();
        sim.start(&mut host);

        assert_eq!(sim.frame_handle(), first);
        assert_eq!(host.active_callbacks(), 1);
    }

    #[test]
    fn pump_stops_after_stop() {
        let mut host = FixedStepHost::new(0.016);
        let mut sim = single_body_loop();

        assert_eq!(host.pump(&mut sim, 10), 0, "not started yet");

        sim.start(&mut host);
        assert_eq!(host.pump(&mut sim, 10), 10);

        sim.stop(&mut host);
        assert_eq!(host.active_callbacks(), 0);
        assert_eq!(host.pump(&mut sim, 10), 0);
        assert_eq!(sim.frames_advanced(), 10);
    }

    #[test]
    fn restart_gets_a_fresh_handle() {
        let mut host = FixedStepHost::new(0.016);
        let mut sim = single_body_loop();

        sim.start(&mut host);
        let first = sim.frame_handle().unwrap();
        sim.stop(&mut host);
        sim.start(&mut host);
        let second = sim.frame_handle().unwrap();

        assert_ne!(first, second);
        assert!(!host.is_active(first));
        assert!(host.is_active(second));
    }

    #[test]
    fn dispose_cancels_registration() {
        let mut host = FixedStepHost::new(0.016);
        let mut sim = single_body_loop();
        sim.start(&mut host);
        assert_eq!(host.active_callbacks(), 1);

        sim.dispose(&mut host);
        assert_eq!(host.active_callbacks(), 0);
    }
}
