pub mod simulation;
pub mod configuration;
pub mod benchmark;

#[cfg(feature = "viewer")]
pub mod visualization;

pub use simulation::states::{NVec3, Particle, ParticleState, ParticleSystem};
pub use simulation::params::SimulationConfig;
pub use simulation::error::{ConfigError, ConfigResult};
pub use simulation::collision::CollisionResolver;
pub use simulation::boundary::BoundaryReflector;
pub use simulation::engine::{FixedStepHost, FrameHandle, FrameHost, SimulationLoop};
pub use simulation::scenario::Scenario;

pub use configuration::config::{BodyConfig, EngineConfig, ParametersConfig, ScenarioConfig};

#[cfg(feature = "viewer")]
pub use visualization::boxsim_vis3d::run_3d;

pub use benchmark::benchmark::{bench_step, bench_step_curve};
