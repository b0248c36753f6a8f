//! Construction-time errors
//!
//! Runtime edge cases (coincident bodies, brief out-of-bounds positions) are
//! absorbed inside the step and never show up here.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("radius must be positive and finite, got {0}")]
    Radius(f64),
    #[error("half extent must be positive and finite, got {0}")]
    HalfExtent(f64),
    #[error("substeps per frame must be at least 1")]
    Substeps,
    #[error("damping factor must lie in (0, 1], got {0}")]
    Damping(f64),
    #[error("mass range [{0}, {1}) must have a positive lower bound and min <= max")]
    MassRange(f64, f64),
    #[error("initial velocity scale must be non-negative and finite, got {0}")]
    VelocityScale(f64),
    #[error("gravity components must be finite")]
    Gravity,
    #[error("spawn half extent must lie in [0, half extent], got {0}")]
    SpawnExtent(f64),
    #[error("scenario lists {bodies} bodies but particle_count is {expected}")]
    BodyCount { expected: usize, bodies: usize },
    #[error("body {0} needs a positive mass and finite position/velocity")]
    Body(usize),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
