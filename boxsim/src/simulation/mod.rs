pub mod states;
pub mod params;
pub mod error;
pub mod forces;
pub mod collision;
pub mod boundary;
pub mod integrator;
pub mod engine;
pub mod scenario;
