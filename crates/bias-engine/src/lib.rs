//! The directional bias estimator.

pub mod engine;
pub mod types;

pub use engine::estimate;
pub use types::{BiasInput, BiasResult};
