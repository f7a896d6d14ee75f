//! Shared types and error definitions for the pre-market bot.

pub mod error;
pub mod types;

pub use error::Error;
pub use types::*;

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
