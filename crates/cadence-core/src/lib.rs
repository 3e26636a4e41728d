//! Shared building blocks for the occurrence engine: settings, the core
//! error type, constants, the injectable clock and small wire types.

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod types;
