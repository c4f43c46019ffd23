//! Schema module - runtime configuration types for the correlation engine.

mod config;

pub use config::*;
