//! Configuration for the causeway generator.
//!
//! Settings persist to disk as RON and can be overridden from the command
//! line. Missing fields fall back to defaults so older files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, RoadsConfig, TerrainConfig, UtilityConfig};
pub use error::ConfigError;
