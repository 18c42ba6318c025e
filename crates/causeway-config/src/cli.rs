//! Command-line argument parsing for the causeway demo.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Causeway command-line arguments.
///
/// Values that mirror config fields override settings loaded from
/// `config.ron`; the rest describe the synthetic scene to generate.
#[derive(Parser, Debug, Default)]
#[command(
    name = "causeway",
    about = "Generate road and power-line geometry over procedural terrain"
)]
pub struct CliArgs {
    /// City blocks per side of the synthetic street grid.
    #[arg(long, default_value_t = 6)]
    pub blocks: u32,

    /// Street spacing in metres.
    #[arg(long, default_value_t = 120.0)]
    pub block_size: f32,

    /// Seed for terrain and street jitter.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Bucket grid cells per side.
    #[arg(long)]
    pub grid_resolution: Option<usize>,

    /// LOD distance in metres.
    #[arg(long)]
    pub lod_distance: Option<f32>,

    /// Catenary factor for power lines.
    #[arg(long)]
    pub catenary_factor: Option<f32>,

    /// Texture atlas manifest (RON). The stock atlas is used otherwise.
    #[arg(long)]
    pub atlas: Option<PathBuf>,

    /// Structure prefab list (RON). A built-in set is used otherwise.
    #[arg(long)]
    pub structures: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.terrain.seed = seed;
        }
        if let Some(res) = args.grid_resolution {
            self.roads.grid_resolution = res;
        }
        if let Some(d) = args.lod_distance {
            self.roads.lod_distance = d;
        }
        if let Some(f) = args.catenary_factor {
            self.utility.catenary_factor = f;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(9),
            catenary_factor: Some(900.0),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.terrain.seed, 9);
        assert_eq!(config.utility.catenary_factor, 900.0);
        // Non-overridden fields retain defaults
        assert_eq!(config.roads.grid_resolution, 16);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_from_args() {
        let args = CliArgs::parse_from([
            "causeway",
            "--blocks",
            "3",
            "--lod-distance",
            "500",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.blocks, 3);
        assert_eq!(args.block_size, 120.0, "unset flags take their defaults");
        let mut config = Config::default();
        config.apply_cli_overrides(&args);
        assert_eq!(config.roads.lod_distance, 500.0);
        assert_eq!(config.debug.log_level, "debug");
    }
}
