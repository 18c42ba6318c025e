//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level generator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Road surface generation.
    pub roads: RoadsConfig,
    /// Power-line generation.
    pub utility: UtilityConfig,
    /// Procedural terrain used when no height field is supplied.
    pub terrain: TerrainConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Road surface, junction and bucketing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoadsConfig {
    /// Lift of road surfaces above the terrain, in metres.
    pub ground_offset: f32,
    /// Distance in metres beyond which a bucket cell is hidden.
    pub lod_distance: f32,
    /// Bucket grid cells per side.
    pub grid_resolution: usize,
    /// Maximum vertices per mesh chunk.
    pub max_chunk_vertices: usize,
    /// Cross product below which two junction arms count as parallel.
    pub junction_parallel_epsilon: f32,
    /// Setback in metres used for parallel junction arms.
    pub junction_parallel_fallback: f32,
    /// Longest junction setback, as a multiple of the wider arm's width.
    pub junction_max_setback_factor: f32,
    /// Texture repeats per metre along road surfaces.
    pub road_uv_scale: f32,
    /// Texture repeats per metre along sidewalks.
    pub sidewalk_uv_scale: f32,
    pub include_highways: bool,
    pub include_paved: bool,
    pub include_dirt: bool,
    /// Place stop signs and traffic lights.
    pub build_signs: bool,
    /// Altitude for points outside the terrain.
    pub fallback_altitude: f32,
}

/// Catenary wire settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UtilityConfig {
    /// Larger values give tauter wires.
    pub catenary_factor: f32,
    /// Segments per wire span.
    pub wire_segments: u32,
    /// Minimum wire height above the terrain, in metres.
    pub ground_clearance: f32,
}

/// fBm terrain settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    pub seed: u32,
    pub octaves: u32,
    pub lacunarity: f64,
    pub persistence: f64,
    /// Frequency of the first octave, in cycles per metre.
    pub base_frequency: f64,
    /// Amplitude of the first octave, in metres.
    pub amplitude: f64,
    pub base_altitude: f64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write a JSON log file next to the config.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for RoadsConfig {
    fn default() -> Self {
        Self {
            ground_offset: 0.1,
            lod_distance: 2000.0,
            grid_resolution: 16,
            max_chunk_vertices: 10_000,
            junction_parallel_epsilon: 0.01,
            junction_parallel_fallback: 1.0,
            junction_max_setback_factor: 4.0,
            road_uv_scale: 0.08,
            sidewalk_uv_scale: 1.0,
            include_highways: true,
            include_paved: true,
            include_dirt: true,
            build_signs: true,
            fallback_altitude: 0.0,
        }
    }
}

impl Default for UtilityConfig {
    fn default() -> Self {
        Self {
            catenary_factor: 1400.0,
            wire_segments: 160,
            ground_clearance: 0.5,
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 5,
            lacunarity: 2.0,
            persistence: 0.5,
            base_frequency: 0.002,
            amplitude: 40.0,
            base_altitude: 100.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

// --- Load / Save / Reload ---

const FILE_NAME: &str = "config.ron";

fn read_file(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl Config {
    /// Read `config.ron` from `config_dir`. A missing file is replaced by the
    /// defaults, which are written back so the user has something to edit.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(FILE_NAME);
        if !path.exists() {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", path.display());
            return Ok(config);
        }
        let config = read_file(&path)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write `config.ron` into `config_dir`, creating the directory if needed.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let path = config_dir.join(FILE_NAME);
        let write_err = |source| ConfigError::Write {
            path: path.clone(),
            source,
        };
        std::fs::create_dir_all(config_dir).map_err(write_err)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .enumerate_arrays(false);
        let text = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;
        std::fs::write(&path, text).map_err(write_err)
    }

    /// Re-read the file: `Some(new_config)` if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = read_file(&config_dir.join(FILE_NAME))?;
        if fresh == *self {
            return Ok(None);
        }
        log::info!("Config reloaded with changes");
        Ok(Some(fresh))
    }

    /// Default config directory: `<platform config dir>/causeway`.
    pub fn default_dir() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|d| d.join("causeway"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let pretty = ron::ser::PrettyConfig::new().depth_limit(3);
        let ron_str = ron::ser::to_string_pretty(&config, pretty).unwrap();
        assert!(ron_str.contains("catenary_factor: 1400.0"), "got {ron_str}");
        assert!(ron_str.contains("grid_resolution: 16"), "got {ron_str}");
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(roads: (ground_offset: 0.5))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.utility, UtilityConfig::default());
        assert_eq!(config.roads.ground_offset, 0.5);
        assert_eq!(config.roads.lod_distance, 2000.0, "unset fields keep defaults");
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok(), "unknown fields must not break old binaries");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.roads.grid_resolution = 32;
        config.utility.wire_segments = 40;
        config.debug.log_level = "debug".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists(), "default config must be written");
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.utility.catenary_factor = 700.0;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.utility.catenary_factor), Some(700.0));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_reload_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::default().reload(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }), "got {err}");
        assert!(err.to_string().contains("config.ron"), "error should name the file: {err}");
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "got {err}");
    }
}
