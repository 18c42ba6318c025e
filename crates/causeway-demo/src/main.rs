//! Generate a synthetic town with roads and a power line over fBm terrain and
//! report what came out.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p causeway-demo -- --blocks 8 --seed 3`.

mod synthetic;

use std::path::Path;
use std::process::ExitCode;

use causeway_build::{GeneratedScene, Generator, GeneratorParams};
use causeway_config::{CliArgs, Config};
use causeway_materials::TextureAtlas;
use causeway_mesh::MemorySink;
use causeway_roads::{CrossSectionParams, JunctionParams, LinkFilter, UvScales};
use causeway_terrain::{NoiseTerrain, NoiseTerrainParams};
use causeway_utility::{CatenaryParams, StructureSet};
use clap::Parser;
use glam::Vec3;
use tracing::{error, info, warn};

fn generator_params(config: &Config) -> GeneratorParams {
    let roads = &config.roads;
    GeneratorParams {
        junction: JunctionParams {
            parallel_epsilon: roads.junction_parallel_epsilon,
            parallel_fallback: roads.junction_parallel_fallback,
            max_setback_factor: roads.junction_max_setback_factor,
        },
        cross_section: CrossSectionParams {
            ground_offset: roads.ground_offset,
            uv: UvScales {
                road: roads.road_uv_scale,
                sidewalk: roads.sidewalk_uv_scale,
            },
            max_vertices: roads.max_chunk_vertices,
        },
        catenary: CatenaryParams {
            factor: config.utility.catenary_factor,
            segments: config.utility.wire_segments,
            clearance: config.utility.ground_clearance,
        },
        filter: LinkFilter {
            highways: roads.include_highways,
            paved: roads.include_paved,
            dirt: roads.include_dirt,
        },
        grid_resolution: roads.grid_resolution,
        lod_distance: roads.lod_distance,
        build_signs: roads.build_signs,
        fallback_altitude: roads.fallback_altitude,
    }
}

fn terrain_params(config: &Config) -> NoiseTerrainParams {
    let t = &config.terrain;
    NoiseTerrainParams {
        seed: t.seed,
        octaves: t.octaves,
        lacunarity: t.lacunarity,
        persistence: t.persistence,
        base_frequency: t.base_frequency,
        amplitude: t.amplitude,
        base_altitude: t.base_altitude,
    }
}

fn load_atlas(path: Option<&Path>) -> TextureAtlas {
    match path {
        Some(path) => TextureAtlas::from_ron(path).unwrap_or_else(|e| {
            warn!("Failed to load atlas {}: {e}, using the stock atlas", path.display());
            TextureAtlas::standard()
        }),
        None => TextureAtlas::standard(),
    }
}

fn load_structures(path: Option<&Path>) -> StructureSet {
    match path {
        Some(path) => StructureSet::from_ron(path).unwrap_or_else(|e| {
            warn!("Failed to load structures {}: {e}, using the built-in set", path.display());
            synthetic::structure_set()
        }),
        None => synthetic::structure_set(),
    }
}

fn report(scene: &GeneratedScene, sink: &MemorySink) {
    let s = &scene.stats;
    info!(
        nodes = s.nodes,
        orphans = s.orphan_nodes,
        intersections = s.intersections,
        fallback_directions = s.fallback_directions,
        parallel_pairs = s.parallel_pairs,
        "junctions"
    );
    info!(
        built = s.links_built,
        filtered = s.links_filtered,
        fallback_frames = s.fallback_frames,
        dropped_primitives = s.dropped_primitives,
        "links"
    );
    info!(
        poles = s.poles_placed,
        missing = s.poles_missing,
        spans = s.spans,
        skipped = s.spans_skipped,
        signs = s.signs,
        "structures"
    );
    info!(chunks = sink.len(), vertices = sink.vertex_count(), clamped = s.clamped, "meshes");

    let occupied = scene.grid.cells().filter(|c| !c.is_empty()).count();
    let eye = scene
        .grid
        .cells()
        .find(|c| !c.is_empty())
        .map(|c| c.center() + Vec3::Y * 50.0)
        .unwrap_or(Vec3::ZERO);
    let visible = scene.grid.visible_cells(eye).count();
    info!(
        resolution = scene.grid.resolution(),
        occupied, visible, "bucket grid (visible from the first occupied cell)"
    );
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(Config::default_dir)
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    causeway_log::init_logging(Some(&log_dir), config.debug.log_to_file, Some(&config));

    let seed = u64::from(config.terrain.seed);
    let (mut roads, mut utility) = match (
        synthetic::street_grid(args.blocks, args.block_size, seed),
        synthetic::power_line(args.blocks, args.block_size),
    ) {
        (Ok(roads), Ok(utility)) => (roads, utility),
        (Err(e), _) | (_, Err(e)) => {
            error!("Failed to build the synthetic networks: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        nodes = roads.num_nodes(),
        links = roads.num_links(),
        poles = utility.num_poles(),
        "synthetic networks"
    );

    let terrain = NoiseTerrain::new(terrain_params(&config));
    let atlas = load_atlas(args.atlas.as_deref());
    let generator = match Generator::new(generator_params(&config), atlas) {
        Ok(generator) => generator,
        Err(e) => {
            error!("Invalid generator settings: {e}");
            return ExitCode::FAILURE;
        }
    };
    let library = load_structures(args.structures.as_deref());

    let prepared = generator.prepare(&mut roads, &mut utility, &terrain);
    info!(
        structures_inferred = prepared.structures_inferred,
        azimuths = prepared.azimuths_computed,
        "networks draped"
    );

    let mut sink = MemorySink::new();
    let mut last = 0;
    let progress = |pct: u8| {
        if pct >= last + 25 || pct == 100 {
            info!("generating: {pct}%");
            last = pct;
        }
    };
    let result =
        generator.generate_with_progress(&roads, &utility, &terrain, &library, &mut sink, progress);

    match result {
        Ok(scene) => {
            report(&scene, &sink);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Generation failed: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_follow_config() {
        let mut config = Config::default();
        config.roads.grid_resolution = 8;
        config.roads.include_dirt = false;
        config.utility.wire_segments = 20;
        let params = generator_params(&config);
        assert_eq!(params.grid_resolution, 8);
        assert!(!params.filter.dirt, "dirt filter should follow config");
        assert_eq!(params.catenary.segments, 20);
    }

    #[test]
    fn test_default_config_matches_generator_defaults() {
        assert_eq!(generator_params(&Config::default()), GeneratorParams::default());
        assert_eq!(terrain_params(&Config::default()), NoiseTerrainParams::default());
    }

    #[test]
    fn test_synthetic_town_generates() {
        let config = Config::default();
        let mut roads = synthetic::street_grid(3, 100.0, 2).unwrap();
        let mut utility = synthetic::power_line(3, 100.0).unwrap();
        let terrain = NoiseTerrain::new(terrain_params(&config));
        let generator =
            Generator::new(generator_params(&config), TextureAtlas::standard()).unwrap();
        generator.prepare(&mut roads, &mut utility, &terrain);

        let mut sink = MemorySink::new();
        let scene = generator
            .generate(&roads, &utility, &terrain, &synthetic::structure_set(), &mut sink)
            .unwrap();
        assert_eq!(scene.stats.links_built, 24);
        assert_eq!(scene.stats.orphan_nodes, 1);
        assert_eq!(scene.stats.poles_missing, 0, "built-in set covers every inferred structure");
        assert_eq!(scene.stats.spans, utility.num_poles() - 1);
        assert!(!sink.is_empty());
    }
}
