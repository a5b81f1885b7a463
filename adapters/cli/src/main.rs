#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plans radio coverage for a grid city.

mod config;
mod layout;
mod overlay;

use anyhow::{Context, Result};
use clap::Parser;
use radio_coverage_core::CellCoord;
use radio_coverage_grid::{query, CityGrid};
use radio_coverage_system_pathfinding::PathFinder;
use radio_coverage_system_placement::TowerPlacer;
use radio_coverage_system_tower_graph::build_tower_graph;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{Cli, Settings};

/// Entry point for the radio coverage command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::resolve(&cli)?;
    let mut grid = build_city(&settings)?;
    println!("Initial city:");
    print!("{grid}");

    for position in &settings.manual_towers {
        grid.place_tower_at(position.row, position.column)
            .with_context(|| {
                format!(
                    "could not place tower at ({}, {})",
                    position.row, position.column
                )
            })?;
    }

    if settings.auto_place {
        let report = TowerPlacer::new()
            .place_minimal_towers(&mut grid)
            .context("automatic tower placement did not reach full coverage")?;
        log::info!("greedy placement added {} towers", report.tower_count());
    }

    if settings.auto_place || !settings.manual_towers.is_empty() {
        println!();
        println!("City with towers:");
        print!("{grid}");
    }

    let summary = query::coverage_summary(&grid);
    println!();
    println!(
        "towers: {}, covered free: {}, uncovered free: {}, covered blocked: {}, uncovered blocked: {}",
        summary.towers,
        summary.free_covered,
        summary.free_uncovered,
        summary.blocked_covered,
        summary.blocked_uncovered
    );

    if let Some((from, to)) = settings.path_query {
        let start = CellCoord::from_signed(from.row, from.column)
            .context("path start is not a grid position")?;
        let end = CellCoord::from_signed(to.row, to.column)
            .context("path end is not a grid position")?;

        let graph = build_tower_graph(&grid.view());
        let path = PathFinder::new()
            .find_most_reliable_path(&graph, start, end)
            .with_context(|| format!("could not route from {start} to {end}"))?;

        let hops = path
            .towers()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ");
        println!();
        println!("Most reliable path ({} hops): {hops}", path.distance());
        print!("{}", overlay::render_path(&grid.view(), &path));
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn build_city(settings: &Settings) -> Result<CityGrid> {
    let seed = match settings.seed {
        Some(seed) => seed,
        None => ChaCha8Rng::from_entropy().next_u64(),
    };
    log::info!(
        "generating {}x{} city with seed {seed}",
        settings.grid.rows,
        settings.grid.columns
    );

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut grid =
        CityGrid::generate(&settings.grid, &mut rng).context("invalid city configuration")?;

    if let Some(path) = &settings.layout {
        let layout = layout::load_layout(path)?;
        grid.set_custom_grid(&layout)
            .with_context(|| format!("layout at {} does not fit the city", path.display()))?;
        log::info!("applied custom layout from {}", path.display());
    }

    Ok(grid)
}
