use radio_coverage_core::{CellCoord, CellState};
use radio_coverage_grid::{query, CityGrid, GridConfig};
use radio_coverage_system_placement::{place_minimal_towers, TowerPlacer};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn free_grid(rows: u32, columns: u32, tower_radius: u32) -> CityGrid {
    CityGrid::new(&GridConfig {
        rows,
        columns,
        block_percentage: 0,
        tower_radius,
    })
    .expect("valid configuration")
}

#[test]
fn open_three_by_three_needs_a_single_tower() {
    let mut grid = free_grid(3, 3, 1);

    let report = place_minimal_towers(&mut grid).expect("full coverage");

    assert_eq!(report.placed(), &[CellCoord::new(1, 1)]);
    assert_eq!(query::towers(&grid), vec![CellCoord::new(1, 1)]);
    assert!(grid.uncovered_free_cells().is_empty());
}

#[test]
fn ties_prefer_first_candidate_in_row_major_order() {
    let mut grid = free_grid(1, 2, 1);

    let report = place_minimal_towers(&mut grid).expect("full coverage");

    assert_eq!(report.placed(), &[CellCoord::new(0, 0)]);
}

#[test]
fn zero_radius_places_a_tower_on_every_free_cell() {
    let mut grid = CityGrid::from_layout(&[vec![0, 1, 0], vec![0, 0, 1]], 0).expect("layout");

    let report = place_minimal_towers(&mut grid).expect("full coverage");

    assert_eq!(report.tower_count(), 4);
    assert_eq!(grid.to_string(), "2 1 2\n2 2 1\n");
}

#[test]
fn fully_blocked_grid_places_nothing() {
    let mut grid = CityGrid::from_layout(&[vec![1, 1], vec![4, 1]], 2).expect("layout");

    let report = place_minimal_towers(&mut grid).expect("nothing to cover");

    assert_eq!(report.tower_count(), 0);
    assert_eq!(grid.to_string(), "1 1\n4 1\n");
}

#[test]
fn existing_towers_are_kept_and_count_as_coverage() {
    let mut grid = free_grid(3, 6, 1);
    grid.place_tower(CellCoord::new(1, 1)).expect("manual tower");

    let report = place_minimal_towers(&mut grid).expect("full coverage");

    assert_eq!(report.placed(), &[CellCoord::new(1, 4)]);
    assert_eq!(query::coverage_summary(&grid).towers, 2);
}

#[test]
fn random_cities_reach_full_coverage_within_bound() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x0c17_9a11_2024_0007);
    let mut placer = TowerPlacer::new();

    for radius in 0..4 {
        for percentage in [0, 20, 45, 80] {
            let config = GridConfig {
                rows: 9,
                columns: 11,
                block_percentage: percentage,
                tower_radius: radius,
            };
            let mut grid = CityGrid::generate(&config, &mut rng).expect("generated grid");
            let free_before = grid.uncovered_free_cells().len();

            let report = placer
                .place_minimal_towers(&mut grid)
                .expect("greedy placement always covers reachable free cells");

            assert!(grid.uncovered_free_cells().is_empty());
            assert!(report.tower_count() <= free_before);
            assert!(report.tower_count() <= (config.rows * config.columns) as usize);
            for cell in report.placed() {
                assert_eq!(grid.view().state(*cell), Some(CellState::Tower));
            }
            assert_eq!(
                grid.view().count(CellState::BlockedUncovered) > 0,
                grid.view().iter().any(|(cell, state)| {
                    state == CellState::BlockedUncovered
                        && report
                            .placed()
                            .iter()
                            .all(|tower| tower.chebyshev_distance(cell) > radius)
                }),
                "blocked cells stay uncovered only when no tower reaches them"
            );
        }
    }
}
