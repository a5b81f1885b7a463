#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that derives the tower adjacency graph from a grid snapshot.

use std::collections::{BTreeMap, BTreeSet};

use radio_coverage_core::{CellState, GridView, TowerGraph};

/// Links every tower to the other towers inside its coverage window.
///
/// Chebyshev distance is symmetric, so each link is discovered from both
/// ends and the result is a valid undirected adjacency list. Towers without
/// neighbours map to an empty set.
#[must_use]
pub fn build_tower_graph(view: &GridView<'_>) -> TowerGraph {
    let mut adjacency = BTreeMap::new();

    for tower in view.towers() {
        let neighbors: BTreeSet<_> = view
            .window(tower)
            .filter(|cell| *cell != tower && view.state(*cell) == Some(CellState::Tower))
            .collect();
        let _ = adjacency.insert(tower, neighbors);
    }

    let graph = TowerGraph::from_adjacency(adjacency);
    debug_assert!(graph.is_symmetric(), "tower adjacency must be undirected");
    log::debug!(
        "built tower graph with {} towers and {} links",
        graph.len(),
        graph.edge_count()
    );
    graph
}
