#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that answers minimum-hop path queries over the tower graph.

use std::collections::{HashMap, HashSet, VecDeque};

use radio_coverage_core::{CellCoord, CoverageError, TowerGraph, TowerPath};

/// Breadth-first path finder that reuses scratch buffers between queries.
#[derive(Debug, Default)]
pub struct PathFinder {
    queue: VecDeque<CellCoord>,
    visited: HashSet<CellCoord>,
    predecessors: HashMap<CellCoord, CellCoord>,
}

impl PathFinder {
    /// Creates a new path finder with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds the chain of towers linking `start` to `end` with the fewest hops.
    ///
    /// Every link is treated as equally reliable, so the most reliable path
    /// is the shortest one. Neighbours are expanded in row-major order,
    /// which makes the chosen path deterministic among equal-length ones.
    pub fn find_most_reliable_path(
        &mut self,
        graph: &TowerGraph,
        start: CellCoord,
        end: CellCoord,
    ) -> Result<TowerPath, CoverageError> {
        for cell in [start, end] {
            if !graph.contains(cell) {
                return Err(CoverageError::UnknownTower { cell });
            }
        }

        if start == end {
            return Ok(TowerPath::new(vec![start]));
        }

        self.queue.clear();
        self.visited.clear();
        self.predecessors.clear();

        let _ = self.visited.insert(start);
        self.queue.push_back(start);

        let mut reached = false;
        while let Some(current) = self.queue.pop_front() {
            if current == end {
                reached = true;
                break;
            }

            let Some(neighbors) = graph.neighbors(current) else {
                continue;
            };

            for &neighbor in neighbors {
                if self.visited.insert(neighbor) {
                    let _ = self.predecessors.insert(neighbor, current);
                    self.queue.push_back(neighbor);
                }
            }
        }

        if !reached {
            log::debug!("no tower chain links {start} to {end}");
            return Err(CoverageError::NoPathExists { start, end });
        }

        let path = self.reconstruct(start, end)?;
        log::debug!(
            "path from {start} to {end} spans {} hops",
            path.distance()
        );
        Ok(path)
    }

    fn reconstruct(&self, start: CellCoord, end: CellCoord) -> Result<TowerPath, CoverageError> {
        let mut towers = vec![end];
        let mut node = end;
        while node != start {
            let Some(&previous) = self.predecessors.get(&node) else {
                return Err(CoverageError::NoPathExists { start, end });
            };
            towers.push(previous);
            node = previous;
        }

        towers.reverse();
        Ok(TowerPath::new(towers))
    }
}

/// Runs a single path query with a fresh [`PathFinder`].
pub fn find_most_reliable_path(
    graph: &TowerGraph,
    start: CellCoord,
    end: CellCoord,
) -> Result<TowerPath, CoverageError> {
    PathFinder::new().find_most_reliable_path(graph, start, end)
}
