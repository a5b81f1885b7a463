#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that greedily places towers until every free cell is covered.

use radio_coverage_core::{CellCoord, CellState, CoverageError, GridView, TowerSite};

/// Outcome of a placement run that reached full coverage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlacementReport {
    placed: Vec<CellCoord>,
}

impl PlacementReport {
    /// Towers placed by the run, in placement order.
    #[must_use]
    pub fn placed(&self) -> &[CellCoord] {
        &self.placed
    }

    /// Number of towers placed by the run.
    #[must_use]
    pub fn tower_count(&self) -> usize {
        self.placed.len()
    }
}

/// Greedy set-cover placer that reuses scratch buffers between runs.
#[derive(Debug, Default)]
pub struct TowerPlacer {
    targets: Vec<CellCoord>,
    candidates: Vec<CellCoord>,
}

impl TowerPlacer {
    /// Creates a new placer with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places towers on `site` until no free cell remains uncovered.
    ///
    /// Candidate sites are the cells that were free and uncovered when the
    /// run started. Each round places a tower on the candidate covering the
    /// most still-uncovered free cells, preferring the first in row-major
    /// order on ties, and retires it from the pool. When no candidate covers
    /// anything new the run stops with
    /// [`CoverageError::ResidualUncoveredCells`]; towers placed up to that
    /// point stay on the grid.
    pub fn place_minimal_towers<S>(&mut self, site: &mut S) -> Result<PlacementReport, CoverageError>
    where
        S: TowerSite + ?Sized,
    {
        self.targets.clear();
        self.targets.extend(uncovered_free_cells(&site.view()));
        self.candidates.clear();
        self.candidates.extend(self.targets.iter().copied());

        let mut report = PlacementReport::default();

        while !self.targets.is_empty() {
            let Some((index, coverage)) = self.best_candidate(&site.view()) else {
                log::warn!(
                    "placement stalled after {} towers with {} free cells uncovered",
                    report.tower_count(),
                    self.targets.len()
                );
                return Err(CoverageError::ResidualUncoveredCells {
                    remaining: self.targets.len(),
                });
            };

            let cell = self.candidates[index];
            site.place_tower(cell)?;
            let _ = self.candidates.remove(index);
            report.placed.push(cell);

            let view = site.view();
            self.targets
                .retain(|target| view.state(*target) == Some(CellState::FreeUncovered));

            log::debug!(
                "round {}: tower at {cell} covered {coverage} cells, {} remain",
                report.tower_count(),
                self.targets.len()
            );
        }

        log::info!("full coverage reached with {} towers", report.tower_count());
        Ok(report)
    }

    /// Index and gain of the first candidate with the strictly greatest
    /// positive marginal coverage.
    fn best_candidate(&self, view: &GridView<'_>) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;
        for (index, candidate) in self.candidates.iter().enumerate() {
            let coverage = marginal_coverage(view, *candidate);
            if coverage > best.map_or(0, |(_, gain)| gain) {
                best = Some((index, coverage));
            }
        }
        best
    }
}

/// Runs a single greedy placement pass with a fresh [`TowerPlacer`].
pub fn place_minimal_towers<S>(site: &mut S) -> Result<PlacementReport, CoverageError>
where
    S: TowerSite + ?Sized,
{
    TowerPlacer::new().place_minimal_towers(site)
}

/// Counts the free uncovered cells a tower at `cell` would newly cover.
#[must_use]
pub fn marginal_coverage(view: &GridView<'_>, cell: CellCoord) -> usize {
    view.window(cell)
        .filter(|covered| view.state(*covered) == Some(CellState::FreeUncovered))
        .count()
}

fn uncovered_free_cells(view: &GridView<'_>) -> Vec<CellCoord> {
    view.iter()
        .filter(|(_, state)| *state == CellState::FreeUncovered)
        .map(|(cell, _)| cell)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Site that accepts every placement without changing any cell.
    struct InertSite {
        cells: Vec<CellState>,
        attempts: Vec<CellCoord>,
    }

    impl TowerSite for InertSite {
        fn view(&self) -> GridView<'_> {
            GridView::new(&self.cells, 1, 3, 1)
        }

        fn place_tower(&mut self, cell: CellCoord) -> Result<(), CoverageError> {
            self.attempts.push(cell);
            Ok(())
        }
    }

    #[test]
    fn stalled_placement_terminates_with_residual_error() {
        let mut site = InertSite {
            cells: vec![CellState::FreeUncovered; 3],
            attempts: Vec::new(),
        };

        let outcome = place_minimal_towers(&mut site);

        assert_eq!(
            outcome,
            Err(CoverageError::ResidualUncoveredCells { remaining: 3 })
        );
        assert_eq!(
            site.attempts,
            vec![CellCoord::new(0, 1), CellCoord::new(0, 0), CellCoord::new(0, 2)],
            "each candidate is tried once before the run gives up"
        );
    }

    #[test]
    fn marginal_coverage_counts_only_free_uncovered_cells() {
        let cells = vec![
            CellState::FreeUncovered,
            CellState::BlockedUncovered,
            CellState::FreeCovered,
            CellState::FreeUncovered,
            CellState::FreeUncovered,
            CellState::Tower,
        ];
        let view = GridView::new(&cells, 2, 3, 1);

        assert_eq!(marginal_coverage(&view, CellCoord::new(0, 0)), 3);
        assert_eq!(marginal_coverage(&view, CellCoord::new(1, 2)), 1);
    }

    #[test]
    fn nothing_to_cover_places_nothing() {
        let mut placer = TowerPlacer::new();
        let mut site = InertSite {
            cells: vec![CellState::FreeCovered; 3],
            attempts: Vec::new(),
        };

        let report = placer.place_minimal_towers(&mut site).expect("nothing to cover");
        assert_eq!(report.tower_count(), 0);
        assert!(placer.candidates.is_empty());
        assert!(site.attempts.is_empty());
    }
}
