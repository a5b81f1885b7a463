#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative city grid state for radio coverage planning.

use std::fmt;

use radio_coverage_core::{CellCoord, CellState, CoverageError, GridView, TowerSite};
use rand::Rng;
use serde::Deserialize;

const DEFAULT_ROWS: u32 = 7;
const DEFAULT_COLUMNS: u32 = 7;
const DEFAULT_BLOCK_PERCENTAGE: u32 = 30;
const DEFAULT_TOWER_RADIUS: u32 = 1;

/// Parameters describing the shape of a city and the reach of its towers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of rows in the city.
    pub rows: u32,
    /// Number of columns in the city.
    pub columns: u32,
    /// Probability, in percent, that a generated cell is blocked.
    pub block_percentage: u32,
    /// Chebyshev radius covered by every tower.
    pub tower_radius: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            block_percentage: DEFAULT_BLOCK_PERCENTAGE,
            tower_radius: DEFAULT_TOWER_RADIUS,
        }
    }
}

impl GridConfig {
    /// Checks that the configuration describes a constructible grid.
    pub fn validate(&self) -> Result<(), CoverageError> {
        if self.block_percentage > 100 {
            return Err(CoverageError::InvalidConfiguration {
                detail: format!(
                    "block percentage {} must lie within 0..=100",
                    self.block_percentage
                ),
            });
        }

        if self.rows == 0 || self.columns == 0 {
            return Err(CoverageError::InvalidConfiguration {
                detail: format!(
                    "grid dimensions {}x{} must both be positive",
                    self.rows, self.columns
                ),
            });
        }

        Ok(())
    }
}

/// Represents the authoritative city grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CityGrid {
    rows: u32,
    columns: u32,
    tower_radius: u32,
    cells: Vec<CellState>,
}

impl CityGrid {
    /// Creates a grid whose cells are all free and uncovered.
    ///
    /// The block percentage is validated but not applied; use
    /// [`CityGrid::generate`] for a randomly obstructed city.
    pub fn new(config: &GridConfig) -> Result<Self, CoverageError> {
        config.validate()?;
        let capacity = cell_capacity(config.rows, config.columns)?;
        Ok(Self {
            rows: config.rows,
            columns: config.columns,
            tower_radius: config.tower_radius,
            cells: vec![CellState::FreeUncovered; capacity],
        })
    }

    /// Creates a grid where each cell is independently blocked with the
    /// configured probability.
    pub fn generate<R>(config: &GridConfig, rng: &mut R) -> Result<Self, CoverageError>
    where
        R: Rng,
    {
        let mut grid = Self::new(config)?;
        for cell in grid.cells.iter_mut() {
            if rng.gen_range(1..=100) <= config.block_percentage {
                *cell = CellState::BlockedUncovered;
            }
        }

        log::debug!(
            "generated {}x{} grid with {} blocked cells",
            grid.rows,
            grid.columns,
            grid.view().count(CellState::BlockedUncovered)
        );
        Ok(grid)
    }

    /// Creates a grid whose shape and contents come from a fixture layout.
    pub fn from_layout(layout: &[Vec<i64>], tower_radius: u32) -> Result<Self, CoverageError> {
        let rows = u32::try_from(layout.len()).map_err(|_| oversized_layout())?;
        let columns = layout
            .first()
            .map_or(Ok(0), |row| u32::try_from(row.len()))
            .map_err(|_| oversized_layout())?;
        let config = GridConfig {
            rows,
            columns,
            block_percentage: 0,
            tower_radius,
        };

        let mut grid = Self::new(&config)?;
        grid.set_custom_grid(layout)?;
        Ok(grid)
    }

    /// Replaces every cell with the states encoded in `layout`.
    ///
    /// The whole layout is validated before the first write, so a rejected
    /// layout leaves the grid untouched.
    pub fn set_custom_grid(&mut self, layout: &[Vec<i64>]) -> Result<(), CoverageError> {
        let mismatched_row = layout
            .iter()
            .find(|row| row.len() != self.columns as usize);
        if layout.len() != self.rows as usize || mismatched_row.is_some() {
            let found_columns = mismatched_row
                .or_else(|| layout.first())
                .map_or(0, Vec::len);
            return Err(CoverageError::InvalidDimensions {
                expected_rows: self.rows,
                expected_columns: self.columns,
                found_rows: layout.len(),
                found_columns,
            });
        }

        let mut decoded = Vec::with_capacity(self.cells.len());
        for (row, values) in layout.iter().enumerate() {
            for (column, &value) in values.iter().enumerate() {
                let state = CellState::from_code(value).ok_or(
                    CoverageError::InvalidCellValue { row, column, value },
                )?;
                decoded.push(state);
            }
        }

        self.cells = decoded;
        Ok(())
    }

    /// Places a tower at `cell` and covers every cell of its window.
    ///
    /// Fails without touching the grid when the cell lies outside the grid
    /// or is blocked or already a tower.
    pub fn place_tower(&mut self, cell: CellCoord) -> Result<(), CoverageError> {
        let view = self.view();
        let Some(state) = view.state(cell) else {
            return Err(CoverageError::OutOfBounds {
                row: i64::from(cell.row()),
                column: i64::from(cell.column()),
            });
        };

        if !state.accepts_tower() {
            return Err(CoverageError::InvalidPlacement { cell, state });
        }

        let window: Vec<CellCoord> = view.window(cell).collect();
        let mut newly_covered = 0_usize;
        for covered in window {
            if let Some(index) = self.index(covered) {
                let current = self.cells[index];
                let next = current.covered();
                if next != current {
                    newly_covered += 1;
                    self.cells[index] = next;
                }
            }
        }

        if let Some(index) = self.index(cell) {
            self.cells[index] = CellState::Tower;
        }

        log::debug!("placed tower at {cell}, newly covering {newly_covered} cells");
        Ok(())
    }

    /// Places a tower at signed indices, as typed by a user.
    pub fn place_tower_at(&mut self, row: i64, column: i64) -> Result<(), CoverageError> {
        let cell = CellCoord::from_signed(row, column)?;
        self.place_tower(cell)
    }

    /// Lists the cells that are free and not yet covered, in row-major order.
    #[must_use]
    pub fn uncovered_free_cells(&self) -> Vec<CellCoord> {
        self.view()
            .iter()
            .filter(|(_, state)| *state == CellState::FreeUncovered)
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Captures a read-only view of the current cell states.
    #[must_use]
    pub fn view(&self) -> GridView<'_> {
        GridView::new(&self.cells, self.rows, self.columns, self.tower_radius)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.row() < self.rows && cell.column() < self.columns {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

impl TowerSite for CityGrid {
    fn view(&self) -> GridView<'_> {
        CityGrid::view(self)
    }

    fn place_tower(&mut self, cell: CellCoord) -> Result<(), CoverageError> {
        CityGrid::place_tower(self, cell)
    }
}

impl fmt::Display for CityGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.view(), f)
    }
}

/// Query functions that provide read-only access to the grid state.
pub mod query {
    use super::CityGrid;
    use radio_coverage_core::{CellCoord, CellState};

    /// Provides the `(rows, columns)` dimensions of the grid.
    #[must_use]
    pub fn dimensions(grid: &CityGrid) -> (u32, u32) {
        (grid.rows, grid.columns)
    }

    /// Chebyshev radius covered by every tower of the grid.
    #[must_use]
    pub fn tower_radius(grid: &CityGrid) -> u32 {
        grid.tower_radius
    }

    /// Returns the state of the provided cell, if it lies within the grid.
    #[must_use]
    pub fn cell_state(grid: &CityGrid, cell: CellCoord) -> Option<CellState> {
        grid.view().state(cell)
    }

    /// Enumerates the cells currently hosting a tower in row-major order.
    #[must_use]
    pub fn towers(grid: &CityGrid) -> Vec<CellCoord> {
        grid.view().towers().collect()
    }

    /// Tallies the cells in each coverage state.
    #[must_use]
    pub fn coverage_summary(grid: &CityGrid) -> CoverageSummary {
        let view = grid.view();
        CoverageSummary {
            free_uncovered: view.count(CellState::FreeUncovered),
            blocked_uncovered: view.count(CellState::BlockedUncovered),
            towers: view.count(CellState::Tower),
            free_covered: view.count(CellState::FreeCovered),
            blocked_covered: view.count(CellState::BlockedCovered),
        }
    }

    /// Number of cells in each coverage state.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct CoverageSummary {
        /// Free cells outside every tower's reach.
        pub free_uncovered: usize,
        /// Blocked cells outside every tower's reach.
        pub blocked_uncovered: usize,
        /// Cells hosting a tower.
        pub towers: usize,
        /// Free cells inside some tower's reach.
        pub free_covered: usize,
        /// Blocked cells inside some tower's reach.
        pub blocked_covered: usize,
    }

    impl CoverageSummary {
        /// Cells of either kind that no tower reaches.
        #[must_use]
        pub const fn uncovered(&self) -> usize {
            self.free_uncovered + self.blocked_uncovered
        }
    }
}

fn cell_capacity(rows: u32, columns: u32) -> Result<usize, CoverageError> {
    let capacity = u64::from(rows) * u64::from(columns);
    usize::try_from(capacity).map_err(|_| CoverageError::InvalidConfiguration {
        detail: format!("grid dimensions {rows}x{columns} exceed addressable memory"),
    })
}

fn oversized_layout() -> CoverageError {
    CoverageError::InvalidConfiguration {
        detail: "layout dimensions exceed the supported grid size".to_owned(),
    }
}
