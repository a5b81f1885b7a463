#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the radio coverage workspace.
//!
//! This crate defines the vocabulary that connects the authoritative city
//! grid, the pure systems and the adapters. The grid owns the cell states and
//! exposes them through a borrowed [`GridView`]; systems read that view and
//! mutate the grid exclusively through the [`TowerSite`] seam. Derived values
//! such as the [`TowerGraph`] and [`TowerPath`] are plain values owned by the
//! caller that requested them.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coverage state of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Open ground that no tower reaches yet.
    FreeUncovered,
    /// Obstructed ground that no tower reaches yet.
    BlockedUncovered,
    /// Cell hosting a radio tower.
    Tower,
    /// Open ground inside at least one tower's coverage window.
    FreeCovered,
    /// Obstructed ground inside at least one tower's coverage window.
    BlockedCovered,
}

impl CellState {
    /// Every state in ascending code order.
    pub const ALL: [CellState; 5] = [
        Self::FreeUncovered,
        Self::BlockedUncovered,
        Self::Tower,
        Self::FreeCovered,
        Self::BlockedCovered,
    ];

    /// Integer code used by the textual dump and fixture layouts.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::FreeUncovered => 0,
            Self::BlockedUncovered => 1,
            Self::Tower => 2,
            Self::FreeCovered => 3,
            Self::BlockedCovered => 4,
        }
    }

    /// Decodes an integer code, returning `None` for values outside `0..=4`.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::FreeUncovered),
            1 => Some(Self::BlockedUncovered),
            2 => Some(Self::Tower),
            3 => Some(Self::FreeCovered),
            4 => Some(Self::BlockedCovered),
            _ => None,
        }
    }

    /// Reports whether the cell is obstructed ground.
    #[must_use]
    pub const fn is_blocked(self) -> bool {
        matches!(self, Self::BlockedUncovered | Self::BlockedCovered)
    }

    /// Reports whether the cell lies inside some tower's coverage, towers included.
    #[must_use]
    pub const fn is_covered(self) -> bool {
        matches!(self, Self::Tower | Self::FreeCovered | Self::BlockedCovered)
    }

    /// Reports whether a new tower may be erected on the cell.
    ///
    /// Covered free ground remains a valid physical site, so both free
    /// variants accept a tower.
    #[must_use]
    pub const fn accepts_tower(self) -> bool {
        matches!(self, Self::FreeUncovered | Self::FreeCovered)
    }

    /// State the cell transitions to when a neighbouring tower covers it.
    #[must_use]
    pub const fn covered(self) -> Self {
        match self {
            Self::FreeUncovered => Self::FreeCovered,
            Self::BlockedUncovered => Self::BlockedCovered,
            other => other,
        }
    }
}

/// Location of a single grid cell expressed as row and column indices.
///
/// Ordering is row-major, which is also the scan order used by every system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Converts signed user-provided indices into a coordinate.
    ///
    /// Negative or oversized indices can never address a cell and are
    /// reported as [`CoverageError::OutOfBounds`].
    pub fn from_signed(row: i64, column: i64) -> Result<Self, CoverageError> {
        match (u32::try_from(row), u32::try_from(column)) {
            (Ok(r), Ok(c)) => Ok(Self::new(r, c)),
            _ => Err(CoverageError::OutOfBounds { row, column }),
        }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Computes the Chebyshev distance between two cell coordinates.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.row
            .abs_diff(other.row)
            .max(self.column.abs_diff(other.column))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Failures surfaced by grid mutation, placement and path queries.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoverageError {
    /// The grid parameters cannot describe a valid city.
    #[error("invalid grid configuration: {detail}")]
    InvalidConfiguration {
        /// Human readable description of the offending parameter.
        detail: String,
    },
    /// A custom layout does not match the grid's shape.
    #[error(
        "layout is {found_rows}x{found_columns} but the grid is {expected_rows}x{expected_columns}"
    )]
    InvalidDimensions {
        /// Row count of the grid.
        expected_rows: u32,
        /// Column count of the grid.
        expected_columns: u32,
        /// Row count of the rejected layout.
        found_rows: usize,
        /// Length of the first row that did not match, or of the first row.
        found_columns: usize,
    },
    /// A custom layout contains a value that is not a cell code.
    #[error("layout value {value} at ({row}, {column}) is not a cell code")]
    InvalidCellValue {
        /// Row containing the offending value.
        row: usize,
        /// Column containing the offending value.
        column: usize,
        /// Rejected value.
        value: i64,
    },
    /// The requested position lies outside the grid.
    #[error("position ({row}, {column}) lies outside the grid")]
    OutOfBounds {
        /// Requested row.
        row: i64,
        /// Requested column.
        column: i64,
    },
    /// The requested cell cannot host a tower.
    #[error("cannot place a tower at {cell}: cell is {state:?}")]
    InvalidPlacement {
        /// Requested cell.
        cell: CellCoord,
        /// State that rejected the placement.
        state: CellState,
    },
    /// Greedy placement can make no further progress.
    #[error("no candidate site improves coverage; {remaining} free cells remain uncovered")]
    ResidualUncoveredCells {
        /// Number of free cells still uncovered when placement stopped.
        remaining: usize,
    },
    /// The cell is not a tower of the queried graph.
    #[error("{cell} is not a tower")]
    UnknownTower {
        /// Cell that was looked up.
        cell: CellCoord,
    },
    /// The two towers are not connected.
    #[error("no chain of towers links {start} to {end}")]
    NoPathExists {
        /// Tower the query started from.
        start: CellCoord,
        /// Tower the query tried to reach.
        end: CellCoord,
    },
}

/// Read-only view into the dense cell state grid.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [CellState],
    rows: u32,
    columns: u32,
    tower_radius: u32,
}

impl<'a> GridView<'a> {
    /// Captures a new view backed by the provided row-major cell slice.
    #[must_use]
    pub fn new(cells: &'a [CellState], rows: u32, columns: u32, tower_radius: u32) -> Self {
        Self {
            cells,
            rows,
            columns,
            tower_radius,
        }
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Provides the `(rows, columns)` dimensions of the grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.columns)
    }

    /// Chebyshev radius covered by every tower.
    #[must_use]
    pub const fn tower_radius(&self) -> u32 {
        self.tower_radius
    }

    /// Reports whether the coordinate addresses a cell of the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    /// Returns the state of the provided cell, if it lies within the grid.
    #[must_use]
    pub fn state(&self, cell: CellCoord) -> Option<CellState> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Iterates over every cell and its state in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, CellState)> + 'a {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, state)| {
            let index = index as u32;
            (CellCoord::new(index / columns, index % columns), *state)
        })
    }

    /// Iterates over the cells currently hosting a tower in row-major order.
    pub fn towers(&self) -> impl Iterator<Item = CellCoord> + 'a {
        self.iter()
            .filter(|(_, state)| *state == CellState::Tower)
            .map(|(cell, _)| cell)
    }

    /// Counts the cells currently in the provided state.
    #[must_use]
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|cell| **cell == state).count()
    }

    /// Iterates over the coverage window centred on `center`, clipped to the grid.
    ///
    /// The window is the square of Chebyshev radius [`Self::tower_radius`],
    /// visited in row-major order. A centre outside the grid yields the
    /// clipped remainder, which may be empty.
    pub fn window(&self, center: CellCoord) -> impl Iterator<Item = CellCoord> {
        let radius = self.tower_radius;
        let row_start = center.row().saturating_sub(radius);
        let row_end = center.row().saturating_add(radius).saturating_add(1).min(self.rows);
        let column_start = center.column().saturating_sub(radius);
        let column_end = center
            .column()
            .saturating_add(radius)
            .saturating_add(1)
            .min(self.columns);

        (row_start..row_end).flat_map(move |row| {
            (column_start..column_end).map(move |column| CellCoord::new(row, column))
        })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Renders one line per row with space separated cell codes.
impl fmt::Display for GridView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = usize::try_from(self.columns).map_err(|_| fmt::Error)?;
        if width == 0 {
            return Ok(());
        }

        for row in self.cells.chunks(width) {
            let line = row
                .iter()
                .map(|state| state.code().to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Mutation seam through which systems place towers on a grid.
pub trait TowerSite {
    /// Captures a read-only view of the current cell states.
    fn view(&self) -> GridView<'_>;

    /// Places a tower at `cell`, propagating coverage through its window.
    fn place_tower(&mut self, cell: CellCoord) -> Result<(), CoverageError>;
}

/// Undirected adjacency between towers within radio range of one another.
///
/// The graph is a value derived from a grid snapshot; it is never updated
/// when the grid changes afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TowerGraph {
    adjacency: BTreeMap<CellCoord, BTreeSet<CellCoord>>,
}

impl TowerGraph {
    /// Wraps a prepared adjacency mapping.
    #[must_use]
    pub fn from_adjacency(adjacency: BTreeMap<CellCoord, BTreeSet<CellCoord>>) -> Self {
        Self { adjacency }
    }

    /// Neighbours of `tower`, or `None` when it is not part of the graph.
    #[must_use]
    pub fn neighbors(&self, tower: CellCoord) -> Option<&BTreeSet<CellCoord>> {
        self.adjacency.get(&tower)
    }

    /// Reports whether `tower` is a node of the graph.
    #[must_use]
    pub fn contains(&self, tower: CellCoord) -> bool {
        self.adjacency.contains_key(&tower)
    }

    /// Iterates over all towers in row-major order.
    pub fn towers(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.adjacency.keys().copied()
    }

    /// Number of towers in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Reports whether the graph holds no towers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Number of undirected links between towers.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Reports whether every link is recorded in both directions.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.adjacency.iter().all(|(tower, neighbors)| {
            neighbors.iter().all(|neighbor| {
                self.adjacency
                    .get(neighbor)
                    .map_or(false, |back| back.contains(tower))
            })
        })
    }
}

/// Minimum-hop chain of towers linking two endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TowerPath {
    towers: Vec<CellCoord>,
}

impl TowerPath {
    /// Creates a path from towers ordered start first.
    #[must_use]
    pub fn new(towers: Vec<CellCoord>) -> Self {
        Self { towers }
    }

    /// Towers visited by the path, start and end inclusive.
    #[must_use]
    pub fn towers(&self) -> &[CellCoord] {
        &self.towers
    }

    /// Number of links traversed by the path.
    #[must_use]
    pub fn distance(&self) -> usize {
        self.towers.len().saturating_sub(1)
    }

    /// Consumes the path, yielding the ordered towers.
    #[must_use]
    pub fn into_vec(self) -> Vec<CellCoord> {
        self.towers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_codes_match_legacy_numbering() {
        let codes: Vec<u8> = CellState::ALL.iter().map(|state| state.code()).collect();
        assert_eq!(codes, vec![0, 1, 2, 3, 4]);
        for state in CellState::ALL {
            assert_eq!(CellState::from_code(i64::from(state.code())), Some(state));
        }
        assert_eq!(CellState::from_code(5), None);
        assert_eq!(CellState::from_code(-1), None);
    }

    #[test]
    fn coverage_never_regresses_towers_or_covered_cells() {
        assert_eq!(CellState::FreeUncovered.covered(), CellState::FreeCovered);
        assert_eq!(CellState::BlockedUncovered.covered(), CellState::BlockedCovered);
        assert_eq!(CellState::Tower.covered(), CellState::Tower);
        assert_eq!(CellState::FreeCovered.covered(), CellState::FreeCovered);
        assert_eq!(CellState::BlockedCovered.covered(), CellState::BlockedCovered);
    }

    #[test]
    fn only_free_cells_accept_towers() {
        let accepting: Vec<CellState> = CellState::ALL
            .into_iter()
            .filter(|state| state.accepts_tower())
            .collect();
        assert_eq!(accepting, vec![CellState::FreeUncovered, CellState::FreeCovered]);
    }

    #[test]
    fn chebyshev_distance_uses_largest_axis_delta() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.chebyshev_distance(destination), 3);
        assert_eq!(destination.chebyshev_distance(origin), 3);
        assert_eq!(origin.chebyshev_distance(origin), 0);
    }

    #[test]
    fn negative_indices_are_out_of_bounds() {
        assert_eq!(
            CellCoord::from_signed(-1, 0),
            Err(CoverageError::OutOfBounds { row: -1, column: 0 })
        );
        assert_eq!(CellCoord::from_signed(2, 3), Ok(CellCoord::new(2, 3)));
    }

    #[test]
    fn coordinates_order_row_major() {
        let mut cells = vec![
            CellCoord::new(1, 0),
            CellCoord::new(0, 2),
            CellCoord::new(0, 1),
        ];
        cells.sort();
        assert_eq!(
            cells,
            vec![CellCoord::new(0, 1), CellCoord::new(0, 2), CellCoord::new(1, 0)]
        );
    }

    #[test]
    fn window_is_clipped_to_grid_bounds() {
        let cells = vec![CellState::FreeUncovered; 12];
        let view = GridView::new(&cells, 3, 4, 1);

        let corner: Vec<CellCoord> = view.window(CellCoord::new(0, 0)).collect();
        assert_eq!(
            corner,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(0, 1),
                CellCoord::new(1, 0),
                CellCoord::new(1, 1),
            ]
        );
        assert_eq!(view.window(CellCoord::new(1, 1)).count(), 9);
        assert_eq!(view.window(CellCoord::new(2, 3)).count(), 4);
    }

    #[test]
    fn zero_radius_window_holds_only_the_centre() {
        let cells = vec![CellState::FreeUncovered; 4];
        let view = GridView::new(&cells, 2, 2, 0);
        let window: Vec<CellCoord> = view.window(CellCoord::new(1, 0)).collect();
        assert_eq!(window, vec![CellCoord::new(1, 0)]);
    }

    #[test]
    fn view_display_emits_codes_per_row() {
        let cells = vec![
            CellState::FreeUncovered,
            CellState::BlockedUncovered,
            CellState::Tower,
            CellState::FreeCovered,
            CellState::BlockedCovered,
            CellState::FreeUncovered,
        ];
        let view = GridView::new(&cells, 2, 3, 1);
        assert_eq!(view.to_string(), "0 1 2\n3 4 0\n");
    }

    #[test]
    fn view_reports_towers_and_states() {
        let cells = vec![
            CellState::Tower,
            CellState::FreeCovered,
            CellState::FreeCovered,
            CellState::Tower,
        ];
        let view = GridView::new(&cells, 2, 2, 1);
        let towers: Vec<CellCoord> = view.towers().collect();
        assert_eq!(towers, vec![CellCoord::new(0, 0), CellCoord::new(1, 1)]);
        assert_eq!(view.state(CellCoord::new(0, 1)), Some(CellState::FreeCovered));
        assert_eq!(view.state(CellCoord::new(2, 0)), None);
        assert_eq!(view.count(CellState::Tower), 2);
    }

    #[test]
    fn tower_graph_detects_asymmetric_links() {
        let a = CellCoord::new(0, 0);
        let b = CellCoord::new(0, 1);
        let mut adjacency = BTreeMap::new();
        let _ = adjacency.insert(a, BTreeSet::from([b]));
        let _ = adjacency.insert(b, BTreeSet::new());
        let graph = TowerGraph::from_adjacency(adjacency);
        assert!(!graph.is_symmetric());

        let mut adjacency = BTreeMap::new();
        let _ = adjacency.insert(a, BTreeSet::from([b]));
        let _ = adjacency.insert(b, BTreeSet::from([a]));
        let graph = TowerGraph::from_adjacency(adjacency);
        assert!(graph.is_symmetric());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn path_distance_counts_links() {
        let path = TowerPath::new(vec![CellCoord::new(0, 0)]);
        assert_eq!(path.distance(), 0);
        let path = TowerPath::new(vec![
            CellCoord::new(0, 0),
            CellCoord::new(1, 1),
            CellCoord::new(2, 2),
        ]);
        assert_eq!(path.distance(), 2);
    }

    #[test]
    fn cell_state_round_trips_through_bincode() {
        assert_round_trip(&CellState::BlockedCovered);
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(5, 7));
    }
}
