//! Text overlay that marks a tower path on top of the grid dump.

use radio_coverage_core::{GridView, TowerPath};

const START_MARK: char = 'S';
const END_MARK: char = 'E';
const HOP_MARK: char = '*';

/// Renders the dump with the path's start, end and intermediate towers marked.
pub(crate) fn render_path(view: &GridView<'_>, path: &TowerPath) -> String {
    let towers = path.towers();
    let start = towers.first().copied();
    let end = towers.last().copied();

    let mut out = String::new();
    let mut row_cells: Vec<String> = Vec::new();
    let mut current_row = 0;

    for (cell, state) in view.iter() {
        if cell.row() != current_row {
            out.push_str(&row_cells.join(" "));
            out.push('\n');
            row_cells.clear();
            current_row = cell.row();
        }

        let mark = if Some(cell) == start {
            START_MARK
        } else if Some(cell) == end {
            END_MARK
        } else if towers.contains(&cell) {
            HOP_MARK
        } else {
            char::from(b'0' + state.code())
        };
        row_cells.push(mark.to_string());
    }

    if !row_cells.is_empty() {
        out.push_str(&row_cells.join(" "));
        out.push('\n');
    }
    out
}
