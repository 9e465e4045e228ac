#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure placement system: rotates piece masks, validates them against a grid
//! and merges them in.
//!
//! Masks are anchored by their bottom-right corner: mask cell `(i, j)` of an
//! `rows x columns` mask lands on grid cell
//! `(anchor.row + i - (rows - 1), anchor.column + j - (columns - 1))`.
//! [`compute_error_matrix`] is the only occupancy check; live previews and
//! committed placements both go through it.

mod rotation;

use cartography_core::{
    CellCoord, ErrorMatrix, Grid, Piece, PieceMask, PlacementAttempt, PlacementRejected,
    TerrainCategory,
};

pub use rotation::{normalize_turns, rotate};

/// Grid coordinate covered by mask cell `(row, column)` when anchored at `anchor`.
#[must_use]
pub fn target_cell(mask: &PieceMask, anchor: CellCoord, row: usize, column: usize) -> CellCoord {
    let rows_above = signed(mask.rows().saturating_sub(1).saturating_sub(row));
    let columns_left = signed(mask.columns().saturating_sub(1).saturating_sub(column));
    anchor.offset(-rows_above, -columns_left)
}

/// Flags every occupied mask cell that would leave the grid or land on terrain.
///
/// Unoccupied mask cells are never flagged. The result has the mask's shape;
/// the placement is valid when no cell is flagged.
#[must_use]
pub fn compute_error_matrix(mask: &PieceMask, grid: &Grid, anchor: CellCoord) -> ErrorMatrix {
    ErrorMatrix::from_fn(mask.rows(), mask.columns(), |row, column| {
        mask.is_occupied(row, column) && !grid.is_vacant(target_cell(mask, anchor, row, column))
    })
}

/// Merges the mask into a new grid, or reports the conflicting cells.
///
/// The input grid is never modified.
pub fn apply(
    mask: &PieceMask,
    category: TerrainCategory,
    grid: &Grid,
    anchor: CellCoord,
) -> Result<Grid, PlacementRejected> {
    let errors = compute_error_matrix(mask, grid, anchor);
    if errors.has_conflicts() {
        return Err(PlacementRejected { errors });
    }

    let cells = mask
        .occupied_cells()
        .map(|(row, column)| target_cell(mask, anchor, row, column));
    Ok(grid.with_terrain(cells, category))
}

/// Applies a prepared placement attempt.
pub fn apply_attempt(attempt: &PlacementAttempt, grid: &Grid) -> Result<Grid, PlacementRejected> {
    apply(&attempt.mask, attempt.category, grid, attempt.anchor)
}

/// Rotates a catalog piece and binds it to an anchor.
#[must_use]
pub fn prepare(piece: &Piece, rotation: i32, anchor: CellCoord) -> PlacementAttempt {
    PlacementAttempt {
        anchor,
        mask: rotate(piece.mask(), rotation),
        category: piece.category(),
    }
}

fn signed(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
