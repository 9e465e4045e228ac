use std::fmt::Write as _;

use cartography_catalog::Catalog;
use cartography_core::{ErrorMatrix, Grid, PieceMask};

const EMPTY_CELL: char = '.';
const CONFLICT_CELL: char = 'x';
const MASK_CELL: char = '#';

/// Renders the grid one row per line using terrain symbols.
pub(crate) fn grid(grid: &Grid) -> String {
    let mut out = String::with_capacity(grid.size() * (grid.size() + 1));
    for row in grid.rows() {
        out.extend(
            row.iter()
                .map(|cell| cell.map_or(EMPTY_CELL, |terrain| terrain.symbol())),
        );
        out.push('\n');
    }
    out
}

/// Renders the conflicting cells of a rejected placement.
pub(crate) fn errors(errors: &ErrorMatrix) -> String {
    let mut out = String::new();
    for row in errors.to_rows() {
        out.extend(
            row.into_iter()
                .map(|flagged| if flagged { CONFLICT_CELL } else { EMPTY_CELL }),
        );
        out.push('\n');
    }
    out
}

fn mask(mask: &PieceMask) -> Vec<String> {
    mask.to_rows()
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|occupied| if occupied { MASK_CELL } else { EMPTY_CELL })
                .collect()
        })
        .collect()
}

/// Lists every catalog piece with its id, terrain, cost and shape.
pub(crate) fn catalog(catalog: &Catalog) -> String {
    let mut out = String::new();
    for (id, piece) in catalog.iter() {
        let _ = writeln!(
            out,
            "{:>2}  {:<20} {:<10} cost {}",
            id.get(),
            piece.name(),
            piece.category().label(),
            piece.time_cost()
        );
        for line in mask(piece.mask()) {
            let _ = writeln!(out, "      {line}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartography_core::{CellCoord, TerrainCategory};

    #[test]
    fn grid_uses_terrain_symbols() {
        let grid = Grid::empty(3)
            .expect("valid grid")
            .with_terrain([CellCoord::new(0, 2)], TerrainCategory::Water)
            .with_terrain([CellCoord::new(2, 0)], TerrainCategory::Mountain);

        assert_eq!(super::grid(&grid), "..W\n...\nM..\n");
    }

    #[test]
    fn errors_mark_conflicts() {
        let errors = ErrorMatrix::from_fn(2, 3, |row, column| row == 0 && column != 1);

        assert_eq!(super::errors(&errors), "x.x\n...\n");
    }

    #[test]
    fn catalog_lists_every_piece() {
        let catalog = Catalog::standard().expect("standard catalog loads");
        let listing = super::catalog(&catalog);

        for (_, piece) in catalog.iter() {
            assert!(listing.contains(piece.name()), "missing {}", piece.name());
        }
        assert!(listing.contains("      .#.\n      ###\n      .#.\n"));
    }
}
