//! Immutable square terrain grid.

use std::sync::Arc;

use crate::{CellCoord, InvariantViolation, TerrainCategory};

/// Square matrix of optional terrain, stored row-major.
///
/// Grids are persistent values: cloning shares the backing storage and every
/// update returns a new grid, so grids captured from earlier log prefixes
/// remain valid.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Arc<[Option<TerrainCategory>]>,
}

impl Grid {
    /// Creates an empty grid with `size` rows and `size` columns.
    pub fn empty(size: usize) -> Result<Self, InvariantViolation> {
        check_size(size)?;
        Ok(Self {
            size,
            cells: vec![None; size * size].into(),
        })
    }

    /// Creates a grid from explicit rows. Every row must be as long as there are rows.
    pub fn from_rows(rows: Vec<Vec<Option<TerrainCategory>>>) -> Result<Self, InvariantViolation> {
        let size = rows.len();
        check_size(size)?;

        let mut cells = Vec::with_capacity(size * size);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(InvariantViolation::NonSquareGrid {
                    row: index,
                    expected: size,
                    found: row.len(),
                });
            }
            cells.extend(row);
        }

        Ok(Self {
            size,
            cells: cells.into(),
        })
    }

    /// Side length of the grid.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub fn contains(&self, coord: CellCoord) -> bool {
        self.index(coord).is_some()
    }

    /// Terrain at the coordinate, or `None` when the cell is empty or outside the grid.
    #[must_use]
    pub fn terrain(&self, coord: CellCoord) -> Option<TerrainCategory> {
        self.index(coord).and_then(|index| self.cells[index])
    }

    /// Reports whether the coordinate lies inside the grid and holds no terrain.
    #[must_use]
    pub fn is_vacant(&self, coord: CellCoord) -> bool {
        self.index(coord)
            .map_or(false, |index| self.cells[index].is_none())
    }

    /// Terrain at a zero-based `(row, column)` pair.
    ///
    /// # Panics
    ///
    /// Panics when the pair lies outside the grid.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<TerrainCategory> {
        assert!(
            row < self.size && column < self.size,
            "grid cell ({row}, {column}) outside {0}x{0} grid",
            self.size,
        );
        self.cells[row * self.size + column]
    }

    /// Iterates over the rows of the grid from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<TerrainCategory>]> + '_ {
        self.cells.chunks(self.size)
    }

    /// Number of cells holding terrain.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Returns a new grid with `category` written into every provided cell.
    ///
    /// # Panics
    ///
    /// Panics when a coordinate lies outside the grid; callers validate first.
    #[must_use]
    pub fn with_terrain<I>(&self, coords: I, category: TerrainCategory) -> Self
    where
        I: IntoIterator<Item = CellCoord>,
    {
        let mut cells = self.cells.to_vec();
        for coord in coords {
            let Some(index) = self.index(coord) else {
                panic!(
                    "cell ({}, {}) outside {2}x{2} grid",
                    coord.row(),
                    coord.column(),
                    self.size,
                );
            };
            cells[index] = Some(category);
        }
        Self {
            size: self.size,
            cells: cells.into(),
        }
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        let row = usize::try_from(coord.row()).ok()?;
        let column = usize::try_from(coord.column()).ok()?;
        if row < self.size && column < self.size {
            Some(row * self.size + column)
        } else {
            None
        }
    }
}

fn check_size(size: usize) -> Result<(), InvariantViolation> {
    if size == 0 {
        return Err(InvariantViolation::EmptyGrid);
    }
    if i32::try_from(size).is_err() {
        return Err(InvariantViolation::GridTooLarge { size });
    }
    Ok(())
}
