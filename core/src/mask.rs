//! Boolean matrices describing piece footprints and placement conflicts.

use serde::{Deserialize, Serialize};

use crate::InvariantViolation;

/// Rectangular occupancy mask of a piece.
///
/// A mask always has at least one row, one column and one occupied cell.
/// Deserialization re-validates those invariants so imported logs cannot
/// smuggle in degenerate masks.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<bool>>", into = "Vec<Vec<bool>>")]
pub struct PieceMask {
    rows: usize,
    columns: usize,
    cells: Vec<bool>,
}

impl PieceMask {
    /// Builds a mask from row vectors of occupancy flags.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, InvariantViolation> {
        let columns = rows.first().map_or(0, Vec::len);
        if rows.is_empty() || columns == 0 {
            return Err(InvariantViolation::EmptyMask);
        }

        let mut cells = Vec::with_capacity(rows.len() * columns);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != columns {
                return Err(InvariantViolation::RaggedMask {
                    row: index,
                    expected: columns,
                    found: row.len(),
                });
            }
            cells.extend_from_slice(row);
        }

        if !cells.iter().any(|occupied| *occupied) {
            return Err(InvariantViolation::VacantMask);
        }

        Ok(Self {
            rows: rows.len(),
            columns,
            cells,
        })
    }

    /// Builds a mask from compact `0`/`1` rows, treating any non-zero value as occupied.
    pub fn from_bits(rows: &[&[u8]]) -> Result<Self, InvariantViolation> {
        Self::from_rows(
            rows.iter()
                .map(|row| row.iter().map(|bit| *bit != 0).collect())
                .collect(),
        )
    }

    /// Number of rows in the mask.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns in the mask.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Reports whether the mask occupies the provided cell.
    ///
    /// # Panics
    ///
    /// Panics when `row` or `column` lies outside the mask.
    #[must_use]
    pub fn is_occupied(&self, row: usize, column: usize) -> bool {
        assert!(
            row < self.rows && column < self.columns,
            "mask cell ({row}, {column}) outside {}x{} mask",
            self.rows,
            self.columns,
        );
        self.cells[row * self.columns + column]
    }

    /// Iterates over the `(row, column)` pairs of occupied cells in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let columns = self.columns;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, occupied)| **occupied)
            .map(move |(index, _)| (index / columns, index % columns))
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|occupied| **occupied).count()
    }

    /// Returns the mask turned a single quarter clockwise.
    ///
    /// Output row `i` is input column `i` read bottom to top, so
    /// `output[i][j] = input[rows - 1 - j][i]`; rows and columns swap.
    #[must_use]
    pub fn quarter_turn(&self) -> Self {
        let rows = self.columns;
        let columns = self.rows;
        let mut cells = Vec::with_capacity(self.cells.len());
        for row in 0..rows {
            for column in 0..columns {
                cells.push(self.cells[(self.rows - 1 - column) * self.columns + row]);
            }
        }
        Self {
            rows,
            columns,
            cells,
        }
    }

    /// Copies the mask into row vectors.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        self.cells
            .chunks(self.columns)
            .map(<[bool]>::to_vec)
            .collect()
    }
}

impl TryFrom<Vec<Vec<bool>>> for PieceMask {
    type Error = InvariantViolation;

    fn try_from(rows: Vec<Vec<bool>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<PieceMask> for Vec<Vec<bool>> {
    fn from(mask: PieceMask) -> Self {
        mask.to_rows()
    }
}

/// Per-cell conflict map shaped like the mask it was computed for.
///
/// Serialized as row vectors; deserialization rejects ragged rows.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<bool>>", into = "Vec<Vec<bool>>")]
pub struct ErrorMatrix {
    rows: usize,
    columns: usize,
    cells: Vec<bool>,
}

impl ErrorMatrix {
    /// Builds a matrix by evaluating `flagged` for every `(row, column)` pair.
    #[must_use]
    pub fn from_fn<F>(rows: usize, columns: usize, mut flagged: F) -> Self
    where
        F: FnMut(usize, usize) -> bool,
    {
        let mut cells = Vec::with_capacity(rows * columns);
        for row in 0..rows {
            for column in 0..columns {
                cells.push(flagged(row, column));
            }
        }
        Self {
            rows,
            columns,
            cells,
        }
    }

    /// Builds a matrix from row vectors of conflict flags.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, InvariantViolation> {
        let columns = rows.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(rows.len() * columns);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != columns {
                return Err(InvariantViolation::RaggedMask {
                    row: index,
                    expected: columns,
                    found: row.len(),
                });
            }
            cells.extend_from_slice(row);
        }

        Ok(Self {
            rows: rows.len(),
            columns,
            cells,
        })
    }

    /// Number of rows in the matrix.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns in the matrix.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Reports whether the provided cell is flagged as a conflict.
    ///
    /// # Panics
    ///
    /// Panics when `row` or `column` lies outside the matrix.
    #[must_use]
    pub fn is_flagged(&self, row: usize, column: usize) -> bool {
        assert!(
            row < self.rows && column < self.columns,
            "error cell ({row}, {column}) outside {}x{} matrix",
            self.rows,
            self.columns,
        );
        self.cells[row * self.columns + column]
    }

    /// Reports whether any cell is flagged.
    #[must_use]
    pub fn has_conflicts(&self) -> bool {
        self.cells.iter().any(|flagged| *flagged)
    }

    /// Number of flagged cells.
    #[must_use]
    pub fn conflict_count(&self) -> usize {
        self.cells.iter().filter(|flagged| **flagged).count()
    }

    /// Iterates over the `(row, column)` pairs of flagged cells in row-major order.
    pub fn conflicts(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let columns = self.columns;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, flagged)| **flagged)
            .map(move |(index, _)| (index / columns, index % columns))
    }

    /// Copies the matrix into row vectors.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        if self.columns == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.cells
            .chunks(self.columns)
            .map(<[bool]>::to_vec)
            .collect()
    }
}

impl TryFrom<Vec<Vec<bool>>> for ErrorMatrix {
    type Error = InvariantViolation;

    fn try_from(rows: Vec<Vec<bool>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<ErrorMatrix> for Vec<Vec<bool>> {
    fn from(matrix: ErrorMatrix) -> Self {
        matrix.to_rows()
    }
}
