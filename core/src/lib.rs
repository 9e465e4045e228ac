#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Cartography engine.
//!
//! This crate defines the value types and the message surface that connect
//! adapters, the authoritative world, and pure systems. Adapters submit
//! [`Command`] values describing desired placements, the world validates and
//! records them in its move log via its `apply` entry point, and then
//! broadcasts [`Event`] values for systems to react to deterministically.
//! Every board state is a [`Grid`] value derived by replaying that log; no
//! grid is ever edited in place.

mod grid;
mod mask;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use grid::Grid;
pub use mask::{ErrorMatrix, PieceMask};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Cartography.";

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests placement of a catalog piece with its bottom-right corner at `anchor`.
    PlacePiece {
        /// Catalog entry to place.
        piece: PieceId,
        /// Number of clockwise quarter turns applied before placement. Any integer is accepted.
        rotation: i32,
        /// Grid cell aligned with the bottom-right corner of the rotated mask.
        anchor: CellCoord,
    },
    /// Discards every recorded placement, returning the session to its starting state.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a piece was appended to the move log.
    PiecePlaced {
        /// Catalog entry that was placed.
        piece: PieceId,
        /// Anchor used for the placement.
        anchor: CellCoord,
        /// Time budget remaining after the placement was recorded.
        time_left: i32,
    },
    /// Reports that a placement request was rejected.
    PlacementRejected {
        /// Catalog entry requested for placement.
        piece: PieceId,
        /// Anchor provided in the placement request.
        anchor: CellCoord,
        /// Specific reason the placement failed.
        reason: RejectionReason,
    },
    /// Announces that the time budget has been exhausted.
    TimeExpired {
        /// Remaining time, which may be negative.
        time_left: i32,
    },
    /// Announces that the move log was truncated to empty.
    Restarted,
}

/// Reasons a placement request may be rejected by the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectionReason {
    /// The time budget is exhausted, so no further placements are accepted.
    GameOver,
    /// The requested piece is not part of the loaded catalog.
    UnknownPiece,
    /// The rotated mask collides with occupied cells or leaves the grid.
    Conflicts(ErrorMatrix),
}

/// Terrain that may occupy a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainCategory {
    /// Cultivated farmland.
    Fields,
    /// Woodland.
    Forest,
    /// Towns, villages and huts.
    Settlement,
    /// Rivers and lakes.
    Water,
    /// Impassable peaks, usually part of the starting layout.
    Mountain,
    /// Underground openings, usually part of the starting layout.
    Cavern,
}

impl TerrainCategory {
    /// Every terrain category in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Fields,
        Self::Forest,
        Self::Settlement,
        Self::Water,
        Self::Mountain,
        Self::Cavern,
    ];

    /// Single character used by text adapters to draw the terrain.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Fields => 'F',
            Self::Forest => 'T',
            Self::Settlement => 'S',
            Self::Water => 'W',
            Self::Mountain => 'M',
            Self::Cavern => 'C',
        }
    }

    /// Human readable name of the terrain.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fields => "fields",
            Self::Forest => "forest",
            Self::Settlement => "settlement",
            Self::Water => "water",
            Self::Mountain => "mountain",
            Self::Cavern => "cavern",
        }
    }
}

/// Location of a grid cell expressed as signed row and column coordinates.
///
/// Coordinates are signed so that mask cells overhanging the top or left
/// edge can be represented and reported as conflicts instead of wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: i32,
    column: i32,
}

impl CellCoord {
    /// Creates a new cell coordinate from a row and a column.
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Returns the coordinate shifted by the provided row and column deltas.
    #[must_use]
    pub const fn offset(self, rows: i32, columns: i32) -> Self {
        Self {
            row: self.row.saturating_add(rows),
            column: self.column.saturating_add(columns),
        }
    }
}

/// Stable key of a piece inside a loaded catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(u16);

impl PieceId {
    /// Creates a new piece identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Static definition of a placeable piece.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    name: String,
    category: TerrainCategory,
    mask: PieceMask,
    time_cost: u32,
}

impl Piece {
    /// Creates a new piece definition.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        category: TerrainCategory,
        mask: PieceMask,
        time_cost: u32,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            mask,
            time_cost,
        }
    }

    /// Display name, unique within a catalog.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Terrain written into every occupied cell.
    #[must_use]
    pub const fn category(&self) -> TerrainCategory {
        self.category
    }

    /// Unrotated occupancy mask.
    #[must_use]
    pub const fn mask(&self) -> &PieceMask {
        &self.mask
    }

    /// Time units consumed by placing the piece.
    #[must_use]
    pub const fn time_cost(&self) -> u32 {
        self.time_cost
    }
}

/// Transient request to merge a rotated mask into a grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacementAttempt {
    /// Grid cell aligned with the bottom-right corner of the mask.
    pub anchor: CellCoord,
    /// Mask after rotation has been applied.
    pub mask: PieceMask,
    /// Terrain written into every occupied cell.
    pub category: TerrainCategory,
}

/// Accepted placement recorded in the move log.
///
/// Entries carry the rotated mask so replay never consults the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Catalog entry the placement originated from.
    pub piece: PieceId,
    /// Grid cell aligned with the bottom-right corner of the mask.
    pub anchor: CellCoord,
    /// Terrain written into every occupied cell.
    pub category: TerrainCategory,
    /// Mask after rotation.
    pub mask: PieceMask,
    /// Time units subtracted from the budget.
    pub time_cost: u32,
}

impl LogEntry {
    /// Converts the entry back into the placement it records.
    #[must_use]
    pub fn attempt(&self) -> PlacementAttempt {
        PlacementAttempt {
            anchor: self.anchor,
            mask: self.mask.clone(),
            category: self.category,
        }
    }
}

/// Board and remaining time budget derived from a move log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    grid: Grid,
    time_left: i32,
}

impl GameState {
    /// Creates a new game state.
    #[must_use]
    pub const fn new(grid: Grid, time_left: i32) -> Self {
        Self { grid, time_left }
    }

    /// Current terrain grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Remaining time budget. Never clamped, so it may be negative.
    #[must_use]
    pub const fn time_left(&self) -> i32 {
        self.time_left
    }

    /// Reports whether the time budget is exhausted.
    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.time_left <= 0
    }
}

/// Expected failure returned when a mask does not fit at the requested anchor.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("placement conflicts with {} cell(s)", .errors.conflict_count())]
pub struct PlacementRejected {
    /// Per-cell conflicts, shaped like the tested mask.
    pub errors: ErrorMatrix,
}

/// Programmer errors that indicate a broken contract between collaborators.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A mask was declared without rows or columns.
    #[error("piece mask has zero dimensions")]
    EmptyMask,
    /// A mask row differs in length from the first row.
    #[error("piece mask row {row} has {found} columns, expected {expected}")]
    RaggedMask {
        /// Index of the offending row.
        row: usize,
        /// Column count of the first row.
        expected: usize,
        /// Column count of the offending row.
        found: usize,
    },
    /// A mask contains no occupied cell.
    #[error("piece mask has no occupied cell")]
    VacantMask,
    /// A grid was declared without cells.
    #[error("grid has zero dimensions")]
    EmptyGrid,
    /// A grid row differs in length from the number of rows.
    #[error("grid row {row} has {found} columns, expected {expected}")]
    NonSquareGrid {
        /// Index of the offending row.
        row: usize,
        /// Number of rows, which every row length must match.
        expected: usize,
        /// Column count of the offending row.
        found: usize,
    },
    /// A grid is too large to be addressed with signed coordinates.
    #[error("grid size {size} exceeds the addressable range")]
    GridTooLarge {
        /// Requested side length.
        size: usize,
    },
    /// Replaying the move log met an entry that does not fit.
    #[error("move log entry {index} conflicts with {conflicts} cell(s) during replay")]
    CorruptedLog {
        /// Position of the entry inside the log.
        index: usize,
        /// Number of conflicting mask cells.
        conflicts: usize,
    },
}
