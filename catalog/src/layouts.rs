//! Starting layouts for the standard 11x11 map.

use cartography_core::{Grid, InvariantViolation, TerrainCategory};
use serde::{Deserialize, Serialize};

/// Side length of the standard map.
pub const STANDARD_GRID_SIZE: usize = 11;

/// Time budget of a standard game, one entry per season.
pub const STANDARD_TIME_LIMIT: i32 = 6 + 7 + 8 + 8;

const M: Option<TerrainCategory> = Some(TerrainCategory::Mountain);
const C: Option<TerrainCategory> = Some(TerrainCategory::Cavern);
const E: Option<TerrainCategory> = None;

type LayoutRows = [[Option<TerrainCategory>; STANDARD_GRID_SIZE]; STANDARD_GRID_SIZE];

const LAYOUT_A: LayoutRows = [
    [E, E, E, E, E, E, E, E, E, E, E],
    [E, E, E, M, E, E, E, E, E, E, E],
    [E, E, E, E, E, E, E, E, M, E, E],
    [E, E, E, E, E, E, E, E, E, E, E],
    [E, E, E, E, E, E, E, E, E, E, E],
    [E, E, E, E, E, M, E, E, E, E, E],
    [E, E, E, E, E, E, E, E, E, E, E],
    [E, E, E, E, E, E, E, E, E, E, E],
    [E, E, M, E, E, E, E, E, E, E, E],
    [E, E, E, E, E, E, E, M, E, E, E],
    [E, E, E, E, E, E, E, E, E, E, E],
];

const LAYOUT_B: LayoutRows = [
    [E, E, E, E, E, E, E, E, E, E, E],
    [E, E, E, E, E, E, E, E, M, E, E],
    [E, E, E, M, E, E, E, E, E, E, E],
    [E, E, E, E, E, C, E, E, E, E, E],
    [E, E, E, E, C, C, E, E, E, E, E],
    [E, E, E, E, C, C, C, E, E, E, E],
    [E, E, E, E, E, C, E, E, E, E, E],
    [E, E, E, E, E, M, E, E, E, E, E],
    [E, E, E, E, E, E, E, E, E, M, E],
    [E, E, M, E, E, E, E, E, E, E, E],
    [E, E, E, E, E, E, E, E, E, E, E],
];

/// Named starting maps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartingLayout {
    /// Empty standard-size map.
    Blank,
    /// Five scattered mountains.
    A,
    /// Five mountains around a central cavern.
    #[default]
    B,
}

impl StartingLayout {
    /// Side length of the grid the layout builds.
    #[must_use]
    pub const fn size(self) -> usize {
        STANDARD_GRID_SIZE
    }

    /// Builds the grid described by the layout.
    pub fn grid(self) -> Result<Grid, InvariantViolation> {
        match self {
            Self::Blank => Grid::empty(STANDARD_GRID_SIZE),
            Self::A => Grid::from_rows(to_rows(&LAYOUT_A)),
            Self::B => Grid::from_rows(to_rows(&LAYOUT_B)),
        }
    }
}

fn to_rows(layout: &LayoutRows) -> Vec<Vec<Option<TerrainCategory>>> {
    layout.iter().map(|row| row.to_vec()).collect()
}
