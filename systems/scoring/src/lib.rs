#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure scoring system evaluating challenges against a derived game state.

use cartography_core::{CellCoord, GameState, Grid, TerrainCategory};

/// Scoring objective presented to the player.
#[derive(Clone, Copy, Debug)]
pub struct Challenge {
    /// Short display name.
    pub name: &'static str,
    /// Rules text shown alongside the score.
    pub description: &'static str,
    /// Pure scoring function. Must not depend on anything but the state.
    pub score: fn(&GameState) -> u32,
}

/// Evaluates the challenge against the state.
#[must_use]
pub fn score(challenge: &Challenge, state: &GameState) -> u32 {
    (challenge.score)(state)
}

/// Evaluates every challenge, preserving order.
pub fn score_all<'a>(
    challenges: &'a [Challenge],
    state: &'a GameState,
) -> impl Iterator<Item = (&'a Challenge, u32)> + 'a {
    challenges
        .iter()
        .map(move |challenge| (challenge, score(challenge, state)))
}

/// Decides which cells may extend a diagonal run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Qualifier {
    /// Any terrain qualifies; only empty cells break a run.
    AnyTerrain,
    /// Only the named category qualifies.
    Only(TerrainCategory),
}

impl Qualifier {
    fn accepts(self, cell: Option<TerrainCategory>) -> bool {
        match (self, cell) {
            (_, None) => false,
            (Self::AnyTerrain, Some(_)) => true,
            (Self::Only(expected), Some(found)) => expected == found,
        }
    }
}

/// Rule awarding points for diagonals that run from the left edge to the
/// bottom edge without a gap.
///
/// For each starting row `offset`, the diagonal visits `(offset + k, k)`
/// until it leaves the grid. It counts only when every visited cell
/// qualifies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagonalRun {
    /// Cells that may extend a run.
    pub qualifier: Qualifier,
    /// Points awarded per completed diagonal.
    pub points: u32,
}

impl DiagonalRun {
    /// Number of starting rows whose diagonal is complete.
    #[must_use]
    pub fn completed_runs(&self, grid: &Grid) -> usize {
        (0..grid.size())
            .filter(|&offset| self.is_complete(grid, offset))
            .count()
    }

    /// Points earned on the grid.
    #[must_use]
    pub fn evaluate(&self, grid: &Grid) -> u32 {
        let runs = u32::try_from(self.completed_runs(grid)).unwrap_or(u32::MAX);
        runs.saturating_mul(self.points)
    }

    fn is_complete(&self, grid: &Grid, offset: usize) -> bool {
        let Ok(start) = i32::try_from(offset) else {
            return false;
        };
        let mut cell = CellCoord::new(start, 0);
        while grid.contains(cell) {
            if !self.qualifier.accepts(grid.terrain(cell)) {
                return false;
            }
            cell = cell.offset(1, 1);
        }
        true
    }
}

/// Diagonal rule behind [`BROKEN_ROAD`].
pub const BROKEN_ROAD_RULE: DiagonalRun = DiagonalRun {
    qualifier: Qualifier::AnyTerrain,
    points: 3,
};

/// Three points per filled diagonal touching the left and bottom edges.
pub const BROKEN_ROAD: Challenge = Challenge {
    name: "Broken road",
    description: "Receive 3 points for each diagonal that is entirely filled cells \
                  and touches the left and bottom edges of the map",
    score: broken_road,
};

/// Challenges scored in a standard game.
pub const STANDARD_CHALLENGES: [Challenge; 1] = [BROKEN_ROAD];

fn broken_road(state: &GameState) -> u32 {
    BROKEN_ROAD_RULE.evaluate(state.grid())
}
