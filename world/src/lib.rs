#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for Cartography.
//!
//! The world owns the catalog, the starting map and the move log. Every read
//! derives the board from the log; [`apply`] is the only way to extend it.

use cartography_catalog::{Catalog, CatalogError, StartingLayout, STANDARD_TIME_LIMIT};
use cartography_core::{
    CellCoord, Command, Event, GameState, Grid, InvariantViolation, LogEntry, Piece, PieceId,
    RejectionReason, WELCOME_BANNER,
};
use cartography_system_placement::{apply_attempt, prepare, rotate};
use cartography_system_replay::{derive_state, MoveLog};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

const DEFAULT_DRAW_SEED: u64 = 0x6361_7274_6f67_7261;

/// Session parameters fixed for the lifetime of a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Starting map.
    pub layout: StartingLayout,
    /// Time units available before the game ends.
    pub time_budget: i32,
    /// Seed for the offered-piece draw.
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: StartingLayout::default(),
            time_budget: STANDARD_TIME_LIMIT,
            seed: DEFAULT_DRAW_SEED,
        }
    }
}

/// Failures raised while constructing a world.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WorldError {
    /// The piece catalog failed to load.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// The starting grid or an imported log broke an engine invariant.
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
    /// An imported log references a piece missing from the catalog.
    #[error("log entry {index} references unknown piece {}", .piece.get())]
    UnknownPiece {
        /// Position of the offending entry.
        index: usize,
        /// Identifier that failed to resolve.
        piece: PieceId,
    },
    /// An imported log entry does not record a rotation of the piece it names.
    #[error("log entry {index} does not match catalog piece {}", .piece.get())]
    PieceMismatch {
        /// Position of the offending entry.
        index: usize,
        /// Identifier the entry claims to place.
        piece: PieceId,
    },
    /// An imported log continues after the time budget ran out.
    #[error("log entry {index} was placed with {time_left} time left")]
    PlacedAfterExpiry {
        /// Position of the offending entry.
        index: usize,
        /// Budget remaining before the entry.
        time_left: i32,
    },
}

/// Represents the authoritative Cartography session.
#[derive(Clone, Debug)]
pub struct World {
    banner: &'static str,
    config: Config,
    catalog: Catalog,
    start_grid: Grid,
    log: MoveLog,
}

impl World {
    /// Creates a session over the standard catalog.
    pub fn new(config: Config) -> Result<Self, WorldError> {
        Self::with_catalog(config, Catalog::standard()?)
    }

    /// Creates a session over a custom catalog.
    pub fn with_catalog(config: Config, catalog: Catalog) -> Result<Self, WorldError> {
        let start_grid = config.layout.grid()?;
        Ok(Self {
            banner: WELCOME_BANNER,
            config,
            catalog,
            start_grid,
            log: MoveLog::new(),
        })
    }

    /// Rebuilds a session over the standard catalog from exported log entries.
    pub fn from_log(config: Config, entries: Vec<LogEntry>) -> Result<Self, WorldError> {
        Self::from_log_with_catalog(config, Catalog::standard()?, entries)
    }

    /// Rebuilds a session over a custom catalog from exported log entries.
    ///
    /// Every entry must record a rotation of a catalog piece with its terrain
    /// and time cost, follow a move made while time remained, and replay
    /// cleanly over the configured starting map.
    pub fn from_log_with_catalog(
        config: Config,
        catalog: Catalog,
        entries: Vec<LogEntry>,
    ) -> Result<Self, WorldError> {
        let mut world = Self::with_catalog(config, catalog)?;
        let mut time_left = config.time_budget;
        for (index, entry) in entries.iter().enumerate() {
            if time_left <= 0 {
                return Err(WorldError::PlacedAfterExpiry { index, time_left });
            }
            let Some(definition) = world.catalog.get(entry.piece) else {
                return Err(WorldError::UnknownPiece {
                    index,
                    piece: entry.piece,
                });
            };
            if !records_piece(entry, definition) {
                return Err(WorldError::PieceMismatch {
                    index,
                    piece: entry.piece,
                });
            }
            time_left = charge(time_left, entry.time_cost);
        }

        let state = derive_state(&entries, &world.start_grid, config.time_budget)?;
        debug!(
            entries = entries.len(),
            time_left = state.time_left(),
            "session rebuilt from log"
        );
        world.log = MoveLog::from_entries(entries);
        Ok(world)
    }

    fn state(&self) -> GameState {
        match derive_state(self.log.entries(), &self.start_grid, self.config.time_budget) {
            Ok(state) => state,
            Err(violation) => panic!("move log no longer replays: {violation}"),
        }
    }

    fn place(
        &mut self,
        piece: PieceId,
        rotation: i32,
        anchor: CellCoord,
        out_events: &mut Vec<Event>,
    ) {
        let state = self.state();
        let reject = |reason: RejectionReason, out_events: &mut Vec<Event>| {
            out_events.push(Event::PlacementRejected {
                piece,
                anchor,
                reason,
            });
        };

        if state.is_over() {
            warn!(piece = piece.get(), "placement after time expired");
            reject(RejectionReason::GameOver, out_events);
            return;
        }

        let Some(definition) = self.catalog.get(piece) else {
            warn!(piece = piece.get(), "placement of unknown piece");
            reject(RejectionReason::UnknownPiece, out_events);
            return;
        };

        let attempt = prepare(definition, rotation, anchor);
        if let Err(rejected) = apply_attempt(&attempt, state.grid()) {
            debug!(
                piece = definition.name(),
                row = anchor.row(),
                column = anchor.column(),
                conflicts = rejected.errors.conflict_count(),
                "placement rejected"
            );
            reject(RejectionReason::Conflicts(rejected.errors), out_events);
            return;
        }

        let time_cost = definition.time_cost();
        let time_left = charge(state.time_left(), time_cost);
        debug!(
            piece = definition.name(),
            row = anchor.row(),
            column = anchor.column(),
            rotation,
            time_left,
            "piece placed"
        );

        self.log.append(LogEntry {
            piece,
            anchor: attempt.anchor,
            category: attempt.category,
            mask: attempt.mask,
            time_cost,
        });
        out_events.push(Event::PiecePlaced {
            piece,
            anchor,
            time_left,
        });

        if time_left <= 0 {
            info!(time_left, placements = self.log.len(), "time budget exhausted");
            out_events.push(Event::TimeExpired { time_left });
        }
    }
}

fn charge(time_left: i32, time_cost: u32) -> i32 {
    time_left.saturating_sub(i32::try_from(time_cost).unwrap_or(i32::MAX))
}

fn records_piece(entry: &LogEntry, piece: &Piece) -> bool {
    entry.category == piece.category()
        && entry.time_cost == piece.time_cost()
        && (0..4).any(|turns| rotate(piece.mask(), turns) == entry.mask)
}

/// Applies the provided command to the world, recording accepted placements.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlacePiece {
            piece,
            rotation,
            anchor,
        } => world.place(piece, rotation, anchor, out_events),
        Command::Restart => {
            info!(discarded = world.log.len(), "session restarted");
            world.log.clear();
            out_events.push(Event::Restarted);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use cartography_catalog::Catalog;
    use cartography_core::{CellCoord, ErrorMatrix, GameState, PieceId};
    use cartography_system_placement::{compute_error_matrix, rotate};
    use cartography_system_replay::MoveLog;
    use cartography_system_scoring::{score as evaluate, Challenge};

    use super::{Config, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Session parameters the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &Config {
        &world.config
    }

    /// Derives the current grid and time budget from the move log.
    ///
    /// # Panics
    ///
    /// Panics if the recorded log no longer replays, which means an entry was
    /// recorded without validation.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state()
    }

    /// Reports whether the time budget is exhausted.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.state().is_over()
    }

    /// Computes live drag feedback for a piece, or `None` if it is not in the catalog.
    #[must_use]
    pub fn preview(
        world: &World,
        piece: PieceId,
        rotation: i32,
        anchor: CellCoord,
    ) -> Option<ErrorMatrix> {
        let definition = world.catalog.get(piece)?;
        let mask = rotate(definition.mask(), rotation);
        Some(compute_error_matrix(&mask, world.state().grid(), anchor))
    }

    /// Piece currently offered to the player.
    ///
    /// Determined by the draw seed and the number of recorded placements, so
    /// a restart returns to the first offer.
    #[must_use]
    pub fn offered_piece(world: &World) -> PieceId {
        world.catalog.draw(world.config.seed, world.log.len())
    }

    /// Snapshot of the move log. Later placements do not affect it.
    #[must_use]
    pub fn log_snapshot(world: &World) -> MoveLog {
        world.log.clone()
    }

    /// Provides read-only access to the loaded catalog.
    #[must_use]
    pub fn catalog(world: &World) -> &Catalog {
        &world.catalog
    }

    /// Scores the current state against a challenge.
    #[must_use]
    pub fn score(world: &World, challenge: &Challenge) -> u32 {
        evaluate(challenge, &world.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartography_core::{PieceMask, TerrainCategory};
    use cartography_system_scoring::BROKEN_ROAD;

    fn blank_world(time_budget: i32) -> World {
        World::new(Config {
            layout: StartingLayout::Blank,
            time_budget,
            ..Config::default()
        })
        .expect("world builds")
    }

    fn piece(world: &World, name: &str) -> PieceId {
        query::catalog(world).resolve(name).expect("piece in catalog")
    }

    fn place(world: &mut World, name: &str, rotation: i32, row: i32, column: i32) -> Vec<Event> {
        let piece = piece(world, name);
        let mut events = Vec::new();
        apply(
            world,
            Command::PlacePiece {
                piece,
                rotation,
                anchor: CellCoord::new(row, column),
            },
            &mut events,
        );
        events
    }

    #[test]
    fn default_config_uses_layout_b_and_full_budget() {
        let config = Config::default();
        assert_eq!(config.layout, StartingLayout::B);
        assert_eq!(config.time_budget, 29);

        let world = World::new(config).expect("world builds");
        let state = query::game_state(&world);
        assert_eq!(state.grid().occupied_count(), 12);
        assert_eq!(state.time_left(), 29);
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
    }

    #[test]
    fn accepted_placement_is_logged_and_charged() {
        let mut world = blank_world(29);

        let events = place(&mut world, "Farm", 0, 5, 5);

        assert_eq!(
            events,
            vec![Event::PiecePlaced {
                piece: piece(&world, "Farm"),
                anchor: CellCoord::new(5, 5),
                time_left: 27,
            }]
        );
        let state = query::game_state(&world);
        assert_eq!(state.time_left(), 27);
        assert_eq!(state.grid().terrain(CellCoord::new(4, 4)), Some(TerrainCategory::Fields));
        assert_eq!(query::log_snapshot(&world).len(), 1);
    }

    #[test]
    fn conflicting_placement_is_rejected_without_logging() {
        let mut world = blank_world(29);
        let _ = place(&mut world, "Anomaly", 0, 3, 3);

        let events = place(&mut world, "Anomaly", 0, 3, 3);

        assert!(matches!(
            events.as_slice(),
            [Event::PlacementRejected {
                reason: RejectionReason::Conflicts(errors),
                ..
            }] if errors.conflict_count() == 1
        ));
        assert_eq!(query::log_snapshot(&world).len(), 1);
    }

    #[test]
    fn unknown_piece_is_rejected() {
        let mut world = blank_world(29);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::PlacePiece {
                piece: PieceId::new(999),
                rotation: 0,
                anchor: CellCoord::new(1, 1),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::PlacementRejected {
                piece: PieceId::new(999),
                anchor: CellCoord::new(1, 1),
                reason: RejectionReason::UnknownPiece,
            }]
        );
    }

    #[test]
    fn exhausting_time_ends_the_game() {
        let mut world = blank_world(2);

        let events = place(&mut world, "Forest huts", 0, 1, 3);

        assert_eq!(events.len(), 2);
        assert_eq!(events[1], Event::TimeExpired { time_left: 0 });
        assert!(query::is_game_over(&world));

        let rejected = place(&mut world, "Anomaly", 0, 8, 8);
        assert!(matches!(
            rejected.as_slice(),
            [Event::PlacementRejected {
                reason: RejectionReason::GameOver,
                ..
            }]
        ));
    }

    #[test]
    fn overspending_drives_time_negative() {
        let mut world = blank_world(1);

        let events = place(&mut world, "Garden", 0, 2, 2);

        assert_eq!(events[1], Event::TimeExpired { time_left: -1 });
        assert_eq!(query::game_state(&world).time_left(), -1);
    }

    #[test]
    fn restart_clears_the_log() {
        let mut world = blank_world(29);
        let offered = query::offered_piece(&world);
        let _ = place(&mut world, "Land", 0, 4, 4);
        let mut events = Vec::new();

        apply(&mut world, Command::Restart, &mut events);

        assert_eq!(events, vec![Event::Restarted]);
        assert!(query::log_snapshot(&world).is_empty());
        assert_eq!(query::game_state(&world).grid().occupied_count(), 0);
        assert_eq!(query::offered_piece(&world), offered);
    }

    #[test]
    fn preview_matches_commit_outcome() {
        let mut world = blank_world(29);
        let _ = place(&mut world, "Anomaly", 0, 4, 4);
        let land = piece(&world, "Land");

        let corner = query::preview(&world, land, 0, CellCoord::new(5, 3)).expect("known piece");
        let centre = query::preview(&world, land, 0, CellCoord::new(5, 5)).expect("known piece");

        assert!(!corner.has_conflicts(), "vacant mask corners may cover terrain");
        assert_eq!(centre.conflicts().collect::<Vec<_>>(), vec![(1, 1)]);
        assert!(query::preview(&world, PieceId::new(500), 0, CellCoord::new(3, 3)).is_none());

        let events = place(&mut world, "Land", 0, 5, 5);
        assert!(matches!(
            events.as_slice(),
            [Event::PlacementRejected {
                reason: RejectionReason::Conflicts(errors),
                ..
            }] if *errors == centre
        ));
    }

    #[test]
    fn snapshot_is_isolated_from_later_placements() {
        let mut world = blank_world(29);
        let _ = place(&mut world, "Anomaly", 0, 0, 0);
        let snapshot = query::log_snapshot(&world);

        let _ = place(&mut world, "Anomaly", 0, 0, 1);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(query::log_snapshot(&world).len(), 2);
    }

    #[test]
    fn from_log_rebuilds_identical_session() {
        let mut world = blank_world(29);
        let _ = place(&mut world, "Fishing village", 1, 10, 0);
        let _ = place(&mut world, "Anomaly", 0, 9, 1);
        let config = *query::config(&world);

        let rebuilt = World::from_log(config, query::log_snapshot(&world).entries().to_vec())
            .expect("log replays");

        assert_eq!(query::game_state(&rebuilt), query::game_state(&world));
        assert_eq!(query::offered_piece(&rebuilt), query::offered_piece(&world));
        assert_eq!(query::score(&rebuilt, &BROKEN_ROAD), query::score(&world, &BROKEN_ROAD));
    }

    #[test]
    fn from_log_rejects_unknown_pieces() {
        let mut world = blank_world(29);
        let _ = place(&mut world, "Anomaly", 0, 0, 0);
        let mut entries = query::log_snapshot(&world).entries().to_vec();
        entries[0].piece = PieceId::new(77);

        let outcome = World::from_log(*query::config(&world), entries);

        assert_eq!(
            outcome.unwrap_err(),
            WorldError::UnknownPiece {
                index: 0,
                piece: PieceId::new(77),
            }
        );
    }

    #[test]
    fn from_log_rejects_entries_after_time_expired() {
        let mut world = blank_world(2);
        let _ = place(&mut world, "Fishing village", 1, 10, 0);
        let mut entries = query::log_snapshot(&world).entries().to_vec();
        for column in [2, 4] {
            let mut extra = entries[0].clone();
            extra.anchor = CellCoord::new(10, column);
            entries.push(extra);
        }

        let outcome = World::from_log(*query::config(&world), entries);

        assert_eq!(
            outcome.unwrap_err(),
            WorldError::PlacedAfterExpiry {
                index: 1,
                time_left: 0,
            }
        );
    }

    #[test]
    fn from_log_rejects_entries_that_disagree_with_catalog() {
        let mut world = blank_world(29);
        let _ = place(&mut world, "Anomaly", 0, 0, 0);
        let config = *query::config(&world);
        let recorded = query::log_snapshot(&world).entries()[0].clone();
        let mismatch = WorldError::PieceMismatch {
            index: 0,
            piece: recorded.piece,
        };

        let mut block = recorded.clone();
        block.anchor = CellCoord::new(4, 4);
        block.category = TerrainCategory::Water;
        block.mask = PieceMask::from_bits(&[&[1, 1, 1], &[1, 1, 1], &[1, 1, 1]])
            .expect("valid mask");
        assert_eq!(World::from_log(config, vec![block]).unwrap_err(), mismatch);

        let mut recoloured = recorded.clone();
        recoloured.category = TerrainCategory::Forest;
        assert_eq!(World::from_log(config, vec![recoloured]).unwrap_err(), mismatch);

        let mut recharged = recorded;
        recharged.time_cost = 5;
        assert_eq!(World::from_log(config, vec![recharged]).unwrap_err(), mismatch);
    }

    #[test]
    fn from_log_accepts_every_rotation() {
        for rotation in 0..4 {
            let mut world = blank_world(29);
            let _ = place(&mut world, "Great river", rotation, 6, 6);
            let entries = query::log_snapshot(&world).entries().to_vec();

            let rebuilt = World::from_log(*query::config(&world), entries).expect("log replays");

            assert_eq!(query::game_state(&rebuilt), query::game_state(&world));
        }
    }

    #[test]
    fn from_log_with_catalog_rebuilds_custom_session() {
        let pond = Piece::new(
            "Pond",
            TerrainCategory::Water,
            PieceMask::from_bits(&[&[1, 1], &[1, 1]]).expect("valid mask"),
            3,
        );
        let catalog = Catalog::from_pieces(vec![pond]).expect("catalog loads");
        let config = Config {
            layout: StartingLayout::Blank,
            ..Config::default()
        };
        let mut world = World::with_catalog(config, catalog.clone()).expect("world builds");
        let _ = place(&mut world, "Pond", 0, 3, 3);
        let entries = query::log_snapshot(&world).entries().to_vec();

        let rebuilt =
            World::from_log_with_catalog(config, catalog, entries).expect("log replays");

        assert_eq!(query::game_state(&rebuilt), query::game_state(&world));
        assert_eq!(query::game_state(&rebuilt).time_left(), 26);
    }

    #[test]
    fn from_log_rejects_overlapping_entries() {
        let mut world = blank_world(29);
        let _ = place(&mut world, "Anomaly", 0, 0, 0);
        let mut entries = query::log_snapshot(&world).entries().to_vec();
        entries.push(entries[0].clone());

        let outcome = World::from_log(*query::config(&world), entries);

        assert_eq!(
            outcome.unwrap_err(),
            WorldError::Invariant(InvariantViolation::CorruptedLog {
                index: 1,
                conflicts: 1,
            })
        );
    }
}
