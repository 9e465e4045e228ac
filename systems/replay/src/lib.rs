#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Append-only move log and the replay fold that derives game state from it.
//!
//! The log is the only record of progress. Board and time budget are never
//! stored; [`derive_state`] recomputes them from the starting grid on every
//! read, so replaying the same log always yields the same state.

use std::sync::Arc;

use cartography_core::{GameState, Grid, InvariantViolation, LogEntry};
use cartography_system_placement::apply_attempt;
use tracing::trace;

/// Append-only sequence of accepted placements.
///
/// Cloning a log is cheap and yields a snapshot: later appends to the
/// original copy the entries instead of disturbing readers of the snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveLog {
    entries: Arc<Vec<LogEntry>>,
}

impl MoveLog {
    /// Creates an empty move log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps previously recorded entries. Entries are not validated until replay.
    #[must_use]
    pub fn from_entries(entries: Vec<LogEntry>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Appends an accepted placement to the end of the log.
    pub fn append(&mut self, entry: LogEntry) {
        Arc::make_mut(&mut self.entries).push(entry);
    }

    /// Truncates the log to empty, which resets the derived game.
    pub fn clear(&mut self) {
        self.entries = Arc::new(Vec::new());
    }

    /// Recorded entries in the order they were accepted.
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// The first `len` entries, or the whole log when it is shorter.
    #[must_use]
    pub fn prefix(&self, len: usize) -> &[LogEntry] {
        &self.entries[..len.min(self.entries.len())]
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no placement has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Folds the log over the starting grid and time budget.
///
/// Each entry is merged with the placement applier and its time cost is
/// subtracted; the budget is never clamped. An entry that no longer fits
/// means it was appended without validation and is reported as
/// [`InvariantViolation::CorruptedLog`].
pub fn derive_state(
    log: &[LogEntry],
    start_grid: &Grid,
    start_time: i32,
) -> Result<GameState, InvariantViolation> {
    trace!(entries = log.len(), start_time, "replaying move log");

    let mut grid = start_grid.clone();
    let mut time_left = start_time;
    for (index, entry) in log.iter().enumerate() {
        grid = apply_attempt(&entry.attempt(), &grid).map_err(|rejected| {
            InvariantViolation::CorruptedLog {
                index,
                conflicts: rejected.errors.conflict_count(),
            }
        })?;
        time_left = time_left.saturating_sub(i32::try_from(entry.time_cost).unwrap_or(i32::MAX));
    }

    Ok(GameState::new(grid, time_left))
}
