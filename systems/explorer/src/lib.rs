#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure exploration system that turns drag gestures into placement commands.

use cartography_core::{CellCoord, Command, ErrorMatrix, Event, PieceId};

/// Live feedback for the piece currently being dragged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplorationPreview {
    /// Catalog entry being dragged.
    pub piece: PieceId,
    /// Quarter turns applied to the piece's mask.
    pub rotation: i32,
    /// Cell under the bottom-right corner of the rotated mask.
    pub anchor: CellCoord,
    /// Conflicting mask cells at the current anchor.
    pub errors: ErrorMatrix,
}

impl ExplorationPreview {
    /// Creates a new preview descriptor.
    #[must_use]
    pub const fn new(
        piece: PieceId,
        rotation: i32,
        anchor: CellCoord,
        errors: ErrorMatrix,
    ) -> Self {
        Self {
            piece,
            rotation,
            anchor,
            errors,
        }
    }

    /// Reports whether dropping the piece here would be accepted.
    #[must_use]
    pub fn placeable(&self) -> bool {
        !self.errors.has_conflicts()
    }
}

/// Drag state sampled once per tick by the gesture adapter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DragInput {
    /// Snapped anchor cell, or `None` while the pointer is off the map.
    pub anchor: Option<CellCoord>,
    /// Quarter turns requested by the player.
    pub rotation: i32,
    /// Set on the tick the piece is dropped.
    pub release: bool,
}

impl DragInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(anchor: Option<CellCoord>, rotation: i32, release: bool) -> Self {
        Self {
            anchor,
            rotation,
            release,
        }
    }
}

/// Exploration system that translates preview + drag input into commands.
///
/// Drops are ignored once the time budget has expired until the session is
/// restarted.
#[derive(Debug, Clone)]
pub struct Explorer {
    accepting: bool,
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new()
    }
}

impl Explorer {
    /// Creates a new exploration system that accepts drops.
    #[must_use]
    pub const fn new() -> Self {
        Self { accepting: true }
    }

    /// Reports whether drops currently produce commands.
    #[must_use]
    pub const fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// Consumes world events and drag input to emit placement commands.
    ///
    /// A command is emitted only on release, when the preview matches the
    /// dragged anchor and rotation and has no conflicts.
    pub fn handle(
        &mut self,
        events: &[Event],
        preview: Option<&ExplorationPreview>,
        input: DragInput,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::TimeExpired { .. } => self.accepting = false,
                Event::Restarted => self.accepting = true,
                Event::PiecePlaced { .. } | Event::PlacementRejected { .. } => {}
            }
        }

        if !self.accepting || !input.release {
            return;
        }

        let Some(preview) = preview else {
            return;
        };
        if input.anchor != Some(preview.anchor) || input.rotation != preview.rotation {
            return;
        }

        if preview.placeable() {
            out.push(Command::PlacePiece {
                piece: preview.piece,
                rotation: preview.rotation,
                anchor: preview.anchor,
            });
        }
    }
}
