use cartography_core::{CellCoord, Command, ErrorMatrix, Event, PieceId};
use cartography_system_explorer::{DragInput, ExplorationPreview, Explorer};

fn preview_at(anchor: CellCoord, rotation: i32, conflicts: usize) -> ExplorationPreview {
    let mut remaining = conflicts;
    let errors = ErrorMatrix::from_fn(2, 2, |_, _| {
        let flagged = remaining > 0;
        remaining = remaining.saturating_sub(1);
        flagged
    });
    ExplorationPreview::new(PieceId::new(3), rotation, anchor, errors)
}

fn drop_at(anchor: CellCoord, rotation: i32) -> DragInput {
    DragInput::new(Some(anchor), rotation, true)
}

#[test]
fn release_emits_place_command_for_clear_preview() {
    let mut explorer = Explorer::default();
    let mut commands = Vec::new();
    let anchor = CellCoord::new(4, 6);

    explorer.handle(
        &[],
        Some(&preview_at(anchor, 1, 0)),
        drop_at(anchor, 1),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::PlacePiece {
            piece: PieceId::new(3),
            rotation: 1,
            anchor,
        }],
        "dropping on a clear preview should request placement",
    );
}

#[test]
fn release_ignored_when_preview_has_conflicts() {
    let mut explorer = Explorer::default();
    let mut commands = Vec::new();
    let anchor = CellCoord::new(0, 0);

    explorer.handle(
        &[],
        Some(&preview_at(anchor, 0, 2)),
        drop_at(anchor, 0),
        &mut commands,
    );

    assert!(commands.is_empty(), "conflicting preview must not emit commands");
}

#[test]
fn dragging_without_release_emits_nothing() {
    let mut explorer = Explorer::default();
    let mut commands = Vec::new();
    let anchor = CellCoord::new(2, 2);

    explorer.handle(
        &[],
        Some(&preview_at(anchor, 0, 0)),
        DragInput::new(Some(anchor), 0, false),
        &mut commands,
    );

    assert!(commands.is_empty());
}

#[test]
fn stale_preview_is_not_committed() {
    let mut explorer = Explorer::default();
    let mut commands = Vec::new();
    let preview = preview_at(CellCoord::new(2, 2), 0, 0);

    explorer.handle(&[], Some(&preview), drop_at(CellCoord::new(3, 2), 0), &mut commands);
    explorer.handle(&[], Some(&preview), drop_at(CellCoord::new(2, 2), 1), &mut commands);
    explorer.handle(
        &[],
        Some(&preview),
        DragInput::new(None, 0, true),
        &mut commands,
    );
    explorer.handle(&[], None, drop_at(CellCoord::new(2, 2), 0), &mut commands);

    assert!(
        commands.is_empty(),
        "drops must match the previewed anchor and rotation"
    );
}

#[test]
fn expired_time_blocks_drops_until_restart() {
    let mut explorer = Explorer::new();
    let mut commands = Vec::new();
    let anchor = CellCoord::new(5, 5);
    let preview = preview_at(anchor, 0, 0);

    explorer.handle(
        &[Event::TimeExpired { time_left: 0 }],
        Some(&preview),
        drop_at(anchor, 0),
        &mut commands,
    );
    assert!(commands.is_empty(), "game over must suppress placement");
    assert!(!explorer.is_accepting());

    explorer.handle(&[Event::Restarted], Some(&preview), drop_at(anchor, 0), &mut commands);
    assert_eq!(commands.len(), 1, "restart should re-enable drops");
    assert!(explorer.is_accepting());
}

#[test]
fn restart_followed_by_expiry_in_one_batch_stays_blocked() {
    let mut explorer = Explorer::new();
    let mut commands = Vec::new();
    let anchor = CellCoord::new(1, 1);

    explorer.handle(
        &[Event::Restarted, Event::TimeExpired { time_left: -2 }],
        Some(&preview_at(anchor, 0, 0)),
        drop_at(anchor, 0),
        &mut commands,
    );

    assert!(commands.is_empty(), "events are applied in order");
}
