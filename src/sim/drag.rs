//! Drag controller
//!
//! Idle -> Dragging(piece) -> Idle. Every call made in the wrong state is a
//! silent no-op; nothing here reports errors.

use glam::Vec2;

use super::geometry::Surface;
use super::layout::{generate_piece_positions, slot_for};
use super::stage::complete_stage;
use super::state::{DragState, EventSink, PieceId, PieceState, PuzzleEvent, PuzzleState};
use crate::distance;

/// What a release did with the held piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Locked into its slot
    Snapped,
    /// Locked into its slot and finished the stage
    Completed,
    /// Missed on the answer side; sent back to a fresh staging spot
    Returned,
    /// Missed on the staging side; left where it was dropped
    DroppedInPlace,
}

/// Pick up a piece. Returns true if a drag started.
///
/// Refused while another drag is active, before pieces are placed, once the
/// stage is completed, while the menu is open, or for a snapped piece.
pub fn begin_drag(
    state: &mut PuzzleState,
    piece: PieceId,
    pointer: Vec2,
    events: &mut impl EventSink,
) -> bool {
    if !state.placed || state.completed() || state.menu_open || state.dragging().is_some() {
        return false;
    }
    let current = state.pieces.get(piece);
    if current.snapped {
        return false;
    }

    state.drag = DragState::Dragging {
        piece,
        offset: pointer - current.pos,
    };
    events.emit(PuzzleEvent::Pickup(piece));
    true
}

/// Follow the pointer. Last value wins.
pub fn update_drag(state: &mut PuzzleState, pointer: Vec2) {
    if let DragState::Dragging { piece, offset } = state.drag {
        state.pieces.get_mut(piece).pos = pointer - offset;
    }
}

/// Release the held piece and decide snap / return / stay.
///
/// `surface` is measured at release time so the target follows resizes.
/// Returns `None` if nothing was being dragged.
pub fn end_drag(
    state: &mut PuzzleState,
    surface: Option<Surface>,
    now_ms: f64,
    events: &mut impl EventSink,
) -> Option<DropOutcome> {
    let DragState::Dragging { piece, .. } = state.drag else {
        return None;
    };
    state.drag = DragState::Idle;

    let Some(surface) = surface else {
        return Some(DropOutcome::DroppedInPlace);
    };

    let slot = slot_for(piece, surface, &state.settings);
    let dropped = state.pieces.get(piece).pos;
    let dist = distance(dropped, slot);

    if dist < state.settings.snap_threshold {
        *state.pieces.get_mut(piece) = PieceState {
            pos: slot,
            snapped: true,
        };
        log::debug!("{} piece snapped (distance {:.1})", piece.as_str(), dist);
        events.emit(PuzzleEvent::Snap(piece));

        if state.pieces.both_snapped() {
            complete_stage(state, now_ms, events);
            return Some(DropOutcome::Completed);
        }
        return Some(DropOutcome::Snapped);
    }

    if dropped.x < surface.midline() {
        let sibling = *state.pieces.get(piece.other());
        let avoid = (!sibling.snapped).then_some(sibling);
        let placement =
            generate_piece_positions(surface, &state.settings, &mut state.rng, avoid.as_ref());
        *state.pieces.get_mut(piece) = *placement.pieces.get(piece);
        log::debug!(
            "{} piece missed by {:.1}, returned to staging ({:?})",
            piece.as_str(),
            dist,
            placement.kind
        );
        events.emit(PuzzleEvent::PieceReturned(piece));
        return Some(DropOutcome::Returned);
    }

    Some(DropOutcome::DroppedInPlace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::layout::staging_region;
    use crate::sim::stage::ensure_placed;
    use crate::sim::state::StagePhase;
    use crate::{Roster, Settings};

    fn surface() -> Surface {
        Surface::new(800.0, 600.0)
    }

    fn placed_state() -> (PuzzleState, Vec<PuzzleEvent>) {
        let mut state = PuzzleState::new(Settings::default(), Roster::default(), 12345);
        let mut events = Vec::new();
        assert!(ensure_placed(&mut state, Some(surface()), &mut events));
        events.clear();
        (state, events)
    }

    /// Grab a piece by its top-left corner and drop it at `at`
    fn drop_at(
        state: &mut PuzzleState,
        piece: PieceId,
        at: Vec2,
        now_ms: f64,
        events: &mut Vec<PuzzleEvent>,
    ) -> Option<DropOutcome> {
        let grab = state.pieces.get(piece).pos;
        assert!(begin_drag(state, piece, grab, events));
        update_drag(state, at);
        end_drag(state, Some(surface()), now_ms, events)
    }

    #[test]
    fn test_pointer_offset_preserved() {
        let (mut state, mut events) = placed_state();
        let start = state.pieces.top.pos;
        let grab = start + Vec2::new(30.0, 40.0);
        assert!(begin_drag(&mut state, PieceId::Top, grab, &mut events));
        assert_eq!(state.dragging(), Some(PieceId::Top));
        assert_eq!(events, vec![PuzzleEvent::Pickup(PieceId::Top)]);

        update_drag(&mut state, grab + Vec2::new(-100.0, 5.0));
        assert_eq!(state.pieces.top.pos, start + Vec2::new(-100.0, 5.0));
        // Bottom untouched
        let bottom = state.pieces.bottom;
        update_drag(&mut state, grab);
        assert_eq!(state.pieces.bottom, bottom);
    }

    #[test]
    fn test_two_snaps_complete_stage() {
        let (mut state, mut events) = placed_state();
        let s = surface();
        let top_slot = slot_for(PieceId::Top, s, &state.settings);
        let bottom_slot = slot_for(PieceId::Bottom, s, &state.settings);

        let outcome = drop_at(&mut state, PieceId::Top, top_slot, 1000.0, &mut events);
        assert_eq!(outcome, Some(DropOutcome::Snapped));
        assert!(state.pieces.top.snapped);
        assert_eq!(state.pieces.top.pos, Vec2::new(75.0, 62.5));
        assert!(!state.completed());

        // 50 units below the bottom slot
        let outcome = drop_at(
            &mut state,
            PieceId::Bottom,
            bottom_slot + Vec2::new(0.0, 50.0),
            2000.0,
            &mut events,
        );
        assert_eq!(outcome, Some(DropOutcome::Completed));
        assert!(state.pieces.bottom.snapped);
        assert_eq!(state.pieces.bottom.pos, Vec2::new(75.0, 300.0));
        assert_eq!(state.phase, StagePhase::Completed);
        assert!(state.celebrating);
        assert_eq!(state.timers.popup_at, Some(5000.0));

        assert_eq!(
            events,
            vec![
                PuzzleEvent::Pickup(PieceId::Top),
                PuzzleEvent::Snap(PieceId::Top),
                PuzzleEvent::Pickup(PieceId::Bottom),
                PuzzleEvent::Snap(PieceId::Bottom),
                PuzzleEvent::Success,
                PuzzleEvent::Celebration { epoch: 0 },
                PuzzleEvent::StageCompleted {
                    stage: 0,
                    popup_at: 5000.0
                },
            ]
        );
    }

    #[test]
    fn test_snap_is_exact_near_threshold() {
        let (mut state, mut events) = placed_state();
        let slot = slot_for(PieceId::Top, surface(), &state.settings);
        let outcome = drop_at(
            &mut state,
            PieceId::Top,
            slot + Vec2::new(119.0, 0.0),
            0.0,
            &mut events,
        );
        assert_eq!(outcome, Some(DropOutcome::Snapped));
        assert_eq!(state.pieces.top.pos, slot);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let (mut state, mut events) = placed_state();
        let slot = slot_for(PieceId::Top, surface(), &state.settings);
        // Exactly 120 away, still on the answer side
        let outcome = drop_at(
            &mut state,
            PieceId::Top,
            slot + Vec2::new(0.0, 120.0),
            0.0,
            &mut events,
        );
        assert_eq!(outcome, Some(DropOutcome::Returned));
        assert!(!state.pieces.top.snapped);
    }

    #[test]
    fn test_far_drop_on_answer_side_returns_to_staging() {
        let (mut state, mut events) = placed_state();
        let slot = slot_for(PieceId::Top, surface(), &state.settings);
        let outcome = drop_at(
            &mut state,
            PieceId::Top,
            slot + Vec2::new(0.0, 200.0),
            0.0,
            &mut events,
        );
        assert_eq!(outcome, Some(DropOutcome::Returned));
        let top = state.pieces.top;
        assert!(!top.snapped);
        assert!(top.pos.x >= surface().midline());
        let region = staging_region(surface(), &state.settings);
        assert!(region.contains_rect(&top.footprint(&state.settings)));
        assert_eq!(events.last(), Some(&PuzzleEvent::PieceReturned(PieceId::Top)));
        assert_eq!(state.dragging(), None);
    }

    #[test]
    fn test_far_drop_on_staging_side_stays_put() {
        let (mut state, mut events) = placed_state();
        let at = Vec2::new(420.0, 62.5);
        let outcome = drop_at(&mut state, PieceId::Top, at, 0.0, &mut events);
        assert_eq!(outcome, Some(DropOutcome::DroppedInPlace));
        assert_eq!(state.pieces.top.pos, at);
        assert!(!state.pieces.top.snapped);
    }

    #[test]
    fn test_snapped_piece_cannot_be_picked_up() {
        let (mut state, mut events) = placed_state();
        let slot = slot_for(PieceId::Top, surface(), &state.settings);
        drop_at(&mut state, PieceId::Top, slot, 0.0, &mut events);
        events.clear();

        assert!(!begin_drag(&mut state, PieceId::Top, slot, &mut events));
        assert!(events.is_empty());
        update_drag(&mut state, Vec2::new(600.0, 300.0));
        assert_eq!(state.pieces.top.pos, slot);
    }

    #[test]
    fn test_completed_stage_refuses_drags() {
        let (mut state, mut events) = placed_state();
        let s = surface();
        let top_slot = slot_for(PieceId::Top, s, &state.settings);
        let bottom_slot = slot_for(PieceId::Bottom, s, &state.settings);
        drop_at(&mut state, PieceId::Top, top_slot, 0.0, &mut events);
        drop_at(&mut state, PieceId::Bottom, bottom_slot, 0.0, &mut events);
        assert!(state.completed());
        events.clear();

        for piece in PieceId::ALL {
            assert!(!begin_drag(&mut state, piece, Vec2::ZERO, &mut events));
        }
        assert_eq!(end_drag(&mut state, Some(s), 0.0, &mut events), None);
        assert!(events.is_empty());
    }

    #[test]
    fn test_single_drag_at_a_time() {
        let (mut state, mut events) = placed_state();
        let top = state.pieces.top.pos;
        let bottom = state.pieces.bottom.pos;
        assert!(begin_drag(&mut state, PieceId::Top, top, &mut events));
        assert!(!begin_drag(&mut state, PieceId::Bottom, bottom, &mut events));
        assert_eq!(state.dragging(), Some(PieceId::Top));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_idle_calls_are_noops() {
        let (mut state, mut events) = placed_state();
        let before = state.pieces;
        update_drag(&mut state, Vec2::new(10.0, 10.0));
        assert_eq!(state.pieces, before);
        assert_eq!(end_drag(&mut state, Some(surface()), 0.0, &mut events), None);
        assert!(events.is_empty());
    }

    #[test]
    fn test_unplaced_state_refuses_drag() {
        let mut state = PuzzleState::new(Settings::default(), Roster::default(), 1);
        let mut events = Vec::new();
        assert!(!begin_drag(&mut state, PieceId::Top, Vec2::ZERO, &mut events));
        assert!(events.is_empty());
    }

    #[test]
    fn test_unmeasurable_surface_drops_in_place() {
        let (mut state, mut events) = placed_state();
        let top = state.pieces.top.pos;
        assert!(begin_drag(&mut state, PieceId::Top, top, &mut events));
        update_drag(&mut state, Vec2::new(75.0, 62.5));
        assert_eq!(
            end_drag(&mut state, None, 0.0, &mut events),
            Some(DropOutcome::DroppedInPlace)
        );
        assert!(!state.pieces.top.snapped);
        assert_eq!(state.pieces.top.pos, Vec2::new(75.0, 62.5));
    }
}
