//! Stage sequencer
//!
//! InProgress -> Completed -> AwaitingAdvance -> (advance) -> InProgress.
//! Every reset path clears pending timers and bumps the epoch so nothing
//! scheduled for the previous stage can touch the new one.

use super::geometry::Surface;
use super::layout::generate_piece_positions;
use super::state::{DragState, EventSink, PiecePair, PuzzleEvent, PuzzleState, StagePhase};

/// Lay out the pieces if that has not happened yet for this stage.
///
/// This is the deferred-placement hook: call it whenever the surface may
/// have become measurable (first frame, resize). Returns true if placement
/// ran.
pub fn ensure_placed(
    state: &mut PuzzleState,
    surface: Option<Surface>,
    events: &mut impl EventSink,
) -> bool {
    if state.placed {
        return false;
    }
    let Some(surface) = surface.filter(|s| s.width > 0.0 && s.height > 0.0) else {
        return false;
    };

    let placement = generate_piece_positions(surface, &state.settings, &mut state.rng, None);
    state.pieces = placement.pieces;
    state.placed = true;

    log::info!(
        "Stage {} ({}) placed on {}x{} ({:?})",
        state.stage_index + 1,
        state.character().name,
        surface.width,
        surface.height,
        placement.kind
    );
    events.emit(PuzzleEvent::StageStarted {
        stage: state.stage_index,
    });
    true
}

/// Mark the stage finished after the second snap
pub(crate) fn complete_stage(state: &mut PuzzleState, now_ms: f64, events: &mut impl EventSink) {
    if state.phase != StagePhase::InProgress {
        return;
    }
    let popup_at = now_ms + state.settings.popup_delay_ms;
    state.phase = StagePhase::Completed;
    state.celebrating = true;
    state.timers.popup_at = Some(popup_at);

    log::info!("Stage {} complete", state.stage_index + 1);
    events.emit(PuzzleEvent::Success);
    events.emit(PuzzleEvent::Celebration { epoch: state.epoch });
    events.emit(PuzzleEvent::StageCompleted {
        stage: state.stage_index,
        popup_at,
    });
}

fn restart_at(
    state: &mut PuzzleState,
    stage_index: usize,
    surface: Option<Surface>,
    events: &mut impl EventSink,
) {
    state.stage_index = stage_index;
    state.phase = StagePhase::InProgress;
    state.celebrating = false;
    state.drag = DragState::Idle;
    state.timers.clear();
    state.epoch = state.epoch.wrapping_add(1);
    state.pieces = PiecePair::placeholder();
    state.placed = false;

    ensure_placed(state, surface, events);
}

/// Move to the next character, wrapping to the first after the last
pub fn advance_stage(
    state: &mut PuzzleState,
    surface: Option<Surface>,
    events: &mut impl EventSink,
) {
    let next = if state.is_last_stage() {
        0
    } else {
        state.stage_index + 1
    };
    restart_at(state, next, surface, events);
}

/// Start the current character over with freshly placed pieces
pub fn reset_stage(state: &mut PuzzleState, surface: Option<Surface>, events: &mut impl EventSink) {
    let stage = state.stage_index;
    restart_at(state, stage, surface, events);
}

/// Celebration overlay reports its display cycle is over.
///
/// Returns false if the signal belongs to an earlier stage or the overlay
/// was already cleared.
pub fn finish_celebration(state: &mut PuzzleState, epoch: u32) -> bool {
    if epoch != state.epoch || !state.celebrating {
        return false;
    }
    state.celebrating = false;
    true
}

/// Pointer went down on the background; the menu opens if it is held
pub fn press_started(state: &mut PuzzleState, now_ms: f64) {
    if state.menu_open {
        return;
    }
    state.timers.long_press_at = Some(now_ms + state.settings.long_press_ms);
}

/// Pointer released or left before the long press fired
pub fn press_released(state: &mut PuzzleState) {
    state.timers.long_press_at = None;
}

pub fn close_menu(state: &mut PuzzleState) {
    state.menu_open = false;
}

/// Menu "start over" action
pub fn restart_from_menu(
    state: &mut PuzzleState,
    surface: Option<Surface>,
    events: &mut impl EventSink,
) {
    reset_stage(state, surface, events);
    close_menu(state);
}
