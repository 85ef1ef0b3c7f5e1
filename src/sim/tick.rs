//! Timer driver
//!
//! The shell calls `tick` every frame with its clock. Deadlines live in
//! `PuzzleState::timers`, so clearing them on reset is all it takes to
//! cancel a pending callback.

use super::state::{DragState, EventSink, PuzzleEvent, PuzzleState, StagePhase};

/// Fire every deadline at or before `now_ms`
pub fn tick(state: &mut PuzzleState, now_ms: f64, events: &mut impl EventSink) {
    if let Some(at) = state.timers.popup_at
        && now_ms >= at
    {
        state.timers.popup_at = None;
        if state.phase == StagePhase::Completed {
            state.phase = StagePhase::AwaitingAdvance;
            log::info!("Showing next-stage popup for stage {}", state.stage_index + 1);
            events.emit(PuzzleEvent::PopupShown {
                stage: state.stage_index,
            });
        }
    }

    if let Some(at) = state.timers.long_press_at
        && now_ms >= at
    {
        state.timers.long_press_at = None;
        if !state.menu_open {
            state.menu_open = true;
            events.emit(PuzzleEvent::MenuOpened);
        }
    }
}

/// Component teardown: cancel every timer and drop any held piece
pub fn teardown(state: &mut PuzzleState) {
    state.timers.clear();
    state.drag = DragState::Idle;
    state.celebrating = false;
}

/// Page restored after a teardown: a finished stage gets its popup back
pub fn resume(state: &mut PuzzleState, now_ms: f64) {
    if state.phase == StagePhase::Completed && state.timers.popup_at.is_none() {
        log::debug!("Re-arming popup for stage {}", state.stage_index + 1);
        state.timers.popup_at = Some(now_ms + state.settings.popup_delay_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Surface;
    use crate::sim::stage::{
        advance_stage, complete_stage, ensure_placed, press_started, reset_stage,
    };
    use crate::{Roster, Settings};

    fn completed_state(now_ms: f64) -> (PuzzleState, Vec<PuzzleEvent>) {
        let mut state = PuzzleState::new(Settings::default(), Roster::default(), 99);
        let mut events = Vec::new();
        ensure_placed(&mut state, Some(Surface::new(1024.0, 768.0)), &mut events);
        complete_stage(&mut state, now_ms, &mut events);
        events.clear();
        (state, events)
    }

    #[test]
    fn test_popup_after_delay() {
        let (mut state, mut events) = completed_state(1000.0);

        tick(&mut state, 3999.0, &mut events);
        assert_eq!(state.phase, StagePhase::Completed);
        assert!(events.is_empty());

        tick(&mut state, 4000.0, &mut events);
        assert!(state.popup_visible());
        assert_eq!(events, vec![PuzzleEvent::PopupShown { stage: 0 }]);

        // Fires once
        tick(&mut state, 9000.0, &mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_reset_suppresses_pending_popup() {
        let (mut state, mut events) = completed_state(0.0);
        reset_stage(&mut state, Some(Surface::new(1024.0, 768.0)), &mut events);
        events.clear();

        tick(&mut state, 10_000.0, &mut events);
        assert_eq!(state.phase, StagePhase::InProgress);
        assert!(!state.popup_visible());
        assert!(events.is_empty());
    }

    #[test]
    fn test_long_press_opens_menu() {
        let mut state = PuzzleState::new(Settings::default(), Roster::default(), 1);
        let mut events = Vec::new();
        press_started(&mut state, 0.0);
        tick(&mut state, 799.0, &mut events);
        assert!(!state.menu_open);
        tick(&mut state, 800.0, &mut events);
        assert!(state.menu_open);
        assert_eq!(events, vec![PuzzleEvent::MenuOpened]);
    }

    #[test]
    fn test_teardown_cancels_everything() {
        let (mut state, mut events) = completed_state(0.0);
        press_started(&mut state, 0.0);
        teardown(&mut state);
        tick(&mut state, 1e9, &mut events);
        assert!(events.is_empty());
        assert!(!state.menu_open);
        assert_eq!(state.phase, StagePhase::Completed);
        assert!(!state.celebrating);
    }

    #[test]
    fn test_resume_after_teardown_shows_popup() {
        let surface = Some(Surface::new(1024.0, 768.0));
        let (mut state, mut events) = completed_state(0.0);
        teardown(&mut state);

        resume(&mut state, 50_000.0);
        ensure_placed(&mut state, surface, &mut events);
        tick(&mut state, 52_999.0, &mut events);
        assert!(!state.popup_visible());
        tick(&mut state, 53_000.0, &mut events);
        assert!(state.popup_visible());

        advance_stage(&mut state, surface, &mut events);
        assert_eq!(state.stage_index, 1);
        assert_eq!(state.phase, StagePhase::InProgress);
    }

    #[test]
    fn test_resume_leaves_live_stage_alone() {
        let mut state = PuzzleState::new(Settings::default(), Roster::default(), 4);
        resume(&mut state, 0.0);
        assert_eq!(state.timers.popup_at, None);

        // A pending popup keeps its original deadline
        let (mut state, _) = completed_state(1000.0);
        resume(&mut state, 2000.0);
        assert_eq!(state.timers.popup_at, Some(4000.0));
    }
}
