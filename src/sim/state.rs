//! Puzzle state and core types
//!
//! `PuzzleState` is the single owned record the shell holds. Everything the
//! drag controller, stage sequencer and timer driver touch lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::roster::{Character, Roster};
use crate::settings::Settings;

/// Which half of the character a piece shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceId {
    Top,
    Bottom,
}

impl PieceId {
    pub const ALL: [PieceId; 2] = [PieceId::Top, PieceId::Bottom];

    /// The sibling piece
    pub fn other(self) -> Self {
        match self {
            PieceId::Top => PieceId::Bottom,
            PieceId::Bottom => PieceId::Top,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceId::Top => "top",
            PieceId::Bottom => "bottom",
        }
    }
}

/// One loose piece
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PieceState {
    /// Top-left corner in surface coordinates
    pub pos: Vec2,
    /// Locked into its slot; never moves again until the stage resets
    pub snapped: bool,
}

impl PieceState {
    pub fn loose(pos: Vec2) -> Self {
        Self { pos, snapped: false }
    }

    /// Bounding box of the piece (full image width, half image height)
    pub fn footprint(&self, settings: &Settings) -> Rect {
        piece_footprint(self.pos, settings)
    }
}

/// Bounding box of a piece whose top-left corner is `pos`
pub fn piece_footprint(pos: Vec2, settings: &Settings) -> Rect {
    Rect::new(pos, Vec2::new(settings.image_width, settings.piece_height()))
}

/// The top/bottom pair, always replaced together on placement
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PiecePair {
    pub top: PieceState,
    pub bottom: PieceState,
}

impl PiecePair {
    /// Zero-position stand-in used until the surface can be measured
    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn get(&self, id: PieceId) -> &PieceState {
        match id {
            PieceId::Top => &self.top,
            PieceId::Bottom => &self.bottom,
        }
    }

    pub fn get_mut(&mut self, id: PieceId) -> &mut PieceState {
        match id {
            PieceId::Top => &mut self.top,
            PieceId::Bottom => &mut self.bottom,
        }
    }

    pub fn both_snapped(&self) -> bool {
        self.top.snapped && self.bottom.snapped
    }
}

/// Drag controller state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// `offset` = pointer - piece position at pickup
    Dragging { piece: PieceId, offset: Vec2 },
}

/// Stage sequencer phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StagePhase {
    /// Pieces still loose
    #[default]
    InProgress,
    /// Both pieces snapped, popup pending
    Completed,
    /// Next-stage popup visible
    AwaitingAdvance,
}

/// Progress indicator state for one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageMarker {
    Done,
    Current,
    Pending,
}

/// Pending deadlines (ms, same clock as `tick`)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Timers {
    /// Next-stage popup becomes visible at this time
    pub popup_at: Option<f64>,
    /// Menu opens at this time unless the press is released first
    pub long_press_at: Option<f64>,
}

impl Timers {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Side effects the core asks its collaborators to perform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PuzzleEvent {
    /// A piece was picked up
    Pickup(PieceId),
    /// A piece locked into its slot
    Snap(PieceId),
    /// Second piece snapped
    Success,
    /// Start the celebration overlay (its cycle belongs to `epoch`)
    Celebration { epoch: u32 },
    /// Stage finished; popup scheduled for `popup_at`
    StageCompleted { stage: usize, popup_at: f64 },
    /// Next-stage popup is now visible
    PopupShown { stage: usize },
    /// A missed drop on the answer side sent the piece back to staging
    PieceReturned(PieceId),
    /// Fresh pieces placed for a stage
    StageStarted { stage: usize },
    /// Long-press menu opened
    MenuOpened,
}

/// Receiver for core side effects
pub trait EventSink {
    fn emit(&mut self, event: PuzzleEvent);
}

impl EventSink for Vec<PuzzleEvent> {
    fn emit(&mut self, event: PuzzleEvent) {
        self.push(event);
    }
}

/// Complete puzzle state
#[derive(Debug, Clone)]
pub struct PuzzleState {
    pub settings: Settings,
    pub roster: Roster,
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Active character, in `[0, roster.len())`
    pub stage_index: usize,
    pub phase: StagePhase,
    pub pieces: PiecePair,
    pub drag: DragState,
    /// False until pieces have been laid out against a measured surface
    pub placed: bool,
    /// Celebration overlay visible
    pub celebrating: bool,
    /// Long-press menu visible
    pub menu_open: bool,
    pub timers: Timers,
    /// Bumped on every stage reset so stale callbacks can be recognised
    pub epoch: u32,
}

impl PuzzleState {
    /// Create a fresh state at stage 0; pieces stay placeholders until
    /// [`super::stage::ensure_placed`] sees a measurable surface.
    pub fn new(settings: Settings, roster: Roster, seed: u64) -> Self {
        Self {
            settings,
            roster,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            stage_index: 0,
            phase: StagePhase::InProgress,
            pieces: PiecePair::placeholder(),
            drag: DragState::Idle,
            placed: false,
            celebrating: false,
            menu_open: false,
            timers: Timers::default(),
            epoch: 0,
        }
    }

    /// Both pieces snapped for the current stage
    pub fn completed(&self) -> bool {
        self.phase != StagePhase::InProgress
    }

    pub fn popup_visible(&self) -> bool {
        self.phase == StagePhase::AwaitingAdvance
    }

    pub fn character(&self) -> &Character {
        self.roster.get(self.stage_index)
    }

    /// Piece currently held, if any
    pub fn dragging(&self) -> Option<PieceId> {
        match self.drag {
            DragState::Dragging { piece, .. } => Some(piece),
            DragState::Idle => None,
        }
    }

    pub fn is_last_stage(&self) -> bool {
        self.stage_index + 1 >= self.roster.len()
    }

    /// Progress-dot state for stage `index`
    pub fn stage_marker(&self, index: usize) -> StageMarker {
        use std::cmp::Ordering;
        match index.cmp(&self.stage_index) {
            Ordering::Less => StageMarker::Done,
            Ordering::Equal => StageMarker::Current,
            Ordering::Greater => StageMarker::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_unplaced() {
        let state = PuzzleState::new(Settings::default(), Roster::default(), 1);
        assert!(!state.placed);
        assert_eq!(state.pieces, PiecePair::placeholder());
        assert_eq!(state.stage_index, 0);
        assert!(!state.completed());
        assert_eq!(state.dragging(), None);
    }

    #[test]
    fn test_stage_markers() {
        let mut state = PuzzleState::new(Settings::default(), Roster::default(), 1);
        state.stage_index = 3;
        assert_eq!(state.stage_marker(2), StageMarker::Done);
        assert_eq!(state.stage_marker(3), StageMarker::Current);
        assert_eq!(state.stage_marker(4), StageMarker::Pending);
        assert!(!state.is_last_stage());
        state.stage_index = 9;
        assert!(state.is_last_stage());
    }

    #[test]
    fn test_piece_pair_access() {
        let mut pair = PiecePair::placeholder();
        pair.get_mut(PieceId::Bottom).snapped = true;
        assert!(pair.get(PieceId::Bottom).snapped);
        assert!(!pair.both_snapped());
        pair.top.snapped = true;
        assert!(pair.both_snapped());
        assert_eq!(PieceId::Top.other(), PieceId::Bottom);
    }

    #[test]
    fn test_footprint_is_half_image() {
        let piece = PieceState::loose(Vec2::new(10.0, 20.0));
        let rect = piece.footprint(&Settings::default());
        assert_eq!(rect.size, Vec2::new(250.0, 237.5));
        assert_eq!(rect.pos, Vec2::new(10.0, 20.0));
    }
}
