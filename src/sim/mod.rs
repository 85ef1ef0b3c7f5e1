//! Deterministic puzzle core
//!
//! All placement, drag and stage logic lives here. This module must stay
//! pure and deterministic:
//! - Seeded RNG only
//! - Time comes in as an argument, never read from a clock
//! - Side effects leave through an `EventSink`, never called directly
//! - No rendering or platform dependencies

pub mod drag;
pub mod geometry;
pub mod layout;
pub mod stage;
pub mod state;
pub mod tick;

pub use drag::{DropOutcome, begin_drag, end_drag, update_drag};
pub use geometry::{Rect, Surface};
pub use layout::{
    Placement, PlacementKind, StagingZones, generate_piece_positions, slot_for, staging_region,
    staging_zones, target_rect,
};
pub use stage::{
    advance_stage, close_menu, ensure_placed, finish_celebration, press_released, press_started,
    reset_stage, restart_from_menu,
};
pub use state::{
    DragState, EventSink, PieceId, PiecePair, PieceState, PuzzleEvent, PuzzleState, StageMarker,
    StagePhase, Timers,
};
pub use tick::{resume, teardown, tick};
