//! Layout generator
//!
//! Places the silhouette target on the left half of the surface and the two
//! loose pieces in the staging region on the right half. Piece positions are
//! drawn by bounded rejection sampling; when sampling cannot produce a
//! non-overlapping pair a fixed stacked placement is used instead.

use glam::Vec2;
use rand::Rng;

use super::geometry::{Rect, Surface};
use super::state::{PieceId, PiecePair, PieceState, piece_footprint};
use crate::consts::STAGING_LEFT_SLACK;
use crate::lerp_span;
use crate::settings::Settings;

/// Where the completed image sits. Recomputed from the surface every time.
pub fn target_rect(surface: Surface, settings: &Settings) -> Rect {
    let w = settings.image_width;
    let h = settings.image_height();
    Rect::new(
        Vec2::new(
            surface.width * settings.target_x_fraction - w / 2.0,
            surface.height / 2.0 - h / 2.0,
        ),
        Vec2::new(w, h),
    )
}

/// Top-left corner a piece snaps to
pub fn slot_for(piece: PieceId, surface: Surface, settings: &Settings) -> Vec2 {
    let target = target_rect(surface, settings).pos;
    match piece {
        PieceId::Top => target,
        PieceId::Bottom => target + Vec2::new(0.0, settings.piece_height()),
    }
}

/// Vertical range a piece's top edge may take inside one zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneRange {
    pub y_min: f32,
    pub y_max: f32,
}

/// Staging region split into its upper and lower zones
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StagingZones {
    /// Leftmost piece x
    pub x_min: f32,
    /// Width of the range piece x is drawn from
    pub x_span: f32,
    pub upper: ZoneRange,
    pub lower: ZoneRange,
    /// Region too short for two pieces plus the gap
    pub degenerate: bool,
}

impl StagingZones {
    fn draw<R: Rng + ?Sized>(&self, zone: ZoneRange, rng: &mut R) -> Vec2 {
        Vec2::new(
            lerp_span(self.x_min, self.x_span, rng.random::<f32>()),
            lerp_span(zone.y_min, zone.y_max - zone.y_min, rng.random::<f32>()),
        )
    }

    /// Fixed stacked placement: top piece in the upper zone, bottom piece
    /// pinned one gap below it, both on the left edge of the staging area
    pub fn fallback(&self) -> PiecePair {
        PiecePair {
            top: PieceState::loose(Vec2::new(self.x_min, self.upper.y_min)),
            bottom: PieceState::loose(Vec2::new(self.x_min, self.lower.y_min)),
        }
    }
}

/// The staging region: right of the midline, inset by the edge margin
pub fn staging_region(surface: Surface, settings: &Settings) -> Rect {
    let m = settings.edge_margin;
    let min = Vec2::new(surface.midline() + m, m);
    let max = Vec2::new(surface.width - m, surface.height - m);
    Rect::new(min, (max - min).max(Vec2::ZERO))
}

/// Compute the zone split for a surface
pub fn staging_zones(surface: Surface, settings: &Settings) -> StagingZones {
    let w = settings.image_width;
    let piece_h = settings.piece_height();
    let gap = settings.staging_gap;
    let m = settings.edge_margin;

    // Piece x is its left edge, so the right bound leaves room for the width
    let area_right = surface.width - m - w;
    let staging_left = surface.midline() + m;
    let (area_left, x_span) = if area_right >= staging_left {
        (staging_left, area_right - staging_left)
    } else {
        // Too narrow to hold a piece: spill left of the staging edge
        let left = staging_left.min(area_right - STAGING_LEFT_SLACK);
        (left, (w * settings.min_staging_width_fraction).max(area_right - left))
    };

    let region_top = m;
    let region_bottom = surface.height - m;
    let region_h = region_bottom - region_top;

    if region_h < 2.0 * piece_h + gap {
        let lower_y = region_top + piece_h + gap;
        return StagingZones {
            x_min: area_left,
            x_span,
            upper: ZoneRange {
                y_min: region_top,
                y_max: region_top,
            },
            lower: ZoneRange {
                y_min: lower_y,
                y_max: lower_y,
            },
            degenerate: true,
        };
    }

    let zone_h = (region_h - gap) / 2.0;
    StagingZones {
        x_min: area_left,
        x_span,
        upper: ZoneRange {
            y_min: region_top,
            y_max: region_top + zone_h - piece_h,
        },
        lower: ZoneRange {
            y_min: region_top + zone_h + gap,
            y_max: region_bottom - piece_h,
        },
        degenerate: false,
    }
}

/// How a placement was arrived at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementKind {
    /// Random draw within the zones
    Sampled,
    /// Random draw that also clears the avoided piece
    Avoided,
    /// Avoidance failed; kept the mutually non-overlapping draw
    AvoidRelaxed,
    /// Staging region too short; fixed stacked placement
    Degenerate,
    /// Mutual retries exhausted; fixed stacked placement
    OverlapFallback,
}

/// Result of one generator run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub pieces: PiecePair,
    pub kind: PlacementKind,
}

/// Draw a fresh pair of unsnapped piece positions.
///
/// Which piece lands in the upper zone is a coin flip per call. `avoid` is
/// the sibling left on the board when only one piece is being re-placed; a
/// snapped sibling sits in its slot, not in staging, and is ignored.
pub fn generate_piece_positions<R: Rng + ?Sized>(
    surface: Surface,
    settings: &Settings,
    rng: &mut R,
    avoid: Option<&PieceState>,
) -> Placement {
    let zones = staging_zones(surface, settings);

    if zones.degenerate {
        log::debug!("Staging region too short, using stacked placement");
        return Placement {
            pieces: zones.fallback(),
            kind: PlacementKind::Degenerate,
        };
    }

    let overlaps =
        |a: Vec2, b: Vec2| piece_footprint(a, settings).overlaps(&piece_footprint(b, settings));

    let swap = rng.random_bool(0.5);
    let draw_pair = |rng: &mut R| {
        if swap {
            (zones.draw(zones.lower, rng), zones.draw(zones.upper, rng))
        } else {
            (zones.draw(zones.upper, rng), zones.draw(zones.lower, rng))
        }
    };

    let (mut top, mut bottom) = draw_pair(&mut *rng);
    let mut retries = 0;
    while retries < settings.mutual_retries && overlaps(top, bottom) {
        (top, bottom) = draw_pair(&mut *rng);
        retries += 1;
    }

    // Zones are `gap >= 0` apart, so a non-degenerate draw never overlaps;
    // the retry cap and stacked fallback only bound the loop
    let mut kind = PlacementKind::Sampled;
    if overlaps(top, bottom) {
        log::debug!("Pieces still overlap after {} retries, stacking", retries);
        let fallback = zones.fallback();
        top = fallback.top.pos;
        bottom = fallback.bottom.pos;
        kind = PlacementKind::OverlapFallback;
    }

    if let Some(avoid) = avoid.filter(|p| !p.snapped) {
        kind = PlacementKind::AvoidRelaxed;
        for _ in 0..settings.avoid_retries {
            let (t, b) = draw_pair(&mut *rng);
            if !overlaps(t, b) && !overlaps(t, avoid.pos) && !overlaps(b, avoid.pos) {
                top = t;
                bottom = b;
                kind = PlacementKind::Avoided;
                break;
            }
        }
    }

    Placement {
        pieces: PiecePair {
            top: PieceState::loose(top),
            bottom: PieceState::loose(bottom),
        },
        kind,
    }
}
