//! Cutting marks drawn around each card cell.
//!
//! All values are millimetres in page space, origin top-left.

use super::surface::Segment;
use crate::types::CardShape;
use std::f64::consts::TAU;

/// Stroke width for every mark
pub const MARK_LINE_WIDTH_MM: f64 = 0.25;

/// Each side of a gutter square stops this short of the corners
pub const GUTTER_SQUARE_INSET_MM: f64 = 1.0;

/// Radial ticks around a circular card
pub const CIRCLE_TICKS: usize = 40;

/// Card placement used to generate marks. `x`/`y` is the top-left of the
/// cell, which includes the gutter on every side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    pub x: f64,
    pub y: f64,
    pub card_width: f64,
    pub card_height: f64,
    pub gutter: f64,
}

impl CellGeometry {
    pub fn cell_width(&self) -> f64 {
        self.gutter + self.card_width + self.gutter
    }

    pub fn cell_height(&self) -> f64 {
        self.gutter + self.card_height + self.gutter
    }
}

/// Marks for one card of the given shape
pub fn card_marks(shape: CardShape, cell: &CellGeometry) -> Vec<Segment> {
    match shape {
        CardShape::Rectangle if cell.gutter > 0.0 => gutter_corners(cell),
        CardShape::Rectangle => card_outline(cell),
        CardShape::Circle => circle_ticks(cell),
    }
}

/// A small square in each of the four gutter corners
pub fn gutter_corners(cell: &CellGeometry) -> Vec<Segment> {
    let g = cell.gutter;
    let far_x = cell.x + g + cell.card_width;
    let far_y = cell.y + g + cell.card_height;

    [
        (cell.x, cell.y),
        (far_x, cell.y),
        (far_x, far_y),
        (cell.x, far_y),
    ]
    .into_iter()
    .flat_map(|(x, y)| gutter_square(x, y, g))
    .collect()
}

/// Four sides of a `size` square, each inset at both ends. Sides too short to
/// survive the inset are left out.
pub fn gutter_square(x: f64, y: f64, size: f64) -> Vec<Segment> {
    let gap = GUTTER_SQUARE_INSET_MM;
    if size <= 2.0 * gap {
        return Vec::new();
    }

    let (left, right) = (x, x + size);
    let (top, bottom) = (y, y + size);
    vec![
        Segment::new((left + gap, top), (right - gap, top)),
        Segment::new((right, top + gap), (right, bottom - gap)),
        Segment::new((left + gap, bottom), (right - gap, bottom)),
        Segment::new((left, top + gap), (left, bottom - gap)),
    ]
}

/// Outline of the card itself, used when there is no gutter to mark
pub fn card_outline(cell: &CellGeometry) -> Vec<Segment> {
    let left = cell.x + cell.gutter;
    let top = cell.y + cell.gutter;
    let right = left + cell.card_width;
    let bottom = top + cell.card_height;
    vec![
        Segment::new((left, top), (right, top)),
        Segment::new((right, top), (right, bottom)),
        Segment::new((right, bottom), (left, bottom)),
        Segment::new((left, bottom), (left, top)),
    ]
}

/// Radial ticks from the card's edge out across the gutter
pub fn circle_ticks(cell: &CellGeometry) -> Vec<Segment> {
    let centre_x = cell.x + cell.gutter + cell.card_width / 2.0;
    let centre_y = cell.y + cell.gutter + cell.card_height / 2.0;
    let inner = cell.card_width / 2.0;
    let outer = inner + cell.gutter;

    (0..CIRCLE_TICKS)
        .map(|i| {
            let angle = TAU * i as f64 / CIRCLE_TICKS as f64;
            let (sin, cos) = angle.sin_cos();
            Segment::new(
                (centre_x + inner * cos, centre_y + inner * sin),
                (centre_x + outer * cos, centre_y + outer * sin),
            )
        })
        .collect()
}
