//! Drawing target for print layouts.
//!
//! Coordinates are millimetres from the top-left corner of the page, with y
//! growing downwards. Implementations convert to their own space.

use crate::types::*;
use image::RgbaImage;
use std::path::Path;

/// Axis-aligned rectangle on the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MmRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl MmRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Straight line between two page points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

impl Segment {
    pub fn new(from: (f64, f64), to: (f64, f64)) -> Self {
        Self { from, to }
    }

    pub fn length(&self) -> f64 {
        (self.to.0 - self.from.0).hypot(self.to.1 - self.from.1)
    }
}

/// Reflection of the whole page about its centre line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirror {
    /// x becomes page_width - x
    Horizontal,
    /// y becomes page_height - y
    Vertical,
}

impl From<Flip> for Mirror {
    fn from(flip: Flip) -> Self {
        match flip {
            Flip::Horizontal => Mirror::Horizontal,
            Flip::Vertical => Mirror::Vertical,
        }
    }
}

impl Mirror {
    /// Where a point drawn under this mirror ends up on the page
    pub fn apply(self, point: (f64, f64), page: (f64, f64)) -> (f64, f64) {
        match self {
            Mirror::Horizontal => (page.0 - point.0, point.1),
            Mirror::Vertical => (point.0, page.1 - point.1),
        }
    }

    /// Flip bitmap pixels on the same axis
    pub fn flip_image(self, image: &RgbaImage) -> RgbaImage {
        match self {
            Mirror::Horizontal => image::imageops::flip_horizontal(image),
            Mirror::Vertical => image::imageops::flip_vertical(image),
        }
    }
}

/// Page-based document that images and lines can be drawn on
pub trait PrintSurface {
    /// Start a new page; later drawing goes to it
    fn add_page(&mut self, width_mm: f64, height_mm: f64) -> Result<()>;

    /// Draw `image` stretched to fill `rect`
    fn draw_image(&mut self, image: &RgbaImage, rect: MmRect) -> Result<()>;

    /// Stroke a thin black line
    fn draw_line(&mut self, segment: Segment) -> Result<()>;

    /// Mirror everything drawn until the matching `end_mirror`
    fn begin_mirror(&mut self, mirror: Mirror) -> Result<()>;

    fn end_mirror(&mut self) -> Result<()>;

    fn page_count(&self) -> usize;

    /// Finish the document and write it to `path`
    fn write(&mut self, path: &Path) -> Result<()>;
}
