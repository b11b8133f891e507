//! Text measurement, wrapping and multi-line layout

use crate::anchor::{HorizontalAnchor, TextAlign, TextAnchor};
use crate::compose::blend_coverage;
use crate::types::{CardError, Colour, Result};
use image::RgbaImage;
use rusttype::{Scale, point};
use std::path::Path;

/// Rectangle relative to a pen origin on the baseline; y grows downward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InkBounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl InkBounds {
    pub fn union(self, other: InkBounds) -> InkBounds {
        InkBounds {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    pub fn translate(self, dx: f64, dy: f64) -> InkBounds {
        InkBounds {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Measures and rasterises single lines of text at a fixed size.
///
/// All quantities are in pixels.
pub trait TypeFace {
    /// Distance from the baseline up to the ascender line (positive)
    fn ascent(&self) -> f64;
    /// Distance from the baseline down to the descender line (positive)
    fn descent(&self) -> f64;
    /// Pen advance for the whole line
    fn advance(&self, line: &str) -> f64;
    /// Inked extent of the line relative to a pen at the origin, or `None`
    /// when nothing would be drawn
    fn ink_bounds(&self, line: &str) -> Option<InkBounds>;
    /// Draw the line with the pen at `x` on the baseline `baseline`
    fn draw(&self, image: &mut RgbaImage, line: &str, x: f64, baseline: f64, fill: Colour);
}

/// TrueType/OpenType font loaded through rusttype
pub struct Font {
    font: rusttype::Font<'static>,
    scale: Scale,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font").field("size", &self.scale.y).finish()
    }
}

impl Font {
    pub fn from_bytes(bytes: Vec<u8>, size_px: f32) -> Result<Self> {
        let font = rusttype::Font::try_from_vec(bytes)
            .ok_or_else(|| CardError::Font("Could not parse font data".into()))?;
        if !(size_px > 0.0) {
            return Err(CardError::Font(format!(
                "Font size must be positive, got {}",
                size_px
            )));
        }
        Ok(Self {
            font,
            scale: Scale::uniform(size_px),
        })
    }

    pub fn from_file(path: impl AsRef<Path>, size_px: f32) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(bytes, size_px)
            .map_err(|e| CardError::Font(format!("{}: {}", path.as_ref().display(), e)))
    }

    pub fn size(&self) -> f32 {
        self.scale.y
    }

    /// Same face at another pixel size
    pub fn resized(&self, size_px: f32) -> Self {
        Self {
            font: self.font.clone(),
            scale: Scale::uniform(size_px),
        }
    }

    fn glyphs(&self, line: &str, x: f32, y: f32) -> Vec<rusttype::PositionedGlyph<'_>> {
        self.font.layout(line, self.scale, point(x, y)).collect()
    }
}

impl TypeFace for Font {
    fn ascent(&self) -> f64 {
        self.font.v_metrics(self.scale).ascent as f64
    }

    fn descent(&self) -> f64 {
        -self.font.v_metrics(self.scale).descent as f64
    }

    fn advance(&self, line: &str) -> f64 {
        self.glyphs(line, 0.0, 0.0)
            .last()
            .map(|g| (g.position().x + g.unpositioned().h_metrics().advance_width) as f64)
            .unwrap_or(0.0)
    }

    fn ink_bounds(&self, line: &str) -> Option<InkBounds> {
        self.glyphs(line, 0.0, 0.0)
            .iter()
            .filter_map(|g| g.pixel_bounding_box())
            .map(|bb| InkBounds {
                left: bb.min.x as f64,
                top: bb.min.y as f64,
                right: bb.max.x as f64,
                bottom: bb.max.y as f64,
            })
            .reduce(InkBounds::union)
    }

    fn draw(&self, image: &mut RgbaImage, line: &str, x: f64, baseline: f64, fill: Colour) {
        let (w, h) = (image.width() as i32, image.height() as i32);
        for glyph in self.glyphs(line, x as f32, baseline as f32) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, v| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 || px >= w || py >= h {
                    return;
                }
                blend_coverage(image.get_pixel_mut(px as u32, py as u32), fill, v);
            });
        }
    }
}

/// Insert line breaks so that no line exceeds `chrs_per_line` characters.
///
/// The last space before the limit becomes a newline. Existing newlines reset
/// the count; a single word longer than the limit is left unbroken.
pub fn insert_new_lines(text: &str, chrs_per_line: usize) -> String {
    let limit = chrs_per_line.max(1);
    let mut chars: Vec<char> = text.chars().collect();
    let mut count = 0usize;
    let mut last_space: Option<usize> = None;

    for i in 0..chars.len() {
        match chars[i] {
            '\n' => {
                count = 0;
                last_space = None;
                continue;
            }
            ' ' => last_space = Some(i),
            _ => {}
        }
        count += 1;
        if count <= limit {
            continue;
        }
        if let Some(space) = last_space.take() {
            chars[space] = '\n';
            count = i - space;
        }
    }

    chars.into_iter().collect()
}

#[derive(Debug, Clone)]
struct LineLayout {
    text: String,
    /// Pen x relative to the block's left edge
    x: f64,
    /// Baseline relative to the first baseline
    baseline: f64,
    ink: Option<InkBounds>,
}

/// A laid-out block of one or more lines.
///
/// Coordinates are relative to the block's left edge and the first line's
/// baseline until placed with [`TextBlock::origin`].
#[derive(Debug, Clone)]
pub struct TextBlock {
    lines: Vec<LineLayout>,
    ascent: f64,
    descent: f64,
    width: f64,
}

impl TextBlock {
    pub fn layout(face: &dyn TypeFace, text: &str, spacing_px: f64, align: TextAlign) -> Self {
        let ascent = face.ascent();
        let descent = face.descent();
        let line_height = ascent + descent + spacing_px;

        let measured: Vec<(&str, f64)> = text
            .split('\n')
            .map(|line| (line, face.advance(line)))
            .collect();
        let width = measured.iter().map(|(_, w)| *w).fold(0.0, f64::max);

        let lines = measured
            .into_iter()
            .enumerate()
            .map(|(i, (line, advance))| {
                let x = match align {
                    TextAlign::Left => 0.0,
                    TextAlign::Center => (width - advance) / 2.0,
                    TextAlign::Right => width - advance,
                };
                let baseline = i as f64 * line_height;
                LineLayout {
                    text: line.to_string(),
                    x,
                    baseline,
                    ink: face.ink_bounds(line).map(|b| b.translate(x, baseline)),
                }
            })
            .collect();

        Self {
            lines,
            ascent,
            descent,
            width,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Widest line advance
    pub fn width(&self) -> f64 {
        self.width
    }

    fn last_baseline(&self) -> f64 {
        self.lines.last().map(|l| l.baseline).unwrap_or(0.0)
    }

    /// Box from the first ascender to the last descender
    pub fn layout_bounds(&self) -> InkBounds {
        InkBounds {
            left: 0.0,
            top: -self.ascent,
            right: self.width,
            bottom: self.last_baseline() + self.descent,
        }
    }

    pub fn ink_bounds(&self) -> Option<InkBounds> {
        self.lines.iter().filter_map(|l| l.ink).reduce(InkBounds::union)
    }

    /// Ink box when anything is drawn, otherwise the layout box
    pub fn bounds(&self) -> InkBounds {
        self.ink_bounds().unwrap_or_else(|| self.layout_bounds())
    }

    /// Block left edge and first baseline for the given anchors (pixels)
    pub fn origin(&self, x: HorizontalAnchor, y: TextAnchor) -> (f64, f64) {
        let left = x.start_for(self.width);
        let layout = self.layout_bounds();
        let ink = self.bounds();
        let baseline = match y {
            TextAnchor::Ascender(v) => v - layout.top,
            TextAnchor::Top(v) => v - ink.top,
            TextAnchor::Middle(v) => v - (layout.top + layout.bottom) / 2.0,
            TextAnchor::Baseline(v) => v,
            TextAnchor::Bottom(v) => v - ink.bottom,
            TextAnchor::Descender(v) => v - layout.bottom,
        };
        (left, baseline)
    }

    /// Draw every line with the block placed at `origin`
    pub fn draw(&self, face: &dyn TypeFace, image: &mut RgbaImage, origin: (f64, f64), fill: Colour) {
        for line in &self.lines {
            face.draw(
                image,
                &line.text,
                origin.0 + line.x,
                origin.1 + line.baseline,
                fill,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_new_lines_breaks_at_last_space() {
        assert_eq!(insert_new_lines("aaa bbb ccc", 7), "aaa bbb\nccc");
        assert_eq!(insert_new_lines("aaa bbbb", 6), "aaa\nbbbb");
        assert_eq!(
            insert_new_lines("the quick brown fox jumps", 10),
            "the quick\nbrown fox\njumps"
        );
    }

    #[test]
    fn test_insert_new_lines_respects_existing_breaks() {
        assert_eq!(insert_new_lines("ab cd\nef gh", 5), "ab cd\nef gh");
        assert_eq!(insert_new_lines("ab\ncd ef gh", 5), "ab\ncd ef\ngh");
    }

    #[test]
    fn test_insert_new_lines_long_word_unbroken() {
        assert_eq!(insert_new_lines("abcdefghij", 3), "abcdefghij");
        assert_eq!(insert_new_lines("", 3), "");
    }

    /// Monospace face: every char is 10px wide, ink fills the em box
    struct Mono;

    impl TypeFace for Mono {
        fn ascent(&self) -> f64 {
            8.0
        }
        fn descent(&self) -> f64 {
            2.0
        }
        fn advance(&self, line: &str) -> f64 {
            10.0 * line.chars().count() as f64
        }
        fn ink_bounds(&self, line: &str) -> Option<InkBounds> {
            (!line.trim().is_empty()).then(|| InkBounds {
                left: 0.0,
                top: -6.0,
                right: self.advance(line),
                bottom: 0.0,
            })
        }
        fn draw(&self, _: &mut RgbaImage, _: &str, _: f64, _: f64, _: Colour) {}
    }

    #[test]
    fn test_block_alignment_and_height() {
        let block = TextBlock::layout(&Mono, "abcd\nab", 5.0, TextAlign::Right);
        assert_eq!(block.line_count(), 2);
        assert_eq!(block.width(), 40.0);
        let layout = block.layout_bounds();
        assert_eq!(layout.top, -8.0);
        // Second baseline sits one line height (8 + 2 + 5) lower
        assert_eq!(layout.bottom, 15.0 + 2.0);
        let ink = block.ink_bounds().unwrap();
        assert_eq!((ink.left, ink.right), (0.0, 40.0));
    }

    #[test]
    fn test_origin_for_anchors() {
        let block = TextBlock::layout(&Mono, "ab", 0.0, TextAlign::Left);
        assert_eq!(block.origin(HorizontalAnchor::Left(5.0), TextAnchor::Ascender(0.0)), (5.0, 8.0));
        assert_eq!(block.origin(HorizontalAnchor::Right(50.0), TextAnchor::Baseline(20.0)), (30.0, 20.0));
        assert_eq!(block.origin(HorizontalAnchor::Centre(50.0), TextAnchor::Top(0.0)), (40.0, 6.0));
        assert_eq!(block.origin(HorizontalAnchor::Left(0.0), TextAnchor::Descender(10.0)).1, 8.0);
        assert_eq!(block.origin(HorizontalAnchor::Left(0.0), TextAnchor::Bottom(10.0)).1, 10.0);
        assert_eq!(block.origin(HorizontalAnchor::Left(0.0), TextAnchor::Middle(5.0)).1, 8.0);
    }
}
