//! Pixel compositing helpers shared by the canvas and the text renderer

use crate::types::Colour;
use image::RgbaImage;

/// Blend `fill` over `dst` with the given glyph coverage (0..=1)
pub fn blend_coverage(dst: &mut Colour, fill: Colour, coverage: f32) {
    let sa = coverage.clamp(0.0, 1.0) * fill.0[3] as f32 / 255.0;
    if sa <= 0.0 {
        return;
    }
    let da = dst.0[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for c in 0..3 {
        let blended =
            (fill.0[c] as f32 * sa + dst.0[c] as f32 * da * (1.0 - sa)) / out_a;
        dst.0[c] = blended.round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Paste `src` at `(x, y)` using its own alpha channel as the mask.
///
/// Every channel, alpha included, moves from the destination value towards
/// the source value in proportion to the source alpha. Parts falling outside
/// the destination are clipped.
pub fn paste_masked(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    let (dw, dh) = (dst.width() as i64, dst.height() as i64);
    for (sx, sy, s) in src.enumerate_pixels() {
        let tx = x + sx as i64;
        let ty = y + sy as i64;
        if tx < 0 || ty < 0 || tx >= dw || ty >= dh {
            continue;
        }
        let mask = s.0[3] as u32;
        if mask == 0 {
            continue;
        }
        let d = dst.get_pixel_mut(tx as u32, ty as u32);
        for c in 0..4 {
            d.0[c] = lerp_channel(d.0[c], s.0[c], mask);
        }
    }
}

/// `a + (b - a) * mask / 255`, rounded
pub fn lerp_channel(a: u8, b: u8, mask: u32) -> u8 {
    let a = a as u32;
    let b = b as u32;
    ((a * (255 - mask) + b * mask + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_paste_masked_opaque_replaces() {
        let mut dst = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]));
        let src = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        paste_masked(&mut dst, &src, 1, 1);
        assert_eq!(dst.get_pixel(1, 1), &Rgba([255, 0, 0, 255]));
        assert_eq!(dst.get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(dst.get_pixel(3, 3), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_paste_masked_clips_negative_offsets() {
        let mut dst = RgbaImage::new(2, 2);
        let src = RgbaImage::from_pixel(3, 3, Rgba([9, 9, 9, 255]));
        paste_masked(&mut dst, &src, -2, -2);
        assert_eq!(dst.get_pixel(0, 0), &Rgba([9, 9, 9, 255]));
        assert_eq!(dst.get_pixel(1, 1), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_blend_coverage_on_transparent() {
        let mut px = Rgba([0, 0, 0, 0]);
        blend_coverage(&mut px, Rgba([10, 20, 30, 255]), 1.0);
        assert_eq!(px, Rgba([10, 20, 30, 255]));

        let mut px = Rgba([255, 255, 255, 255]);
        blend_coverage(&mut px, Rgba([0, 0, 0, 255]), 0.0);
        assert_eq!(px, Rgba([255, 255, 255, 255]));
    }
}
