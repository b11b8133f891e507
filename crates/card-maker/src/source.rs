//! Image inputs: in-memory bitmaps, raster files and SVG files

use crate::types::{CardError, Result};
use crate::units::whole_px;
use image::{DynamicImage, RgbaImage, imageops::FilterType};
use log::debug;
use resvg::{tiny_skia, usvg};
use std::path::{Path, PathBuf};

/// Anything that can be pasted onto a card or a sheet
#[derive(Debug, Clone)]
pub enum ImageSource {
    Image(RgbaImage),
    Path(PathBuf),
}

impl From<RgbaImage> for ImageSource {
    fn from(image: RgbaImage) -> Self {
        ImageSource::Image(image)
    }
}

impl From<&RgbaImage> for ImageSource {
    fn from(image: &RgbaImage) -> Self {
        ImageSource::Image(image.clone())
    }
}

impl From<DynamicImage> for ImageSource {
    fn from(image: DynamicImage) -> Self {
        ImageSource::Image(image.to_rgba8())
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        ImageSource::Path(path.to_path_buf())
    }
}

impl From<&str> for ImageSource {
    fn from(path: &str) -> Self {
        ImageSource::Path(PathBuf::from(path))
    }
}

impl From<String> for ImageSource {
    fn from(path: String) -> Self {
        ImageSource::Path(PathBuf::from(path))
    }
}

pub fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

impl ImageSource {
    /// Pixel size before any resizing
    pub fn natural_size(&self) -> Result<(u32, u32)> {
        match self {
            ImageSource::Image(image) => Ok(image.dimensions()),
            ImageSource::Path(path) if is_svg(path) => {
                let size = parse_svg(path)?.size();
                Ok((
                    whole_px(size.width().round() as f64),
                    whole_px(size.height().round() as f64),
                ))
            }
            ImageSource::Path(path) => Ok(image::image_dimensions(path)?),
        }
    }

    /// Produce an RGBA bitmap, scaled to `target` when given.
    ///
    /// SVG files are rasterised directly at the target size.
    pub fn load(&self, target: Option<(u32, u32)>) -> Result<RgbaImage> {
        match self {
            ImageSource::Image(image) => Ok(resize_to(image.clone(), target)),
            ImageSource::Path(path) if is_svg(path) => render_svg(path, target),
            ImageSource::Path(path) => {
                debug!("Loading image {}", path.display());
                let image = image::open(path)?.to_rgba8();
                Ok(resize_to(image, target))
            }
        }
    }
}

fn resize_to(image: RgbaImage, target: Option<(u32, u32)>) -> RgbaImage {
    match target {
        Some((w, h)) if (w, h) != image.dimensions() => {
            image::imageops::resize(&image, w, h, FilterType::CatmullRom)
        }
        _ => image,
    }
}

fn parse_svg(path: &Path) -> Result<usvg::Tree> {
    let data = std::fs::read(path)?;
    usvg::Tree::from_data(&data, &usvg::Options::default())
        .map_err(|e| CardError::Svg(format!("{}: {}", path.display(), e)))
}

/// Rasterise an SVG file, at its own size or at `target`
pub fn render_svg(path: &Path, target: Option<(u32, u32)>) -> Result<RgbaImage> {
    let tree = parse_svg(path)?;
    let size = tree.size();
    let (w, h) = target.unwrap_or((
        whole_px(size.width().round() as f64),
        whole_px(size.height().round() as f64),
    ));
    debug!("Rasterising {} at {}x{}", path.display(), w, h);

    let mut pixmap = tiny_skia::Pixmap::new(w, h).ok_or_else(|| {
        CardError::Svg(format!("Cannot allocate a {}x{} pixmap", w, h))
    })?;
    let transform = tiny_skia::Transform::from_scale(
        w as f32 / size.width(),
        h as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    let mut image = RgbaImage::new(w, h);
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(image)
}

/// Requested image size in the card's default unit; either side may be left
/// out to keep the aspect ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResizeRequest {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl ResizeRequest {
    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    pub fn width(width: f64) -> Self {
        Self {
            width: Some(width),
            height: None,
        }
    }

    pub fn height(height: f64) -> Self {
        Self {
            width: None,
            height: Some(height),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }
}

/// Decide the pixel size for an image of `natural` size given a request
/// already converted to pixels.
///
/// Returns whether a resize is needed along with the final size.
pub fn need_resize_px(
    natural: (u32, u32),
    width_px: Option<f64>,
    height_px: Option<f64>,
) -> (bool, (u32, u32)) {
    let (nw, nh) = natural;
    match (width_px, height_px) {
        (None, None) => (false, natural),
        (Some(w), Some(h)) => {
            let size = (whole_px(w), whole_px(h));
            (size != natural, size)
        }
        (Some(w), None) => {
            let w = whole_px(w);
            let h = whole_px(w as f64 * nh as f64 / nw as f64);
            (w != nw, (w, h))
        }
        (None, Some(h)) => {
            let h = whole_px(h);
            let w = whole_px(h as f64 * nw as f64 / nh as f64);
            (h != nh, (w, h))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_need_resize_keeps_aspect_ratio() {
        assert_eq!(need_resize_px((200, 100), None, None), (false, (200, 100)));
        assert_eq!(need_resize_px((200, 100), Some(100.0), None), (true, (100, 50)));
        assert_eq!(need_resize_px((200, 100), None, Some(25.0)), (true, (50, 25)));
        assert_eq!(need_resize_px((200, 100), Some(200.0), None), (false, (200, 100)));
        assert_eq!(
            need_resize_px((200, 100), Some(10.9), Some(20.2)),
            (true, (10, 20))
        );
    }

    #[test]
    fn test_in_memory_source_resizes() {
        let source = ImageSource::from(RgbaImage::new(8, 4));
        assert_eq!(source.natural_size().unwrap(), (8, 4));
        assert_eq!(source.load(Some((4, 2))).unwrap().dimensions(), (4, 2));
        assert_eq!(source.load(None).unwrap().dimensions(), (8, 4));
    }

    #[test]
    fn test_svg_detection() {
        assert!(is_svg(Path::new("a/b/icon.SVG")));
        assert!(!is_svg(Path::new("icon.png")));
        assert!(!is_svg(Path::new("svg")));
    }
}
