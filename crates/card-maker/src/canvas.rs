//! The card canvas: a transparent bitmap with a gutter, addressed in the
//! card's default unit

use crate::anchor::{HorizontalAnchor, TextAlign, TextAnchor, VerticalAnchor};
use crate::bounds::BoxSpec;
use crate::compose::{lerp_channel, paste_masked};
use crate::html::{ChromeRenderer, HtmlRenderer, HtmlStyle, page_css};
use crate::optimise::{Assessment, optimise};
use crate::source::{ImageSource, ResizeRequest, need_resize_px};
use crate::text::{TextBlock, TypeFace, insert_new_lines};
use crate::types::{BLACK, CardError, Colour, Result, TRANSPARENT};
use crate::units::{Geometry, Unit, UnitConverter, whole_px};
use image::RgbaImage;
use log::{debug, info};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Line spacing used until one is set explicitly
pub const DEFAULT_TEXT_LINE_SPACING_MM: f64 = 1.5;

/// Weight of the wash colour when tinting a card (the pair is averaged)
const WASH_SCALE: u32 = 2;

// =============================================================================
// Construction options
// =============================================================================

/// Everything needed to create a canvas.
///
/// `width`, `height` and `gutter` are in `unit`; exactly one of `width_px`
/// and `width_mm` gives the width in the other unit.
#[derive(Debug, Clone)]
pub struct CanvasOptions {
    pub width: f64,
    pub height: f64,
    pub unit: Option<Unit>,
    pub width_px: Option<f64>,
    pub width_mm: Option<f64>,
    pub gutter: f64,
    pub colour: Colour,
    pub image: Option<RgbaImage>,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            unit: None,
            width_px: None,
            width_mm: None,
            gutter: 0.0,
            colour: TRANSPARENT,
            image: None,
        }
    }
}

impl CanvasOptions {
    /// Card measured in millimetres, `width_px` pixels wide
    pub fn mm(width: f64, height: f64, width_px: f64) -> Self {
        Self {
            width,
            height,
            unit: Some(Unit::Mm),
            width_px: Some(width_px),
            ..Default::default()
        }
    }

    /// Card measured in pixels, `width_mm` millimetres wide
    pub fn px(width: f64, height: f64, width_mm: f64) -> Self {
        Self {
            width,
            height,
            unit: Some(Unit::Px),
            width_mm: Some(width_mm),
            ..Default::default()
        }
    }

    pub fn with_gutter(mut self, gutter: f64) -> Self {
        self.gutter = gutter;
        self
    }

    pub fn with_colour(mut self, colour: Colour) -> Self {
        self.colour = colour;
        self
    }

    pub fn with_image(mut self, image: RgbaImage) -> Self {
        self.image = Some(image);
        self
    }
}

// =============================================================================
// Text options and results
// =============================================================================

/// How and where to draw a piece of text
pub struct TextOptions<'a> {
    pub font: &'a dyn TypeFace,
    pub x: HorizontalAnchor,
    pub y: TextAnchor,
    pub fill: Colour,
    /// Extra space between lines in the default unit
    pub spacing: Option<f64>,
    /// Wrap at this many characters
    pub chrs_per_line: Option<usize>,
    /// Wrap to fit this width in the default unit
    pub width: Option<f64>,
}

impl<'a> TextOptions<'a> {
    pub fn new(font: &'a dyn TypeFace, x: HorizontalAnchor, y: TextAnchor) -> Self {
        Self {
            font,
            x,
            y,
            fill: BLACK,
            spacing: None,
            chrs_per_line: None,
            width: None,
        }
    }

    pub fn with_fill(mut self, fill: Colour) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = Some(spacing);
        self
    }

    pub fn with_chrs_per_line(mut self, chrs: usize) -> Self {
        self.chrs_per_line = Some(chrs);
        self
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }
}

/// Drawn text extent in the default unit, relative to the card (gutter
/// excluded)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl TextBounds {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

// =============================================================================
// Canvas
// =============================================================================

pub struct CardCanvas {
    geometry: Geometry,
    image: RgbaImage,
    text_line_spacing: f64,
    font_families: BTreeMap<String, PathBuf>,
    html_renderer: Option<Box<dyn HtmlRenderer>>,
}

impl std::fmt::Debug for CardCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardCanvas")
            .field("geometry", &self.geometry)
            .field("text_line_spacing", &self.text_line_spacing)
            .field("font_families", &self.font_families)
            .field("html_renderer", &self.html_renderer.is_some())
            .finish()
    }
}

impl CardCanvas {
    pub fn new(options: CanvasOptions) -> Result<Self> {
        let geometry = Geometry::new(
            options.unit,
            options.width,
            options.height,
            options.gutter,
            options.width_px,
            options.width_mm,
        )?;
        let size = (
            geometry.width_with_gutters_px(),
            geometry.height_with_gutters_px(),
        );
        let image = match options.image {
            Some(image) if image.dimensions() == size => image,
            Some(image) => {
                debug!(
                    "Scaling initial image from {:?} to {:?}",
                    image.dimensions(),
                    size
                );
                image::imageops::resize(
                    &image,
                    size.0,
                    size.1,
                    image::imageops::FilterType::CatmullRom,
                )
            }
            None => RgbaImage::from_pixel(size.0, size.1, options.colour),
        };
        let text_line_spacing = geometry
            .converter()
            .from_mm(DEFAULT_TEXT_LINE_SPACING_MM);

        debug!(
            "Created {}x{}px card with {}px gutter",
            geometry.width.px, geometry.height.px, geometry.gutter.px
        );
        Ok(Self {
            geometry,
            image,
            text_line_spacing,
            font_families: BTreeMap::new(),
            html_renderer: None,
        })
    }

    /// Independent copy of the bitmap and settings; the HTML renderer is not
    /// shared and will be recreated on demand.
    pub fn copy(&self) -> Self {
        Self {
            geometry: self.geometry,
            image: self.image.clone(),
            text_line_spacing: self.text_line_spacing,
            font_families: self.font_families.clone(),
            html_renderer: None,
        }
    }

    // -------------------------------------------------------------------------
    // Dimensions
    // -------------------------------------------------------------------------

    pub fn unit(&self) -> Unit {
        self.geometry.unit()
    }

    pub fn converter(&self) -> &UnitConverter {
        self.geometry.converter()
    }

    pub fn width(&self) -> f64 {
        self.geometry.width.value
    }

    pub fn height(&self) -> f64 {
        self.geometry.height.value
    }

    pub fn gutter(&self) -> f64 {
        self.geometry.gutter.value
    }

    pub fn width_px(&self) -> u32 {
        self.geometry.width.px
    }

    pub fn height_px(&self) -> u32 {
        self.geometry.height.px
    }

    pub fn gutter_px(&self) -> u32 {
        self.geometry.gutter.px
    }

    pub fn width_mm(&self) -> f64 {
        self.geometry.width.mm
    }

    pub fn height_mm(&self) -> f64 {
        self.geometry.height.mm
    }

    pub fn gutter_mm(&self) -> f64 {
        self.geometry.gutter.mm
    }

    pub fn width_with_gutters(&self) -> f64 {
        self.geometry.width_with_gutters()
    }

    pub fn height_with_gutters(&self) -> f64 {
        self.geometry.height_with_gutters()
    }

    pub fn width_with_gutters_px(&self) -> u32 {
        self.geometry.width_with_gutters_px()
    }

    pub fn height_with_gutters_px(&self) -> u32 {
        self.geometry.height_with_gutters_px()
    }

    pub fn width_with_gutters_mm(&self) -> f64 {
        self.geometry.width_with_gutters_mm()
    }

    pub fn height_with_gutters_mm(&self) -> f64 {
        self.geometry.height_with_gutters_mm()
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width(), self.height())
    }

    pub fn size_px(&self) -> (u32, u32) {
        (self.width_px(), self.height_px())
    }

    pub fn size_mm(&self) -> (f64, f64) {
        (self.width_mm(), self.height_mm())
    }

    pub fn size_with_gutters(&self) -> (f64, f64) {
        (self.width_with_gutters(), self.height_with_gutters())
    }

    pub fn size_with_gutters_px(&self) -> (u32, u32) {
        (self.width_with_gutters_px(), self.height_with_gutters_px())
    }

    pub fn size_with_gutters_mm(&self) -> (f64, f64) {
        (self.width_with_gutters_mm(), self.height_with_gutters_mm())
    }

    // -------------------------------------------------------------------------
    // Unit conversion
    // -------------------------------------------------------------------------

    pub fn to_px(&self, value: f64) -> f64 {
        self.converter().to_px(value)
    }

    pub fn to_mm(&self, value: f64) -> f64 {
        self.converter().to_mm(value)
    }

    pub fn from_px(&self, px: f64) -> f64 {
        self.converter().from_px(px)
    }

    pub fn from_mm(&self, mm: f64) -> f64 {
        self.converter().from_mm(mm)
    }

    pub fn to_px_opt(&self, value: Option<f64>) -> Option<f64> {
        self.converter().to_px_opt(value)
    }

    pub fn to_mm_opt(&self, value: Option<f64>) -> Option<f64> {
        self.converter().to_mm_opt(value)
    }

    pub fn from_px_opt(&self, px: Option<f64>) -> Option<f64> {
        self.converter().from_px_opt(px)
    }

    pub fn from_mm_opt(&self, mm: Option<f64>) -> Option<f64> {
        self.converter().from_mm_opt(mm)
    }

    // -------------------------------------------------------------------------
    // Text line spacing
    // -------------------------------------------------------------------------

    /// Line spacing in the default unit
    pub fn text_line_spacing(&self) -> f64 {
        self.text_line_spacing
    }

    pub fn text_line_spacing_px(&self) -> f64 {
        self.to_px(self.text_line_spacing)
    }

    pub fn text_line_spacing_mm(&self) -> f64 {
        self.to_mm(self.text_line_spacing)
    }

    /// Set the spacing in the default unit; `None` restores the default
    pub fn set_text_line_spacing(&mut self, spacing: Option<f64>) {
        self.text_line_spacing =
            spacing.unwrap_or_else(|| self.from_mm(DEFAULT_TEXT_LINE_SPACING_MM));
    }

    pub fn set_text_line_spacing_mm(&mut self, spacing_mm: Option<f64>) {
        self.set_text_line_spacing(self.from_mm_opt(spacing_mm));
    }

    pub fn set_text_line_spacing_px(&mut self, spacing_px: Option<f64>) {
        self.set_text_line_spacing(self.from_px_opt(spacing_px));
    }

    // -------------------------------------------------------------------------
    // Images
    // -------------------------------------------------------------------------

    /// Decide the pixel size for an image of `natural` pixel size given a
    /// request in the default unit
    pub fn need_resize_px(&self, natural: (u32, u32), size: ResizeRequest) -> (bool, (u32, u32)) {
        need_resize_px(natural, self.to_px_opt(size.width), self.to_px_opt(size.height))
    }

    /// Load an image (raster or SVG) at the requested size
    pub fn load_image(
        &self,
        source: impl Into<ImageSource>,
        size: ResizeRequest,
    ) -> Result<RgbaImage> {
        let source = source.into();
        if size.is_empty() {
            return source.load(None);
        }
        let (resize, target) = self.need_resize_px(source.natural_size()?, size);
        if target.0 == 0 || target.1 == 0 {
            return Err(CardError::Config(format!(
                "Requested image size {:?} is smaller than one pixel",
                size
            )));
        }
        source.load(resize.then_some(target))
    }

    /// Paste an image with one of its edges (or its centre) at each anchor
    pub fn paste(
        &mut self,
        source: impl Into<ImageSource>,
        size: ResizeRequest,
        x: HorizontalAnchor,
        y: VerticalAnchor,
    ) -> Result<()> {
        let image = self.load_image(source, size)?;
        let (w, h) = (image.width() as f64, image.height() as f64);
        let g = self.gutter_px() as i64;

        let left = match x {
            HorizontalAnchor::Left(v) => self.to_px(v) as i64,
            HorizontalAnchor::Right(v) => (self.to_px(v) - w) as i64,
            HorizontalAnchor::Centre(v) => (self.to_px(v) - w / 2.0).round() as i64,
        } + g;
        let top = match y {
            VerticalAnchor::Top(v) => self.to_px(v) as i64,
            VerticalAnchor::Bottom(v) => (self.to_px(v) - h) as i64,
            VerticalAnchor::Middle(v) => (self.to_px(v) - h / 2.0).round() as i64,
        } + g;

        debug!("Pasting {}x{} image at ({}, {})", w, h, left, top);
        paste_masked(&mut self.image, &image, left, top);
        Ok(())
    }

    /// Paste with optional anchor arguments, exactly one per axis
    #[allow(clippy::too_many_arguments)]
    pub fn paste_at(
        &mut self,
        source: impl Into<ImageSource>,
        size: ResizeRequest,
        x_left: Option<f64>,
        x_centre: Option<f64>,
        x_right: Option<f64>,
        y_top: Option<f64>,
        y_middle: Option<f64>,
        y_bottom: Option<f64>,
    ) -> Result<()> {
        let x = HorizontalAnchor::from_options(x_left, x_centre, x_right)?;
        let y = VerticalAnchor::from_options(y_top, y_middle, y_bottom)?;
        self.paste(source, size, x, y)
    }

    // -------------------------------------------------------------------------
    // Text
    // -------------------------------------------------------------------------

    /// Draw text and return where it landed
    pub fn text(&mut self, text: &str, options: &TextOptions<'_>) -> Result<TextBounds> {
        if options.width.is_some() && options.chrs_per_line.is_some() {
            return Err(CardError::Config(
                "Cannot specify both 'width' and 'chrs_per_line'".into(),
            ));
        }

        let face = options.font;
        let align = options.x.align();
        let spacing_px = self.to_px(options.spacing.unwrap_or(self.text_line_spacing));

        let text = match (options.chrs_per_line, options.width) {
            (Some(chrs), _) => insert_new_lines(text, chrs),
            (None, Some(width)) => wrap_to_width(face, text, self.to_px(width), spacing_px, align)?,
            (None, None) => text.to_string(),
        };

        let g = self.gutter_px() as f64;
        let x = options.x.with_value(self.to_px(options.x.value()) + g);
        let y = options.y.with_value(self.to_px(options.y.value()) + g);

        let block = TextBlock::layout(face, &text, spacing_px, align);
        let origin = block.origin(x, y);
        block.draw(face, &mut self.image, origin, options.fill);

        let drawn = block.bounds().translate(origin.0, origin.1);
        debug!(
            "Drew {} line(s) of text in ({:.1}, {:.1})-({:.1}, {:.1})px",
            block.line_count(),
            drawn.left,
            drawn.top,
            drawn.right,
            drawn.bottom
        );
        Ok(TextBounds {
            left: self.from_px(drawn.left - g),
            top: self.from_px(drawn.top - g),
            right: self.from_px(drawn.right - g),
            bottom: self.from_px(drawn.bottom - g),
        })
    }

    // -------------------------------------------------------------------------
    // HTML
    // -------------------------------------------------------------------------

    /// Register font families (name to font file) usable from `html()`
    pub fn set_font_families(&mut self, families: BTreeMap<String, PathBuf>) {
        self.font_families = families;
    }

    pub fn font_families(&self) -> &BTreeMap<String, PathBuf> {
        &self.font_families
    }

    /// Use a specific renderer instead of the default headless browser
    pub fn set_html_renderer(&mut self, renderer: Box<dyn HtmlRenderer>) {
        self.html_renderer = Some(renderer);
    }

    pub fn has_html_renderer(&self) -> bool {
        self.html_renderer.is_some()
    }

    /// Render HTML into a box whose top-left corner is at (`left`, `top`).
    ///
    /// The height defaults to the space left down to the bottom of the card,
    /// including the gutter.
    pub fn html(
        &mut self,
        content: &str,
        left: f64,
        top: f64,
        width: f64,
        height: Option<f64>,
        style: &HtmlStyle,
    ) -> Result<()> {
        let mut spec = BoxSpec::default().left(left).top(top).width(width);
        if let Some(height) = height {
            spec = spec.height(height);
        }
        let default_height = self.height_with_gutters() - top - self.gutter();
        let bounds = spec.resolve(width, default_height)?;

        let width_px = whole_px(self.to_px(bounds.width));
        let height_px = whole_px(self.to_px(bounds.height));
        if width_px == 0 || height_px == 0 {
            return Err(CardError::Config(format!(
                "HTML box is empty: {}x{}px",
                width_px, height_px
            )));
        }

        let css = page_css(
            width_px,
            self.to_px_opt(style.font_size),
            style,
            &self.font_families,
        );

        let mut renderer: Box<dyn HtmlRenderer> = match self.html_renderer.take() {
            Some(renderer) => renderer,
            None => Box::new(ChromeRenderer::new()?),
        };
        let rendered = renderer.render(content, &css, width_px, height_px);
        self.html_renderer = Some(renderer);
        let image = rendered?;

        self.paste(
            image,
            ResizeRequest::default(),
            HorizontalAnchor::Left(bounds.left),
            VerticalAnchor::Top(bounds.top),
        )
    }

    // -------------------------------------------------------------------------
    // Output
    // -------------------------------------------------------------------------

    /// The card without its gutter
    pub fn image(&self) -> RgbaImage {
        let g = self.gutter_px();
        image::imageops::crop_imm(&self.image, g, g, self.width_px(), self.height_px())
            .to_image()
    }

    /// The full bitmap including the gutter
    pub fn image_with_gutters(&self) -> RgbaImage {
        self.image.clone()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.image().save(path.as_ref())?;
        info!("Saved card to {}", path.as_ref().display());
        Ok(())
    }

    pub fn save_with_gutters(&self, path: impl AsRef<Path>) -> Result<()> {
        self.image.save(path.as_ref())?;
        info!("Saved card with gutters to {}", path.as_ref().display());
        Ok(())
    }

    /// Tint the whole card towards `colour`
    pub fn colour_wash(&mut self, colour: Colour) {
        self.image = Self::colour_wash_image(&self.image, colour);
    }

    /// Average every channel with `colour`, then mask by the original alpha so
    /// transparent areas stay transparent
    pub fn colour_wash_image(image: &RgbaImage, colour: Colour) -> RgbaImage {
        let mut out = image.clone();
        for pixel in out.pixels_mut() {
            let mask = pixel.0[3] as u32;
            for c in 0..4 {
                let washed = ((pixel.0[c] as u32 + colour.0[c] as u32) / WASH_SCALE).min(255) as u8;
                pixel.0[c] = lerp_channel(0, washed, mask);
            }
        }
        out
    }
}

impl From<&CardCanvas> for ImageSource {
    fn from(canvas: &CardCanvas) -> Self {
        ImageSource::Image(canvas.image())
    }
}

/// Find a wrap threshold so the text block fits `target_px`
fn wrap_to_width(
    face: &dyn TypeFace,
    text: &str,
    target_px: f64,
    spacing_px: f64,
    align: TextAlign,
) -> Result<String> {
    let length = text.chars().count() as u64;
    let wrap = |chrs: u64| insert_new_lines(text, usize::try_from(chrs).unwrap_or(usize::MAX));

    let chrs = optimise(length, |chrs| {
        let width = TextBlock::layout(face, &wrap(chrs), spacing_px, align)
            .bounds()
            .width();
        let direction = if width > target_px {
            Ordering::Greater
        } else if width == target_px || chrs >= length {
            Ordering::Equal
        } else {
            Ordering::Less
        };
        Assessment::new(direction, width <= target_px)
    })
    .map_err(|_| {
        CardError::NotFound(format!(
            "Cannot wrap text to fit within {:.1}px: {:?}",
            target_px, text
        ))
    })?;

    debug!("Wrapping text at {} characters per line", chrs);
    Ok(wrap(chrs))
}
