use super::marks::{CellGeometry, card_marks};
use super::pdf::PdfSurface;
use super::surface::{Mirror, MmRect, PrintSurface};
use crate::options::PrintOptions;
use crate::types::*;
use card_maker::ImageSource;
use image::RgbaImage;
use log::{debug, info, warn};
use std::path::Path;

/// Resolution used to rasterise SVG cards for print
pub const SVG_PRINT_DPI: f64 = 300.0;

/// One card to place: a front, an optional back, and an offset for the front
/// within its cell.
#[derive(Debug, Clone)]
pub struct PrintCard {
    pub front: ImageSource,
    pub back: Option<ImageSource>,
    pub x_offset_mm: f64,
    pub y_offset_mm: f64,
}

impl PrintCard {
    pub fn new(front: impl Into<ImageSource>) -> Self {
        Self {
            front: front.into(),
            back: None,
            x_offset_mm: 0.0,
            y_offset_mm: 0.0,
        }
    }

    pub fn with_back(mut self, back: impl Into<ImageSource>) -> Self {
        self.back = Some(back.into());
        self
    }

    pub fn with_offset(mut self, x_mm: f64, y_mm: f64) -> Self {
        self.x_offset_mm = x_mm;
        self.y_offset_mm = y_mm;
        self
    }
}

#[derive(Debug)]
struct PendingBack {
    image: Option<RgbaImage>,
    x: f64,
    y: f64,
}

/// Lays cards out on printable pages, row by row, with cutting marks.
///
/// Backs are collected as fronts are added. When a page of fronts is full, a
/// page of mirrored backs follows it so the sheet can be printed duplex.
pub struct PrintLayout<S: PrintSurface = PdfSurface> {
    options: PrintOptions,
    surface: S,
    cursor: Option<(f64, f64)>,
    /// A page has been started but none of its cells is used yet
    page_open: bool,
    backs: Vec<PendingBack>,
    cards: usize,
}

impl PrintLayout<PdfSurface> {
    pub fn new(options: PrintOptions) -> Result<Self> {
        Self::with_surface(options, PdfSurface::default())
    }
}

impl<S: PrintSurface> PrintLayout<S> {
    pub fn with_surface(options: PrintOptions, surface: S) -> Result<Self> {
        options.validate()?;
        let (page_w, page_h) = options.page_size_mm();
        debug!(
            "Print layout: {}x{}mm cards, {}mm gutter, {:.1}x{:.1}mm page",
            options.card_width_mm, options.card_height_mm, options.gutter_mm, page_w, page_h
        );
        Ok(Self {
            options,
            surface,
            cursor: None,
            page_open: false,
            backs: Vec::new(),
            cards: 0,
        })
    }

    pub fn options(&self) -> &PrintOptions {
        &self.options
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Top-left of the most recently used cell
    pub fn cursor(&self) -> Option<(f64, f64)> {
        self.cursor
    }

    /// Backs queued for the next backs page
    pub fn pending_backs(&self) -> usize {
        self.backs.len()
    }

    /// Fronts added so far
    pub fn card_count(&self) -> usize {
        self.cards
    }

    /// Number of cells that fit on one page
    pub fn cards_per_page(&self) -> usize {
        let (page_w, page_h) = self.options.page_size_mm();
        let per_axis = |page: f64, margin: f64, cell: f64| {
            ((page - margin) / cell).floor().max(0.0) as usize
        };
        per_axis(page_w, self.options.margin_left_mm, self.options.cell_width_mm())
            * per_axis(page_h, self.options.margin_top_mm, self.options.cell_height_mm())
    }

    fn start_page(&mut self) -> Result<()> {
        let (page_w, page_h) = self.options.page_size_mm();
        self.surface.add_page(page_w, page_h)?;
        self.cursor = None;
        self.page_open = true;
        Ok(())
    }

    /// The next free cell, and whether it needs a new page
    fn next_slot(&self) -> ((f64, f64), bool) {
        let first = (self.options.margin_left_mm, self.options.margin_top_mm);
        let Some((x, y)) = self.cursor else {
            return (first, !self.page_open);
        };

        let (page_w, page_h) = self.options.page_size_mm();
        let cell_w = self.options.cell_width_mm();
        let cell_h = self.options.cell_height_mm();

        let mut next = (x + cell_w, y);
        if next.0 + cell_w > page_w {
            next = (self.options.margin_left_mm, y + cell_h);
            if next.1 + cell_h > page_h {
                return (first, true);
            }
        }
        (next, false)
    }

    /// Find the next free cell, starting a page when needed. The cell only
    /// counts as used once it is passed to `commit`.
    fn reserve(&mut self) -> Result<(f64, f64)> {
        let (slot, new_page) = self.next_slot();
        if new_page {
            self.start_page()?;
        }
        Ok(slot)
    }

    fn commit(&mut self, slot: (f64, f64)) {
        self.cursor = Some(slot);
        self.page_open = false;
    }

    /// Forget the current page so the next cell starts a new one
    fn close_page(&mut self) {
        self.cursor = None;
        self.page_open = false;
    }

    /// True when no further cell fits on the page after `(x, y)`
    fn is_last_slot(&self, x: f64, y: f64) -> bool {
        let (page_w, page_h) = self.options.page_size_mm();
        let last_on_row = x + 2.0 * self.options.cell_width_mm() > page_w;
        let last_on_column = y + 2.0 * self.options.cell_height_mm() > page_h;
        last_on_row && last_on_column
    }

    fn cell(&self, x: f64, y: f64) -> CellGeometry {
        CellGeometry {
            x,
            y,
            card_width: self.options.card_width_mm,
            card_height: self.options.card_height_mm,
            gutter: self.options.gutter_mm,
        }
    }

    fn draw_marks(&mut self, cell: &CellGeometry) -> Result<()> {
        for segment in card_marks(self.options.shape, cell) {
            self.surface.draw_line(segment)?;
        }
        Ok(())
    }

    /// Bitmap for a cell of the given size; SVGs are rasterised to fit it
    fn load(source: &ImageSource, width_mm: f64, height_mm: f64) -> Result<RgbaImage> {
        let target = match source {
            ImageSource::Path(path) if card_maker::source::is_svg(path) => Some((
                mm_to_print_px(width_mm),
                mm_to_print_px(height_mm),
            )),
            _ => None,
        };
        Ok(source.load(target)?)
    }

    fn check_drawable(image: &RgbaImage, side: &str) -> Result<()> {
        if image.width() == 0 || image.height() == 0 {
            return Err(SheetError::Config(format!("Card {} image is empty", side)));
        }
        Ok(())
    }

    /// Place a card front in the next cell and queue its back.
    ///
    /// Filling the last cell on a page emits the backs page straight away.
    pub fn add(&mut self, card: PrintCard) -> Result<()> {
        let g = self.options.gutter_mm;
        let width = self.options.card_width_mm + 2.0 * g - 2.0 * card.x_offset_mm;
        let height = self.options.card_height_mm + 2.0 * g - 2.0 * card.y_offset_mm;
        if width <= 0.0 || height <= 0.0 {
            return Err(SheetError::Config(format!(
                "Offset ({}, {}) leaves no room for the card",
                card.x_offset_mm, card.y_offset_mm
            )));
        }

        let front = Self::load(&card.front, width, height)?;
        Self::check_drawable(&front, "front")?;
        let back = if self.options.include_backs {
            card.back
                .as_ref()
                .map(|b| Self::load(b, self.options.cell_width_mm(), self.options.cell_height_mm()))
                .transpose()?
        } else {
            None
        };
        if let Some(back) = &back {
            Self::check_drawable(back, "back")?;
        }

        // A failed draw leaves the cell free, keeping later backs aligned
        let (x, y) = self.reserve()?;
        let rect = MmRect::new(x + card.x_offset_mm, y + card.y_offset_mm, width, height);
        self.surface.draw_image(&front, rect)?;
        let cell = self.cell(x, y);
        self.draw_marks(&cell)?;
        self.commit((x, y));

        self.cards += 1;
        debug!("Card {} at ({:.1}, {:.1})mm", self.cards, x, y);
        self.backs.push(PendingBack { image: back, x, y });

        if self.is_last_slot(x, y) {
            self.add_backs_page()?;
        }
        Ok(())
    }

    /// Emit the queued backs on a new, mirrored page.
    ///
    /// Call this after the last card. The next front always starts a new
    /// page, even when drawing a back fails.
    pub fn add_backs_page(&mut self) -> Result<()> {
        self.close_page();
        let backs = std::mem::take(&mut self.backs);

        if !self.options.include_backs || backs.is_empty() {
            return Ok(());
        }

        let mirror = Mirror::from(self.options.flip);
        debug!("Backs page with {} card(s), mirrored {:?}", backs.len(), mirror);
        let result = self.draw_backs(&backs, mirror);
        self.close_page();
        result
    }

    fn draw_backs(&mut self, backs: &[PendingBack], mirror: Mirror) -> Result<()> {
        for (i, back) in backs.iter().enumerate() {
            let (x, y) = self.reserve()?;
            if (x, y) != (back.x, back.y) {
                warn!(
                    "Back slot ({:.1}, {:.1}) differs from its front ({:.1}, {:.1})",
                    x, y, back.x, back.y
                );
            }

            self.surface.begin_mirror(mirror)?;
            let drawn = self.draw_back(back, x, y, mirror);
            let ended = self.surface.end_mirror();
            if let Err(e) = drawn.and(ended) {
                warn!("{} card back(s) not printed", backs.len() - i);
                return Err(e);
            }
            self.commit((x, y));
        }
        Ok(())
    }

    fn draw_back(&mut self, back: &PendingBack, x: f64, y: f64, mirror: Mirror) -> Result<()> {
        if let Some(image) = &back.image {
            let rect = MmRect::new(
                x,
                y,
                self.options.cell_width_mm(),
                self.options.cell_height_mm(),
            );
            self.surface.draw_image(&mirror.flip_image(image), rect)?;
        }
        let cell = self.cell(x, y);
        self.draw_marks(&cell)
    }

    /// Write the document. Backs still queued are not written; call
    /// `add_backs_page` first.
    pub fn output(&mut self, path: impl AsRef<Path>) -> Result<()> {
        if self.options.include_backs && !self.backs.is_empty() {
            warn!(
                "{} card back(s) still pending; call add_backs_page before output",
                self.backs.len()
            );
        }
        let path = path.as_ref();
        self.surface.write(path)?;
        info!(
            "{} card(s) on {} page(s) written to {}",
            self.cards,
            self.surface.page_count(),
            path.display()
        );
        Ok(())
    }
}

fn mm_to_print_px(mm: f64) -> u32 {
    (mm / 25.4 * SVG_PRINT_DPI).round().max(1.0) as u32
}
