use crate::options::ContactSheetOptions;
use crate::types::*;
use card_maker::ImageSource;
use card_maker::compose::paste_masked;
use image::{Rgba, RgbaImage};
use log::{debug, info};
use std::path::Path;

/// A grid of card images on one bitmap, filled row by row
#[derive(Debug, Clone)]
pub struct ContactSheet {
    options: ContactSheetOptions,
    rows: usize,
    image: RgbaImage,
    next: usize,
}

impl ContactSheet {
    pub fn new(options: ContactSheetOptions) -> Result<Self> {
        options.validate()?;
        let rows = options.resolved_rows()?;

        let width = options.card_width as u64 * options.columns as u64;
        let height = options.card_height as u64 * rows as u64;
        if width > u32::MAX as u64 || height > u32::MAX as u64 {
            return Err(SheetError::Config(format!(
                "A {}x{} sheet is too large",
                width, height
            )));
        }

        debug!(
            "Contact sheet {}x{} cells of {}x{}px",
            options.columns, rows, options.card_width, options.card_height
        );
        let image = RgbaImage::from_pixel(width as u32, height as u32, Rgba(options.background));

        Ok(Self {
            options,
            rows,
            image,
            next: 0,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.options.columns
    }

    pub fn capacity(&self) -> usize {
        self.rows * self.options.columns
    }

    /// Number of cards added so far
    pub fn len(&self) -> usize {
        self.next
    }

    pub fn is_empty(&self) -> bool {
        self.next == 0
    }

    pub fn is_full(&self) -> bool {
        self.next >= self.capacity()
    }

    /// Stretch `card` to the cell size and paste it into the next free cell.
    ///
    /// Canvases are added without their gutters.
    pub fn add(&mut self, card: impl Into<ImageSource>) -> Result<()> {
        if self.is_full() {
            return Err(SheetError::SheetFull {
                capacity: self.capacity(),
            });
        }

        let cell = (self.options.card_width, self.options.card_height);
        let image = card.into().load(Some(cell))?;

        let column = self.next % self.options.columns;
        let row = self.next / self.options.columns;
        let x = column as i64 * cell.0 as i64;
        let y = row as i64 * cell.1 as i64;
        paste_masked(&mut self.image, &image, x, y);

        debug!("Card {} placed at row {}, column {}", self.next, row, column);
        self.next += 1;
        Ok(())
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Write the sheet; the format follows the file extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.image.save(path)?;
        info!(
            "Saved contact sheet with {} of {} cards to {}",
            self.next,
            self.capacity(),
            path.display()
        );
        Ok(())
    }
}
