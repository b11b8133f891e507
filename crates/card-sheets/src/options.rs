use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Print layout configuration. All lengths are in millimetres.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PrintOptions {
    // Card
    pub card_width_mm: f64,
    pub card_height_mm: f64,
    pub gutter_mm: f64,
    pub shape: CardShape,

    // Backs
    pub include_backs: bool,
    pub flip: Flip,

    // Page
    pub paper: PaperSize,
    pub orientation: Orientation,
    pub margin_left_mm: f64,
    pub margin_top_mm: f64,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            card_width_mm: 63.0,
            card_height_mm: 88.0,
            gutter_mm: 4.0,
            shape: CardShape::Rectangle,
            include_backs: true,
            flip: Flip::Horizontal,
            paper: PaperSize::A4,
            orientation: Orientation::Landscape,
            margin_left_mm: 10.0,
            margin_top_mm: 10.0,
        }
    }
}

impl PrintOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| SheetError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SheetError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Width of one card plus a gutter on each side
    pub fn cell_width_mm(&self) -> f64 {
        self.gutter_mm + self.card_width_mm + self.gutter_mm
    }

    /// Height of one card plus a gutter on each side
    pub fn cell_height_mm(&self) -> f64 {
        self.gutter_mm + self.card_height_mm + self.gutter_mm
    }

    pub fn page_size_mm(&self) -> (f64, f64) {
        self.paper.dimensions_with_orientation(self.orientation)
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if !(self.card_width_mm > 0.0 && self.card_height_mm > 0.0) {
            return Err(SheetError::Config(format!(
                "Card size must be positive, got {} x {} mm",
                self.card_width_mm, self.card_height_mm
            )));
        }
        if self.gutter_mm < 0.0 {
            return Err(SheetError::Config(format!(
                "Gutter cannot be negative, got {} mm",
                self.gutter_mm
            )));
        }
        if self.margin_left_mm < 0.0 || self.margin_top_mm < 0.0 {
            return Err(SheetError::Config("Page margins cannot be negative".into()));
        }

        let (page_w, page_h) = self.page_size_mm();
        if self.margin_left_mm + self.cell_width_mm() > page_w
            || self.margin_top_mm + self.cell_height_mm() > page_h
        {
            return Err(SheetError::Config(format!(
                "A {:.1} x {:.1} mm card cell does not fit on a {:.1} x {:.1} mm page",
                self.cell_width_mm(),
                self.cell_height_mm(),
                page_w,
                page_h
            )));
        }

        Ok(())
    }
}

/// Contact sheet configuration. Cell sizes are in pixels.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContactSheetOptions {
    pub card_width: u32,
    pub card_height: u32,
    pub columns: usize,
    /// Fixed number of rows; conflicts with `cards`
    pub rows: Option<usize>,
    /// Number of cards to make room for; conflicts with `rows`
    pub cards: Option<usize>,
    /// RGBA background
    pub background: [u8; 4],
}

impl Default for ContactSheetOptions {
    fn default() -> Self {
        Self {
            card_width: 0,
            card_height: 0,
            columns: 1,
            rows: None,
            cards: None,
            background: [255, 255, 255, 255],
        }
    }
}

impl ContactSheetOptions {
    pub fn new(card_width: u32, card_height: u32) -> Self {
        Self {
            card_width,
            card_height,
            ..Default::default()
        }
    }

    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| SheetError::Config(format!("Failed to parse config: {}", e)))
    }

    #[cfg(feature = "serde")]
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SheetError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Row count: explicit, or enough for `cards`, or one
    pub fn resolved_rows(&self) -> Result<usize> {
        match (self.rows, self.cards) {
            (Some(_), Some(_)) => Err(SheetError::Config(
                "Cannot specify both 'rows' and 'cards'".into(),
            )),
            (Some(rows), None) => Ok(rows),
            (None, Some(cards)) => Ok(cards.div_ceil(self.columns.max(1)).max(1)),
            (None, None) => Ok(1),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.card_width == 0 || self.card_height == 0 {
            return Err(SheetError::Config(format!(
                "Card size must be positive, got {}x{}px",
                self.card_width, self.card_height
            )));
        }
        if self.columns == 0 {
            return Err(SheetError::Config("Columns must be at least 1".into()));
        }
        if self.resolved_rows()? == 0 {
            return Err(SheetError::Config("Rows must be at least 1".into()));
        }
        Ok(())
    }
}
