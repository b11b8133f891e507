//! Pixel/millimetre measurement handling
//!
//! A card is described in one default unit (px or mm) together with the width
//! in the other unit. That single pair fixes the conversion ratio used for
//! every other quantity on the card.

use crate::types::{CardError, Result};
use std::fmt;
use std::str::FromStr;

/// Unit a card's dimensions are expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Px,
    Mm,
}

impl FromStr for Unit {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "px" => Ok(Unit::Px),
            "mm" => Ok(Unit::Mm),
            other => Err(CardError::Config(format!(
                "Unit must be px or mm, but got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Px => f.write_str("px"),
            Unit::Mm => f.write_str("mm"),
        }
    }
}

/// Converts between the default unit, pixels and millimetres.
///
/// The ratio is fixed when the converter is built and never changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConverter {
    unit: Unit,
    width_px: f64,
    width_mm: f64,
}

impl UnitConverter {
    pub fn new(unit: Unit, width_px: f64, width_mm: f64) -> Self {
        Self {
            unit,
            width_px,
            width_mm,
        }
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn px_per_mm(&self) -> f64 {
        self.width_px / self.width_mm
    }

    /// Default unit to pixels
    pub fn to_px(&self, value: f64) -> f64 {
        match self.unit {
            Unit::Px => value,
            Unit::Mm => value * self.px_per_mm(),
        }
    }

    /// Default unit to millimetres
    pub fn to_mm(&self, value: f64) -> f64 {
        match self.unit {
            Unit::Mm => value,
            Unit::Px => value / self.px_per_mm(),
        }
    }

    /// Pixels to the default unit
    pub fn from_px(&self, px: f64) -> f64 {
        match self.unit {
            Unit::Px => px,
            Unit::Mm => px / self.px_per_mm(),
        }
    }

    /// Millimetres to the default unit
    pub fn from_mm(&self, mm: f64) -> f64 {
        match self.unit {
            Unit::Mm => mm,
            Unit::Px => mm * self.px_per_mm(),
        }
    }

    pub fn to_px_opt(&self, value: Option<f64>) -> Option<f64> {
        value.map(|v| self.to_px(v))
    }

    pub fn to_mm_opt(&self, value: Option<f64>) -> Option<f64> {
        value.map(|v| self.to_mm(v))
    }

    pub fn from_px_opt(&self, px: Option<f64>) -> Option<f64> {
        px.map(|v| self.from_px(v))
    }

    pub fn from_mm_opt(&self, mm: Option<f64>) -> Option<f64> {
        mm.map(|v| self.from_mm(v))
    }

    /// Convert a default-unit value to a whole number of pixels (truncating)
    pub fn whole_px(&self, value: f64) -> u32 {
        whole_px(self.to_px(value))
    }

    /// Build the measurement triple for a default-unit value
    pub fn measure(&self, value: f64) -> Measure {
        let px = self.whole_px(value);
        let mm = match self.unit {
            Unit::Mm => value,
            Unit::Px => self.to_mm(px as f64),
        };
        Measure { value, px, mm }
    }
}

/// Truncate a pixel quantity to a whole, non-negative pixel count
pub fn whole_px(px: f64) -> u32 {
    if px.is_finite() && px > 0.0 {
        px as u32
    } else {
        0
    }
}

/// A linear quantity in the default unit, whole pixels and millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measure {
    pub value: f64,
    pub px: u32,
    pub mm: f64,
}

/// Card dimensions with all three representations fixed at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    converter: UnitConverter,
    pub width: Measure,
    pub height: Measure,
    pub gutter: Measure,
}

impl Geometry {
    /// Derive the card geometry.
    ///
    /// `width` is in the default unit; exactly one of `width_px`/`width_mm`
    /// must be given and it must be the unit that is *not* the default.
    pub fn new(
        unit: Option<Unit>,
        width: f64,
        height: f64,
        gutter: f64,
        width_px: Option<f64>,
        width_mm: Option<f64>,
    ) -> Result<Self> {
        let unit =
            unit.ok_or_else(|| CardError::Config("Must specify the unit being used".into()))?;

        let other = match (unit, width_px, width_mm) {
            (_, None, None) => {
                return Err(CardError::Config(
                    "Must specify width_mm or width_px".into(),
                ));
            }
            (_, Some(_), Some(_)) => {
                return Err(CardError::Config(
                    "Cannot specify width of both mm and px".into(),
                ));
            }
            (Unit::Px, Some(_), None) => {
                return Err(CardError::Config(
                    "Cannot specify width_px when default unit is also px".into(),
                ));
            }
            (Unit::Mm, None, Some(_)) => {
                return Err(CardError::Config(
                    "Cannot specify width_mm when default unit is also mm".into(),
                ));
            }
            (Unit::Px, None, Some(mm)) => mm,
            (Unit::Mm, Some(px), None) => px,
        };

        if !(width > 0.0 && other > 0.0) {
            return Err(CardError::Config(format!(
                "Card width must be positive, got {} and {}",
                width, other
            )));
        }
        if !(height > 0.0) {
            return Err(CardError::Config(format!(
                "Card height must be positive, got {}",
                height
            )));
        }
        if gutter < 0.0 {
            return Err(CardError::Config(format!(
                "Gutter cannot be negative, got {}",
                gutter
            )));
        }

        // The requested pair gives the basis ratio; the final ratio is taken
        // from the truncated pixel width so that every later conversion agrees
        // with the bitmap size.
        let basis = match unit {
            Unit::Px => UnitConverter::new(unit, width, other),
            Unit::Mm => UnitConverter::new(unit, other, width),
        };
        let width_px = basis.whole_px(width);
        if width_px == 0 {
            return Err(CardError::Config(
                "Card width is less than one pixel".into(),
            ));
        }
        let width_mm = match unit {
            Unit::Mm => width,
            Unit::Px => basis.to_mm(width_px as f64),
        };
        let converter = UnitConverter::new(unit, width_px as f64, width_mm);

        Ok(Self {
            converter,
            width: Measure {
                value: width,
                px: width_px,
                mm: width_mm,
            },
            height: converter.measure(height),
            gutter: converter.measure(gutter),
        })
    }

    pub fn converter(&self) -> &UnitConverter {
        &self.converter
    }

    pub fn unit(&self) -> Unit {
        self.converter.unit
    }

    /// Width including a gutter on both sides, in the default unit
    pub fn width_with_gutters(&self) -> f64 {
        self.width.value + 2.0 * self.gutter.value
    }

    pub fn height_with_gutters(&self) -> f64 {
        self.height.value + 2.0 * self.gutter.value
    }

    pub fn width_with_gutters_px(&self) -> u32 {
        self.width.px + 2 * self.gutter.px
    }

    pub fn height_with_gutters_px(&self) -> u32 {
        self.height.px + 2 * self.gutter.px
    }

    pub fn width_with_gutters_mm(&self) -> f64 {
        self.width.mm + 2.0 * self.gutter.mm
    }

    pub fn height_with_gutters_mm(&self) -> f64 {
        self.height.mm + 2.0 * self.gutter.mm
    }
}
