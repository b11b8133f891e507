//! Anchor points for placing images and text on a card
//!
//! Each axis names exactly one reference line. Configuration-driven callers
//! that carry optional fields go through `from_options`, which validates that
//! exactly one was supplied.

use crate::types::{CardError, Result};

/// Horizontal reference: which edge (or the centre) sits at the coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HorizontalAnchor {
    Left(f64),
    Centre(f64),
    Right(f64),
}

/// Vertical reference for images
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VerticalAnchor {
    Top(f64),
    Middle(f64),
    Bottom(f64),
}

/// Vertical reference for text.
///
/// `Ascender`/`Descender` refer to the font's line metrics, `Top`/`Bottom`
/// to the inked extent, `Baseline` to the first line's baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextAnchor {
    Ascender(f64),
    Top(f64),
    Middle(f64),
    Baseline(f64),
    Bottom(f64),
    Descender(f64),
}

/// Index and value of the single supplied option
fn exactly_one(names: &str, options: &[Option<f64>]) -> Result<(usize, f64)> {
    let given: Vec<(usize, f64)> = options
        .iter()
        .enumerate()
        .filter_map(|(i, value)| value.map(|v| (i, v)))
        .collect();
    match given.as_slice() {
        [one] => Ok(*one),
        _ => Err(CardError::Config(format!(
            "Must specify exactly one of {} but got {}",
            names,
            given.len()
        ))),
    }
}

impl HorizontalAnchor {
    pub fn from_options(
        x_left: Option<f64>,
        x_centre: Option<f64>,
        x_right: Option<f64>,
    ) -> Result<Self> {
        Ok(
            match exactly_one("x_left, x_centre, x_right", &[x_left, x_centre, x_right])? {
                (0, v) => HorizontalAnchor::Left(v),
                (1, v) => HorizontalAnchor::Centre(v),
                (_, v) => HorizontalAnchor::Right(v),
            },
        )
    }

    pub fn value(self) -> f64 {
        match self {
            HorizontalAnchor::Left(v) | HorizontalAnchor::Centre(v) | HorizontalAnchor::Right(v) => v,
        }
    }

    pub fn with_value(self, v: f64) -> Self {
        match self {
            HorizontalAnchor::Left(_) => HorizontalAnchor::Left(v),
            HorizontalAnchor::Centre(_) => HorizontalAnchor::Centre(v),
            HorizontalAnchor::Right(_) => HorizontalAnchor::Right(v),
        }
    }

    /// Single-letter horizontal anchor code (`l`, `m`, `r`)
    pub fn code(self) -> char {
        match self {
            HorizontalAnchor::Left(_) => 'l',
            HorizontalAnchor::Centre(_) => 'm',
            HorizontalAnchor::Right(_) => 'r',
        }
    }

    /// Alignment of lines within a multi-line block
    pub fn align(self) -> TextAlign {
        match self {
            HorizontalAnchor::Left(_) => TextAlign::Left,
            HorizontalAnchor::Centre(_) => TextAlign::Center,
            HorizontalAnchor::Right(_) => TextAlign::Right,
        }
    }

    /// Left edge of something `extent` wide placed at this anchor
    pub fn start_for(self, extent: f64) -> f64 {
        match self {
            HorizontalAnchor::Left(v) => v,
            HorizontalAnchor::Centre(v) => v - extent / 2.0,
            HorizontalAnchor::Right(v) => v - extent,
        }
    }
}

impl VerticalAnchor {
    pub fn from_options(
        y_top: Option<f64>,
        y_middle: Option<f64>,
        y_bottom: Option<f64>,
    ) -> Result<Self> {
        Ok(
            match exactly_one("y_top, y_middle, y_bottom", &[y_top, y_middle, y_bottom])? {
                (0, v) => VerticalAnchor::Top(v),
                (1, v) => VerticalAnchor::Middle(v),
                (_, v) => VerticalAnchor::Bottom(v),
            },
        )
    }

    pub fn value(self) -> f64 {
        match self {
            VerticalAnchor::Top(v) | VerticalAnchor::Middle(v) | VerticalAnchor::Bottom(v) => v,
        }
    }

    pub fn with_value(self, v: f64) -> Self {
        match self {
            VerticalAnchor::Top(_) => VerticalAnchor::Top(v),
            VerticalAnchor::Middle(_) => VerticalAnchor::Middle(v),
            VerticalAnchor::Bottom(_) => VerticalAnchor::Bottom(v),
        }
    }
}

impl TextAnchor {
    #[allow(clippy::too_many_arguments)]
    pub fn from_options(
        y_ascender: Option<f64>,
        y_top: Option<f64>,
        y_middle: Option<f64>,
        y_baseline: Option<f64>,
        y_bottom: Option<f64>,
        y_descender: Option<f64>,
    ) -> Result<Self> {
        let (index, v) = exactly_one(
            "y_ascender, y_top, y_middle, y_baseline, y_bottom, y_descender",
            &[y_ascender, y_top, y_middle, y_baseline, y_bottom, y_descender],
        )?;
        Ok(match index {
            0 => TextAnchor::Ascender(v),
            1 => TextAnchor::Top(v),
            2 => TextAnchor::Middle(v),
            3 => TextAnchor::Baseline(v),
            4 => TextAnchor::Bottom(v),
            _ => TextAnchor::Descender(v),
        })
    }

    pub fn value(self) -> f64 {
        match self {
            TextAnchor::Ascender(v)
            | TextAnchor::Top(v)
            | TextAnchor::Middle(v)
            | TextAnchor::Baseline(v)
            | TextAnchor::Bottom(v)
            | TextAnchor::Descender(v) => v,
        }
    }

    pub fn with_value(self, v: f64) -> Self {
        match self {
            TextAnchor::Ascender(_) => TextAnchor::Ascender(v),
            TextAnchor::Top(_) => TextAnchor::Top(v),
            TextAnchor::Middle(_) => TextAnchor::Middle(v),
            TextAnchor::Baseline(_) => TextAnchor::Baseline(v),
            TextAnchor::Bottom(_) => TextAnchor::Bottom(v),
            TextAnchor::Descender(_) => TextAnchor::Descender(v),
        }
    }

    /// Single-letter vertical anchor code (`a`, `t`, `m`, `s`, `b`, `d`)
    pub fn code(self) -> char {
        match self {
            TextAnchor::Ascender(_) => 'a',
            TextAnchor::Top(_) => 't',
            TextAnchor::Middle(_) => 'm',
            TextAnchor::Baseline(_) => 's',
            TextAnchor::Bottom(_) => 'b',
            TextAnchor::Descender(_) => 'd',
        }
    }
}

/// Per-line alignment inside a text block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Two-letter anchor code such as `la` or `ms`
pub fn anchor_code(x: HorizontalAnchor, y: TextAnchor) -> String {
    [x.code(), y.code()].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_horizontal() {
        assert_eq!(
            HorizontalAnchor::from_options(None, Some(3.0), None).unwrap(),
            HorizontalAnchor::Centre(3.0)
        );
        match HorizontalAnchor::from_options(Some(1.0), None, Some(2.0)) {
            Err(CardError::Config(msg)) => {
                assert!(msg.contains("one of x_left, x_centre, x_right"));
                assert!(msg.contains("got 2"));
            }
            _ => panic!("Expected Config error"),
        }
        assert!(HorizontalAnchor::from_options(None, None, None).is_err());
    }

    #[test]
    fn test_exactly_one_vertical() {
        match VerticalAnchor::from_options(None, None, None) {
            Err(CardError::Config(msg)) => {
                assert!(msg.contains("one of y_top, y_middle, y_bottom"));
                assert!(msg.contains("got 0"));
            }
            _ => panic!("Expected Config error"),
        }
        assert_eq!(
            VerticalAnchor::from_options(None, None, Some(9.0)).unwrap(),
            VerticalAnchor::Bottom(9.0)
        );
    }

    #[test]
    fn test_text_anchor_codes() {
        let y = TextAnchor::from_options(None, None, None, Some(5.0), None, None).unwrap();
        assert_eq!(anchor_code(HorizontalAnchor::Right(0.0), y), "rs");
        assert_eq!(
            anchor_code(HorizontalAnchor::Centre(0.0), TextAnchor::Descender(0.0)),
            "md"
        );
        assert_eq!(HorizontalAnchor::Centre(0.0).align(), TextAlign::Center);
    }

    #[test]
    fn test_start_for_extent() {
        assert_eq!(HorizontalAnchor::Left(10.0).start_for(4.0), 10.0);
        assert_eq!(HorizontalAnchor::Centre(10.0).start_for(4.0), 8.0);
        assert_eq!(HorizontalAnchor::Right(10.0).start_for(4.0), 6.0);
    }
}
