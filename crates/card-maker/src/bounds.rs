//! Rectangle resolution from partial edge/size/centre constraints

use crate::types::{CardError, Result};

/// A resolved rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

/// Partially specified rectangle.
///
/// Each axis takes at most two of start edge, end edge, size and centre.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxSpec {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub centre: Option<f64>,
    pub middle: Option<f64>,
}

impl BoxSpec {
    pub fn left(mut self, v: f64) -> Self {
        self.left = Some(v);
        self
    }

    pub fn top(mut self, v: f64) -> Self {
        self.top = Some(v);
        self
    }

    pub fn right(mut self, v: f64) -> Self {
        self.right = Some(v);
        self
    }

    pub fn bottom(mut self, v: f64) -> Self {
        self.bottom = Some(v);
        self
    }

    pub fn width(mut self, v: f64) -> Self {
        self.width = Some(v);
        self
    }

    pub fn height(mut self, v: f64) -> Self {
        self.height = Some(v);
        self
    }

    pub fn centre(mut self, v: f64) -> Self {
        self.centre = Some(v);
        self
    }

    pub fn middle(mut self, v: f64) -> Self {
        self.middle = Some(v);
        self
    }

    /// Solve both axes, using the defaults for a missing size
    pub fn resolve(&self, default_width: f64, default_height: f64) -> Result<Bounds> {
        let (left, right, width) = solve_axis(
            "horizontal",
            self.left,
            self.right,
            self.width,
            self.centre,
            default_width,
        )?;
        let (top, bottom, height) = solve_axis(
            "vertical",
            self.top,
            self.bottom,
            self.height,
            self.middle,
            default_height,
        )?;
        Ok(Bounds {
            left,
            top,
            right,
            bottom,
            width,
            height,
        })
    }
}

fn solve_axis(
    axis: &str,
    start: Option<f64>,
    end: Option<f64>,
    size: Option<f64>,
    centre: Option<f64>,
    default_size: f64,
) -> Result<(f64, f64, f64)> {
    let given = [start, end, size, centre]
        .iter()
        .filter(|v| v.is_some())
        .count();
    if given > 2 {
        return Err(CardError::Config(format!(
            "Box is over-constrained on the {} axis: {} values given, at most 2 allowed",
            axis, given
        )));
    }

    // Collapse the centre into edges first
    let (start, end, size) = match (centre, start, end, size) {
        (Some(c), None, None, Some(s)) => (Some(c - s / 2.0), Some(c + s / 2.0), Some(s)),
        (Some(c), Some(a), None, None) => (Some(a), Some(2.0 * c - a), None),
        (Some(c), None, Some(b), None) => (Some(2.0 * c - b), Some(b), None),
        (Some(c), None, None, None) => (
            Some(c - default_size / 2.0),
            Some(c + default_size / 2.0),
            Some(default_size),
        ),
        (_, start, end, size) => (start, end, size),
    };

    match (start, end, size) {
        (Some(a), Some(b), _) => Ok((a, b, b - a)),
        (Some(a), None, Some(s)) => Ok((a, a + s, s)),
        (None, Some(b), Some(s)) => Ok((b - s, b, s)),
        (Some(a), None, None) => Ok((a, a + default_size, default_size)),
        (None, Some(b), None) => Ok((b - default_size, b, default_size)),
        (None, None, _) => Err(CardError::Config(format!(
            "Box is under-constrained on the {} axis: an edge or centre is required",
            axis
        ))),
    }
}
