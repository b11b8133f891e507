pub mod anchor;
pub mod bounds;
mod canvas;
pub mod compose;
pub mod html;
pub mod optimise;
pub mod source;
pub mod text;
mod types;
pub mod units;

pub use anchor::{HorizontalAnchor, TextAlign, TextAnchor, VerticalAnchor, anchor_code};
pub use bounds::{Bounds, BoxSpec};
pub use canvas::{
    CanvasOptions, CardCanvas, DEFAULT_TEXT_LINE_SPACING_MM, TextBounds, TextOptions,
};
pub use html::{ChromeRenderer, HtmlRenderer, HtmlStyle, VerticalAlign};
pub use optimise::{Assessment, optimise};
pub use source::{ImageSource, ResizeRequest};
pub use text::{Font, InkBounds, TextBlock, TypeFace, insert_new_lines};
pub use types::*;
pub use units::{Geometry, Measure, Unit, UnitConverter};
