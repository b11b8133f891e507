//! Printable PDF sheets of cards with cutting marks and duplex backs

mod layout;
pub mod marks;
mod pdf;
mod surface;

pub use layout::{PrintCard, PrintLayout, SVG_PRINT_DPI};
pub use pdf::PdfSurface;
pub use surface::{Mirror, MmRect, PrintSurface, Segment};
