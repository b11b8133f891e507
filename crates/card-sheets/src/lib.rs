mod contact;
mod options;
pub mod print;
mod types;

pub use contact::ContactSheet;
pub use options::*;
pub use print::{PdfSurface, PrintCard, PrintLayout, PrintSurface};
pub use types::*;
