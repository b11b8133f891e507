//! Cell lookups over a CSV sheet, for assembling card content from tables

mod csv;
mod types;
mod workbook;

pub use crate::csv::load_card_text;
pub use types::*;
pub use workbook::{DEFAULT_SEARCH_LIMIT, Workbook};
