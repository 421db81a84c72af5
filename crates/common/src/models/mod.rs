//! Paper data model
//!
//! The data source is a single JSON object mapping paper ids to records.
//! It is loaded once at startup and treated as an immutable snapshot for
//! the duration of one graph build.

mod paper;
mod text;

pub use paper::{Iter, PaperCatalog, PaperRecord};
pub use text::{display_label, format_summary, strip_emphasis, strip_leading_bullets, BULLET};
