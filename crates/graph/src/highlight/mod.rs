//! Focus highlighting
//!
//! `FocusStore` owns the hovered/clicked focus slots and publishes every
//! change over a watch channel. `HighlightEngine` turns the current focus
//! into node and edge colors once per frame.

mod engine;
mod focus;
pub mod palette;

pub use engine::{FrameSummary, HighlightEngine};
pub use focus::{FocusEvent, FocusSource, FocusState, FocusStore};
pub use palette::{EdgeRole, NodeRole, Palette, Rgba};
