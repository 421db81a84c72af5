//! Citemap graph engine
//!
//! The algorithmic core of the citation explorer:
//! - Citation graph construction with cycle rejection at insertion time
//! - Layered initial layout from topological generations, plus a bounded
//!   force relaxation pass
//! - Focus highlighting of transitive ancestors and descendants
//! - Nearest-neighbor semantic matching and title search

pub mod citation;
pub mod highlight;
pub mod layout;
pub mod retrieval;

pub use citation::{build, BuildOutcome, BuildReport, CitationGraph, GraphEdge, GraphNode};
pub use highlight::{FocusEvent, FocusSource, FocusState, FocusStore, FrameSummary, HighlightEngine, Palette};
pub use layout::{LayeredPlanner, LayoutReport, LayoutRefiner};
pub use retrieval::{find_closest, search_titles, TitleMatch};
