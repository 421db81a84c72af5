//! Paper retrieval
//!
//! Maps a query embedding to the closest paper and matches free text
//! against paper ids and titles.

mod nearest;
mod title;

pub use nearest::{cosine_similarity, find_closest};
pub use title::{search_titles, TitleMatch, DEFAULT_SEARCH_LIMIT};
