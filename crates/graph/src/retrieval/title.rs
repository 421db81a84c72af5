//! Title search

use citemap_common::models::PaperCatalog;

pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// One search hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleMatch {
    pub id: String,
    pub title: String,
}

/// Papers whose id contains `query`, or whose title contains it ignoring
/// case, in catalog order. An empty query matches nothing.
pub fn search_titles(papers: &PaperCatalog, query: &str, limit: usize) -> Vec<TitleMatch> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    papers
        .iter()
        .filter(|(id, paper)| id.contains(query) || paper.title.to_lowercase().contains(&needle))
        .take(limit)
        .map(|(id, paper)| TitleMatch {
            id: id.clone(),
            title: paper.title.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use citemap_common::models::PaperRecord;

    fn papers() -> PaperCatalog {
        [
            ("PMC101", "Bone Density Loss in Microgravity"),
            ("PMC102", "Plant growth on the ISS"),
            ("PMC203", "Microgravity and muscle atrophy"),
        ]
        .into_iter()
        .map(|(id, title)| (id, PaperRecord::new(title)))
        .collect()
    }

    #[test]
    fn test_title_match_ignores_case() {
        let hits = search_titles(&papers(), "MICROGRAVITY", DEFAULT_SEARCH_LIMIT);
        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["PMC101", "PMC203"]);
    }

    #[test]
    fn test_id_match_is_case_sensitive() {
        assert_eq!(search_titles(&papers(), "PMC10", DEFAULT_SEARCH_LIMIT).len(), 2);
        assert!(search_titles(&papers(), "pmc10", DEFAULT_SEARCH_LIMIT).is_empty());
    }

    #[test]
    fn test_limit_and_empty_query() {
        assert_eq!(search_titles(&papers(), "PMC", 1).len(), 1);
        assert!(search_titles(&papers(), "", DEFAULT_SEARCH_LIMIT).is_empty());
    }
}
