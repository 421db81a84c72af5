//! Nearest-neighbor matching over stored paper embeddings

use citemap_common::models::PaperCatalog;

/// Cosine similarity of two vectors.
///
/// A zero-norm vector scores -1 so that it loses against any real
/// comparison. Vectors of different lengths are not comparable and score
/// NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let norm = |v: &[f32]| v.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>().sqrt();
    let (norm_a, norm_b) = (norm(a), norm(b));

    if norm_a == 0.0 || norm_b == 0.0 {
        return -1.0;
    }
    if a.len() != b.len() {
        return f64::NAN;
    }

    let dot: f64 = a.iter().zip(b).map(|(&x, &y)| x as f64 * y as f64).sum();
    dot / (norm_a * norm_b)
}

/// Id of the paper most similar to `query`.
///
/// Papers that were never embedded are skipped, as are scores that are not
/// comparable. An empty stored vector counts as a zero vector. The first
/// paper in catalog order wins a tie.
pub fn find_closest<'a>(papers: &'a PaperCatalog, query: &[f32]) -> Option<&'a str> {
    let mut best: Option<(&str, f64)> = None;

    for (id, paper) in papers {
        let Some(embedding) = paper.embedding.as_deref() else {
            continue;
        };

        let score = cosine_similarity(query, embedding);
        if score.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((id.as_str(), score));
        }
    }

    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use citemap_common::models::PaperRecord;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn catalog(entries: &[(&str, Vec<f32>)]) -> PaperCatalog {
        entries
            .iter()
            .map(|(id, v)| (*id, PaperRecord::new(*id).with_embedding(v.clone())))
            .collect()
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-9);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-9);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-9);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), -1.0);
        assert!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]).is_nan());
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[]), -1.0);
    }

    #[test]
    fn test_identical_vector_is_found() {
        let mut rng = StdRng::seed_from_u64(3);
        let entries: Vec<(String, Vec<f32>)> = (0..20)
            .map(|i| (format!("P{:02}", i), (0..16).map(|_| rng.gen::<f32>() - 0.5).collect()))
            .collect();
        let papers: PaperCatalog = entries
            .iter()
            .map(|(id, v)| (id.as_str(), PaperRecord::new(id.clone()).with_embedding(v.clone())))
            .collect();

        for (id, v) in &entries {
            assert_eq!(find_closest(&papers, v), Some(id.as_str()));
        }
    }

    #[test]
    fn test_first_maximum_wins() {
        let papers = catalog(&[("A", vec![1.0, 0.0]), ("B", vec![2.0, 0.0]), ("C", vec![0.0, 1.0])]);
        assert_eq!(find_closest(&papers, &[3.0, 0.0]), Some("A"));
    }

    #[test]
    fn test_empty_catalog() {
        assert_eq!(find_closest(&PaperCatalog::new(), &[1.0]), None);
    }

    #[test]
    fn test_zero_vectors_never_fault() {
        let papers = catalog(&[("A", vec![0.0, 0.0]), ("B", vec![0.0, 1.0])]);
        assert_eq!(find_closest(&papers, &[0.0, 1.0]), Some("B"));
        // Zero query scores -1 everywhere, so the first paper wins
        assert_eq!(find_closest(&papers, &[0.0, 0.0]), Some("A"));
    }

    #[test]
    fn test_papers_without_embedding_skipped() {
        let mut papers = catalog(&[("B", vec![0.0, 1.0])]);
        papers.insert("A", PaperRecord::new("never embedded"));
        assert_eq!(find_closest(&papers, &[1.0, 0.0]), Some("B"));

        let mut unembedded = PaperCatalog::new();
        unembedded.insert("A", PaperRecord::new("never embedded"));
        assert_eq!(find_closest(&unembedded, &[1.0]), None);
    }

    #[test]
    fn test_empty_vectors_score_as_zero_vectors() {
        let papers = catalog(&[("A", vec![]), ("B", vec![])]);
        assert_eq!(find_closest(&papers, &[1.0, 0.0]), Some("A"));

        let papers = catalog(&[("A", vec![]), ("B", vec![-1.0, 0.0])]);
        assert_eq!(find_closest(&papers, &[1.0, 0.0]), Some("A"));
    }

    #[test]
    fn test_length_mismatch_never_wins() {
        let papers = catalog(&[("A", vec![1.0, 0.0, 0.0]), ("B", vec![-1.0, 0.0])]);
        assert_eq!(find_closest(&papers, &[1.0, 0.0]), Some("B"));
        assert_eq!(find_closest(&catalog(&[("A", vec![1.0])]), &[1.0, 0.0]), None);
    }

    #[test]
    fn test_tie_goes_to_first_in_file_order() {
        let papers = PaperCatalog::from_json_str(r#"{"B": {"vector": [1.0, 0.0]}, "A": {"vector": [2.0, 0.0]}}"#).unwrap();
        assert_eq!(find_closest(&papers, &[1.0, 0.0]), Some("B"));
    }
}
