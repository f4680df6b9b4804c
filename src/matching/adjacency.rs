//! Forward and reverse neighbor sets built from alignment hits.

use std::collections::{HashMap, HashSet};

use crate::core::hit::AlignmentHit;

/// Transcript (or protein) id -> gene id translation table
pub type IdMap = HashMap<String, String>;

/// Translate an id through an optional map, falling back to the id itself
fn translate<'a>(id: &'a str, map: Option<&'a IdMap>) -> &'a str {
    map.and_then(|m| m.get(id)).map_or(id, String::as_str)
}

/// Rewrite query and subject ids of hits through optional translation maps.
///
/// Ids absent from a map are kept as-is.
pub fn translate_hits(
    hits: &[AlignmentHit],
    query_map: Option<&IdMap>,
    subject_map: Option<&IdMap>,
) -> Vec<AlignmentHit> {
    if query_map.is_none() && subject_map.is_none() {
        return hits.to_vec();
    }
    hits.iter()
        .map(|hit| {
            let mut hit = hit.clone();
            hit.query_id = translate(&hit.query_id, query_map).to_string();
            hit.subject_id = translate(&hit.subject_id, subject_map).to_string();
            hit
        })
        .collect()
}

/// Neighbor sets between query genes and subject genes.
///
/// Set iteration order is unspecified; use [`AdjacencyMap::sorted_keys`]
/// and [`AdjacencyMap::sorted_neighbors`] where order matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyMap {
    /// query gene -> subject genes it hits
    pub forward: HashMap<String, HashSet<String>>,
    /// subject gene -> query genes that hit it
    pub reverse: HashMap<String, HashSet<String>>,
}

impl AdjacencyMap {
    /// Build the map from hits, translating query ids through `query_map` and
    /// subject ids through `subject_map` when given
    pub fn build(
        hits: &[AlignmentHit],
        query_map: Option<&IdMap>,
        subject_map: Option<&IdMap>,
    ) -> Self {
        let mut map = Self::default();
        for hit in hits {
            let query = translate(&hit.query_id, query_map);
            let subject = translate(&hit.subject_id, subject_map);
            map.insert(query, subject);
        }
        map
    }

    /// Record that `query` hits `subject`
    pub fn insert(&mut self, query: &str, subject: &str) {
        self.forward
            .entry(query.to_string())
            .or_default()
            .insert(subject.to_string());
        self.reverse
            .entry(subject.to_string())
            .or_default()
            .insert(query.to_string());
    }

    pub fn subjects_of(&self, query: &str) -> Option<&HashSet<String>> {
        self.forward.get(query)
    }

    pub fn queries_of(&self, subject: &str) -> Option<&HashSet<String>> {
        self.reverse.get(subject)
    }

    /// `subject` is in `forward[query]` and `query` is in `reverse[subject]`
    pub fn is_mutual(&self, query: &str, subject: &str) -> bool {
        self.forward.get(query).is_some_and(|s| s.contains(subject))
            && self.reverse.get(subject).is_some_and(|q| q.contains(query))
    }

    /// Query ids in sorted order
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.forward.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Subject ids in sorted order
    pub fn sorted_reverse_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.reverse.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Sorted neighbors of one id in a neighbor table
    pub fn sorted_neighbors<'a>(
        table: &'a HashMap<String, HashSet<String>>,
        id: &str,
    ) -> Vec<&'a str> {
        let mut neighbors: Vec<&str> = table
            .get(id)
            .map(|set| set.iter().map(String::as_str).collect())
            .unwrap_or_default();
        neighbors.sort_unstable();
        neighbors
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// Build the maps for both search directions.
///
/// `forward_hits` are reference genes searched against the target annotation,
/// `reverse_hits` are target genes searched against the reference annotation.
/// Returns `(reference -> target, target -> reference)`; the reference map
/// translates reference ids on both sides and likewise for the target map.
pub fn build_bidirectional(
    forward_hits: &[AlignmentHit],
    reverse_hits: &[AlignmentHit],
    ref_map: Option<&IdMap>,
    target_map: Option<&IdMap>,
) -> (AdjacencyMap, AdjacencyMap) {
    let forward = AdjacencyMap::build(forward_hits, ref_map, target_map);
    let reverse = AdjacencyMap::build(reverse_hits, target_map, ref_map);
    (forward, reverse)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(q: &str, s: &str) -> AlignmentHit {
        AlignmentHit::new(q, s)
    }

    #[test]
    fn test_build_dedups() {
        let hits = vec![hit("A", "X"), hit("A", "X"), hit("A", "Y"), hit("B", "X")];
        let map = AdjacencyMap::build(&hits, None, None);

        assert_eq!(map.subjects_of("A").unwrap().len(), 2);
        assert_eq!(map.queries_of("X").unwrap().len(), 2);
        assert_eq!(map.sorted_keys(), vec!["A", "B"]);
        assert_eq!(
            AdjacencyMap::sorted_neighbors(&map.reverse, "X"),
            vec!["A", "B"]
        );
        assert!(map.is_mutual("A", "Y"));
        assert!(!map.is_mutual("B", "Y"));
    }

    #[test]
    fn test_translation_with_fallback() {
        let query_map: IdMap = [("A.t1", "A"), ("A.t2", "A")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let subject_map: IdMap = [("X.t1", "X")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let hits = vec![hit("A.t1", "X.t1"), hit("A.t2", "Y.t1"), hit("B", "X.t1")];
        let map = AdjacencyMap::build(&hits, Some(&query_map), Some(&subject_map));

        assert_eq!(
            AdjacencyMap::sorted_neighbors(&map.forward, "A"),
            vec!["X", "Y.t1"]
        );
        assert_eq!(
            AdjacencyMap::sorted_neighbors(&map.reverse, "X"),
            vec!["A", "B"]
        );
        assert!(map.subjects_of("A.t1").is_none());
    }

    #[test]
    fn test_translate_hits() {
        let map: IdMap = [("A.t1".to_string(), "A".to_string())].into_iter().collect();
        let hits = vec![hit("A.t1", "X"), hit("B", "A.t1")];
        let translated = translate_hits(&hits, Some(&map), None);
        assert_eq!(translated[0].query_id, "A");
        assert_eq!(translated[1].query_id, "B");
        // Subject side is untouched without a subject map
        assert_eq!(translated[1].subject_id, "A.t1");
    }

    #[test]
    fn test_empty() {
        let map = AdjacencyMap::build(&[], None, None);
        assert!(map.is_empty());
        assert!(map.sorted_keys().is_empty());
        assert!(AdjacencyMap::sorted_neighbors(&map.forward, "A").is_empty());
    }

    #[test]
    fn test_build_bidirectional() {
        let fwd = vec![hit("R1", "T1"), hit("R1", "T2")];
        let rev = vec![hit("T1", "R1")];
        let (f, r) = build_bidirectional(&fwd, &rev, None, None);
        assert_eq!(f.subjects_of("R1").unwrap().len(), 2);
        assert!(r.subjects_of("T1").unwrap().contains("R1"));
        assert!(r.queries_of("R1").unwrap().contains("T1"));
    }
}
