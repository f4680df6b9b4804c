//! Union-Find clustering of sequence ids from pairwise cluster tables.
//!
//! Every `(representative, member)` pair is unioned; every id ever seen ends
//! up in exactly one cluster. Clusters are numbered from 1 in ascending order
//! of their root id. The root printed as a cluster's representative depends on
//! the order pairs were unioned, so only the partition itself is stable across
//! input orderings.

pub mod union_find;

use std::collections::HashMap;

use tracing::debug;

use crate::core::cluster::{ClusterAssignment, ClusterStats};
pub use union_find::UnionFind;

/// The clusters resolved from one pair stream
#[derive(Debug, Clone, Default)]
pub struct ClusterSet {
    /// Ordered by cluster number, then sequence id
    assignments: Vec<ClusterAssignment>,

    /// Index: sequence id -> index in assignments
    by_sequence: HashMap<String, usize>,

    /// Index: representative -> cluster number
    by_representative: HashMap<String, usize>,

    cluster_count: usize,
}

/// Cluster a stream of `(representative, member)` pairs
pub fn parse_clusters<I, A, B>(pairs: I) -> ClusterSet
where
    I: IntoIterator<Item = (A, B)>,
    A: AsRef<str>,
    B: AsRef<str>,
{
    let mut uf = UnionFind::new();
    let mut pair_count = 0usize;
    for (rep, member) in pairs {
        uf.union(rep.as_ref(), member.as_ref());
        pair_count += 1;
    }

    let mut groups: Vec<(String, Vec<String>)> = uf.groups().into_iter().collect();
    groups.sort_by(|a, b| a.0.cmp(&b.0));

    let mut assignments = Vec::with_capacity(uf.len());
    let mut by_representative = HashMap::with_capacity(groups.len());
    for (i, (root, mut members)) in groups.into_iter().enumerate() {
        let cluster_number = i + 1;
        members.sort();
        let cluster_size = members.len();
        for sequence_id in members {
            assignments.push(ClusterAssignment {
                cluster_number,
                sequence_id,
                representative: root.clone(),
                cluster_size,
            });
        }
        by_representative.insert(root, cluster_number);
    }

    let by_sequence = assignments
        .iter()
        .enumerate()
        .map(|(i, a)| (a.sequence_id.clone(), i))
        .collect();

    let cluster_count = by_representative.len();
    debug!(
        "Clustered {} ids from {} pairs into {} clusters",
        assignments.len(),
        pair_count,
        cluster_count
    );

    ClusterSet {
        assignments,
        by_sequence,
        by_representative,
        cluster_count,
    }
}

impl ClusterSet {
    /// One row per sequence id, ordered by cluster number then id
    pub fn assignments(&self) -> &[ClusterAssignment] {
        &self.assignments
    }

    /// Number of clusters
    pub fn len(&self) -> usize {
        self.cluster_count
    }

    pub fn is_empty(&self) -> bool {
        self.cluster_count == 0
    }

    /// Number of sequence ids across all clusters
    pub fn sequence_count(&self) -> usize {
        self.assignments.len()
    }

    pub fn singleton_count(&self) -> usize {
        self.assignments.iter().filter(|a| a.cluster_size == 1).count()
    }

    pub fn cluster_of(&self, sequence_id: &str) -> Option<&ClusterAssignment> {
        self.by_sequence
            .get(sequence_id)
            .map(|&idx| &self.assignments[idx])
    }

    /// Sorted members of the cluster labelled `representative`; empty if no
    /// cluster carries that label
    pub fn members_of(&self, representative: &str) -> Vec<&str> {
        let Some(&number) = self.by_representative.get(representative) else {
            return Vec::new();
        };
        self.assignments
            .iter()
            .filter(|a| a.cluster_number == number)
            .map(|a| a.sequence_id.as_str())
            .collect()
    }

    /// Per-cluster summary, largest first; ties by cluster number
    pub fn stats(&self) -> Vec<ClusterStats> {
        let mut stats: Vec<ClusterStats> = Vec::with_capacity(self.cluster_count);
        for a in &self.assignments {
            match stats.last_mut() {
                Some(s) if s.cluster_number == a.cluster_number => {
                    s.members.push(a.sequence_id.clone());
                }
                _ => stats.push(ClusterStats {
                    cluster_number: a.cluster_number,
                    representative: a.representative.clone(),
                    size: a.cluster_size,
                    members: vec![a.sequence_id.clone()],
                }),
            }
        }
        stats.sort_by(|a, b| {
            b.size
                .cmp(&a.size)
                .then_with(|| a.cluster_number.cmp(&b.cluster_number))
        });
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn partition(set: &ClusterSet) -> BTreeSet<Vec<String>> {
        set.stats().into_iter().map(|s| s.members).collect()
    }

    fn members(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_two_clusters() {
        let set = parse_clusters([("A", "A"), ("A", "B"), ("A", "C"), ("D", "D")]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.sequence_count(), 4);
        assert_eq!(set.singleton_count(), 1);

        let stats = set.stats();
        assert_eq!(stats[0].size, 3);
        assert_eq!(stats[0].members, members(&["A", "B", "C"]));
        assert_eq!(stats[1].size, 1);
        assert_eq!(stats[1].members, members(&["D"]));

        assert_eq!(set.members_of("A"), vec!["A", "B", "C"]);
        assert!(set.members_of("B").is_empty());
        assert_eq!(set.cluster_of("C").unwrap().cluster_size, 3);
    }

    #[test]
    fn test_numbering_follows_sorted_roots() {
        let set = parse_clusters([("Z", "Y"), ("B", "C")]);
        let rows = set.assignments();
        assert_eq!(rows[0].sequence_id, "B");
        assert_eq!(rows[0].cluster_number, 1);
        assert_eq!(rows[2].representative, "Z");
        assert_eq!(rows[2].cluster_number, 2);
        assert_eq!(rows[2].sequence_id, "Y");
    }

    #[test]
    fn test_partition_independent_of_order() {
        let pairs = [("A", "A"), ("A", "B"), ("C", "C")];
        let expected = partition(&parse_clusters(pairs));
        let permutations = [
            [pairs[0], pairs[2], pairs[1]],
            [pairs[1], pairs[0], pairs[2]],
            [pairs[1], pairs[2], pairs[0]],
            [pairs[2], pairs[0], pairs[1]],
            [pairs[2], pairs[1], pairs[0]],
        ];
        for perm in permutations {
            assert_eq!(partition(&parse_clusters(perm)), expected);
        }
        assert_eq!(
            expected,
            [members(&["A", "B"]), members(&["C"])].into_iter().collect()
        );
    }

    #[test]
    fn test_every_id_in_exactly_one_cluster() {
        let pairs = [("r1", "m1"), ("r2", "m2"), ("m1", "m2"), ("r3", "r3")];
        let set = parse_clusters(pairs);
        let mut seen = BTreeSet::new();
        for a in set.assignments() {
            assert!(seen.insert(a.sequence_id.clone()));
        }
        assert_eq!(seen.len(), 5);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_empty_stream() {
        let set = parse_clusters(Vec::<(String, String)>::new());
        assert!(set.is_empty());
        assert!(set.stats().is_empty());
        assert!(set.assignments().is_empty());
    }
}
