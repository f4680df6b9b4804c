use std::collections::HashMap;

/// Disjoint-set forest over string ids.
///
/// Ids are added lazily the first time they are seen. `find` compresses paths
/// iteratively, and `union` attaches the lower-rank root under the
/// higher-rank one.
#[derive(Debug, Clone, Default)]
pub struct UnionFind {
    names: Vec<String>,
    index: HashMap<String, usize>,
    parent: Vec<usize>,
    rank: Vec<u32>,
}

impl UnionFind {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct ids seen
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Index of `id`, adding it as a singleton if new
    fn slot(&mut self, id: &str) -> usize {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.names.len();
        self.names.push(id.to_string());
        self.index.insert(id.to_string(), idx);
        self.parent.push(idx);
        self.rank.push(0);
        idx
    }

    fn find_index(&mut self, mut idx: usize) -> usize {
        let mut root = idx;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Point every node on the path straight at the root
        while self.parent[idx] != root {
            let next = self.parent[idx];
            self.parent[idx] = root;
            idx = next;
        }
        root
    }

    /// Canonical root of `id`; an unseen id becomes its own singleton set
    pub fn find(&mut self, id: &str) -> &str {
        let idx = self.slot(id);
        let root = self.find_index(idx);
        &self.names[root]
    }

    /// Merge the sets holding `a` and `b`.
    ///
    /// On equal rank the root of `a` is kept. Returns `false` if they were
    /// already in the same set.
    pub fn union(&mut self, a: &str, b: &str) -> bool {
        let a_idx = self.slot(a);
        let b_idx = self.slot(b);
        let root_a = self.find_index(a_idx);
        let root_b = self.find_index(b_idx);
        if root_a == root_b {
            return false;
        }

        match self.rank[root_a].cmp(&self.rank[root_b]) {
            std::cmp::Ordering::Less => self.parent[root_a] = root_b,
            std::cmp::Ordering::Greater => self.parent[root_b] = root_a,
            std::cmp::Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] += 1;
            }
        }
        true
    }

    pub fn connected(&mut self, a: &str, b: &str) -> bool {
        let a_idx = self.slot(a);
        let b_idx = self.slot(b);
        self.find_index(a_idx) == self.find_index(b_idx)
    }

    /// Every id grouped under its root name, in first-seen order within a group
    pub fn groups(&mut self) -> HashMap<String, Vec<String>> {
        let mut groups: HashMap<String, Vec<String>> = HashMap::new();
        for idx in 0..self.names.len() {
            let root = self.find_index(idx);
            groups
                .entry(self.names[root].clone())
                .or_default()
                .push(self.names[idx].clone());
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_singletons() {
        let mut uf = UnionFind::new();
        assert!(uf.is_empty());
        assert_eq!(uf.find("X"), "X");
        assert_eq!(uf.len(), 1);
        assert!(uf.contains("X"));
    }

    #[test]
    fn test_union_and_connected() {
        let mut uf = UnionFind::new();
        assert!(uf.union("A", "B"));
        assert!(uf.union("C", "D"));
        assert!(!uf.connected("A", "C"));
        assert!(uf.union("B", "D"));
        assert!(uf.connected("A", "C"));
        assert!(!uf.union("A", "D"));
        assert_eq!(uf.len(), 4);
    }

    #[test]
    fn test_equal_rank_keeps_first_root() {
        let mut uf = UnionFind::new();
        uf.union("A", "B");
        assert_eq!(uf.find("B"), "A");
        // Rank 1 root absorbs a rank 0 root regardless of argument order
        uf.union("Z", "A");
        assert_eq!(uf.find("Z"), "A");
    }

    #[test]
    fn test_long_chain_compresses() {
        let mut uf = UnionFind::new();
        let ids: Vec<String> = (0..10_000).map(|i| format!("s{i}")).collect();
        for pair in ids.windows(2) {
            uf.union(&pair[1], &pair[0]);
        }
        let root = uf.find("s0").to_string();
        assert_eq!(uf.find("s9999"), root);
        assert_eq!(uf.groups().len(), 1);
    }
}
