use serde::{Deserialize, Serialize};

/// Cluster membership of one sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    /// 1-based, assigned in ascending order of the sorted canonical root ids
    pub cluster_number: usize,
    pub sequence_id: String,
    /// Canonical root of the cluster. Depends on union order; do not rely on
    /// which member is chosen.
    pub representative: String,
    pub cluster_size: usize,
}

impl ClusterAssignment {
    pub const TSV_HEADER: &'static str = "cluster\tsequence_id\trepresentative\tcluster_size";

    pub fn tsv_row(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}",
            self.cluster_number, self.sequence_id, self.representative, self.cluster_size
        )
    }
}

/// Size and membership summary for one cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterStats {
    pub cluster_number: usize,
    pub representative: String,
    pub size: usize,
    /// Sorted member ids
    pub members: Vec<String>,
}
