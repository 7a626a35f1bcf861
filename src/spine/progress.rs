use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Milestones in a project's path from draft to published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpineNodeId {
    Writing,
    Editing,
    CoverDesign,
    IsbnAssigned,
    Formatting,
    Distribution,
    Published,
}

impl SpineNodeId {
    pub const ALL: [SpineNodeId; 7] = [
        SpineNodeId::Writing,
        SpineNodeId::Editing,
        SpineNodeId::CoverDesign,
        SpineNodeId::IsbnAssigned,
        SpineNodeId::Formatting,
        SpineNodeId::Distribution,
        SpineNodeId::Published,
    ];
}

impl fmt::Display for SpineNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SpineNodeId::Writing => "writing",
            SpineNodeId::Editing => "editing",
            SpineNodeId::CoverDesign => "cover design",
            SpineNodeId::IsbnAssigned => "ISBN assigned",
            SpineNodeId::Formatting => "formatting",
            SpineNodeId::Distribution => "distribution",
            SpineNodeId::Published => "published",
        };
        f.write_str(label)
    }
}

/// A node is completed, pending review, or neither. Never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    #[default]
    NotStarted,
    PendingReview,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpineNode {
    pub id: SpineNodeId,
    pub status: NodeStatus,
    pub timestamp: Option<DateTime<Utc>>,
}

impl SpineNode {
    fn fresh(id: SpineNodeId) -> Self {
        Self {
            id,
            status: NodeStatus::NotStarted,
            timestamp: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == NodeStatus::Completed
    }

    pub fn is_pending_review(&self) -> bool {
        self.status == NodeStatus::PendingReview
    }
}

/// Immutable collection of spine nodes keyed by id.
///
/// `set` returns a new collection. Nothing cascades: completing a later
/// node says nothing about earlier ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpineProgress {
    nodes: BTreeMap<SpineNodeId, SpineNode>,
}

impl Default for SpineProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl SpineProgress {
    pub fn new() -> Self {
        let nodes = SpineNodeId::ALL
            .into_iter()
            .map(|id| (id, SpineNode::fresh(id)))
            .collect();
        Self { nodes }
    }

    pub fn get(&self, id: SpineNodeId) -> SpineNode {
        // collections deserialized from older records may lack newer ids
        self.nodes
            .get(&id)
            .cloned()
            .unwrap_or_else(|| SpineNode::fresh(id))
    }

    pub fn set(&self, id: SpineNodeId, status: NodeStatus) -> Self {
        self.set_at(id, status, Utc::now())
    }

    pub fn set_at(&self, id: SpineNodeId, status: NodeStatus, at: DateTime<Utc>) -> Self {
        let timestamp = match status {
            NodeStatus::NotStarted => None,
            NodeStatus::PendingReview | NodeStatus::Completed => Some(at),
        };
        let mut nodes = self.nodes.clone();
        nodes.insert(
            id,
            SpineNode {
                id,
                status,
                timestamp,
            },
        );
        Self { nodes }
    }

    /// Nodes in milestone order.
    pub fn nodes(&self) -> impl Iterator<Item = SpineNode> + '_ {
        SpineNodeId::ALL.into_iter().map(|id| self.get(id))
    }

    pub fn completed_count(&self) -> usize {
        self.nodes().filter(SpineNode::is_completed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_progress_has_every_node_not_started() {
        let progress = SpineProgress::new();
        for node in progress.nodes() {
            assert_eq!(node.status, NodeStatus::NotStarted);
            assert!(!node.is_completed());
            assert!(!node.is_pending_review());
            assert!(node.timestamp.is_none());
        }
        assert_eq!(progress.nodes().count(), SpineNodeId::ALL.len());
    }

    #[test]
    fn test_set_returns_new_collection_and_leaves_original() {
        let original = SpineProgress::new();
        let updated = original.set(SpineNodeId::IsbnAssigned, NodeStatus::Completed);

        assert!(!original.get(SpineNodeId::IsbnAssigned).is_completed());
        let node = updated.get(SpineNodeId::IsbnAssigned);
        assert!(node.is_completed());
        assert!(node.timestamp.is_some());
    }

    #[test]
    fn test_no_cascade_to_earlier_nodes() {
        let progress = SpineProgress::new().set(SpineNodeId::Published, NodeStatus::Completed);
        assert!(!progress.get(SpineNodeId::Writing).is_completed());
        assert!(!progress.get(SpineNodeId::IsbnAssigned).is_completed());
        assert_eq!(progress.completed_count(), 1);
    }

    #[test]
    fn test_pending_then_completed_is_never_both() {
        let progress = SpineProgress::new()
            .set(SpineNodeId::CoverDesign, NodeStatus::PendingReview)
            .set(SpineNodeId::CoverDesign, NodeStatus::Completed);
        let node = progress.get(SpineNodeId::CoverDesign);
        assert!(node.is_completed());
        assert!(!node.is_pending_review());
    }

    #[test]
    fn test_reset_clears_timestamp() {
        let progress = SpineProgress::new()
            .set(SpineNodeId::Editing, NodeStatus::Completed)
            .set(SpineNodeId::Editing, NodeStatus::NotStarted);
        assert!(progress.get(SpineNodeId::Editing).timestamp.is_none());
    }
}
