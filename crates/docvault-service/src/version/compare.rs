//! Version comparison result types.

use serde::{Deserialize, Serialize};

use docvault_entity::{ChangeType, DocumentChange, DocumentVersion};

/// Aggregate counts over a comparison's change list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeStatistics {
    /// Number of added segments.
    pub additions: u64,
    /// Number of deleted segments.
    pub deletions: u64,
    /// Number of modified segments.
    pub modifications: u64,
    /// Total number of change segments.
    pub total_changes: u64,
}

impl ChangeStatistics {
    /// Tally the change list by change type.
    pub fn from_changes(changes: &[DocumentChange]) -> Self {
        let count = |t: ChangeType| changes.iter().filter(|c| c.change_type == t).count() as u64;
        Self {
            additions: count(ChangeType::Added),
            deletions: count(ChangeType::Deleted),
            modifications: count(ChangeType::Modified),
            total_changes: changes.len() as u64,
        }
    }
}

/// Result of comparing two versions of a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionComparison {
    /// The first version, as requested by the caller.
    pub version1: DocumentVersion,
    /// The second version, as requested by the caller.
    pub version2: DocumentVersion,
    /// Change segments from `version1` to `version2`, ordered by line.
    pub changes: Vec<DocumentChange>,
    /// Aggregate counts over `changes`.
    pub statistics: ChangeStatistics,
}
