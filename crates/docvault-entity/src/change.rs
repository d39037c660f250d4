//! Change record entities and classification enums.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

/// Kind of difference between two versions' content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "change_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// Lines present only in the new version.
    Added,
    /// Lines replaced between versions.
    Modified,
    /// Lines present only in the old version.
    Deleted,
    /// Content relocated within the document.
    Moved,
    /// Document renamed.
    Renamed,
}

impl ChangeType {
    /// Return the change type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::Moved => "moved",
            Self::Renamed => "renamed",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse severity classification assigned to a change.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "impact_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    /// Minor edit with no regulatory language.
    Low,
    /// Moderate rewrite or pure addition.
    Medium,
    /// Major rewrite, deletion, or governance language.
    High,
    /// Regulatory or contractual language affected.
    Critical,
}

impl ImpactLevel {
    /// Return the impact level as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named regulatory framework detectable by keyword scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceFramework {
    /// EU General Data Protection Regulation.
    #[serde(rename = "GDPR")]
    Gdpr,
    /// Sarbanes-Oxley Act.
    #[serde(rename = "SOX")]
    Sox,
    /// Health Insurance Portability and Accountability Act.
    #[serde(rename = "HIPAA")]
    Hipaa,
    /// ISO/IEC 27001 information security standard.
    #[serde(rename = "ISO27001")]
    Iso27001,
    /// Payment Card Industry Data Security Standard.
    #[serde(rename = "PCI DSS")]
    PciDss,
}

impl ComplianceFramework {
    /// Return the framework's conventional display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gdpr => "GDPR",
            Self::Sox => "SOX",
            Self::Hipaa => "HIPAA",
            Self::Iso27001 => "ISO27001",
            Self::PciDss => "PCI DSS",
        }
    }
}

impl fmt::Display for ComplianceFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which regulatory frameworks a change plausibly touches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceImpact {
    /// Frameworks whose keyword sets matched the changed text.
    pub affected_frameworks: Vec<ComplianceFramework>,
    /// Whether the change needs manual compliance review.
    pub requires_review: bool,
    /// When the analysis ran.
    pub analyzed_at: DateTime<Utc>,
}

/// One persisted diff segment between two specific versions.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentChange {
    /// Unique change identifier.
    pub id: Uuid,
    /// The older version in the pair.
    pub from_version_id: Uuid,
    /// The newer version in the pair.
    pub to_version_id: Uuid,
    /// Kind of difference.
    pub change_type: ChangeType,
    /// Text present before the change (empty for pure additions).
    pub old_content: String,
    /// Text present after the change (empty for pure deletions).
    pub new_content: String,
    /// First affected line in the old content, 1-based.
    pub line_start: i32,
    /// Last affected line in the old content.
    pub line_end: i32,
    /// Diff-algorithm certainty, 0.0 to 1.0.
    pub confidence_score: f32,
    /// Human-readable description of the change.
    pub change_summary: String,
    /// Severity classification.
    pub impact_assessment: ImpactLevel,
    /// Regulatory framework exposure.
    pub compliance_impact: Json<ComplianceImpact>,
    /// When the change record was created.
    pub created_at: DateTime<Utc>,
}

impl DocumentChange {
    /// Materialize a change record from an analyzer draft.
    ///
    /// Used both when persisting the consecutive-version lineage and when
    /// returning ad hoc comparison results that are never stored.
    pub fn from_draft(from_version_id: Uuid, to_version_id: Uuid, draft: ChangeDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_version_id,
            to_version_id,
            change_type: draft.change_type,
            old_content: draft.old_content,
            new_content: draft.new_content,
            line_start: draft.line_start,
            line_end: draft.line_end,
            confidence_score: draft.confidence_score,
            change_summary: draft.change_summary,
            impact_assessment: draft.impact_assessment,
            compliance_impact: Json(draft.compliance_impact),
            created_at: Utc::now(),
        }
    }
}

/// An analyzed diff segment not yet tied to stored version identifiers.
///
/// The analyzer operates on bare content strings; the orchestrator later
/// keys drafts to the (previous current, newly created) version pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeDraft {
    /// Kind of difference.
    pub change_type: ChangeType,
    /// Text present before the change (empty for pure additions).
    pub old_content: String,
    /// Text present after the change (empty for pure deletions).
    pub new_content: String,
    /// First affected line in the old content, 1-based.
    pub line_start: i32,
    /// Last affected line in the old content.
    pub line_end: i32,
    /// Diff-algorithm certainty, 0.0 to 1.0.
    pub confidence_score: f32,
    /// Human-readable description of the change.
    pub change_summary: String,
    /// Severity classification.
    pub impact_assessment: ImpactLevel,
    /// Regulatory framework exposure.
    pub compliance_impact: ComplianceImpact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impact_levels_are_ordered() {
        assert!(ImpactLevel::Low < ImpactLevel::Medium);
        assert!(ImpactLevel::Medium < ImpactLevel::High);
        assert!(ImpactLevel::High < ImpactLevel::Critical);
    }

    #[test]
    fn test_framework_serializes_to_display_name() {
        let json = serde_json::to_string(&ComplianceFramework::PciDss).unwrap();
        assert_eq!(json, "\"PCI DSS\"");
        let json = serde_json::to_string(&ComplianceFramework::Iso27001).unwrap();
        assert_eq!(json, "\"ISO27001\"");
    }
}
