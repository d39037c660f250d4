//! Line-level diff computation and change classification.

use similar::{Algorithm, DiffTag, TextDiff, capture_diff_slices};

use docvault_entity::{ChangeDraft, ChangeType};

use crate::frameworks;
use crate::impact::{self, ChangeContext};
use crate::summary;

/// Confidence assigned to every change record. The diff is deterministic,
/// not probabilistic, so the score is a fixed high constant.
const DIFF_CONFIDENCE: f32 = 0.95;

/// Computes structured change records from two content strings.
///
/// Stateless and side-effect-free; safe to share and to invoke
/// concurrently across unrelated document pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeAnalyzer;

impl ChangeAnalyzer {
    /// Create a new analyzer.
    pub fn new() -> Self {
        Self
    }

    /// Compute the change records between two content snapshots.
    ///
    /// Both inputs are split on `'\n'` and aligned with a Myers diff.
    /// Each non-equal opcode yields one draft: inserts become additions,
    /// deletes become deletions, replaces become modifications. Identical
    /// inputs produce an empty list. Empty old or new content is valid
    /// (pure creation or full deletion).
    pub fn analyze(&self, old_content: &str, new_content: &str) -> Vec<ChangeDraft> {
        let old_lines: Vec<&str> = old_content.split('\n').collect();
        let new_lines: Vec<&str> = new_content.split('\n').collect();

        let ops = capture_diff_slices(Algorithm::Myers, &old_lines, &new_lines);
        let mut drafts = Vec::new();

        for op in ops {
            let (tag, old_range, new_range) = op.as_tag_tuple();
            let change_type = match tag {
                DiffTag::Equal => continue,
                DiffTag::Insert => ChangeType::Added,
                DiffTag::Delete => ChangeType::Deleted,
                DiffTag::Replace => ChangeType::Modified,
            };

            let old_text = old_lines[old_range.clone()].join("\n");
            let new_text = new_lines[new_range].join("\n");
            let combined_text = format!("{old_text} {new_text}").to_lowercase();
            let similarity = self.similarity_ratio(&old_text, &new_text);

            let impact = impact::assess_impact(&ChangeContext {
                combined_text: &combined_text,
                change_type,
                similarity,
            });

            drafts.push(ChangeDraft {
                change_type,
                change_summary: summary::change_summary(&old_text, &new_text, change_type),
                compliance_impact: frameworks::analyze_compliance(&combined_text, impact),
                impact_assessment: impact,
                old_content: old_text,
                new_content: new_text,
                // 1-based line numbers in the old content; inserts carry an
                // empty range anchored at the insertion point.
                line_start: old_range.start as i32 + 1,
                line_end: old_range.end as i32,
                confidence_score: DIFF_CONFIDENCE,
            });
        }

        drafts
    }

    /// Character-level similarity ratio between two texts, 0.0 to 1.0.
    pub fn similarity_ratio(&self, old_text: &str, new_text: &str) -> f32 {
        TextDiff::from_chars(old_text, new_text).ratio()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_entity::ImpactLevel;

    /// Apply drafts back onto the old content; the result must equal the
    /// new content if the diff is complete.
    fn apply_drafts(old_content: &str, drafts: &[ChangeDraft]) -> String {
        let mut lines: Vec<String> = old_content.split('\n').map(String::from).collect();
        for draft in drafts.iter().rev() {
            let start = (draft.line_start - 1) as usize;
            let end = draft.line_end as usize;
            let replacement: Vec<String> = if draft.change_type == ChangeType::Deleted {
                Vec::new()
            } else {
                draft.new_content.split('\n').map(String::from).collect()
            };
            lines.splice(start..end, replacement);
        }
        lines.join("\n")
    }

    #[test]
    fn test_identical_content_yields_no_changes() {
        let analyzer = ChangeAnalyzer::new();
        let content = "line one\nline two\n";
        assert!(analyzer.analyze(content, content).is_empty());
    }

    #[test]
    fn test_distinct_content_yields_changes() {
        let analyzer = ChangeAnalyzer::new();
        let drafts = analyzer.analyze("alpha\n", "beta\n");
        assert!(!drafts.is_empty());
    }

    #[test]
    fn test_pure_addition() {
        let analyzer = ChangeAnalyzer::new();
        let drafts = analyzer.analyze("first\nsecond", "first\nsecond\nthird");
        assert_eq!(drafts.len(), 1);
        let draft = &drafts[0];
        assert_eq!(draft.change_type, ChangeType::Added);
        assert_eq!(draft.old_content, "");
        assert_eq!(draft.new_content, "third");
        assert_eq!(draft.line_start, 3);
        assert_eq!(draft.line_end, 2);
        assert!((draft.confidence_score - 0.95).abs() < f32::EPSILON);
    }

    #[test]
    fn test_pure_deletion_is_high_impact() {
        let analyzer = ChangeAnalyzer::new();
        let drafts = analyzer.analyze("first\nplain sentence\nlast", "first\nlast");
        assert_eq!(drafts.len(), 1);
        let draft = &drafts[0];
        assert_eq!(draft.change_type, ChangeType::Deleted);
        assert_eq!(draft.old_content, "plain sentence");
        assert_eq!(draft.new_content, "");
        assert_eq!(draft.impact_assessment, ImpactLevel::High);
        assert_eq!(draft.change_summary, "Deleted 2 words of content");
    }

    #[test]
    fn test_applying_drafts_reconstructs_new_content() {
        let analyzer = ChangeAnalyzer::new();
        let old = "intro\nsection one\nsection two\nsection three\noutro";
        let new = "intro\nsection one rewritten\nsection three\nappendix\noutro";
        let drafts = analyzer.analyze(old, new);
        assert!(!drafts.is_empty());
        assert_eq!(apply_drafts(old, &drafts), new);
    }

    #[test]
    fn test_empty_old_content_is_valid() {
        let analyzer = ChangeAnalyzer::new();
        let drafts = analyzer.analyze("", "brand new body");
        assert_eq!(drafts.len(), 1);
        assert_eq!(apply_drafts("", &drafts), "brand new body");
    }

    #[test]
    fn test_mandatory_keyword_makes_modification_critical() {
        let analyzer = ChangeAnalyzer::new();
        let drafts = analyzer.analyze(
            "The policy is optional.",
            "The policy is mandatory and required.",
        );
        assert_eq!(drafts.len(), 1);
        let draft = &drafts[0];
        assert_eq!(draft.change_type, ChangeType::Modified);
        assert_eq!(draft.impact_assessment, ImpactLevel::Critical);
        let combined = format!("{} {}", draft.old_content, draft.new_content).to_lowercase();
        assert!(combined.contains("mandatory"));
        assert!(combined.contains("required"));
    }

    #[test]
    fn test_changed_lines_only_drive_classification() {
        // "must" sits on an untouched line; the edited line carries no
        // keywords, so the change stays below critical.
        let analyzer = ChangeAnalyzer::new();
        let old = "Access must be logged.\nThe cover page is blue.\n";
        let new = "Access must be logged.\nThe cover page is green.\n";
        let drafts = analyzer.analyze(old, new);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].line_start, 2);
        assert_eq!(drafts[0].impact_assessment, ImpactLevel::Low);
    }

    #[test]
    fn test_compliance_tagging_on_changed_text() {
        let analyzer = ChangeAnalyzer::new();
        let drafts = analyzer.analyze(
            "Records are retained for one year.\n",
            "Personal data records are retained for one year with consent.\n",
        );
        assert_eq!(drafts.len(), 1);
        let compliance = &drafts[0].compliance_impact;
        assert!(
            compliance
                .affected_frameworks
                .contains(&docvault_entity::ComplianceFramework::Gdpr)
        );
        assert!(compliance.requires_review);
    }

    #[test]
    fn test_similarity_ratio_bounds() {
        let analyzer = ChangeAnalyzer::new();
        assert!((analyzer.similarity_ratio("same", "same") - 1.0).abs() < f32::EPSILON);
        assert_eq!(analyzer.similarity_ratio("abc", "xyz"), 0.0);
    }
}
