//! Impact classification rules.
//!
//! The severity heuristics are an ordered rule table evaluated
//! first-match-wins, kept as plain data so the rules can be tested and
//! extended independently of the diff walk.

use docvault_entity::{ChangeType, ImpactLevel};

/// Keywords whose presence in changed text marks the change critical.
pub const CRITICAL_KEYWORDS: &[&str] = &[
    "shall",
    "must",
    "required",
    "mandatory",
    "compliance",
    "regulation",
    "legal",
    "penalty",
    "violation",
    "audit",
    "security",
    "privacy",
    "confidential",
    "restricted",
];

/// Keywords whose presence marks the change high impact.
pub const HIGH_IMPACT_KEYWORDS: &[&str] = &[
    "policy",
    "procedure",
    "process",
    "control",
    "standard",
    "responsibility",
    "authority",
    "approval",
    "review",
];

/// Inputs a rule predicate is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct ChangeContext<'a> {
    /// Lowercased concatenation of old and new text.
    pub combined_text: &'a str,
    /// The diff segment's change type.
    pub change_type: ChangeType,
    /// Character-level similarity between old and new text, 0.0 to 1.0.
    pub similarity: f32,
}

/// Condition under which a rule fires.
#[derive(Debug, Clone, Copy)]
pub enum ImpactPredicate {
    /// Combined text contains any of the given keywords.
    ContainsAny(&'static [&'static str]),
    /// The change is of the given type.
    ChangeTypeIs(ChangeType),
    /// Old/new similarity is below the threshold.
    SimilarityBelow(f32),
    /// Always fires; terminates the table.
    Always,
}

impl ImpactPredicate {
    /// Evaluate the predicate against a change context.
    pub fn matches(&self, ctx: &ChangeContext<'_>) -> bool {
        match self {
            Self::ContainsAny(keywords) => keywords.iter().any(|k| ctx.combined_text.contains(k)),
            Self::ChangeTypeIs(change_type) => ctx.change_type == *change_type,
            Self::SimilarityBelow(threshold) => ctx.similarity < *threshold,
            Self::Always => true,
        }
    }
}

/// One entry in the ordered impact rule table.
#[derive(Debug, Clone, Copy)]
pub struct ImpactRule {
    /// Stable rule name for diagnostics and tests.
    pub name: &'static str,
    /// When the rule fires.
    pub predicate: ImpactPredicate,
    /// Impact assigned when it does.
    pub impact: ImpactLevel,
}

/// The impact rule table, evaluated top to bottom, first match wins.
///
/// Keyword rules outrank change-type rules: deleting a sentence containing
/// "shall" is critical, not merely a high-impact deletion. The similarity
/// rules only ever fire for modifications, since additions and deletions
/// are already consumed by the change-type rules above them.
pub const IMPACT_RULES: &[ImpactRule] = &[
    ImpactRule {
        name: "critical-keywords",
        predicate: ImpactPredicate::ContainsAny(CRITICAL_KEYWORDS),
        impact: ImpactLevel::Critical,
    },
    ImpactRule {
        name: "high-impact-keywords",
        predicate: ImpactPredicate::ContainsAny(HIGH_IMPACT_KEYWORDS),
        impact: ImpactLevel::High,
    },
    ImpactRule {
        name: "deletion",
        predicate: ImpactPredicate::ChangeTypeIs(ChangeType::Deleted),
        impact: ImpactLevel::High,
    },
    ImpactRule {
        name: "addition",
        predicate: ImpactPredicate::ChangeTypeIs(ChangeType::Added),
        impact: ImpactLevel::Medium,
    },
    ImpactRule {
        name: "major-rewrite",
        predicate: ImpactPredicate::SimilarityBelow(0.3),
        impact: ImpactLevel::High,
    },
    ImpactRule {
        name: "moderate-rewrite",
        predicate: ImpactPredicate::SimilarityBelow(0.7),
        impact: ImpactLevel::Medium,
    },
    ImpactRule {
        name: "minor-edit",
        predicate: ImpactPredicate::Always,
        impact: ImpactLevel::Low,
    },
];

/// Return the first rule matching the context.
pub fn classify(ctx: &ChangeContext<'_>) -> &'static ImpactRule {
    IMPACT_RULES
        .iter()
        .find(|rule| rule.predicate.matches(ctx))
        .unwrap_or(&IMPACT_RULES[IMPACT_RULES.len() - 1])
}

/// Assess the impact level of a change.
pub fn assess_impact(ctx: &ChangeContext<'_>) -> ImpactLevel {
    classify(ctx).impact
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(text: &str, change_type: ChangeType, similarity: f32) -> ChangeContext<'_> {
        ChangeContext {
            combined_text: text,
            change_type,
            similarity,
        }
    }

    #[test]
    fn test_table_ends_with_catch_all() {
        let last = &IMPACT_RULES[IMPACT_RULES.len() - 1];
        assert!(matches!(last.predicate, ImpactPredicate::Always));
        assert_eq!(last.impact, ImpactLevel::Low);
    }

    #[test]
    fn test_critical_keywords_outrank_everything() {
        let c = ctx(
            "this clause shall remain in force",
            ChangeType::Deleted,
            0.0,
        );
        let rule = classify(&c);
        assert_eq!(rule.name, "critical-keywords");
        assert_eq!(rule.impact, ImpactLevel::Critical);
    }

    #[test]
    fn test_high_impact_keywords_beat_change_type() {
        let c = ctx("updated the escalation procedure", ChangeType::Added, 1.0);
        let rule = classify(&c);
        assert_eq!(rule.name, "high-impact-keywords");
        assert_eq!(rule.impact, ImpactLevel::High);
    }

    #[test]
    fn test_deletion_without_keywords_is_high() {
        let c = ctx("some plain sentence", ChangeType::Deleted, 0.0);
        assert_eq!(classify(&c).name, "deletion");
        assert_eq!(assess_impact(&c), ImpactLevel::High);
    }

    #[test]
    fn test_addition_without_keywords_is_medium() {
        let c = ctx("another plain sentence", ChangeType::Added, 0.0);
        assert_eq!(assess_impact(&c), ImpactLevel::Medium);
    }

    #[test]
    fn test_modification_tiers_on_similarity() {
        assert_eq!(
            assess_impact(&ctx("plain", ChangeType::Modified, 0.2)),
            ImpactLevel::High
        );
        assert_eq!(
            assess_impact(&ctx("plain", ChangeType::Modified, 0.5)),
            ImpactLevel::Medium
        );
        assert_eq!(
            assess_impact(&ctx("plain", ChangeType::Modified, 0.9)),
            ImpactLevel::Low
        );
    }
}
