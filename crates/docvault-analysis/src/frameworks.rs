//! Compliance-framework keyword tagging.

use chrono::Utc;

use docvault_entity::{ComplianceFramework, ComplianceImpact, ImpactLevel};

/// Keyword sets per framework, matched case-insensitively as substrings
/// of the combined changed text.
pub const FRAMEWORK_KEYWORDS: &[(ComplianceFramework, &[&str])] = &[
    (
        ComplianceFramework::Gdpr,
        &[
            "gdpr",
            "data protection",
            "personal data",
            "privacy",
            "consent",
            "data subject",
        ],
    ),
    (
        ComplianceFramework::Sox,
        &[
            "sox",
            "sarbanes",
            "financial",
            "internal control",
            "audit",
            "financial reporting",
        ],
    ),
    (
        ComplianceFramework::Hipaa,
        &[
            "hipaa",
            "health",
            "medical",
            "patient",
            "phi",
            "protected health information",
        ],
    ),
    (
        ComplianceFramework::Iso27001,
        &[
            "iso27001",
            "information security",
            "security management",
            "risk management",
        ],
    ),
    (
        ComplianceFramework::PciDss,
        &[
            "pci",
            "payment card",
            "cardholder",
            "payment data",
            "card data",
        ],
    ),
];

/// Return every framework whose keyword set hits the combined text.
///
/// `combined_text` must already be lowercased.
pub fn affected_frameworks(combined_text: &str) -> Vec<ComplianceFramework> {
    FRAMEWORK_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| combined_text.contains(k)))
        .map(|(framework, _)| *framework)
        .collect()
}

/// Build the compliance-impact record for one change.
///
/// A change needs manual review when it touches any framework's keywords
/// or when its impact is critical, so regulatory-language edits that match
/// no framework still reach a reviewer.
pub fn analyze_compliance(combined_text: &str, impact: ImpactLevel) -> ComplianceImpact {
    let frameworks = affected_frameworks(combined_text);
    let requires_review = !frameworks.is_empty() || impact == ImpactLevel::Critical;
    ComplianceImpact {
        affected_frameworks: frameworks,
        requires_review,
        analyzed_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_framework_hit() {
        let frameworks = affected_frameworks("the data subject may withdraw consent");
        assert_eq!(frameworks, vec![ComplianceFramework::Gdpr]);
    }

    #[test]
    fn test_multiple_framework_hits() {
        let frameworks = affected_frameworks("annual audit of cardholder data handling");
        assert!(frameworks.contains(&ComplianceFramework::Sox));
        assert!(frameworks.contains(&ComplianceFramework::PciDss));
    }

    #[test]
    fn test_no_hits_no_review_for_low_impact() {
        let impact = analyze_compliance("reworded the introduction", ImpactLevel::Low);
        assert!(impact.affected_frameworks.is_empty());
        assert!(!impact.requires_review);
    }

    #[test]
    fn test_critical_impact_forces_review_without_framework_hit() {
        let impact = analyze_compliance("this step is now mandatory", ImpactLevel::Critical);
        assert!(impact.affected_frameworks.is_empty());
        assert!(impact.requires_review);
    }

    #[test]
    fn test_framework_hit_forces_review() {
        let impact = analyze_compliance("patient records retention", ImpactLevel::Low);
        assert_eq!(impact.affected_frameworks, vec![ComplianceFramework::Hipaa]);
        assert!(impact.requires_review);
    }
}
