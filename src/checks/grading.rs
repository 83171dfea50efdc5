//! Grade calculation
//!
//! Reduces a set of findings to a letter grade and an assessment. Only the
//! presence and severity of findings matter, never their order.

use crate::models::{Assessment, Finding, FindingCategory, Grade, Severity};

/// Grade a set of findings
pub fn grade(findings: &[Finding]) -> (Grade, Assessment) {
    let critical_expiry = findings
        .iter()
        .any(|f| f.category == FindingCategory::Expiry && f.severity == Severity::Critical);
    if critical_expiry {
        return (Grade::F, Assessment::CriticalIssue);
    }

    let mut grade = Grade::APlus;
    let mut assessment = Assessment::Secure;

    for finding in findings {
        let (cap, level) = match (finding.severity, finding.category) {
            (Severity::Critical, _) => (Grade::D, Assessment::UrgentAttention),
            (Severity::Warning, FindingCategory::Expiry) => (Grade::B, Assessment::Monitor),
            (Severity::Warning, _) => (Grade::A, Assessment::Monitor),
            (Severity::Info, _) => continue,
        };
        grade = grade.worst(cap);
        assessment = assessment.most_severe(level);
    }

    (grade, assessment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expired() -> Finding {
        Finding::critical(FindingCategory::Expiry, "Certificate expired 10 days ago")
    }

    fn expiring() -> Finding {
        Finding::warning(FindingCategory::Expiry, "Certificate expires in 20 days")
    }

    fn weak_key_warning() -> Finding {
        Finding::warning(FindingCategory::WeakKey, "Weak key size: RSA 1536 bits")
    }

    fn mismatch() -> Finding {
        Finding::critical(FindingCategory::HostnameMismatch, "not valid for host")
    }

    fn incomplete_chain() -> Finding {
        Finding::warning(FindingCategory::ChainTrust, "Incomplete or unverifiable chain")
    }

    #[test]
    fn test_no_findings_is_secure() {
        assert_eq!(grade(&[]), (Grade::APlus, Assessment::Secure));
    }

    #[test]
    fn test_critical_expiry_short_circuits() {
        assert_eq!(
            grade(&[expired(), weak_key_warning()]),
            (Grade::F, Assessment::CriticalIssue)
        );
        assert_eq!(
            grade(&[mismatch(), expired()]),
            (Grade::F, Assessment::CriticalIssue)
        );
    }

    #[test]
    fn test_other_critical_caps_at_d() {
        assert_eq!(grade(&[mismatch()]), (Grade::D, Assessment::UrgentAttention));
        assert_eq!(
            grade(&[expiring(), mismatch(), incomplete_chain()]),
            (Grade::D, Assessment::UrgentAttention)
        );
    }

    #[test]
    fn test_expiry_warning_caps_at_b() {
        assert_eq!(grade(&[expiring()]), (Grade::B, Assessment::Monitor));
        assert_eq!(
            grade(&[weak_key_warning(), expiring()]),
            (Grade::B, Assessment::Monitor)
        );
    }

    #[test]
    fn test_weak_key_or_chain_warning_caps_at_a() {
        assert_eq!(grade(&[weak_key_warning()]), (Grade::A, Assessment::Monitor));
        assert_eq!(grade(&[incomplete_chain()]), (Grade::A, Assessment::Monitor));
    }

    #[test]
    fn test_info_findings_do_not_downgrade() {
        let info = Finding::new(FindingCategory::ChainTrust, Severity::Info, "note");
        assert_eq!(grade(&[info]), (Grade::APlus, Assessment::Secure));
    }

    #[test]
    fn test_order_does_not_matter() {
        let findings = vec![weak_key_warning(), expiring(), mismatch(), incomplete_chain()];
        let expected = grade(&findings);

        let mut reversed = findings.clone();
        reversed.reverse();
        assert_eq!(grade(&reversed), expected);

        let mut rotated = findings;
        rotated.rotate_left(2);
        assert_eq!(grade(&rotated), expected);
    }
}
