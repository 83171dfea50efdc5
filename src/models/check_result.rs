//! Per-domain and batch check results

use super::{Assessment, Certificate, Finding, FindingCategory, Grade};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of checking a single domain
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// Domain that was checked
    pub domain: String,
    /// Whether a certificate was retrieved and decoded
    pub success: bool,
    /// Decoded leaf certificate (present on success)
    pub certificate: Option<Certificate>,
    /// Findings in category order
    pub findings: Vec<Finding>,
    pub grade: Grade,
    pub assessment: Assessment,
    /// Human-readable failure reason (present on failure)
    pub error: Option<String>,
    /// Whole days until expiry at `checked_at`
    pub days_until_expiry: Option<i64>,
    /// Whether the presented chain verified against the Mozilla root set
    pub trust_verified: Option<bool>,
    /// When the check was evaluated
    pub checked_at: DateTime<Utc>,
}

impl CheckResult {
    /// Build a successful result
    pub fn success(
        certificate: Certificate,
        findings: Vec<Finding>,
        grade: Grade,
        assessment: Assessment,
        trust_verified: Option<bool>,
        checked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            domain: certificate.domain.clone(),
            success: true,
            days_until_expiry: Some(certificate.days_until_expiry(checked_at)),
            certificate: Some(certificate),
            findings,
            grade,
            assessment,
            error: None,
            trust_verified,
            checked_at,
        }
    }

    /// Build a failed result carrying the error message unmodified
    pub fn failure(
        domain: impl Into<String>,
        error: impl Into<String>,
        checked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            domain: domain.into(),
            success: false,
            certificate: None,
            findings: vec![],
            grade: Grade::F,
            assessment: Assessment::CriticalIssue,
            error: Some(error.into()),
            days_until_expiry: None,
            trust_verified: None,
            checked_at,
        }
    }

    /// Expiry classification used for batch counts
    pub fn status(&self) -> ExpiryStatus {
        if !self.success {
            ExpiryStatus::Errored
        } else if self.days_until_expiry.is_some_and(|days| days < 0) {
            ExpiryStatus::Expired
        } else if self
            .findings
            .iter()
            .any(|f| f.category == FindingCategory::Expiry)
        {
            ExpiryStatus::ExpiringSoon
        } else {
            ExpiryStatus::Valid
        }
    }

    /// Whether anything at all was flagged
    pub fn has_issues(&self) -> bool {
        !self.success || !self.findings.is_empty()
    }
}

/// Expiry bucket of a single result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExpiryStatus {
    Valid,
    ExpiringSoon,
    Expired,
    Errored,
}

impl std::fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpiryStatus::Valid => write!(f, "Valid"),
            ExpiryStatus::ExpiringSoon => write!(f, "Expiring"),
            ExpiryStatus::Expired => write!(f, "Expired"),
            ExpiryStatus::Errored => write!(f, "Error"),
        }
    }
}

/// Tally of results by expiry bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCounts {
    pub valid: usize,
    pub expiring_soon: usize,
    pub expired: usize,
    pub errored: usize,
}

impl BatchCounts {
    pub fn tally(results: &[CheckResult]) -> Self {
        results
            .iter()
            .fold(BatchCounts::default(), |mut counts, result| {
                match result.status() {
                    ExpiryStatus::Valid => counts.valid += 1,
                    ExpiryStatus::ExpiringSoon => counts.expiring_soon += 1,
                    ExpiryStatus::Expired => counts.expired += 1,
                    ExpiryStatus::Errored => counts.errored += 1,
                }
                counts
            })
    }

    pub fn total(&self) -> usize {
        self.valid + self.expiring_soon + self.expired + self.errored
    }
}

/// Results for a list of domains, in request order
#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub results: Vec<CheckResult>,
    pub counts: BatchCounts,
}

impl BatchResult {
    pub fn new(results: Vec<CheckResult>) -> Self {
        let counts = BatchCounts::tally(&results);
        Self { results, counts }
    }

    /// Whether any domain errored or was assessed as a critical issue
    pub fn has_failures(&self) -> bool {
        self.results
            .iter()
            .any(|r| !r.success || r.assessment == Assessment::CriticalIssue)
    }
}
