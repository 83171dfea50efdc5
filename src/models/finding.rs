//! Policy findings

use serde::Serialize;
use std::fmt;

/// What a finding is about
///
/// The declaration order is the order in which findings are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingCategory {
    Expiry,
    WeakKey,
    WeakSignature,
    HostnameMismatch,
    ChainTrust,
}

impl FindingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingCategory::Expiry => "EXPIRY",
            FindingCategory::WeakKey => "WEAK_KEY",
            FindingCategory::WeakSignature => "WEAK_SIGNATURE",
            FindingCategory::HostnameMismatch => "HOSTNAME_MISMATCH",
            FindingCategory::ChainTrust => "CHAIN_TRUST",
        }
    }
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How bad a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// Get the icon for this severity
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Info => "ℹ",
            Severity::Warning => "⚠",
            Severity::Critical => "✗",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A single detected condition about a certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub category: FindingCategory,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn new(category: FindingCategory, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            category,
            severity,
            message: message.into(),
        }
    }

    pub fn warning(category: FindingCategory, message: impl Into<String>) -> Self {
        Self::new(category, Severity::Warning, message)
    }

    pub fn critical(category: FindingCategory, message: impl Into<String>) -> Self {
        Self::new(category, Severity::Critical, message)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}] {}", self.category, self.severity, self.message)
    }
}
