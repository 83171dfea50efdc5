//! Certificate policy evaluation
//!
//! Applies the fixed rule set to a decoded certificate and its chain. Every
//! rule runs; a certificate can collect several findings. Evaluation is pure:
//! the same certificate, chain and `now` always give the same findings.

use crate::config::PolicySettings;
use crate::models::{Certificate, CertificateChain, Finding, FindingCategory, KeyAlgorithm};
use chrono::{DateTime, Utc};

/// Signature hash algorithms that are broken for signing
const WEAK_SIGNATURE_HASHES: [&str; 2] = ["md5", "sha1"];

/// Evaluate a certificate with the default thresholds and the given warning window
pub fn evaluate(
    certificate: &Certificate,
    chain: Option<&CertificateChain>,
    now: DateTime<Utc>,
    warning_window_days: i64,
) -> Vec<Finding> {
    let settings = PolicySettings {
        warning_window_days,
        ..PolicySettings::default()
    };
    evaluate_with(certificate, chain, now, &settings)
}

/// Evaluate a certificate against explicit policy settings
pub fn evaluate_with(
    certificate: &Certificate,
    chain: Option<&CertificateChain>,
    now: DateTime<Utc>,
    settings: &PolicySettings,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    findings.extend(check_expiry(certificate, now, settings));
    findings.extend(check_key_strength(certificate, settings));
    findings.extend(check_signature_algorithm(certificate));
    findings.extend(check_hostname(certificate));
    if let Some(chain) = chain {
        findings.extend(check_chain(chain));
    }

    // Reported in category order
    findings.sort_by_key(|f| f.category);
    findings
}

fn check_expiry(
    certificate: &Certificate,
    now: DateTime<Utc>,
    settings: &PolicySettings,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    if certificate.is_not_yet_valid(now) {
        findings.push(Finding::critical(
            FindingCategory::Expiry,
            format!(
                "Certificate is not yet valid (valid from {})",
                certificate.not_before.format("%Y-%m-%d %H:%M:%S UTC")
            ),
        ));
    }

    let days = certificate.days_until_expiry(now);
    if days < 0 {
        findings.push(Finding::critical(
            FindingCategory::Expiry,
            format!("Certificate expired {} days ago", days.abs()),
        ));
    } else if days <= settings.critical_window_days {
        findings.push(Finding::critical(
            FindingCategory::Expiry,
            format!("Certificate expires within a week ({} days left)", days),
        ));
    } else if days <= settings.warning_window_days {
        findings.push(Finding::warning(
            FindingCategory::Expiry,
            format!("Certificate expires in {} days", days),
        ));
    }

    findings
}

fn check_key_strength(certificate: &Certificate, settings: &PolicySettings) -> Option<Finding> {
    let bits = certificate.key_bits;
    let algorithm = certificate.public_key_algorithm;

    let critical = bits < settings.minimum_key_bits
        || (algorithm == KeyAlgorithm::Rsa && bits <= settings.rsa_critical_bits);
    if critical {
        return Some(Finding::critical(
            FindingCategory::WeakKey,
            format!("{} key of {} bits is insecure", algorithm, bits),
        ));
    }

    if algorithm == KeyAlgorithm::Rsa && bits < settings.rsa_warning_bits {
        return Some(Finding::warning(
            FindingCategory::WeakKey,
            format!(
                "Weak key size: RSA {} bits (< {} bits)",
                bits, settings.rsa_warning_bits
            ),
        ));
    }

    None
}

fn check_signature_algorithm(certificate: &Certificate) -> Option<Finding> {
    let algorithm = certificate.signature_algorithm.to_lowercase();

    WEAK_SIGNATURE_HASHES
        .iter()
        .find(|hash| algorithm.contains(*hash))
        .map(|hash| {
            Finding::critical(
                FindingCategory::WeakSignature,
                format!(
                    "Signature algorithm {} uses {}, which is broken for signing",
                    certificate.signature_algorithm,
                    hash.to_uppercase()
                ),
            )
        })
}

fn check_hostname(certificate: &Certificate) -> Option<Finding> {
    let domain = certificate.domain.as_str();
    let covered = std::iter::once(certificate.subject_name.as_str())
        .chain(certificate.subject_alternative_names.iter().map(String::as_str))
        .any(|pattern| hostname_matches(pattern, domain));

    if covered {
        return None;
    }

    let names = if certificate.subject_alternative_names.is_empty() {
        format!("CN={} (no SAN extension)", certificate.subject_name)
    } else {
        certificate.subject_alternative_names.join(", ")
    };
    Some(Finding::critical(
        FindingCategory::HostnameMismatch,
        format!("Certificate is not valid for '{}' (covers {})", domain, names),
    ))
}

fn check_chain(chain: &CertificateChain) -> Option<Finding> {
    if chain.terminates_at_self_signed_root() {
        None
    } else {
        Some(Finding::warning(
            FindingCategory::ChainTrust,
            format!(
                "Incomplete or unverifiable chain ({} certificate{} presented)",
                chain.len(),
                if chain.len() == 1 { "" } else { "s" }
            ),
        ))
    }
}

/// Case-insensitive hostname match with a single leading wildcard label
///
/// `*.example.com` matches `foo.example.com`, but neither `example.com` nor
/// `foo.bar.example.com`.
pub fn hostname_matches(pattern: &str, hostname: &str) -> bool {
    let pattern = pattern.trim_end_matches('.').to_ascii_lowercase();
    let hostname = hostname.trim_end_matches('.').to_ascii_lowercase();

    if pattern.is_empty() || hostname.is_empty() {
        return false;
    }

    match pattern.strip_prefix("*.") {
        Some(suffix) => match hostname.split_once('.') {
            Some((label, rest)) => !label.is_empty() && !suffix.is_empty() && rest == suffix,
            None => false,
        },
        None => pattern == hostname,
    }
}
