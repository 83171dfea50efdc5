mod common;

use chrono::{TimeZone, Utc};
use ssl_checker::checks::certificate::{decode, decode_chain};
use ssl_checker::checks::chain::complete_with_trust_anchors;
use ssl_checker::models::{CertificateChain, ChainLink, KeyAlgorithm};
use ssl_checker::DecodeError;

#[test]
fn test_decode_issued_certificate() {
    let ca = common::root_ca("Test Issuing CA");
    let leaf = common::leaf(
        &ca,
        Some("www.example.com"),
        &["www.example.com", "example.com"],
        (2025, 1, 1),
        (2025, 12, 31),
    );

    let cert = decode(&leaf.der, "www.example.com").unwrap();

    assert_eq!(cert.domain, "www.example.com");
    assert_eq!(cert.subject_name, "www.example.com");
    assert_eq!(cert.issuer_name, "Test Issuing CA");
    assert_eq!(
        cert.subject_alternative_names,
        vec!["www.example.com", "example.com"]
    );
    assert_eq!(cert.not_before, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(cert.not_after, Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap());
    assert_eq!(cert.public_key_algorithm, KeyAlgorithm::Ecdsa);
    assert_eq!(cert.key_bits, 256);
    assert_eq!(cert.signature_algorithm, "ecdsa-with-SHA256");
    assert!(!cert.serial_number.is_empty());
    assert!(cert.serial_number.len() <= 16);
    assert_eq!(cert.fingerprint_sha256.split(':').count(), 32);
}

#[test]
fn test_missing_common_names_use_defaults() {
    let leaf = common::self_signed(None, &["example.org"], (2025, 1, 1), (2026, 1, 1));

    let cert = decode(&leaf.der, "example.org").unwrap();

    assert_eq!(cert.subject_name, "example.org");
    assert_eq!(cert.issuer_name, "Unknown");
}

#[test]
fn test_missing_san_is_empty() {
    let leaf = common::self_signed(Some("legacy.example"), &[], (2025, 1, 1), (2026, 1, 1));

    let cert = decode(&leaf.der, "legacy.example").unwrap();

    assert!(cert.subject_alternative_names.is_empty());
    assert_eq!(cert.subject_name, "legacy.example");
}

#[test]
fn test_trailing_bytes_are_malformed() {
    let leaf = common::self_signed(Some("example.com"), &["example.com"], (2025, 1, 1), (2026, 1, 1));
    let mut der = leaf.der.clone();
    der.extend_from_slice(&[0, 0, 0]);

    assert!(matches!(
        decode(&der, "example.com"),
        Err(DecodeError::Malformed { .. })
    ));
}

#[test]
fn test_inverted_validity_window_is_malformed() {
    let leaf = common::self_signed(Some("example.com"), &["example.com"], (2026, 1, 1), (2025, 1, 1));

    match decode(&leaf.der, "example.com") {
        Err(DecodeError::Malformed { message }) => {
            assert!(message.contains("validity window"), "message: {}", message)
        }
        other => panic!("expected Malformed, got {:?}", other),
    }
}

#[test]
fn test_truncated_certificate_is_malformed() {
    let leaf = common::self_signed(Some("example.com"), &["example.com"], (2025, 1, 1), (2026, 1, 1));
    let der = &leaf.der[..leaf.der.len() / 2];

    assert!(matches!(
        decode(der, "example.com"),
        Err(DecodeError::Malformed { .. })
    ));
}

#[test]
fn test_chain_with_root_is_complete() {
    let ca = common::root_ca("Test Root");
    let leaf = common::leaf(&ca, Some("example.com"), &["example.com"], (2025, 1, 1), (2026, 1, 1));

    let chain = decode_chain(&[leaf.der.clone(), ca.der()]);
    assert_eq!(chain.len(), 2);
    assert_eq!(chain.links[1].subject_name, "Test Root");
    assert!(chain.links[1].is_self_signed());
    assert!(chain.terminates_at_self_signed_root());

    let leaf_only = decode_chain(&[leaf.der]);
    assert_eq!(leaf_only.len(), 1);
    assert!(!leaf_only.terminates_at_self_signed_root());
}

#[test]
fn test_unparseable_chain_entries_are_skipped() {
    let ca = common::root_ca("Test Root");
    let leaf = common::leaf(&ca, Some("example.com"), &["example.com"], (2025, 1, 1), (2026, 1, 1));

    let chain = decode_chain(&[leaf.der, vec![0xde, 0xad, 0xbe, 0xef], ca.der()]);
    assert_eq!(chain.len(), 2);
    assert!(chain.terminates_at_self_signed_root());
}

#[test]
fn test_chain_completed_from_trust_anchor() {
    let anchor = &webpki_roots::TLS_SERVER_ROOTS[0];
    let root_subject = anchor.subject.as_ref().to_vec();

    let mut chain = CertificateChain::new(vec![
        ChainLink {
            subject_name: "example.com".to_string(),
            subject: b"leaf".to_vec(),
            issuer: b"intermediate".to_vec(),
        },
        ChainLink {
            subject_name: "Intermediate".to_string(),
            subject: b"intermediate".to_vec(),
            issuer: root_subject.clone(),
        },
    ]);
    assert!(!chain.terminates_at_self_signed_root());

    assert!(complete_with_trust_anchors(&mut chain));
    assert_eq!(chain.len(), 3);
    assert_eq!(chain.links[2].subject, root_subject);
    assert!(chain.terminates_at_self_signed_root());
}

#[test]
fn test_private_root_is_not_completed() {
    let ca = common::root_ca("Private Root");
    let leaf = common::leaf(&ca, Some("example.com"), &["example.com"], (2025, 1, 1), (2026, 1, 1));

    let mut chain = decode_chain(&[leaf.der]);
    assert!(!complete_with_trust_anchors(&mut chain));
    assert_eq!(chain.len(), 1);
}
