//! Certificate information types

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Public key algorithm of a certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KeyAlgorithm {
    Rsa,
    Ecdsa,
    Other,
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyAlgorithm::Rsa => write!(f, "RSA"),
            KeyAlgorithm::Ecdsa => write!(f, "ECDSA"),
            KeyAlgorithm::Other => write!(f, "Other"),
        }
    }
}

/// Decoded leaf certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    /// Domain that was checked
    pub domain: String,
    /// Issuer common name
    pub issuer_name: String,
    /// Subject common name
    pub subject_name: String,
    /// Not valid before
    pub not_before: DateTime<Utc>,
    /// Not valid after
    pub not_after: DateTime<Utc>,
    /// Public key algorithm
    pub public_key_algorithm: KeyAlgorithm,
    /// Key strength in bits (RSA modulus or EC curve order)
    pub key_bits: u32,
    /// Signature algorithm name, e.g. `sha256WithRSAEncryption`
    pub signature_algorithm: String,
    /// DNS names from the Subject Alternative Name extension
    pub subject_alternative_names: Vec<String>,
    /// Serial number (hex, truncated for display)
    pub serial_number: String,
    /// SHA-256 thumbprint of the DER encoding
    pub fingerprint_sha256: String,
}

impl Certificate {
    /// Whole days from `now` until expiry, rounded down (negative once expired)
    pub fn days_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        self.not_after
            .signed_duration_since(now)
            .num_seconds()
            .div_euclid(86_400)
    }

    /// Check if the certificate is not yet valid at `now`
    pub fn is_not_yet_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.not_before
    }
}

/// One certificate of a presented chain, reduced to its names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainLink {
    /// Subject common name, for display
    pub subject_name: String,
    /// DER contents of the subject distinguished name
    #[serde(skip)]
    pub subject: Vec<u8>,
    /// DER contents of the issuer distinguished name
    #[serde(skip)]
    pub issuer: Vec<u8>,
}

impl ChainLink {
    pub fn is_self_signed(&self) -> bool {
        self.subject == self.issuer
    }
}

/// Certificate chain as sent by the server, leaf first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CertificateChain {
    pub links: Vec<ChainLink>,
}

impl CertificateChain {
    pub fn new(links: Vec<ChainLink>) -> Self {
        Self { links }
    }

    pub fn leaf(&self) -> Option<&ChainLink> {
        self.links.first()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Follow issuer→subject links from the leaf to the last reachable link
    ///
    /// The walk stops at a self-signed certificate or at a link whose issuer
    /// is not in the chain. Returns `None` for an empty chain or a cycle.
    pub fn walk_end(&self) -> Option<&ChainLink> {
        let mut current = self.leaf()?;

        // Every hop visits a distinct certificate, so a complete walk takes
        // at most `len` steps; anything longer is a cycle.
        for _ in 0..self.links.len() {
            if current.is_self_signed() {
                return Some(current);
            }
            match self.links.iter().find(|link| link.subject == current.issuer) {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }

        None
    }

    /// Whether the walk from the leaf ends at a self-signed certificate
    pub fn terminates_at_self_signed_root(&self) -> bool {
        self.walk_end().is_some_and(ChainLink::is_self_signed)
    }
}
