//! Certificate parsing
//!
//! Decodes DER encoded X.509 certificates using x509-parser.

use crate::models::{Certificate, CertificateChain, ChainLink, KeyAlgorithm};
use crate::utils::DecodeError;
use chrono::{DateTime, TimeZone, Utc};
use sha2::Digest;
use x509_parser::prelude::*;
use x509_parser::public_key::PublicKey;

/// OID of the X.520 commonName attribute
pub const OID_COMMON_NAME: &str = "2.5.4.3";

const OID_KEY_RSA: &str = "1.2.840.113549.1.1.1";
const OID_KEY_EC: &str = "1.2.840.10045.2.1";

/// Length of the displayed serial number, in hex digits
const SERIAL_DISPLAY_LEN: usize = 16;

/// Decode the leaf certificate checked for `domain`
pub fn decode(der: &[u8], domain: &str) -> Result<Certificate, DecodeError> {
    let cert = parse_strict(der)?;

    let subject_attributes = name_attributes(cert.subject());
    let issuer_attributes = name_attributes(cert.issuer());

    let subject_name = find_first(&subject_attributes, OID_COMMON_NAME)
        .unwrap_or(domain)
        .to_string();
    let issuer_name = find_first(&issuer_attributes, OID_COMMON_NAME)
        .unwrap_or("Unknown")
        .to_string();

    let not_before = asn1_time_to_datetime(cert.validity().not_before)?;
    let not_after = asn1_time_to_datetime(cert.validity().not_after)?;
    if not_before > not_after {
        return Err(DecodeError::Malformed {
            message: format!(
                "validity window is inverted (notBefore {} is after notAfter {})",
                not_before, not_after
            ),
        });
    }

    let (public_key_algorithm, key_bits) = extract_public_key_info(&cert)?;

    Ok(Certificate {
        domain: domain.to_string(),
        issuer_name,
        subject_name,
        not_before,
        not_after,
        public_key_algorithm,
        key_bits,
        signature_algorithm: signature_algorithm_name(
            &cert.signature_algorithm.algorithm.to_id_string(),
        ),
        subject_alternative_names: extract_san(&cert)?,
        serial_number: serial_display(cert.raw_serial()),
        fingerprint_sha256: fingerprint(der),
    })
}

/// Reduce a presented chain (leaf first) to its issuer/subject links
///
/// Certificates that cannot be parsed are left out; a gap can only make the
/// chain look incomplete.
pub fn decode_chain(ders: &[Vec<u8>]) -> CertificateChain {
    let links = ders
        .iter()
        .enumerate()
        .filter_map(|(index, der)| match chain_link(der) {
            Ok(link) => Some(link),
            Err(e) => {
                tracing::warn!("Skipping chain certificate #{}: {}", index, e);
                None
            }
        })
        .collect();

    CertificateChain::new(links)
}

/// Parse a single certificate into a chain link
pub fn chain_link(der: &[u8]) -> Result<ChainLink, DecodeError> {
    let cert = parse_strict(der)?;
    let subject_attributes = name_attributes(cert.subject());

    Ok(ChainLink {
        subject_name: find_first(&subject_attributes, OID_COMMON_NAME)
            .unwrap_or("Unknown")
            .to_string(),
        subject: dn_contents(cert.subject().as_raw()).to_vec(),
        issuer: dn_contents(cert.issuer().as_raw()).to_vec(),
    })
}

/// First value of `target` in an ordered attribute list
pub fn find_first<'a>(attributes: &'a [(String, String)], target: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(oid, _)| oid == target)
        .map(|(_, value)| value.as_str())
}

/// Flatten a distinguished name into `(attribute OID, value)` pairs
fn name_attributes(name: &X509Name) -> Vec<(String, String)> {
    name.iter_attributes()
        .filter_map(|attr| {
            attr.as_str()
                .ok()
                .map(|value| (attr.attr_type().to_id_string(), value.to_string()))
        })
        .collect()
}

fn parse_strict(der: &[u8]) -> Result<X509Certificate<'_>, DecodeError> {
    let (rest, cert) = X509Certificate::from_der(der).map_err(|e| DecodeError::Malformed {
        message: format!("failed to parse certificate: {}", e),
    })?;

    if !rest.is_empty() {
        return Err(DecodeError::Malformed {
            message: format!("{} trailing bytes after certificate", rest.len()),
        });
    }

    Ok(cert)
}

fn extract_san(cert: &X509Certificate) -> Result<Vec<String>, DecodeError> {
    let san = cert
        .subject_alternative_name()
        .map_err(|e| DecodeError::Malformed {
            message: format!("invalid subjectAltName extension: {}", e),
        })?;

    Ok(san
        .map(|ext| {
            ext.value
                .general_names
                .iter()
                .filter_map(|name| match name {
                    GeneralName::DNSName(dns) => Some(dns.to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default())
}

fn extract_public_key_info(cert: &X509Certificate) -> Result<(KeyAlgorithm, u32), DecodeError> {
    let spki = cert.public_key();
    let alg_oid = spki.algorithm.algorithm.to_id_string();

    match spki.parsed() {
        Ok(PublicKey::RSA(rsa)) => Ok((KeyAlgorithm::Rsa, rsa_modulus_bits(rsa.modulus))),
        Ok(PublicKey::EC(_)) => {
            let curve = spki
                .algorithm
                .parameters
                .as_ref()
                .and_then(|p| p.as_oid().ok())
                .map(|oid| oid.to_id_string());
            let bits = curve
                .as_deref()
                .and_then(curve_order_bits)
                .unwrap_or_else(|| ec_point_bits(&spki.subject_public_key.data));
            Ok((KeyAlgorithm::Ecdsa, bits))
        }
        Err(e) if alg_oid == OID_KEY_RSA || alg_oid == OID_KEY_EC => {
            Err(DecodeError::Malformed {
                message: format!("invalid public key: {}", e),
            })
        }
        _ => Ok((
            KeyAlgorithm::Other,
            (spki.subject_public_key.data.len() * 8) as u32,
        )),
    }
}

/// Bit length of an RSA modulus (big-endian, possibly zero padded)
fn rsa_modulus_bits(modulus: &[u8]) -> u32 {
    let significant = match modulus.iter().position(|&b| b != 0) {
        Some(start) => &modulus[start..],
        None => return 0,
    };
    (significant.len() as u32 - 1) * 8 + (8 - significant[0].leading_zeros())
}

/// Order size of the named curves in common use
fn curve_order_bits(oid: &str) -> Option<u32> {
    match oid {
        // secp192r1
        "1.2.840.10045.3.1.1" => Some(192),
        // secp224r1
        "1.3.132.0.33" => Some(224),
        // secp256r1 / P-256
        "1.2.840.10045.3.1.7" => Some(256),
        // secp256k1
        "1.3.132.0.10" => Some(256),
        // secp384r1 / P-384
        "1.3.132.0.34" => Some(384),
        // secp521r1 / P-521
        "1.3.132.0.35" => Some(521),
        // brainpoolP256r1, P384r1, P512r1
        "1.3.36.3.3.2.8.1.1.7" => Some(256),
        "1.3.36.3.3.2.8.1.1.11" => Some(384),
        "1.3.36.3.3.2.8.1.1.13" => Some(512),
        _ => None,
    }
}

/// Coordinate size derived from the point encoding, for unnamed curves
fn ec_point_bits(point: &[u8]) -> u32 {
    match point.first() {
        Some(0x04) => ((point.len() - 1) / 2 * 8) as u32,
        Some(0x02) | Some(0x03) => ((point.len() - 1) * 8) as u32,
        _ => (point.len() * 8) as u32,
    }
}

/// Canonical name of a signature algorithm OID
fn signature_algorithm_name(oid: &str) -> String {
    match oid {
        "1.2.840.113549.1.1.2" => "md2WithRSAEncryption",
        "1.2.840.113549.1.1.4" => "md5WithRSAEncryption",
        "1.2.840.113549.1.1.5" => "sha1WithRSAEncryption",
        "1.2.840.113549.1.1.10" => "rsassaPss",
        "1.2.840.113549.1.1.11" => "sha256WithRSAEncryption",
        "1.2.840.113549.1.1.12" => "sha384WithRSAEncryption",
        "1.2.840.113549.1.1.13" => "sha512WithRSAEncryption",
        "1.2.840.113549.1.1.14" => "sha224WithRSAEncryption",
        "1.2.840.10040.4.3" => "dsa-with-sha1",
        "2.16.840.1.101.3.4.3.2" => "dsa-with-sha256",
        "1.2.840.10045.4.1" => "ecdsa-with-SHA1",
        "1.2.840.10045.4.3.1" => "ecdsa-with-SHA224",
        "1.2.840.10045.4.3.2" => "ecdsa-with-SHA256",
        "1.2.840.10045.4.3.3" => "ecdsa-with-SHA384",
        "1.2.840.10045.4.3.4" => "ecdsa-with-SHA512",
        "1.3.101.112" => "ed25519",
        "1.3.101.113" => "ed448",
        other => return other.to_string(),
    }
    .to_string()
}

/// Strip the outer SEQUENCE header from a DER encoded Name
pub(crate) fn dn_contents(raw: &[u8]) -> &[u8] {
    let header = match raw.get(1) {
        Some(&len) if len & 0x80 == 0 => 2,
        Some(&len) => 2 + (len & 0x7f) as usize,
        None => return raw,
    };
    raw.get(header..).unwrap_or(&[])
}

fn serial_display(raw: &[u8]) -> String {
    let mut hex: String = raw.iter().map(|b| format!("{:02x}", b)).collect();
    hex.truncate(SERIAL_DISPLAY_LEN);
    hex
}

fn fingerprint(der: &[u8]) -> String {
    sha2::Sha256::digest(der)
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// Convert ASN.1 time to chrono DateTime
fn asn1_time_to_datetime(time: ASN1Time) -> Result<DateTime<Utc>, DecodeError> {
    Utc.timestamp_opt(time.timestamp(), 0)
        .single()
        .ok_or_else(|| DecodeError::Malformed {
            message: "invalid timestamp in certificate".to_string(),
        })
}
