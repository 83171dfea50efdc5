//! Chain completion against the Mozilla root set
//!
//! Servers normally leave the root out of the chain they send. When the walk
//! from the leaf ends at a certificate issued by a root shipped in
//! `webpki-roots`, that
//! root is appended as a self-signed link so the structural chain check sees
//! the chain the client would actually build.

use crate::checks::certificate::{find_first, OID_COMMON_NAME};
use crate::models::{CertificateChain, ChainLink};
use x509_parser::prelude::*;

/// Append the `webpki-roots` anchor that issued the end of `chain`, if any
pub fn complete_with_trust_anchors(chain: &mut CertificateChain) -> bool {
    complete_with_roots(
        chain,
        webpki_roots::TLS_SERVER_ROOTS
            .iter()
            .map(|anchor| anchor.subject.as_ref()),
    )
}

/// Append the root whose subject issued the end of the walk from the leaf
///
/// The end is found by following issuers, so chains sent out of order are
/// completed too. `root_subjects` are DER contents of root distinguished
/// names (without the outer SEQUENCE header). Returns whether a root was
/// appended.
pub fn complete_with_roots<'a>(
    chain: &mut CertificateChain,
    root_subjects: impl IntoIterator<Item = &'a [u8]>,
) -> bool {
    let Some(top) = chain.walk_end() else {
        return false;
    };
    if top.is_self_signed() {
        return false;
    }

    let wanted = top.issuer.clone();
    let Some(root) = root_subjects.into_iter().find(|subject| *subject == wanted) else {
        return false;
    };

    tracing::debug!("Completed chain with trust anchor {}", anchor_name(root));
    chain.links.push(ChainLink {
        subject_name: anchor_name(root),
        subject: root.to_vec(),
        issuer: root.to_vec(),
    });
    true
}

/// Common name of an anchor subject, for display
fn anchor_name(contents: &[u8]) -> String {
    let der = wrap_sequence(contents);
    X509Name::from_der(&der)
        .ok()
        .and_then(|(_, name)| {
            let attributes: Vec<(String, String)> = name
                .iter_attributes()
                .filter_map(|attr| {
                    attr.as_str()
                        .ok()
                        .map(|value| (attr.attr_type().to_id_string(), value.to_string()))
                })
                .collect();
            find_first(&attributes, OID_COMMON_NAME).map(str::to_string)
        })
        .unwrap_or_else(|| "Trust anchor".to_string())
}

/// Re-add the SEQUENCE header stripped from a Name
fn wrap_sequence(contents: &[u8]) -> Vec<u8> {
    let len = contents.len();
    let mut der = vec![0x30];
    if len < 0x80 {
        der.push(len as u8);
    } else if len <= 0xff {
        der.extend([0x81, len as u8]);
    } else {
        der.extend([0x82, (len >> 8) as u8, len as u8]);
    }
    der.extend_from_slice(contents);
    der
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::certificate::dn_contents;

    fn link(subject: &[u8], issuer: &[u8]) -> ChainLink {
        ChainLink {
            subject_name: String::from_utf8_lossy(subject).to_string(),
            subject: subject.to_vec(),
            issuer: issuer.to_vec(),
        }
    }

    #[test]
    fn test_appends_matching_root() {
        let mut chain = CertificateChain::new(vec![
            link(b"leaf", b"intermediate"),
            link(b"intermediate", b"root"),
        ]);
        let roots: Vec<&[u8]> = vec![b"other", b"root"];

        assert!(complete_with_roots(&mut chain, roots));
        assert_eq!(chain.len(), 3);
        assert!(chain.terminates_at_self_signed_root());
    }

    #[test]
    fn test_completes_chain_sent_out_of_order() {
        let mut chain = CertificateChain::new(vec![
            link(b"leaf", b"int1"),
            link(b"int2", b"root"),
            link(b"int1", b"int2"),
        ]);
        let roots: Vec<&[u8]> = vec![b"root"];

        assert!(!chain.terminates_at_self_signed_root());
        assert!(complete_with_roots(&mut chain, roots));
        assert_eq!(chain.len(), 4);
        assert!(chain.terminates_at_self_signed_root());
    }

    #[test]
    fn test_cycle_is_not_completed() {
        let mut chain = CertificateChain::new(vec![link(b"a", b"b"), link(b"b", b"a")]);
        let roots: Vec<&[u8]> = vec![b"a", b"b"];

        assert!(!complete_with_roots(&mut chain, roots));
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_no_matching_root() {
        let mut chain = CertificateChain::new(vec![link(b"leaf", b"intermediate")]);
        let roots: Vec<&[u8]> = vec![b"root"];

        assert!(!complete_with_roots(&mut chain, roots));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_self_signed_top_is_left_alone() {
        let mut chain = CertificateChain::new(vec![
            link(b"leaf", b"root"),
            link(b"root", b"root"),
        ]);
        let roots: Vec<&[u8]> = vec![b"root"];

        assert!(!complete_with_roots(&mut chain, roots));
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_wrap_sequence_round_trips_header() {
        let contents = vec![0x31; 200];
        let der = wrap_sequence(&contents);
        assert_eq!(&der[..3], &[0x30, 0x81, 200]);
        assert_eq!(dn_contents(&der), contents.as_slice());
    }

    #[test]
    fn test_real_anchor_has_a_name() {
        let anchor = &webpki_roots::TLS_SERVER_ROOTS[0];
        let name = anchor_name(anchor.subject.as_ref());
        assert!(!name.is_empty());
    }
}
