//! Certificates and servers shared by the integration tests
#![allow(dead_code)]

use rcgen::{
    date_time_ymd, BasicConstraints, Certificate, CertificateParams, DistinguishedName, DnType,
    IsCa, KeyPair,
};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

/// A calendar day as (year, month, day)
pub type Day = (i32, u8, u8);

pub struct Issuer {
    pub cert: Certificate,
    pub key: KeyPair,
}

impl Issuer {
    pub fn der(&self) -> Vec<u8> {
        self.cert.der().to_vec()
    }
}

pub struct Leaf {
    pub der: Vec<u8>,
    pub key: KeyPair,
}

fn name(common_name: Option<&str>) -> DistinguishedName {
    let mut dn = DistinguishedName::new();
    if let Some(cn) = common_name {
        dn.push(DnType::OrganizationName, "Example Org");
        dn.push(DnType::CommonName, cn);
    }
    dn
}

/// Self-signed CA
pub fn root_ca(common_name: &str) -> Issuer {
    let key = KeyPair::generate().unwrap();
    let mut params = CertificateParams::new(Vec::<String>::new()).unwrap();
    params.distinguished_name = name(Some(common_name));
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    let cert = params.self_signed(&key).unwrap();
    Issuer { cert, key }
}

fn leaf_params(
    common_name: Option<&str>,
    sans: &[&str],
    not_before: Day,
    not_after: Day,
) -> CertificateParams {
    let sans: Vec<String> = sans.iter().map(|s| s.to_string()).collect();
    let mut params = CertificateParams::new(sans).unwrap();
    params.distinguished_name = name(common_name);
    params.not_before = date_time_ymd(not_before.0, not_before.1, not_before.2);
    params.not_after = date_time_ymd(not_after.0, not_after.1, not_after.2);
    params
}

/// Leaf certificate issued by `issuer`
pub fn leaf(
    issuer: &Issuer,
    common_name: Option<&str>,
    sans: &[&str],
    not_before: Day,
    not_after: Day,
) -> Leaf {
    let key = KeyPair::generate().unwrap();
    let cert = leaf_params(common_name, sans, not_before, not_after)
        .signed_by(&key, &issuer.cert, &issuer.key)
        .unwrap();
    Leaf {
        der: cert.der().to_vec(),
        key,
    }
}

/// Self-signed leaf certificate
pub fn self_signed(
    common_name: Option<&str>,
    sans: &[&str],
    not_before: Day,
    not_after: Day,
) -> Leaf {
    let key = KeyPair::generate().unwrap();
    let cert = leaf_params(common_name, sans, not_before, not_after)
        .self_signed(&key)
        .unwrap();
    Leaf {
        der: cert.der().to_vec(),
        key,
    }
}

/// Serve `chain` over TLS on a local port until the test ends
pub async fn spawn_tls_server(chain: Vec<Vec<u8>>, key: &KeyPair) -> SocketAddr {
    let certs: Vec<CertificateDer<'static>> = chain.into_iter().map(CertificateDer::from).collect();
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key.serialize_der()));

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = rustls::ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                if let Ok(mut tls) = acceptor.accept(stream).await {
                    let _ = tls.shutdown().await;
                }
            });
        }
    });
    addr
}

/// Accept connections and never answer
pub async fn spawn_silent_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    addr
}

/// Answer every connection with plain text instead of TLS
pub async fn spawn_plaintext_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let _ = stream
                .write_all(b"HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\n\r\n")
                .await;
            let _ = stream.shutdown().await;
        }
    });
    addr
}
