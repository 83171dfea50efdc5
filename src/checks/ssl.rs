//! TLS certificate fetcher
//!
//! Connects to a host, performs a single TLS handshake with the domain as SNI
//! and captures the certificate chain the server sends. Certificate
//! verification never aborts the handshake: expired, mismatched and
//! self-signed certificates are still retrieved so they can be graded. The
//! WebPKI verdict is recorded on the side instead.

use crate::checks::dns::{parse_ip_literal, DnsResolver};
use crate::utils::ConnectionError;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::client::WebPkiServerVerifier;
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, Error as RustlsError, RootCertStore, SignatureScheme};
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

/// Certificates captured from one handshake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedChain {
    /// DER certificates in the order the server sent them, leaf first
    pub certificates: Vec<Vec<u8>>,
    /// Whether the chain verified against the WebPKI roots for this name
    pub trust_verified: bool,
}

impl FetchedChain {
    pub fn leaf(&self) -> Option<&[u8]> {
        self.certificates.first().map(Vec::as_slice)
    }
}

/// Something that can retrieve the certificate chain of a host
pub trait CertificateSource: Send + Sync {
    fn fetch(
        &self,
        domain: &str,
        port: u16,
        timeout: Duration,
    ) -> impl Future<Output = Result<FetchedChain, ConnectionError>> + Send;
}

/// A verifier that records the WebPKI verdict and accepts the certificate regardless.
#[derive(Debug)]
struct TrustRecordingVerifier {
    inner: Arc<WebPkiServerVerifier>,
    verdict: Arc<Mutex<Option<bool>>>,
}

impl ServerCertVerifier for TrustRecordingVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, RustlsError> {
        let verified = match self.inner.verify_server_cert(
            end_entity,
            intermediates,
            server_name,
            ocsp_response,
            now,
        ) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("Certificate for {:?} did not verify: {}", server_name, e);
                false
            }
        };
        if let Ok(mut stored) = self.verdict.lock() {
            *stored = Some(verified);
        }
        Ok(ServerCertVerified::assertion())
    }

    // Handshake signatures are accepted as-is so that servers with keys ring
    // refuses to verify (RSA below 2048 bits) can still be inspected.
    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, RustlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, RustlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::ECDSA_NISTP521_SHA512,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ED25519,
            SignatureScheme::ED448,
            SignatureScheme::RSA_PKCS1_SHA1,
            SignatureScheme::ECDSA_SHA1_Legacy,
        ]
    }
}

/// Fetcher backed by rustls and the system resolver
pub struct TlsFetcher {
    resolver: DnsResolver,
    roots: Arc<RootCertStore>,
    provider: Arc<CryptoProvider>,
}

impl TlsFetcher {
    /// Create a fetcher that verifies against the Mozilla root set
    pub fn new() -> Self {
        Self::with_roots(RootCertStore::from_iter(
            webpki_roots::TLS_SERVER_ROOTS.iter().cloned(),
        ))
    }

    /// Create a fetcher that verifies against the given roots
    pub fn with_roots(roots: RootCertStore) -> Self {
        Self {
            resolver: DnsResolver::system(),
            roots: Arc::new(roots),
            provider: Arc::new(rustls::crypto::ring::default_provider()),
        }
    }

    fn client_config(
        &self,
        verdict: Arc<Mutex<Option<bool>>>,
    ) -> Result<ClientConfig, ConnectionError> {
        let inner = WebPkiServerVerifier::builder_with_provider(
            Arc::clone(&self.roots),
            Arc::clone(&self.provider),
        )
        .build()
        .map_err(|e| ConnectionError::TlsFailure {
            message: format!("Failed to build verifier: {}", e),
        })?;

        let verifier = TrustRecordingVerifier { inner, verdict };
        let config = ClientConfig::builder_with_provider(Arc::clone(&self.provider))
            .with_safe_default_protocol_versions()
            .map_err(|e| ConnectionError::TlsFailure {
                message: e.to_string(),
            })?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(verifier))
            .with_no_client_auth();
        Ok(config)
    }

    async fn fetch_chain(&self, domain: &str, port: u16) -> Result<FetchedChain, ConnectionError> {
        let server_name = server_name(domain)?;
        let addresses = self.resolver.resolve(domain).await?;
        let stream = connect(&addresses, port).await?;

        let verdict = Arc::new(Mutex::new(None));
        let connector = TlsConnector::from(Arc::new(self.client_config(Arc::clone(&verdict))?));

        let tls_stream = connector
            .connect(server_name, stream)
            .await
            .map_err(|e| ConnectionError::TlsFailure {
                message: e.to_string(),
            })?;

        let (_, client_connection) = tls_stream.get_ref();
        let certificates: Vec<Vec<u8>> = client_connection
            .peer_certificates()
            .map(|certs| certs.iter().map(|c| c.as_ref().to_vec()).collect())
            .unwrap_or_default();

        if certificates.is_empty() {
            return Err(ConnectionError::TlsFailure {
                message: "server presented no certificate".to_string(),
            });
        }

        let trust_verified = verdict.lock().ok().and_then(|v| *v).unwrap_or(false);
        tracing::debug!(
            "Fetched {} certificate(s) from {}:{} (trusted: {})",
            certificates.len(),
            domain,
            port,
            trust_verified
        );

        Ok(FetchedChain {
            certificates,
            trust_verified,
        })
    }
}

impl Default for TlsFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CertificateSource for TlsFetcher {
    async fn fetch(
        &self,
        domain: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<FetchedChain, ConnectionError> {
        match tokio::time::timeout(timeout, self.fetch_chain(domain, port)).await {
            Ok(result) => result,
            Err(_) => Err(ConnectionError::Timeout {
                seconds: whole_seconds(timeout),
            }),
        }
    }
}

/// Timeout in whole seconds, rounded up
fn whole_seconds(timeout: Duration) -> u64 {
    timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0)
}

/// Server name sent as SNI; IP literals are accepted without SNI
fn server_name(domain: &str) -> Result<ServerName<'static>, ConnectionError> {
    if let Some(ip) = parse_ip_literal(domain) {
        return Ok(ServerName::IpAddress(ip.into()));
    }
    ServerName::try_from(domain.to_string()).map_err(|_| ConnectionError::TlsFailure {
        message: format!("Invalid server name: {}", domain),
    })
}

/// Connect to the first address that accepts
async fn connect(addresses: &[IpAddr], port: u16) -> Result<TcpStream, ConnectionError> {
    let mut last_error = None;

    for ip in addresses {
        let addr = SocketAddr::new(*ip, port);
        match TcpStream::connect(addr).await {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!("Connection to {} failed: {}", addr, e);
                last_error = Some(ConnectionError::Refused {
                    address: addr.to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    Err(last_error.unwrap_or_else(|| ConnectionError::Refused {
        address: format!("port {}", port),
        message: "no addresses to connect to".to_string(),
    }))
}
