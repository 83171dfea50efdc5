//! Name resolution for the fetcher
//!
//! Resolves a domain through the system resolver configuration. IP literals
//! are returned as-is without a lookup.

use crate::utils::ConnectionError;
use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::Resolver;
use std::net::IpAddr;

/// Type alias for the Tokio async resolver
type TokioResolver = Resolver<TokioConnectionProvider>;

/// Resolver used by the fetcher
pub struct DnsResolver {
    resolver: TokioResolver,
}

impl DnsResolver {
    /// Create a resolver from the system configuration (`/etc/resolv.conf` on Unix)
    ///
    /// Falls back to the resolver's built-in public nameservers when the
    /// system configuration cannot be read.
    pub fn system() -> Self {
        let resolver = match TokioResolver::builder_tokio() {
            Ok(builder) => builder.build(),
            Err(e) => {
                tracing::warn!("Failed to read system resolver config, using defaults: {}", e);
                TokioResolver::builder_with_config(
                    ResolverConfig::default(),
                    TokioConnectionProvider::default(),
                )
                .build()
            }
        };
        Self { resolver }
    }

    /// Resolve a domain to its addresses, in resolver order
    pub async fn resolve(&self, domain: &str) -> Result<Vec<IpAddr>, ConnectionError> {
        if let Some(ip) = parse_ip_literal(domain) {
            return Ok(vec![ip]);
        }

        let lookup = self
            .resolver
            .lookup_ip(domain)
            .await
            .map_err(|e| ConnectionError::DnsFailure {
                domain: domain.to_string(),
                message: e.to_string(),
            })?;

        let addresses: Vec<IpAddr> = lookup.iter().collect();
        if addresses.is_empty() {
            return Err(ConnectionError::DnsFailure {
                domain: domain.to_string(),
                message: "no addresses returned".to_string(),
            });
        }

        tracing::debug!("Resolved {} to {:?}", domain, addresses);
        Ok(addresses)
    }
}

/// Parse an IP literal, accepting bracketed IPv6 (`[::1]`)
pub fn parse_ip_literal(host: &str) -> Option<IpAddr> {
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    host.parse().ok()
}
