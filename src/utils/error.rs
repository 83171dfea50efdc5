//! Custom error types for ssl-checker
//!
//! This module defines the failure modes of a certificate check using
//! `thiserror`. Every error here is recoverable at the orchestrator level:
//! it turns into a failed `CheckResult` for a single domain.

use thiserror::Error;

/// Per-domain failure of a certificate check
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Invalid domain '{domain}': {reason}")]
    InvalidDomain { domain: String, reason: String },
}

/// Failures while retrieving a certificate from the network
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("Connection timeout: no response within {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Domain not found (DNS error): {domain}: {message}")]
    DnsFailure { domain: String, message: String },

    #[error("SSL error: {message}")]
    TlsFailure { message: String },

    #[error("Connection to {address} failed: {message}")]
    Refused { address: String, message: String },
}

impl ConnectionError {
    /// Short machine-readable name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            ConnectionError::Timeout { .. } => "TIMEOUT",
            ConnectionError::DnsFailure { .. } => "DNS_FAILURE",
            ConnectionError::TlsFailure { .. } => "TLS_FAILURE",
            ConnectionError::Refused { .. } => "REFUSED",
        }
    }
}

/// Certificate decoding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Malformed certificate: {message}")]
    Malformed { message: String },
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for a single domain check
pub type Result<T> = std::result::Result<T, CheckError>;
