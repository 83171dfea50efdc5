//! Check stages for ssl-checker
//!
//! Fetch, decode, evaluate and grade. Only the fetcher touches the network;
//! the other stages are synchronous and pure.

pub mod certificate;
pub mod chain;
pub mod dns;
pub mod grading;
pub mod policy;
pub mod ssl;

pub use certificate::{decode, decode_chain};
pub use chain::complete_with_trust_anchors;
pub use dns::DnsResolver;
pub use grading::grade;
pub use policy::{evaluate, evaluate_with};
pub use ssl::{CertificateSource, FetchedChain, TlsFetcher};
