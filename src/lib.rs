//! ssl-checker Library
//!
//! Certificate retrieval and security evaluation:
//! - TLS handshake against each domain, capturing the presented chain
//! - X.509 decoding of the leaf and the chain
//! - Policy evaluation (expiry, weak keys and signatures, hostname coverage,
//!   chain completeness)
//! - A letter grade and assessment per domain, plus batch counts
//!
//! # Usage
//!
//! ```rust,no_run
//! use ssl_checker::{check_domains, CheckOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let domains = vec!["github.com".to_string()];
//!     let batch = check_domains(&domains, &CheckOptions::default()).await;
//!     for result in &batch.results {
//!         println!("{}: {}", result.domain, result.grade);
//!     }
//! }
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod models;
pub mod output;
pub mod runner;
pub mod utils;

// Re-export commonly used types
pub use checks::{CertificateSource, FetchedChain, TlsFetcher};
pub use config::{CheckOptions, PolicySettings, Settings};
pub use models::{
    Assessment, BatchCounts, BatchResult, Certificate, CheckResult, Finding, FindingCategory,
    Grade, Severity,
};
pub use runner::{check_domains, CertificateRunner, CheckEvent};
pub use utils::{CheckError, Clock, ConnectionError, DecodeError, FixedClock, SystemClock};
