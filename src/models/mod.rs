//! Data models for ssl-checker
//!
//! This module contains all the data structures produced by a check.

pub mod certificate;
pub mod check_result;
pub mod finding;
pub mod report_card;

pub use certificate::{Certificate, CertificateChain, ChainLink, KeyAlgorithm};
pub use check_result::{BatchCounts, BatchResult, CheckResult, ExpiryStatus};
pub use finding::{Finding, FindingCategory, Severity};
pub use report_card::{Assessment, Grade};
