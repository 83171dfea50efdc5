//! Check orchestration engine
//!
//! Runs each domain through fetch, decode, evaluate and grade, concurrently
//! up to the configured limit. A failure for one domain becomes a failed
//! [`CheckResult`] for that domain and never affects the others. Results come
//! back in input order and events are reported through an optional callback
//! so any frontend (CLI progress bar, tests) can follow along.

use crate::checks::dns::parse_ip_literal;
use crate::checks::{certificate, chain, grading, policy};
use crate::checks::{CertificateSource, TlsFetcher};
use crate::config::CheckOptions;
use crate::models::{BatchResult, CheckResult};
use crate::utils::{CheckError, Clock, DecodeError, Result, SystemClock};
use futures::stream::{self, StreamExt};
use rustls::pki_types::ServerName;

/// Events emitted during a batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckEvent {
    Started {
        domain: String,
        index: usize,
    },
    Finished {
        domain: String,
        index: usize,
        success: bool,
    },
}

/// Runs certificate checks against a source using a clock
pub struct CertificateRunner<S, C> {
    source: S,
    clock: C,
    options: CheckOptions,
}

impl<S: CertificateSource, C: Clock> CertificateRunner<S, C> {
    pub fn new(source: S, clock: C, options: CheckOptions) -> Self {
        Self {
            source,
            clock,
            options,
        }
    }

    /// Check a single domain; failures are folded into the result
    pub async fn check_domain(&self, domain: &str) -> CheckResult {
        match self.inspect(domain).await {
            Ok(result) => {
                tracing::debug!(
                    "{}: grade {} ({}), {} finding(s)",
                    domain,
                    result.grade,
                    result.assessment,
                    result.findings.len()
                );
                result
            }
            Err(e) => {
                tracing::warn!("Check failed for {}: {}", domain, e);
                CheckResult::failure(domain, e.to_string(), self.clock.now())
            }
        }
    }

    async fn inspect(&self, domain: &str) -> Result<CheckResult> {
        validate_domain(domain)?;

        let fetched = self
            .source
            .fetch(domain, self.options.port, self.options.timeout())
            .await?;
        let leaf = fetched.leaf().ok_or_else(|| DecodeError::Malformed {
            message: "no certificate was presented".to_string(),
        })?;

        let certificate = certificate::decode(leaf, domain)?;
        let mut presented = certificate::decode_chain(&fetched.certificates);
        if self.options.use_trust_anchors {
            chain::complete_with_trust_anchors(&mut presented);
        }

        let now = self.clock.now();
        let findings =
            policy::evaluate_with(&certificate, Some(&presented), now, &self.options.policy());
        let (grade, assessment) = grading::grade(&findings);

        Ok(CheckResult::success(
            certificate,
            findings,
            grade,
            assessment,
            Some(fetched.trust_verified),
            now,
        ))
    }

    /// Check every domain, preserving input order
    ///
    /// Repeated domains are checked again and get their own entry. The
    /// returned future is `Send`, so a batch can run on a spawned task.
    pub async fn check_all(
        &self,
        domains: &[String],
        on_event: Option<&(dyn Fn(CheckEvent) + Sync)>,
    ) -> BatchResult {
        let concurrency = self.options.concurrency.max(1);
        tracing::debug!(
            "Checking {} domain(s), {} at a time",
            domains.len(),
            concurrency
        );

        let results: Vec<CheckResult> = stream::iter(domains.iter().cloned().enumerate())
            .map(|(index, domain)| async move {
                if let Some(emit) = on_event {
                    emit(CheckEvent::Started {
                        domain: domain.clone(),
                        index,
                    });
                }
                let result = self.check_domain(&domain).await;
                if let Some(emit) = on_event {
                    emit(CheckEvent::Finished {
                        domain: domain.clone(),
                        index,
                        success: result.success,
                    });
                }
                result
            })
            .buffered(concurrency)
            .collect()
            .await;

        BatchResult::new(results)
    }
}

/// Check domains over the network with the wall clock
pub async fn check_domains(domains: &[String], options: &CheckOptions) -> BatchResult {
    let runner = CertificateRunner::new(TlsFetcher::new(), SystemClock, options.clone());
    runner.check_all(domains, None).await
}

/// Reject names that can never be connected to
fn validate_domain(domain: &str) -> Result<()> {
    let invalid = |reason: &str| CheckError::InvalidDomain {
        domain: domain.to_string(),
        reason: reason.to_string(),
    };

    if domain.is_empty() {
        return Err(invalid("domain is empty"));
    }
    if domain.chars().any(char::is_whitespace) {
        return Err(invalid("domain contains whitespace"));
    }
    if parse_ip_literal(domain).is_none() && ServerName::try_from(domain).is_err() {
        return Err(invalid("not a valid host name"));
    }
    Ok(())
}
