//! CLI argument definitions using clap

use crate::config::CheckOptions;
use clap::Parser;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "ssl-checker")]
#[command(version)]
#[command(about = "Check TLS certificates for expiry, weak crypto and hostname coverage", long_about = None)]
pub struct Cli {
    /// Domains to check
    #[arg(value_name = "DOMAIN")]
    pub domains: Vec<String>,

    /// File containing domains (one per line, '#' starts a comment)
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Port to connect to (default: 443)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Connection timeout in seconds (default: 10)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Warn when a certificate expires within this many days (default: 30)
    #[arg(short, long, value_name = "DAYS")]
    pub warning_days: Option<i64>,

    /// Number of domains checked at the same time (default: 8)
    #[arg(long, value_name = "N")]
    pub parallel: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Print one "domain grade" line per domain
    #[arg(short, long)]
    pub quiet: bool,

    /// Only show domains with issues
    #[arg(long)]
    pub issues_only: bool,

    /// Path to a TOML settings file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply command-line overrides on top of configured options
    pub fn apply_overrides(&self, options: &mut CheckOptions) {
        if let Some(port) = self.port {
            options.port = port;
        }
        if let Some(timeout) = self.timeout {
            options.timeout_secs = timeout;
        }
        if let Some(days) = self.warning_days {
            options.warning_window_days = days;
        }
        if let Some(parallel) = self.parallel {
            options.concurrency = parallel;
        }
    }

    /// Positional domains followed by those from `--file`, normalised
    pub fn collect_domains(&self) -> std::io::Result<Vec<String>> {
        let mut domains: Vec<String> = self
            .domains
            .iter()
            .filter_map(|d| normalize_domain(d))
            .collect();

        if let Some(path) = &self.file {
            domains.extend(read_domain_file(path)?);
        }

        Ok(domains)
    }

    /// Whether a progress bar should be drawn
    pub fn shows_progress(&self, domain_count: usize) -> bool {
        !self.json && !self.quiet && domain_count > 1
    }
}

/// Strip scheme, path and port from user input and lower-case it
///
/// Returns `None` when nothing is left.
pub fn normalize_domain(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let without_scheme = trimmed
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(trimmed);
    let host_port = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();

    let host = if let Some(bracketed) = host_port.strip_prefix('[') {
        // [v6]:port
        match bracketed.split_once(']') {
            Some((v6, _)) => format!("[{}]", v6),
            None => host_port.to_string(),
        }
    } else {
        match host_port.rsplit_once(':') {
            Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host.to_string(),
            _ => host_port.to_string(),
        }
    };

    let host = host.trim_end_matches('.').to_lowercase();
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Read domains from a file, one per line
///
/// Blank lines and lines starting with `#` are skipped.
pub fn read_domain_file(path: &Path) -> std::io::Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);

    let mut domains = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some(domain) = normalize_domain(trimmed) {
            domains.push(domain);
        }
    }
    Ok(domains)
}
