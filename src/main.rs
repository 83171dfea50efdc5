//! ssl-checker - TLS certificate expiry and security checker
//!
//! Checks one or more domains and prints a grade, an assessment and the
//! findings for each, followed by a summary. Exits with status 1 when any
//! domain errored or was assessed as a critical issue.

use anyhow::{bail, Context, Result};
use clap::Parser;
use ssl_checker::cli::Cli;
use ssl_checker::config::load_config;
use ssl_checker::output;
use ssl_checker::runner::CertificateRunner;
use ssl_checker::utils::progress::BatchProgress;
use ssl_checker::utils::SystemClock;
use ssl_checker::{BatchResult, CheckEvent, TlsFetcher};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(batch) => {
            if batch.has_failures() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<BatchResult> {
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let mut settings = load_config(cli.config.as_deref()).context("Failed to load settings")?;
    cli.apply_overrides(&mut settings.check);
    settings
        .check
        .validate()
        .context("Invalid command-line option")?;

    let domains = cli.collect_domains().context("Failed to read domain file")?;
    if domains.is_empty() {
        bail!("No domains given (pass them as arguments or with --file)");
    }

    let runner = CertificateRunner::new(TlsFetcher::new(), SystemClock, settings.check.clone());

    let batch = if cli.shows_progress(domains.len()) {
        let progress = BatchProgress::new(domains.len() as u64);
        let on_event = |event: CheckEvent| progress.handle(event);
        let batch = runner.check_all(&domains, Some(&on_event)).await;
        progress.finish_and_clear();
        batch
    } else {
        runner.check_all(&domains, None).await
    };

    if cli.json {
        output::print_json(&batch)?;
        return Ok(batch);
    }

    let shown = batch
        .results
        .iter()
        .filter(|r| !cli.issues_only || r.has_issues());

    if cli.quiet {
        for result in shown {
            output::print_grade_quiet(&result.domain, result.grade);
        }
        return Ok(batch);
    }

    output::print_header("Certificate Checks");
    for result in shown {
        output::print_result(result);
    }
    output::print_batch_summary(&batch.counts);

    Ok(batch)
}
