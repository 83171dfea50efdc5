//! Progress indicators for CLI mode
//!
//! This module provides batch progress display using indicatif and console,
//! driven by the runner's [`CheckEvent`]s.

use crate::runner::CheckEvent;
use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Progress bar for a batch of domain checks
pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    /// Create a progress bar for the given number of domains
    pub fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        let template = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(template);
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// A progress bar that draws nothing (quiet and JSON modes)
    pub fn hidden() -> Self {
        let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::hidden());
        Self { bar }
    }

    /// Update the bar from a runner event
    pub fn handle(&self, event: CheckEvent) {
        match event {
            CheckEvent::Started { domain, .. } => {
                self.bar.set_message(format!("Checking {}...", domain));
            }
            CheckEvent::Finished {
                domain, success, ..
            } => {
                if !success {
                    self.bar
                        .println(format!("  {} {}", style("✗").red(), domain));
                }
                self.bar.inc(1);
            }
        }
    }

    /// Position reached so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Finish and clear the progress bar
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}
