//! Rich terminal output formatting

use super::grade::{styled_assessment, styled_grade, styled_severity_icon};
use crate::models::{BatchCounts, CheckResult};
use console::style;

/// Print section header
pub fn print_header(title: &str) {
    println!();
    println!("{}", style(format!("━━━ {} ━━━", title)).cyan().bold());
    println!();
}

/// Format one domain's result as a block of lines
pub fn format_result(result: &CheckResult) -> String {
    let mut out = String::new();

    if !result.success {
        out.push_str(&format!(
            "{} {}  {}  {}\n",
            style("✗").red().bold(),
            style(&result.domain).bold(),
            styled_grade(result.grade),
            styled_assessment(result.assessment)
        ));
        if let Some(error) = &result.error {
            out.push_str(&format!("    {}\n", style(error).red()));
        }
        return out;
    }

    let icon = if result.findings.is_empty() {
        style("✓").green().bold()
    } else {
        style("!").yellow().bold()
    };
    out.push_str(&format!(
        "{} {}  {}  {}  {}\n",
        icon,
        style(&result.domain).bold(),
        styled_grade(result.grade),
        styled_assessment(result.assessment),
        result
            .days_until_expiry
            .map(format_expiry_days)
            .unwrap_or_default()
    ));

    if let Some(cert) = &result.certificate {
        out.push_str(&format!(
            "    {} {}  {} {}  {} {} {} bits\n",
            style("Issuer:").dim(),
            cert.issuer_name,
            style("Expires:").dim(),
            cert.not_after.format("%Y-%m-%d"),
            style("Key:").dim(),
            cert.public_key_algorithm,
            cert.key_bits
        ));
    }

    for finding in &result.findings {
        out.push_str(&format!(
            "    {} {}: {}\n",
            styled_severity_icon(finding.severity),
            finding.category,
            finding.message
        ));
    }

    out
}

/// Print one domain's result
pub fn print_result(result: &CheckResult) {
    print!("{}", format_result(result));
}

/// Print the summary of a batch
pub fn print_batch_summary(counts: &BatchCounts) {
    print_header("Batch Check Summary");

    println!("  Total domains checked: {}", style(counts.total()).bold());
    println!("  Valid: {}", style(counts.valid).green());
    println!("  Expiring soon: {}", style(counts.expiring_soon).yellow());
    println!("  Already expired: {}", style(counts.expired).red());
    println!("  Failed: {}", style(counts.errored).red());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), message);
}

fn format_expiry_days(days: i64) -> String {
    if days < 0 {
        style(format!("Expired {} days ago", days.abs()))
            .red()
            .to_string()
    } else if days == 0 {
        style("Expires today!").red().bold().to_string()
    } else if days <= 7 {
        style(format!("{} days left", days)).red().to_string()
    } else if days <= 30 {
        style(format!("{} days left", days)).yellow().to_string()
    } else {
        style(format!("{} days left", days)).green().to_string()
    }
}
