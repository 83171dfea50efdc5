//! Grade and assessment display

use crate::models::{Assessment, Grade, Severity};
use console::{style, StyledObject};

/// Grade letter coloured by band
pub fn styled_grade(grade: Grade) -> StyledObject<&'static str> {
    let grade_str = grade.as_str();
    match grade {
        Grade::APlus | Grade::A => style(grade_str).green().bold(),
        Grade::B => style(grade_str).cyan().bold(),
        Grade::C | Grade::D => style(grade_str).yellow().bold(),
        Grade::F => style(grade_str).red().bold(),
    }
}

/// Assessment label coloured by severity
pub fn styled_assessment(assessment: Assessment) -> StyledObject<&'static str> {
    let label = assessment.as_str();
    match assessment {
        Assessment::Secure => style(label).green(),
        Assessment::Monitor => style(label).yellow(),
        Assessment::UrgentAttention => style(label).red(),
        Assessment::CriticalIssue => style(label).red().bold(),
    }
}

/// Severity icon coloured by severity
pub fn styled_severity_icon(severity: Severity) -> StyledObject<&'static str> {
    let icon = severity.icon();
    match severity {
        Severity::Info => style(icon).blue(),
        Severity::Warning => style(icon).yellow().bold(),
        Severity::Critical => style(icon).red().bold(),
    }
}

/// Print just the grade line (for quiet mode)
pub fn print_grade_quiet(domain: &str, grade: Grade) {
    println!("{} {}", domain, grade.as_str());
}
