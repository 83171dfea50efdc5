//! Output formatting module
//!
//! Provides the output formats of the command-line driver:
//! - Coloured terminal output with a batch summary
//! - JSON export

pub mod grade;
pub mod json;
pub mod terminal;

pub use grade::print_grade_quiet;
pub use json::{print_json, to_json};
pub use terminal::{format_result, print_batch_summary, print_error, print_header, print_result};
