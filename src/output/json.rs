//! JSON output formatter

use crate::models::BatchResult;

/// Serialize a batch result as pretty-printed JSON
pub fn to_json(batch: &BatchResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(batch)
}

/// Print a batch result as JSON to stdout
pub fn print_json(batch: &BatchResult) -> anyhow::Result<()> {
    println!("{}", to_json(batch)?);
    Ok(())
}
