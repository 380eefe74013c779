//! Output formatting for CLI.

mod json;
mod summary;

pub use json::{JsonOutput, OutputFormat};
pub use summary::{EntrySummary, TimelineSummary};
