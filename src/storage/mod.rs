//! File system storage operations
//!
//! The output directory is reset before every run and then receives one
//! JSON file per processed report and a single run summary.

mod directory;

pub use directory::{ReportDirectory, SUMMARY_FILE, sanitize_file_name};
