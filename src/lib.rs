//! Salesforce Report Metadata
//!
//! Lists every report in a Salesforce org, describes each one, and writes
//! the normalized metadata to one JSON file per report plus a run summary.

pub mod client;
pub mod config;
pub mod etl;
pub mod pipeline;
pub mod reports;
pub mod storage;

// Re-exports for convenience
pub use client::{Credentials, ReportsApi, SalesforceClient, Session};
pub use config::{ExtractConfig, Settings};
pub use etl::Transformer;
pub use pipeline::{ReportPipeline, Stage};
pub use reports::{ReportDescriptor, ReportMetadata, ReportOutcome, RunSummary};
pub use storage::ReportDirectory;
