//! Salesforce report extraction
//!
//! Listing ([`ReportsExtractor`]), per-report describe and reshape
//! ([`ReportEnricher`], [`ReportFormatter`]) and the output record types.

mod descriptor;
mod enricher;
mod extractor;
mod formatter;
mod metadata;
mod query;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use descriptor::ReportDescriptor;
pub use enricher::{ReportEnricher, format_duration};
pub(crate) use enricher::error_message;
pub use extractor::{FetchedReports, ReportsExtractor};
pub use formatter::{DescribedReport, ReportFormatter};
pub use metadata::{
    AdditionalInfo, BasicInfo, ReportFailure, ReportFields, ReportFilters, ReportMetadata,
    ReportOutcome, RunSummary,
};
pub use query::ReportQuery;
