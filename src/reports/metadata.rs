//! Output records: per-report metadata, per-report outcomes and the run summary

use crate::config::ExtractConfig;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Normalized metadata for one report, written as `<name>.json`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub basic_info: BasicInfo,
    pub fields: ReportFields,
    pub filters: ReportFilters,
    pub additional_info: AdditionalInfo,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    pub id: String,
    pub name: String,
    pub folder_name: Option<String>,
    pub report_type: String,
}

/// Column and grouping definitions
///
/// Values are copied from the describe payload as-is; only a missing or null
/// list is replaced with `[]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFields {
    pub detail_columns: Value,
    pub groupings_down: Value,
    pub groupings_across: Value,
}

impl Default for ReportFields {
    fn default() -> Self {
        Self {
            detail_columns: empty_list(),
            groupings_down: empty_list(),
            groupings_across: empty_list(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilters {
    pub standard_filters: Value,
    pub cross_filters: Value,
    pub scope_filters: Value,
    pub historical_filters: Value,
}

impl Default for ReportFilters {
    fn default() -> Self {
        Self {
            standard_filters: empty_list(),
            cross_filters: empty_list(),
            scope_filters: empty_list(),
            historical_filters: empty_list(),
        }
    }
}

fn empty_list() -> Value {
    Value::Array(Vec::new())
}

/// Display attributes; `last_run_date` comes from the listing, not the describe call
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalInfo {
    pub currency: Option<Value>,
    pub show_grand_total: Option<Value>,
    pub show_subtotals: Option<Value>,
    pub last_run_date: Option<String>,
}

/// A report that could not be processed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFailure {
    error: bool,
    pub report_name: String,
    pub error_message: String,
}

impl ReportFailure {
    pub fn new(report_name: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            error: true,
            report_name: report_name.into(),
            error_message: error_message.into(),
        }
    }
}

/// The result of processing one listed report
///
/// Serialized untagged: a processed report is its metadata object, a
/// failure is `{"error": true, "reportName": ..., "errorMessage": ...}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportOutcome {
    Processed(ReportMetadata),
    Failed(ReportFailure),
}

impl ReportOutcome {
    pub fn is_processed(&self) -> bool {
        matches!(self, Self::Processed(_))
    }

    /// Display name of the report this outcome belongs to
    pub fn report_name(&self) -> &str {
        match self {
            Self::Processed(metadata) => &metadata.basic_info.name,
            Self::Failed(failure) => &failure.report_name,
        }
    }
}

/// Aggregate of a whole run, written once as `reports_summary.json`
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total_reports: usize,
    #[serde(serialize_with = "serialize_millis")]
    pub processed_at: DateTime<Utc>,
    pub query_config: ExtractConfig,
    pub reports: Vec<ReportOutcome>,
}

impl RunSummary {
    /// Build the summary, timestamped now
    pub fn new(
        total_reports: usize,
        query_config: ExtractConfig,
        reports: Vec<ReportOutcome>,
    ) -> Self {
        Self {
            total_reports,
            processed_at: Utc::now(),
            query_config,
            reports,
        }
    }

    pub fn processed_count(&self) -> usize {
        self.reports.iter().filter(|r| r.is_processed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.reports.len() - self.processed_count()
    }
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`
fn serialize_millis<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
}
