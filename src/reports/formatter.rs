//! Reshapes a report describe payload into [`ReportMetadata`]

use super::{
    AdditionalInfo, BasicInfo, ReportDescriptor, ReportFields, ReportFilters, ReportMetadata,
};
use crate::etl::Transformer;
use eyre::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

/// A listed report paired with its raw describe payload
pub struct DescribedReport {
    pub descriptor: ReportDescriptor,
    pub description: Value,
}

/// Shape of `GET /analytics/reports/{id}/describe` that we care about.
///
/// Only `reportMetadata.reportType.label` is required. Everything else is
/// passed through untouched, whatever its type.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportDescription {
    report_metadata: DescribedMetadata,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescribedMetadata {
    report_type: ReportType,
    detail_columns: Option<Value>,
    groupings_down: Option<Value>,
    groupings_across: Option<Value>,
    report_filters: Option<Value>,
    cross_filters: Option<Value>,
    scope_filters: Option<Value>,
    historical_snapshot_dates: Option<Value>,
    currency: Option<Value>,
    show_grand_total: Option<Value>,
    show_subtotals: Option<Value>,
}

#[derive(Deserialize)]
struct ReportType {
    label: String,
}

/// Transformer from a [`DescribedReport`] to [`ReportMetadata`]
///
/// # Example
/// ```
/// use sf_report_metadata::etl::Transformer;
/// use sf_report_metadata::reports::{DescribedReport, ReportDescriptor, ReportFormatter};
/// use serde_json::json;
///
/// let report = DescribedReport {
///     descriptor: ReportDescriptor::new("00O1", "Pipeline"),
///     description: json!({"reportMetadata": {"reportType": {"label": "Opportunities"}}}),
/// };
///
/// let metadata = ReportFormatter.transform(report).unwrap();
/// assert_eq!(metadata.basic_info.report_type, "Opportunities");
/// assert_eq!(metadata.fields.detail_columns, json!([]));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ReportFormatter;

impl Transformer for ReportFormatter {
    type Input = DescribedReport;
    type Output = ReportMetadata;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        let DescribedReport {
            descriptor,
            description,
        } = input;

        let description: ReportDescription = serde_json::from_value(description)
            .wrap_err("Unexpected report description")?;
        let meta = description.report_metadata;

        Ok(ReportMetadata {
            basic_info: BasicInfo {
                id: descriptor.id,
                name: descriptor.name,
                folder_name: descriptor.folder_name,
                report_type: meta.report_type.label,
            },
            fields: ReportFields {
                detail_columns: list_or_empty(meta.detail_columns),
                groupings_down: list_or_empty(meta.groupings_down),
                groupings_across: list_or_empty(meta.groupings_across),
            },
            filters: ReportFilters {
                standard_filters: list_or_empty(meta.report_filters),
                cross_filters: list_or_empty(meta.cross_filters),
                scope_filters: list_or_empty(meta.scope_filters),
                historical_filters: list_or_empty(meta.historical_snapshot_dates),
            },
            additional_info: AdditionalInfo {
                currency: meta.currency,
                show_grand_total: meta.show_grand_total,
                show_subtotals: meta.show_subtotals,
                last_run_date: descriptor.last_run_date,
            },
        })
    }
}

/// Absent and null lists become `[]`; any other value is kept as-is
fn list_or_empty(value: Option<Value>) -> Value {
    match value {
        None | Some(Value::Null) => Value::Array(Vec::new()),
        Some(value) => value,
    }
}
