//! The remote operations the report pipeline depends on

use super::{Credentials, Session};
use crate::reports::ReportDescriptor;
use eyre::Result;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;

/// One batch of a SOQL query result
///
/// When `done` is false, `next_records_url` is the cursor for the next batch.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPage {
    pub done: bool,
    #[serde(default)]
    pub records: Vec<ReportDescriptor>,
    #[serde(default)]
    pub next_records_url: Option<String>,
}

/// Remote Salesforce operations used by the pipeline
///
/// Every call that needs authorization borrows the [`Session`] returned by
/// [`ReportsApi::login`]; implementors hold no session state of their own.
pub trait ReportsApi: Send + Sync {
    /// Open a session
    fn login(&self, credentials: &Credentials) -> impl Future<Output = Result<Session>> + Send;

    /// Close a session
    fn logout(&self, session: &Session) -> impl Future<Output = Result<()>> + Send;

    /// Run a SOQL query and return its first batch
    fn query(
        &self,
        session: &Session,
        soql: &str,
    ) -> impl Future<Output = Result<QueryPage>> + Send;

    /// Fetch the batch behind a continuation cursor
    fn query_more(
        &self,
        session: &Session,
        cursor: &str,
    ) -> impl Future<Output = Result<QueryPage>> + Send;

    /// Fetch the raw describe payload of a single report
    fn describe_report(
        &self,
        session: &Session,
        report_id: &str,
    ) -> impl Future<Output = Result<Value>> + Send;
}
