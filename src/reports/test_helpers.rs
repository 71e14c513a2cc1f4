//! In-memory `ReportsApi` used by the unit tests in this module

use crate::client::{Credentials, QueryPage, ReportsApi, Session};
use crate::reports::ReportDescriptor;
use eyre::{Result, eyre};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

pub(crate) fn session() -> Session {
    Session::new("SESSION", Url::parse("https://example.my.salesforce.com").unwrap())
}

/// A page of records; `next` is the index of the following page, if any
pub(crate) fn page(records: Vec<ReportDescriptor>, next: Option<usize>) -> QueryPage {
    QueryPage {
        done: next.is_none(),
        records,
        next_records_url: next.map(|n| format!("/services/data/v62.0/query/01g-{}", n)),
    }
}

pub(crate) fn description(label: &str) -> Value {
    json!({"reportMetadata": {"reportType": {"label": label}, "detailColumns": ["AMOUNT"]}})
}

#[derive(Default)]
pub(crate) struct MockApi {
    pub pages: Vec<QueryPage>,
    pub descriptions: HashMap<String, Value>,
    pub calls: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn with_pages(pages: Vec<QueryPage>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    pub fn describe(mut self, id: &str, description: Value) -> Self {
        self.descriptions.insert(id.to_string(), description);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn page_at(&self, index: usize) -> Result<QueryPage> {
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| eyre!("no page {}", index))
    }
}

impl ReportsApi for MockApi {
    async fn login(&self, credentials: &Credentials) -> Result<Session> {
        self.record(format!("login {}", credentials.username()));
        Ok(session())
    }

    async fn logout(&self, _session: &Session) -> Result<()> {
        self.record("logout".to_string());
        Ok(())
    }

    async fn query(&self, _session: &Session, soql: &str) -> Result<QueryPage> {
        self.record(format!("query {}", soql));
        self.page_at(0)
    }

    async fn query_more(&self, _session: &Session, cursor: &str) -> Result<QueryPage> {
        self.record(format!("query_more {}", cursor));
        let index = cursor
            .rsplit('-')
            .next()
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| eyre!("bad cursor {}", cursor))?;
        self.page_at(index)
    }

    async fn describe_report(&self, _session: &Session, report_id: &str) -> Result<Value> {
        self.record(format!("describe {}", report_id));
        self.descriptions
            .get(report_id)
            .cloned()
            .ok_or_else(|| eyre!("NOT_FOUND: The requested resource does not exist"))
    }
}
