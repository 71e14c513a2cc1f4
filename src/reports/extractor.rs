//! Paginated report listing
//!
//! Runs the SOQL listing query and follows `nextRecordsUrl` cursors until
//! Salesforce reports `done`.

use super::{ReportDescriptor, ReportQuery};
use crate::client::{QueryPage, ReportsApi, Session};
use eyre::Result;
use futures::{Stream, TryStreamExt, stream};

/// Every report returned by one listing run, in service order
#[derive(Clone, Debug)]
pub struct FetchedReports {
    pub records: Vec<ReportDescriptor>,
    pub total_size: usize,
    pub query: String,
}

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Fetcher for the report listing
///
/// Borrows the API client and the session for the duration of the fetch.
pub struct ReportsExtractor<'a, A> {
    api: &'a A,
    session: &'a Session,
    soql: String,
}

impl<'a, A: ReportsApi> ReportsExtractor<'a, A> {
    pub fn new(api: &'a A, session: &'a Session, query: &ReportQuery) -> Self {
        Self {
            api,
            session,
            soql: query.to_string(),
        }
    }

    /// Lazily yield result batches, starting from the first query.
    ///
    /// Each call starts a fresh listing. The stream ends after the batch
    /// flagged `done`; a batch that is not done but carries no cursor is an
    /// error.
    pub fn pages(&self) -> impl Stream<Item = Result<QueryPage>> + Send + '_ {
        let soql = self.soql.as_str();
        stream::try_unfold(Cursor::Start, move |cursor| async move {
            let page = match cursor {
                Cursor::Start => self.api.query(self.session, soql).await?,
                Cursor::Next(url) => self.api.query_more(self.session, &url).await?,
                Cursor::Done => return Ok(None),
            };

            let next = match (page.done, &page.next_records_url) {
                (true, _) => Cursor::Done,
                (false, Some(url)) => Cursor::Next(url.clone()),
                (false, None) => {
                    eyre::bail!("Query returned more records but no nextRecordsUrl")
                }
            };

            Ok::<_, eyre::Report>(Some((page, next)))
        })
    }

    /// Fetch every page and concatenate the records in order
    pub async fn fetch_all(&self) -> Result<FetchedReports> {
        let mut records = Vec::new();
        let mut pages = std::pin::pin!(self.pages());
        let mut continuation = false;

        while let Some(page) = pages.try_next().await? {
            records.extend(page.records);
            if continuation {
                log::info!("Fetched {} reports so far...", records.len());
            }
            continuation = true;
        }

        Ok(FetchedReports {
            total_size: records.len(),
            records,
            query: self.soql.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractConfig;
    use crate::reports::test_helpers::{MockApi, page, session};

    fn report(id: &str) -> ReportDescriptor {
        ReportDescriptor::new(id, format!("Report {}", id))
    }

    fn query() -> ReportQuery {
        ReportQuery::from_config(&ExtractConfig::default())
    }

    #[tokio::test]
    async fn test_two_pages_of_one() {
        let api = MockApi::with_pages(vec![
            page(vec![report("a")], Some(1)),
            page(vec![report("b")], None),
        ]);
        let session = session();

        let fetched = ReportsExtractor::new(&api, &session, &query())
            .fetch_all()
            .await
            .unwrap();

        assert_eq!(fetched.total_size, 2);
        let ids: Vec<_> = fetched.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(
            fetched.query,
            "SELECT Id, Name, FolderName, LastRunDate FROM Report"
        );
    }

    #[tokio::test]
    async fn test_pages_are_concatenated_in_order() {
        let pages = vec![
            page(vec![report("1"), report("2"), report("3")], Some(1)),
            page(vec![], Some(2)),
            page(vec![report("4"), report("2")], None),
        ];
        let expected: usize = pages.iter().map(|p| p.records.len()).sum();
        let api = MockApi::with_pages(pages);
        let session = session();

        let fetched = ReportsExtractor::new(&api, &session, &query())
            .fetch_all()
            .await
            .unwrap();

        assert_eq!(fetched.total_size, expected);
        let ids: Vec<_> = fetched.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3", "4", "2"]);
        assert_eq!(
            api.calls(),
            [
                "query SELECT Id, Name, FolderName, LastRunDate FROM Report",
                "query_more /services/data/v62.0/query/01g-1",
                "query_more /services/data/v62.0/query/01g-2",
            ]
        );
    }

    #[tokio::test]
    async fn test_single_done_page_never_continues() {
        let api = MockApi::with_pages(vec![page(vec![report("a")], None)]);
        let session = session();

        let fetched = ReportsExtractor::new(&api, &session, &query())
            .fetch_all()
            .await
            .unwrap();

        assert_eq!(fetched.total_size, 1);
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_cursor_is_an_error() {
        let mut broken = page(vec![report("a")], None);
        broken.done = false;
        let api = MockApi::with_pages(vec![broken]);
        let session = session();

        let result = ReportsExtractor::new(&api, &session, &query())
            .fetch_all()
            .await;
        assert!(result.unwrap_err().to_string().contains("nextRecordsUrl"));
    }

    #[tokio::test]
    async fn test_continuation_failure_aborts() {
        let api = MockApi::with_pages(vec![page(vec![report("a")], Some(7))]);
        let session = session();

        let result = ReportsExtractor::new(&api, &session, &query())
            .fetch_all()
            .await;
        assert!(result.is_err());
    }
}
