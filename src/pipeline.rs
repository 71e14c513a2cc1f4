//! Report extraction pipeline
//!
//! login → reset output → build query → fetch all → describe each → write
//! summary → logout. Logout runs whether or not the middle stages succeed.

use crate::client::{Credentials, ReportsApi, Session};
use crate::config::ExtractConfig;
use crate::reports::{ReportEnricher, ReportQuery, ReportsExtractor, RunSummary, error_message};
use crate::storage::ReportDirectory;
use eyre::Result;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// Where the pipeline is in its run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Authenticating,
    Querying,
    Fetching,
    Enriching,
    Summarizing,
    LoggedOut,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Authenticating => "authenticating",
            Self::Querying => "querying",
            Self::Fetching => "fetching",
            Self::Enriching => "enriching",
            Self::Summarizing => "summarizing",
            Self::LoggedOut => "logged out",
        };
        write!(f, "{}", name)
    }
}

/// Extracts metadata for every report into an output directory
///
/// # Example
/// ```no_run
/// use sf_report_metadata::client::{Credentials, SalesforceClient};
/// use sf_report_metadata::config::ExtractConfig;
/// use sf_report_metadata::pipeline::ReportPipeline;
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let client = SalesforceClient::try_new(Url::parse("https://login.salesforce.com")?, "62.0")?;
/// let credentials = Credentials::new("user@example.com", "password", "token");
///
/// let mut pipeline = ReportPipeline::new(
///     client,
///     credentials,
///     ExtractConfig::default(),
///     "report_metadata",
/// );
/// let summary = pipeline.run().await?;
/// println!("{} report(s) processed", summary.processed_count());
/// # Ok(())
/// # }
/// ```
pub struct ReportPipeline<A> {
    api: A,
    credentials: Credentials,
    config: ExtractConfig,
    output_dir: PathBuf,
    stage: Stage,
}

impl<A: ReportsApi> ReportPipeline<A> {
    pub fn new(
        api: A,
        credentials: Credentials,
        config: ExtractConfig,
        output_dir: impl AsRef<Path>,
    ) -> Self {
        Self {
            api,
            credentials,
            config,
            output_dir: output_dir.as_ref().to_path_buf(),
            stage: Stage::Idle,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn enter(&mut self, stage: Stage) {
        log::debug!("Pipeline stage: {} -> {}", self.stage, stage);
        self.stage = stage;
    }

    /// Run the pipeline to completion
    ///
    /// Per-report failures are recorded in the summary and never end the
    /// run. Any other failure is logged and returned; files written so far
    /// are left in place. Every exit path ends with the logout step.
    ///
    /// # Errors
    /// Returns an error if login, directory setup, the listing, or the
    /// summary write fails
    pub async fn run(&mut self) -> Result<RunSummary> {
        self.enter(Stage::Authenticating);
        let (session, result) = match self.api.login(&self.credentials).await {
            Ok(session) => {
                log::info!("Connected to Salesforce successfully!");
                let result = self.extract(&session).await;
                (Some(session), result)
            }
            Err(e) => (None, Err(e)),
        };

        if let Err(e) = &result {
            log::error!("Error: {}", error_message(e));
        }

        self.logout(session).await;
        result
    }

    async fn extract(&mut self, session: &Session) -> Result<RunSummary> {
        self.enter(Stage::Querying);
        let directory = ReportDirectory::reset(&self.output_dir)?;
        let query = ReportQuery::from_config(&self.config);

        log::info!("Fetching all reports...");
        log::info!("Using configuration: {}", self.config);

        self.enter(Stage::Fetching);
        let fetched = ReportsExtractor::new(&self.api, session, &query)
            .fetch_all()
            .await?;
        log::info!("Found {} reports in total", fetched.total_size);
        log::info!("Using query: {}", fetched.query.bright_black());

        self.enter(Stage::Enriching);
        let enricher = ReportEnricher::new(&self.api, session);
        let total = fetched.records.len();
        let mut outcomes = Vec::with_capacity(total);
        for (index, report) in fetched.records.iter().enumerate() {
            let outcome = enricher
                .enrich_with(report, index, total, |metadata| {
                    directory.write_report(metadata).map(|_| ())
                })
                .await;
            outcomes.push(outcome);
        }

        self.enter(Stage::Summarizing);
        let summary = RunSummary::new(fetched.total_size, self.config.clone(), outcomes);
        let summary_path = directory.write_summary(&summary)?;

        log::info!("Processing complete!");
        log::info!(
            "Summary file saved to: {}",
            summary_path.display().bright_black()
        );

        Ok(summary)
    }

    /// Best-effort logout; a failure here is only a warning
    async fn logout(&mut self, session: Option<Session>) {
        match session {
            Some(session) => {
                if let Err(e) = self.api.logout(&session).await {
                    log::warn!("Failed to log out: {}", error_message(&e));
                }
            }
            None => log::debug!("No session was opened, nothing to close"),
        }
        self.enter(Stage::LoggedOut);
        log::info!("Logged out of Salesforce");
    }
}
