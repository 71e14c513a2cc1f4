//! Per-report metadata retrieval with failure isolation

use super::{
    DescribedReport, ReportDescriptor, ReportFailure, ReportFormatter, ReportMetadata,
    ReportOutcome,
};
use crate::client::{ReportsApi, Session};
use crate::etl::Transformer;
use eyre::Result;
use owo_colors::OwoColorize;
use std::time::{Duration, Instant};

/// Describes and reshapes reports one at a time
///
/// [`ReportEnricher::enrich`] never fails: any error while describing or
/// reshaping a report becomes a [`ReportOutcome::Failed`] for that report.
pub struct ReportEnricher<'a, A> {
    api: &'a A,
    session: &'a Session,
    formatter: ReportFormatter,
}

impl<'a, A: ReportsApi> ReportEnricher<'a, A> {
    pub fn new(api: &'a A, session: &'a Session) -> Self {
        Self {
            api,
            session,
            formatter: ReportFormatter,
        }
    }

    /// Describe one report; `index` is zero-based and only used for progress output
    pub async fn enrich(
        &self,
        descriptor: &ReportDescriptor,
        index: usize,
        total: usize,
    ) -> ReportOutcome {
        self.enrich_with(descriptor, index, total, |_| Ok(())).await
    }

    /// Like [`ReportEnricher::enrich`], also running `persist` on the metadata
    ///
    /// A `persist` failure is isolated the same way as a describe failure.
    pub async fn enrich_with<F>(
        &self,
        descriptor: &ReportDescriptor,
        index: usize,
        total: usize,
        persist: F,
    ) -> ReportOutcome
    where
        F: FnOnce(&ReportMetadata) -> Result<()>,
    {
        let started = Instant::now();

        let result = match self.describe(descriptor).await {
            Ok(metadata) => persist(&metadata).map(|_| metadata),
            Err(e) => Err(e),
        };

        let elapsed = format_duration(started.elapsed());
        match result {
            Ok(metadata) => {
                log::info!(
                    "{} Processed: {} ({}/{}) - Time: {}",
                    "✓".green(),
                    descriptor.name,
                    index + 1,
                    total,
                    elapsed
                );
                ReportOutcome::Processed(metadata)
            }
            Err(e) => {
                let message = error_message(&e);
                log::error!(
                    "Error processing report {} ({}/{}) - Time: {}: {}",
                    descriptor.name,
                    index + 1,
                    total,
                    elapsed,
                    message.red()
                );
                ReportOutcome::Failed(ReportFailure::new(&descriptor.name, message))
            }
        }
    }

    async fn describe(&self, descriptor: &ReportDescriptor) -> Result<ReportMetadata> {
        log::debug!("Describing report '{}' ({})", descriptor.name, descriptor.id);
        let description = self
            .api
            .describe_report(self.session, &descriptor.id)
            .await?;
        self.formatter.transform(DescribedReport {
            descriptor: descriptor.clone(),
            description,
        })
    }
}

/// `523ms` below one second, `1.23s` above
pub fn format_duration(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.2}s", millis as f64 / 1000.0)
    }
}

/// Flatten an error and its causes into one line
pub(crate) fn error_message(err: &eyre::Report) -> String {
    err.chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}
