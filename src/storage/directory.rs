//! Flat output directory of report JSON files

use crate::reports::{ReportMetadata, RunSummary};
use eyre::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "reports_summary.json";

/// Output directory holding one `<name>.json` per report and the run summary
pub struct ReportDirectory {
    path: PathBuf,
}

impl ReportDirectory {
    /// Clear out any previous run and recreate the directory empty
    ///
    /// Everything inside an existing directory is removed along with the
    /// directory itself; nothing from an earlier run survives.
    pub fn reset(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if path.exists() {
            log::info!("Cleaning up existing results...");
            for entry in std::fs::read_dir(&path)
                .with_context(|| format!("Failed to read directory: {}", path.display()))?
            {
                let entry_path = entry?.path();
                log::trace!("Removing {}", entry_path.display());
                let removed = match entry_path.is_dir() {
                    true => std::fs::remove_dir_all(&entry_path),
                    false => std::fs::remove_file(&entry_path),
                };
                removed.with_context(|| format!("Failed to remove: {}", entry_path.display()))?;
            }
            std::fs::remove_dir(&path)
                .with_context(|| format!("Failed to remove directory: {}", path.display()))?;
            log::info!("Cleanup complete.");
        }

        std::fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        log::debug!("Output directory ready: {}", path.display());

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path a report with this display name is written to
    pub fn report_path(&self, report_name: &str) -> PathBuf {
        self.path
            .join(format!("{}.json", sanitize_file_name(report_name)))
    }

    pub fn summary_path(&self) -> PathBuf {
        self.path.join(SUMMARY_FILE)
    }

    /// Write one report's metadata; a report whose name sanitizes to an
    /// existing file overwrites it
    pub fn write_report(&self, metadata: &ReportMetadata) -> Result<PathBuf> {
        let path = self.report_path(&metadata.basic_info.name);
        if path.exists() {
            log::debug!(
                "Overwriting {} with report '{}'",
                path.display(),
                metadata.basic_info.name
            );
        }
        write_json(&path, metadata)?;
        Ok(path)
    }

    pub fn write_summary(&self, summary: &RunSummary) -> Result<PathBuf> {
        let path = self.summary_path();
        write_json(&path, summary)?;
        log::debug!("Wrote summary to {}", path.display().bright_black());
        Ok(path)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Replace every character outside `[A-Za-z0-9]` with `_`
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
