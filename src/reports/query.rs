//! SOQL listing query for the Report object

use crate::config::ExtractConfig;

const BASE_QUERY: &str = "SELECT Id, Name, FolderName, LastRunDate FROM Report";

/// The report listing query, rendered with `Display`
///
/// Filter values are inserted verbatim; the caller is responsible for
/// supplying a valid SOQL datetime literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportQuery {
    conditions: Vec<String>,
}

impl ReportQuery {
    pub fn from_config(config: &ExtractConfig) -> Self {
        let mut conditions = Vec::new();
        if let Some(date) = &config.last_run_date {
            conditions.push(format!("LastRunDate > {}", date));
        }
        Self { conditions }
    }

    pub fn is_filtered(&self) -> bool {
        !self.conditions.is_empty()
    }
}

impl std::fmt::Display for ReportQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", BASE_QUERY)?;
        if self.is_filtered() {
            write!(f, " WHERE {}", self.conditions.join(" AND "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfiltered_query() {
        let query = ReportQuery::from_config(&ExtractConfig::default());
        assert!(!query.is_filtered());
        assert_eq!(
            query.to_string(),
            "SELECT Id, Name, FolderName, LastRunDate FROM Report"
        );
    }

    #[test]
    fn test_last_run_date_filter() {
        let config = ExtractConfig::new(Some("2024-01-01T00:00:00Z".to_string()));
        let query = ReportQuery::from_config(&config);
        assert_eq!(
            query.to_string(),
            "SELECT Id, Name, FolderName, LastRunDate FROM Report WHERE LastRunDate > 2024-01-01T00:00:00Z"
        );
    }

    #[test]
    fn test_filter_value_is_not_interpreted() {
        let config = ExtractConfig::new(Some("LAST_N_DAYS:30".to_string()));
        let query = ReportQuery::from_config(&config);
        assert!(query.to_string().ends_with("WHERE LastRunDate > LAST_N_DAYS:30"));
    }
}
