use serde::{Deserialize, Serialize};

/// Listing-level view of one report, as returned by the SOQL query
///
/// Only `Id` and `Name` are required; reports that were never run have a
/// null `LastRunDate`, and reports in a private folder may lack `FolderName`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReportDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub folder_name: Option<String>,
    #[serde(default)]
    pub last_run_date: Option<String>,
}

impl ReportDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            folder_name: None,
            last_run_date: None,
        }
    }

    pub fn with_folder(mut self, folder_name: impl Into<String>) -> Self {
        self.folder_name = Some(folder_name.into());
        self
    }

    pub fn with_last_run_date(mut self, last_run_date: impl Into<String>) -> Self {
        self.last_run_date = Some(last_run_date.into());
        self
    }
}
