//! Salesforce API client and authentication.
//!
//! This module provides the [`ReportsApi`] seam the pipeline is written
//! against, its HTTP implementation [`SalesforceClient`], and the
//! authentication types ([`Credentials`], [`Session`]).

mod api;
mod auth;
mod salesforce;

pub use api::{QueryPage, ReportsApi};
pub use auth::{Credentials, Session};
pub use salesforce::SalesforceClient;
