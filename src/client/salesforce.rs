//! Salesforce HTTP client
//!
//! Implements [`ReportsApi`] on top of the SOAP partner API (login/logout)
//! and the REST API (SOQL query and report describe).

use super::{Credentials, QueryPage, ReportsApi, Session};
use crate::config::Settings;
use eyre::{Context, Result, eyre};
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

const PARTNER_NS: &str = "urn:partner.soap.sforce.com";

/// Salesforce client for a single org.
///
/// The client itself is stateless with respect to authentication: login
/// returns a [`Session`] which must be passed back into every other call.
///
/// # Example
/// ```no_run
/// use sf_report_metadata::client::{Credentials, ReportsApi, SalesforceClient};
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let url = Url::parse("https://login.salesforce.com")?;
/// let client = SalesforceClient::try_new(url, "62.0")?;
///
/// let credentials = Credentials::new("user@example.com", "password", "token");
/// let session = client.login(&credentials).await?;
/// let page = client
///     .query(&session, "SELECT Id, Name FROM Report")
///     .await?;
/// println!("{} report(s) in the first batch", page.records.len());
/// client.logout(&session).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct SalesforceClient {
    client: Client,
    login_url: Url,
    api_version: String,
}

impl SalesforceClient {
    /// Create a new client from a login URL and an API version such as `62.0`.
    pub fn try_new(login_url: Url, api_version: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .with_context(|| "Failed to build HTTP client")?;
        Ok(Self {
            client,
            login_url,
            api_version: api_version.into(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::try_new(settings.login_url.clone(), settings.api_version.clone())
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    fn soap_path(&self) -> String {
        format!("services/Soap/u/{}", self.api_version)
    }

    fn rest_url(&self, session: &Session, path: &str) -> Result<Url> {
        let path = format!(
            "services/data/v{}/{}",
            self.api_version,
            path.strip_prefix('/').unwrap_or(path)
        );
        session
            .instance_url()
            .join(&path)
            .with_context(|| format!("Invalid REST path: {}", path))
    }

    /// POST a SOAP envelope and return the response body.
    ///
    /// SOAP faults are reported with HTTP 500, so the fault string is checked
    /// before the status code.
    async fn soap_call(&self, url: Url, action: &str, envelope: String) -> Result<String> {
        log::debug!("SOAP {} -> {}", action, url);

        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "text/xml; charset=UTF-8")
            .header("SOAPAction", action)
            .body(envelope)
            .send()
            .await
            .map_err(|e| eyre!("Failed to send {} request: {}", action, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read {} response", action))?;

        if let Some(fault) = extract_tag(&body, "faultstring")? {
            eyre::bail!("{}", fault);
        }
        if !status.is_success() {
            eyre::bail!("{} failed ({}): {}", action, status, body);
        }

        Ok(body)
    }

    /// GET a REST resource with the session's bearer token.
    async fn get_json<T: DeserializeOwned>(
        &self,
        session: &Session,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<T> {
        log::debug!("GET {}", url.path());

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(session.session_id())
            .query(query)
            .send()
            .await
            .map_err(|e| eyre!("Failed to send request: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => format!("<response body unreadable: {}>", e),
            };
            eyre::bail!("{}", describe_api_error(status, &body));
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url.path()))
    }
}

impl ReportsApi for SalesforceClient {
    async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let url = self
            .login_url
            .join(&self.soap_path())
            .with_context(|| format!("Invalid login URL: {}", self.login_url))?;

        let envelope = soap_envelope(
            None,
            &format!(
                "<n1:login xmlns:n1=\"{}\"><n1:username>{}</n1:username><n1:password>{}</n1:password></n1:login>",
                PARTNER_NS,
                xml_escape(credentials.username()),
                xml_escape(&credentials.login_password()),
            ),
        );

        let body = self.soap_call(url, "login", envelope).await?;

        let session_id = extract_tag(&body, "sessionId")?
            .ok_or_else(|| eyre!("Login response did not contain a sessionId"))?;
        let server_url = extract_tag(&body, "serverUrl")?
            .ok_or_else(|| eyre!("Login response did not contain a serverUrl"))?;
        let instance_url = instance_url(&server_url)?;

        log::debug!("Logged in as {} on {}", credentials.username(), instance_url);

        Ok(Session::new(session_id, instance_url))
    }

    async fn logout(&self, session: &Session) -> Result<()> {
        let url = session
            .instance_url()
            .join(&self.soap_path())
            .with_context(|| "Invalid logout URL")?;

        let envelope = soap_envelope(
            Some(session.session_id()),
            &format!("<n1:logout xmlns:n1=\"{}\" />", PARTNER_NS),
        );

        self.soap_call(url, "logout", envelope).await?;
        Ok(())
    }

    async fn query(&self, session: &Session, soql: &str) -> Result<QueryPage> {
        let url = self.rest_url(session, "query")?;
        log::trace!("SOQL: {}", soql);
        self.get_json(session, url, &[("q", soql)]).await
    }

    async fn query_more(&self, session: &Session, cursor: &str) -> Result<QueryPage> {
        let url = session
            .instance_url()
            .join(cursor)
            .with_context(|| format!("Invalid query cursor: {}", cursor))?;
        self.get_json(session, url, &[]).await
    }

    async fn describe_report(&self, session: &Session, report_id: &str) -> Result<Value> {
        let url = self.rest_url(session, &format!("analytics/reports/{}/describe", report_id))?;
        self.get_json(session, url, &[]).await
    }
}

/// Error entry returned by the REST API on failure
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiError {
    #[serde(default)]
    error_code: Option<String>,
    message: String,
}

/// Render a REST error body as `errorCode: message`, falling back to the raw body.
fn describe_api_error(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<Vec<ApiError>>(body) {
        Ok(errors) if !errors.is_empty() => errors
            .into_iter()
            .map(|e| match e.error_code {
                Some(code) => format!("{}: {}", code, e.message),
                None => e.message,
            })
            .collect::<Vec<_>>()
            .join("; "),
        _ => format!("Request failed ({}): {}", status, body),
    }
}

fn soap_envelope(session_id: Option<&str>, body: &str) -> String {
    let header = match session_id {
        Some(id) => format!(
            "<env:Header><n1:SessionHeader xmlns:n1=\"{}\"><n1:sessionId>{}</n1:sessionId></n1:SessionHeader></env:Header>",
            PARTNER_NS,
            xml_escape(id)
        ),
        None => String::new(),
    };
    format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"utf-8\" ?>",
            "<env:Envelope xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\" ",
            "xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" ",
            "xmlns:env=\"http://schemas.xmlsoap.org/soap/envelope/\">",
            "{}<env:Body>{}</env:Body></env:Envelope>"
        ),
        header, body
    )
}

/// Text content of the first `<tag>` element, ignoring any namespace prefix.
fn extract_tag(xml: &str, tag: &str) -> Result<Option<String>> {
    let pattern = format!(
        r"<(?:\w+:)?{0}(?:\s[^>]*)?>([^<]*)</(?:\w+:)?{0}>",
        regex::escape(tag)
    );
    let re = Regex::new(&pattern).with_context(|| format!("Invalid pattern for <{}>", tag))?;
    Ok(re
        .captures(xml)
        .and_then(|c| c.get(1))
        .map(|m| xml_unescape(m.as_str())))
}

/// `https://na1.salesforce.com/services/Soap/u/62.0/00D...` -> `https://na1.salesforce.com/`
fn instance_url(server_url: &str) -> Result<Url> {
    let mut url =
        Url::parse(server_url).with_context(|| format!("Invalid serverUrl: {}", server_url))?;
    url.set_path("/");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn xml_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn xml_unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
