//! Mite REST API client.
//!
//! Wraps the four calls the CLI needs:
//! - creating a time entry
//! - listing projects and services (for name resolution)
//! - listing time entries for a timesheet
//!
//! Calls are blocking and issued one at a time. Payloads are read
//! leniently: missing or mistyped fields become neutral values instead of
//! failing the whole response.

use std::fmt;

use chrono::NaiveDate;
use mt_core::{Candidate, NO_DESCRIPTION, Period, TimeEntry};
use reqwest::blocking::RequestBuilder;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

const API_KEY_HEADER: &str = "X-MiteApiKey";
const USER_AGENT: &str = concat!("mt/", env!("CARGO_PKG_VERSION"));

/// API client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The account or API key was unusable.
    #[error("invalid credentials: {reason}")]
    InvalidCredentials { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("server returned {status}\nResponse: {body}")]
    Status { status: u16, body: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Mite API client bound to one account.
pub struct Client {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Fields for a new time entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewTimeEntry {
    pub minutes: u32,
    pub note: String,
    /// Defaults to today on the server when absent.
    #[serde(rename = "date_at", skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<u64>,
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    time_entry: &'a NewTimeEntry,
}

/// Filters for listing time entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryQuery {
    pub period: Option<Period>,
    pub project_id: Option<u64>,
    pub service_id: Option<u64>,
    pub limit: Option<u32>,
}

impl EntryQuery {
    /// Query-string parameters for `GET /time_entries.json`.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        match self.period {
            Some(Period::At { at }) => params.push(("at", at.as_param().to_string())),
            Some(Period::Range { from, to }) => {
                if let Some(from) = from {
                    params.push(("from", from.format("%Y-%m-%d").to_string()));
                }
                if let Some(to) = to {
                    params.push(("to", to.format("%Y-%m-%d").to_string()));
                }
            }
            None => {}
        }
        if let Some(id) = self.project_id {
            params.push(("project_id", id.to_string()));
        }
        if let Some(id) = self.service_id {
            params.push(("service_id", id.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

impl Client {
    /// Creates a client for `https://<account>.mite.de`.
    ///
    /// # Errors
    ///
    /// Returns an error if the account or API key is empty or
    /// whitespace-only, or if the HTTP client fails to build.
    pub fn new(account: &str, api_key: impl Into<String>) -> Result<Self, ApiError> {
        let account = account.trim();
        if account.is_empty() {
            return Err(ApiError::InvalidCredentials {
                reason: "account cannot be empty",
            });
        }
        Self::with_base_url(format!("https://{account}.mite.de"), api_key)
    }

    /// Creates a client against an explicit base URL.
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ApiError::InvalidCredentials {
                reason: "API key cannot be empty",
            });
        }

        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates a time entry and returns it as stored by the server.
    pub fn create_time_entry(&self, entry: &NewTimeEntry) -> Result<TimeEntry, ApiError> {
        tracing::debug!(
            minutes = entry.minutes,
            date = ?entry.date,
            project_id = ?entry.project_id,
            service_id = ?entry.service_id,
            "creating time entry"
        );
        let request = self
            .http
            .post(self.url("time_entries.json"))
            .json(&CreateRequest { time_entry: entry });
        let payload: Value = self.send(request)?;

        let created = payload
            .get("time_entry")
            .ok_or_else(|| ApiError::InvalidResponse("missing time_entry object".to_string()))?;
        Ok(entry_from_value(created))
    }

    /// All projects, in the order the server lists them.
    pub fn projects(&self) -> Result<Vec<Candidate>, ApiError> {
        self.list_named("projects", "project")
    }

    /// All services, in the order the server lists them.
    pub fn services(&self) -> Result<Vec<Candidate>, ApiError> {
        self.list_named("services", "service")
    }

    /// Time entries matching `query`, in the order the server returns them.
    pub fn time_entries(&self, query: &EntryQuery) -> Result<Vec<TimeEntry>, ApiError> {
        let params = query.to_params();
        tracing::debug!(?params, "fetching time entries");

        let request = self.http.get(self.url("time_entries.json")).query(&params);
        let items: Vec<Value> = self.send(request)?;

        let entries: Vec<TimeEntry> = items
            .iter()
            .map(|item| entry_from_value(item.get("time_entry").unwrap_or(item)))
            .collect();
        tracing::debug!(count = entries.len(), "fetched time entries");
        Ok(entries)
    }

    fn list_named(&self, resource: &str, key: &str) -> Result<Vec<Candidate>, ApiError> {
        let items: Vec<Value> = self.send(self.http.get(self.url(&format!("{resource}.json"))))?;

        let mut candidates = Vec::with_capacity(items.len());
        for item in &items {
            match candidate_from_value(item.get(key).unwrap_or(item)) {
                Some(candidate) => candidates.push(candidate),
                None => tracing::warn!(%item, "skipping {key} without id or name"),
            }
        }
        tracing::debug!(count = candidates.len(), "fetched {resource}");
        Ok(candidates)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .header(API_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|err| ApiError::InvalidResponse(err.to_string()))
    }
}

fn candidate_from_value(value: &Value) -> Option<Candidate> {
    let id = value.get("id")?.as_u64()?;
    let name = value.get("name")?.as_str()?;
    Some(Candidate::new(id, name))
}

/// Reads a time entry object, defaulting anything missing or malformed.
fn entry_from_value(value: &Value) -> TimeEntry {
    let text = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let date = text("date_at").and_then(|raw| {
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .inspect_err(|err| tracing::warn!(%raw, %err, "ignoring malformed entry date"))
            .ok()
    });
    let minutes = value
        .get("minutes")
        .and_then(Value::as_u64)
        .and_then(|m| u32::try_from(m).ok())
        .unwrap_or(0);

    TimeEntry {
        date,
        minutes,
        note: text("note").unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        project: text("project_name"),
        service: text("service_name"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use httpmock::prelude::*;
    use mt_core::AtFilter;
    use serde_json::json;

    fn client(server: &MockServer) -> Client {
        Client::with_base_url(server.base_url(), "secret-key").unwrap()
    }

    // ========== Construction ==========

    #[test]
    fn client_rejects_empty_api_key() {
        assert!(matches!(
            Client::new("acme", ""),
            Err(ApiError::InvalidCredentials { .. })
        ));
        assert!(matches!(
            Client::new("acme", "   "),
            Err(ApiError::InvalidCredentials { .. })
        ));
    }

    #[test]
    fn client_rejects_empty_account() {
        assert!(matches!(
            Client::new(" ", "key"),
            Err(ApiError::InvalidCredentials { .. })
        ));
    }

    #[test]
    fn client_uses_account_subdomain() {
        let client = Client::new("acme", "key").unwrap();
        assert_eq!(client.base_url(), "https://acme.mite.de");
    }

    #[test]
    fn client_debug_redacts_api_key() {
        let client = Client::new("acme", "secret-key").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }

    // ========== Query parameters ==========

    #[test]
    fn query_params_for_at_filter() {
        let query = EntryQuery {
            period: Some(Period::At {
                at: AtFilter::LastMonth,
            }),
            project_id: Some(7),
            service_id: None,
            limit: Some(50),
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("at", "last_month".to_string()),
                ("project_id", "7".to_string()),
                ("limit", "50".to_string()),
            ]
        );
    }

    #[test]
    fn query_params_for_range() {
        let query = EntryQuery {
            period: Some(Period::Range {
                from: NaiveDate::from_ymd_opt(2025, 1, 1),
                to: None,
            }),
            service_id: Some(3),
            ..EntryQuery::default()
        };
        assert_eq!(
            query.to_params(),
            vec![("from", "2025-01-01".to_string()), ("service_id", "3".to_string())]
        );
    }

    // ========== Requests ==========

    #[test]
    fn projects_are_listed_in_server_order() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/projects.json")
                .header("x-miteapikey", "secret-key");
            then.status(200).json_body(json!([
                {"project": {"id": 2, "name": "Zeta"}},
                {"project": {"id": 1, "name": "Alpha"}},
                {"project": {"name": "no id"}}
            ]));
        });

        let projects = client(&server).projects().unwrap();

        mock.assert();
        assert_eq!(
            projects,
            vec![Candidate::new(2, "Zeta"), Candidate::new(1, "Alpha")]
        );
    }

    #[test]
    fn services_endpoint() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/services.json");
            then.status(200)
                .json_body(json!([{"service": {"id": 9, "name": "Development"}}]));
        });

        let services = client(&server).services().unwrap();

        mock.assert();
        assert_eq!(services, vec![Candidate::new(9, "Development")]);
    }

    #[test]
    fn time_entries_send_filters_and_read_leniently() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/time_entries.json")
                .query_param("at", "this_month")
                .query_param("project_id", "42");
            then.status(200).json_body(json!([
                {"time_entry": {
                    "date_at": "2025-01-06",
                    "minutes": 90,
                    "note": "Review",
                    "project_name": "Acme",
                    "service_name": "Dev"
                }},
                {"time_entry": {
                    "date_at": "not a date",
                    "minutes": "lots",
                    "note": "",
                    "project_name": null
                }}
            ]));
        });

        let query = EntryQuery {
            period: Some(Period::At {
                at: AtFilter::ThisMonth,
            }),
            project_id: Some(42),
            ..EntryQuery::default()
        };
        let entries = client(&server).time_entries(&query).unwrap();

        mock.assert();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0],
            TimeEntry {
                date: NaiveDate::from_ymd_opt(2025, 1, 6),
                minutes: 90,
                note: "Review".to_string(),
                project: Some("Acme".to_string()),
                service: Some("Dev".to_string()),
            }
        );
        assert_eq!(
            entries[1],
            TimeEntry {
                date: None,
                minutes: 0,
                note: NO_DESCRIPTION.to_string(),
                project: None,
                service: None,
            }
        );
    }

    #[test]
    fn create_time_entry_posts_payload() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/time_entries.json")
                .header("x-miteapikey", "secret-key")
                .json_body(json!({
                    "time_entry": {
                        "minutes": 90,
                        "note": "Bug fixing",
                        "date_at": "2025-01-15",
                        "project_id": 5
                    }
                }));
            then.status(201).json_body(json!({
                "time_entry": {
                    "id": 100,
                    "date_at": "2025-01-15",
                    "minutes": 90,
                    "note": "Bug fixing",
                    "project_name": "Acme"
                }
            }));
        });

        let entry = NewTimeEntry {
            minutes: 90,
            note: "Bug fixing".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 15),
            project_id: Some(5),
            service_id: None,
        };
        let created = client(&server).create_time_entry(&entry).unwrap();

        mock.assert();
        assert_eq!(created.minutes, 90);
        assert_eq!(created.project.as_deref(), Some("Acme"));
        assert_eq!(created.service, None);
    }

    #[test]
    fn error_status_includes_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/projects.json");
            then.status(401).body(r#"{"error":"Access denied"}"#);
        });

        let err = client(&server).projects().unwrap_err();

        match &err {
            ApiError::Status { status, body } => {
                assert_eq!(*status, 401);
                assert!(body.contains("Access denied"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("Response: {\"error\":\"Access denied\"}"));
    }

    #[test]
    fn malformed_json_is_invalid_response() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/services.json");
            then.status(200).body("<html>maintenance</html>");
        });

        let err = client(&server).services().unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[test]
    fn unreachable_server_is_request_error() {
        // Port 9 (discard) is not expected to accept HTTP connections
        let client = Client::with_base_url("http://127.0.0.1:9", "key").unwrap();
        assert!(matches!(client.projects(), Err(ApiError::Request(_))));
    }
}
